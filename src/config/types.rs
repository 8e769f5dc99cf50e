use serde::Deserialize;

/// Default content API base, matching a locally deployed phylesystem API
pub const DEFAULT_API_URL: &str = "http://localhost/api/";

/// Default single-study indexing endpoint below the OTI base URL
pub const DEFAULT_INDEX_PATH: &str = "ext/studies/graphdb/index_study";

/// Main configuration structure for an indexing run
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub indexer: IndexerConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Indexing service (OTI) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    /// Base URL of the OTI service, e.g. `http://localhost:7474/db/data/`
    #[serde(default)]
    pub url: Option<String>,

    /// Indexing endpoint path, resolved against `url`
    #[serde(rename = "index-path", default = "default_index_path")]
    pub index_path: String,

    /// Body shape sent to the indexing endpoint
    #[serde(rename = "request-format", default)]
    pub request_format: RequestFormat,

    /// Number of indexing requests allowed in flight at once
    #[serde(rename = "max-concurrent-submissions", default = "default_max_concurrent")]
    pub max_concurrent_submissions: usize,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Per-request connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            url: None,
            index_path: default_index_path(),
            request_format: RequestFormat::default(),
            max_concurrent_submissions: default_max_concurrent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

/// JSON body shape accepted by the indexing endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestFormat {
    /// `{"url": "..."}`
    #[default]
    Single,
    /// `{"urls": ["..."]}`, accepted by the older bulk endpoint
    Batch,
}

/// Where the study list comes from, and how document URLs are formed
///
/// Unknown `kind` values fail at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SourceConfig {
    /// Study ids from `{api-url}study_list`, documents at `{api-url}study/{id}.json`
    LocalApi {
        #[serde(rename = "api-url", default = "default_api_url")]
        api_url: String,
    },

    /// Study ids from `{contents-url}/contents/study`, documents at
    /// `{raw-url}/study/{id}/{id}.json`
    Repository {
        #[serde(rename = "contents-url")]
        contents_url: String,
        #[serde(rename = "raw-url")]
        raw_url: String,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::LocalApi {
            api_url: default_api_url(),
        }
    }
}

/// Client identification sent with every request
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    #[serde(rename = "client-name", default = "default_client_name")]
    pub client_name: String,

    #[serde(rename = "client-version", default = "default_client_version")]
    pub client_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: default_client_name(),
            client_version: default_client_version(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.client_name, self.client_version, contact),
            None => format!("{}/{}", self.client_name, self.client_version),
        }
    }
}

fn default_index_path() -> String {
    DEFAULT_INDEX_PATH.to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_max_concurrent() -> usize {
    1
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_client_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
