use oti_indexer::config::{Config, RequestFormat, SourceConfig};
use oti_indexer::indexer::Coordinator;
use oti_indexer::{DiscoveryError, IndexerError, RunSummary, StudyFilter, StudyId};
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INDEX_PATH: &str = "/db/data/ext/studies/graphdb/index_study";

/// Creates a test configuration pointing at the two mock servers
fn create_test_config(oti_server: &MockServer, api_server: &MockServer) -> Config {
    let mut config = Config::default();
    config.indexer.url = Some(format!("{}/db/data", oti_server.uri()));
    config.indexer.timeout_secs = 1;
    config.indexer.connect_timeout_secs = 1;
    config.source = SourceConfig::LocalApi {
        api_url: format!("{}/api/", api_server.uri()),
    };
    config
}

fn document_url(api_server: &MockServer, id: &str) -> String {
    format!("{}/api/study/{}.json", api_server.uri(), id)
}

async fn mount_study_list(api_server: &MockServer, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/api/study_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ids))
        .expect(1)
        .mount(api_server)
        .await;
}

async fn mount_index_response(
    oti_server: &MockServer,
    url: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path(INDEX_PATH))
        .and(body_json(serde_json::json!({ "url": url })))
        .respond_with(response)
        .expect(times)
        .mount(oti_server)
        .await;
}

async fn run(config: &Config) -> Result<RunSummary, IndexerError> {
    Coordinator::from_config(config, None)
        .expect("Failed to create coordinator")
        .run()
        .await
}

#[tokio::test]
async fn test_full_run_indexes_every_study() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;
    let studies = ["pg_1", "pg_2", "pg_3"];

    mount_study_list(&api_server, &studies).await;
    for id in studies {
        mount_index_response(
            &oti_server,
            &document_url(&api_server, id),
            ResponseTemplate::new(200).set_body_string("true"),
            1,
        )
        .await;
    }

    let config = create_test_config(&oti_server, &api_server);
    let summary = run(&config).await.expect("Run failed");

    assert_eq!(summary.attempted(), 3);
    assert_eq!(summary.succeeded(), 3);
    assert!(!summary.has_failures());
    // Wiremock verifies each study was posted exactly once when the servers drop
}

#[tokio::test]
async fn test_error_map_on_200_is_a_failure() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_study_list(&api_server, &["pg_41", "pg_42"]).await;

    let bad_url = document_url(&api_server, "pg_41");
    mount_index_response(
        &oti_server,
        &bad_url,
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "indexed": [],
            "errors": { bad_url.as_str(): "bad format" }
        })),
        1,
    )
    .await;
    mount_index_response(
        &oti_server,
        &document_url(&api_server, "pg_42"),
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "indexed": ["pg_42"],
            "errors": {}
        })),
        1,
    )
    .await;

    let config = create_test_config(&oti_server, &api_server);
    let summary = run(&config).await.expect("Run failed");

    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.succeeded(), 1);
    let failure = &summary.failures()[0];
    assert_eq!(failure.study_id, StudyId::from("pg_41"));
    assert_eq!(failure.url, bad_url);
    assert_eq!(failure.status, 200);
    assert_eq!(failure.message, "bad format");
}

#[tokio::test]
async fn test_rejected_study_records_status_and_body() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_study_list(&api_server, &["pg_1", "pg_2"]).await;
    mount_index_response(
        &oti_server,
        &document_url(&api_server, "pg_1"),
        ResponseTemplate::new(500).set_body_string("java.lang.NullPointerException"),
        1,
    )
    .await;
    mount_index_response(
        &oti_server,
        &document_url(&api_server, "pg_2"),
        ResponseTemplate::new(200).set_body_string("true"),
        1,
    )
    .await;

    let config = create_test_config(&oti_server, &api_server);
    let summary = run(&config).await.expect("Run failed");

    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failed(), 1);
    let failure = &summary.failures()[0];
    assert_eq!(failure.status, 500);
    assert_eq!(failure.message, "java.lang.NullPointerException");
    assert!(!failure.is_transport());
}

#[tokio::test]
async fn test_transport_failure_mid_batch_continues() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;
    let studies = ["s1", "s2", "s3", "s4", "s5"];

    mount_study_list(&api_server, &studies).await;
    for id in studies {
        let response = if id == "s3" {
            // Outlives the 1s client timeout
            ResponseTemplate::new(200)
                .set_body_string("true")
                .set_delay(Duration::from_secs(5))
        } else {
            ResponseTemplate::new(200).set_body_string("true")
        };
        mount_index_response(&oti_server, &document_url(&api_server, id), response, 1).await;
    }

    let config = create_test_config(&oti_server, &api_server);
    let summary = run(&config).await.expect("Run failed");

    assert_eq!(summary.attempted(), 5);
    assert_eq!(summary.succeeded(), 4);
    assert_eq!(summary.failed(), 1);
    let failure = &summary.failures()[0];
    assert_eq!(failure.study_id, StudyId::from("s3"));
    assert!(failure.is_transport());
}

#[tokio::test]
async fn test_discovery_failure_submits_nothing() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/study_list"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&api_server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&oti_server)
        .await;

    let config = create_test_config(&oti_server, &api_server);
    let err = run(&config).await.unwrap_err();

    assert!(matches!(
        err,
        IndexerError::Discovery(DiscoveryError::Status { status: 502, .. })
    ));
}

#[tokio::test]
async fn test_rerun_gives_same_outcome_classes() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/study_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(["ok_1", "bad_1"]))
        .expect(2)
        .mount(&api_server)
        .await;

    let bad_url = document_url(&api_server, "bad_1");
    mount_index_response(
        &oti_server,
        &document_url(&api_server, "ok_1"),
        ResponseTemplate::new(200).set_body_string("true"),
        2,
    )
    .await;
    mount_index_response(
        &oti_server,
        &bad_url,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "errors": { bad_url.as_str(): "no trees" } })),
        2,
    )
    .await;

    let config = create_test_config(&oti_server, &api_server);
    let first = run(&config).await.expect("First run failed");
    let second = run(&config).await.expect("Second run failed");

    assert_eq!(first.succeeded(), second.succeeded());
    assert_eq!(first.failures(), second.failures());
}

#[tokio::test]
async fn test_trailing_slash_on_oti_url_is_irrelevant() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/study_list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(["pg_1"]))
        .mount(&api_server)
        .await;
    mount_index_response(
        &oti_server,
        &document_url(&api_server, "pg_1"),
        ResponseTemplate::new(200).set_body_string("true"),
        2,
    )
    .await;

    let mut config = create_test_config(&oti_server, &api_server);
    config.indexer.url = Some(format!("{}/db/data/", oti_server.uri()));
    assert_eq!(run(&config).await.unwrap().succeeded(), 1);

    config.indexer.url = Some(format!("{}/db/data", oti_server.uri()));
    config.source = SourceConfig::LocalApi {
        api_url: format!("{}/api", api_server.uri()),
    };
    assert_eq!(run(&config).await.unwrap().succeeded(), 1);
}

#[tokio::test]
async fn test_batch_format_and_custom_index_path() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_study_list(&api_server, &["pg_9"]).await;
    Mock::given(method("POST"))
        .and(path("/db/data/ext/studies/graphdb/index_studies"))
        .and(body_json(serde_json::json!({
            "urls": [document_url(&api_server, "pg_9")]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "indexed": ["pg_9"], "errors": [] })),
        )
        .expect(1)
        .mount(&oti_server)
        .await;

    let mut config = create_test_config(&oti_server, &api_server);
    config.indexer.index_path = "ext/studies/graphdb/index_studies".to_string();
    config.indexer.request_format = RequestFormat::Batch;

    let summary = run(&config).await.expect("Run failed");
    assert_eq!(summary.succeeded(), 1);
}

#[tokio::test]
async fn test_repository_mode_submits_raw_urls() {
    let oti_server = MockServer::start().await;
    let listing_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/OpenTreeOfLife/phylesystem/contents/study"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": "10", "type": "dir"},
        ])))
        .expect(1)
        .mount(&listing_server)
        .await;
    mount_index_response(
        &oti_server,
        "http://raw.example/phylesystem/master/study/10/10.json",
        ResponseTemplate::new(200).set_body_string("true"),
        1,
    )
    .await;

    let mut config = create_test_config(&oti_server, &listing_server);
    config.source = SourceConfig::Repository {
        contents_url: format!("{}/repos/OpenTreeOfLife/phylesystem", listing_server.uri()),
        raw_url: "http://raw.example/phylesystem/master/".to_string(),
    };

    let summary = run(&config).await.expect("Run failed");
    assert_eq!(summary.succeeded(), 1);
}

#[tokio::test]
async fn test_filtered_rerun_only_submits_listed_studies() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_study_list(&api_server, &["pg_1", "pg_2", "pg_3"]).await;
    mount_index_response(
        &oti_server,
        &document_url(&api_server, "pg_2"),
        ResponseTemplate::new(200).set_body_string("true"),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&oti_server)
        .await;

    let config = create_test_config(&oti_server, &api_server);
    let filter = StudyFilter::new([StudyId::from("pg_2")]);
    let summary = Coordinator::from_config(&config, Some(filter))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.attempted(), 1);
    assert_eq!(summary.succeeded(), 1);
}

#[tokio::test]
async fn test_bounded_concurrency_end_to_end() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;
    let studies = ["a", "b", "c", "d", "e", "f"];

    mount_study_list(&api_server, &studies).await;
    for id in studies {
        let status = if id == "d" { 400 } else { 200 };
        mount_index_response(
            &oti_server,
            &document_url(&api_server, id),
            ResponseTemplate::new(status)
                .set_body_string("true")
                .set_delay(Duration::from_millis(50)),
            1,
        )
        .await;
    }

    let mut config = create_test_config(&oti_server, &api_server);
    config.indexer.max_concurrent_submissions = 3;

    let summary = run(&config).await.expect("Run failed");
    assert_eq!(summary.attempted(), 6);
    assert_eq!(summary.succeeded(), 5);
    assert_eq!(summary.failures()[0].study_id, StudyId::from("d"));
}

#[tokio::test]
async fn test_error_keyed_by_study_id_is_a_failure() {
    let oti_server = MockServer::start().await;
    let api_server = MockServer::start().await;

    mount_study_list(&api_server, &["pg_41"]).await;
    mount_index_response(
        &oti_server,
        &document_url(&api_server, "pg_41"),
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": { "pg_41": "bad format" },
            "indexed": 0
        })),
        1,
    )
    .await;

    let config = create_test_config(&oti_server, &api_server);
    let summary = run(&config).await.expect("Run failed");

    assert_eq!(summary.succeeded(), 0);
    let failure = &summary.failures()[0];
    assert_eq!(failure.status, 200);
    assert_eq!(failure.message, "pg_41: bad format");
}

#[tokio::test]
async fn test_dot_segment_id_fails_without_posting() {
    let oti_server = MockServer::start().await;
    let listing_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/o/phylesystem/contents/study"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": ".."},
            {"name": "10"},
        ])))
        .mount(&listing_server)
        .await;
    mount_index_response(
        &oti_server,
        "http://raw.example/master/study/10/10.json",
        ResponseTemplate::new(200).set_body_string("true"),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&oti_server)
        .await;

    let mut config = create_test_config(&oti_server, &listing_server);
    config.source = SourceConfig::Repository {
        contents_url: format!("{}/repos/o/phylesystem", listing_server.uri()),
        raw_url: "http://raw.example/master".to_string(),
    };

    let summary = run(&config).await.expect("Run failed");
    assert_eq!(summary.attempted(), 2);
    assert_eq!(summary.succeeded(), 1);
    assert_eq!(summary.failures()[0].study_id, StudyId::from(".."));
    assert!(summary.failures()[0].url.is_empty());
}
