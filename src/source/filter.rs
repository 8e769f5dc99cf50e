use crate::source::{StudyId, StudyList};
use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Restricts a run to an explicit set of study ids
///
/// Used to re-run only the studies that failed last time.
#[derive(Debug, Clone, Default)]
pub struct StudyFilter {
    ids: Vec<StudyId>,
}

impl StudyFilter {
    pub fn new(ids: impl IntoIterator<Item = StudyId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Reads ids from a file, one per line
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(StudyId::from),
        ))
    }

    /// Adds more ids to the filter
    pub fn extend(&mut self, ids: impl IntoIterator<Item = StudyId>) {
        self.ids.extend(ids);
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Keeps only the listed studies, in enumeration order
    ///
    /// Requested ids the source did not list are logged and skipped.
    pub fn apply(&self, studies: StudyList) -> StudyList {
        let wanted: HashSet<&StudyId> = self.ids.iter().collect();
        let listed: HashSet<&StudyId> = studies.iter().collect();

        let mut reported = HashSet::new();
        for id in &self.ids {
            if !listed.contains(id) && reported.insert(id) {
                tracing::warn!("Requested study {} is not in the study list; skipping", id);
            }
        }

        let kept: StudyList = studies
            .iter()
            .filter(|id| wanted.contains(id))
            .cloned()
            .collect();
        tracing::info!(
            "Study filter kept {} of {} studies",
            kept.len(),
            studies.len()
        );
        kept
    }
}
