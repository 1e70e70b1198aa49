use modgraph_core::FileGraph;
use serde::Serialize;
use std::path::PathBuf;

/// A file whose graph could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Root the scan ran against.
    pub root: PathBuf,
    /// Graphs of every file that succeeded, sorted by path.
    pub graphs: Vec<FileGraph>,
    /// Files that failed, sorted by path.
    pub failures: Vec<Failure>,
}

impl ScanResult {
    pub fn files_analyzed(&self) -> usize {
        self.graphs.len() + self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
