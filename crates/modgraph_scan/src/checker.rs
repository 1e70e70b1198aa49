use anyhow::{Result, anyhow};
use dashmap::DashMap;
use log::{debug, info, trace, warn};
use modgraph_core::{FileGraph, OsFileSystem, SpecifierResolver, graph_for_file};
use rayon::prelude::*;
use std::{path::PathBuf, thread};

use crate::{
    collector::collect_files,
    config::Config,
    types::{Failure, ScanResult},
};

/// Builds the import/export graph of every source file under the configured root.
///
/// Files are processed in parallel. A file that fails is recorded in
/// [`ScanResult::failures`] and does not stop the others.
pub fn run_graph_scan(cfg: Config) -> Result<ScanResult> {
    info!("Starting graph scan");

    let root = cfg.resolve_root()?;
    info!("Using root directory: {}", root.display());

    debug!("Collecting source files with glob: {:?}", cfg.entry_glob);
    let files = collect_files(&root, cfg.entry_glob.as_deref())?;
    if files.is_empty() {
        warn!("No source files found under {}", root.display());
        return Err(anyhow!("No source files found under {}", root.display()));
    }
    info!("Processing {} files in parallel", files.len());

    let resolver = SpecifierResolver::new(OsFileSystem);
    let graphs: DashMap<PathBuf, FileGraph> = DashMap::new();
    let failures: DashMap<PathBuf, String> = DashMap::new();

    files.par_iter().for_each(|file| {
        let thread_id = thread::current().id();
        debug!("Thread {:?} processing: {}", thread_id, file.display());

        match graph_for_file(&resolver, file) {
            Ok(file_graph) => {
                trace!("Built graph with {} nodes for {}", file_graph.graph.len(), file.display());
                graphs.insert(file.clone(), file_graph);
            }
            Err(e) => {
                warn!("Failed to build graph for {}: {}", file.display(), e);
                failures.insert(file.clone(), e.to_string());
            }
        }
    });

    let mut graphs: Vec<FileGraph> = graphs.into_iter().map(|(_, graph)| graph).collect();
    graphs.sort_by(|a, b| a.path.cmp(&b.path));

    let mut failures: Vec<Failure> =
        failures.into_iter().map(|(path, message)| Failure { path, message }).collect();
    failures.sort_by(|a, b| a.path.cmp(&b.path));

    info!("Graph scan complete. {} graphs, {} failures", graphs.len(), failures.len());
    Ok(ScanResult { root, graphs, failures })
}
