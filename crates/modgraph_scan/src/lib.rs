//! Project-wide import/export graph scanning.
//!
//! Walks a JavaScript/TypeScript project, builds the graph of every source
//! file in parallel and reports the result as a tree or as JSON.
//!
//! # Examples
//!
//! ```no_run
//! use modgraph_scan::{Config, run_graph_scan};
//! use std::io::{BufWriter, Write};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config {
//!     root: Some(std::path::PathBuf::from("/path/to/project")),
//!     entry_glob: None,
//!     json: false,
//! };
//!
//! let result = run_graph_scan(cfg)?;
//!
//! // Use buffered output for better performance
//! let mut stdout = BufWriter::new(std::io::stdout());
//! modgraph_scan::print_graph_tree(&mut stdout, &result)?;
//! stdout.flush()?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod collector;
mod config;
mod reporter;
mod types;

// Re-export public API
pub use checker::run_graph_scan;
pub use collector::collect_files;
pub use config::Config;
pub use reporter::{print_graph_json, print_graph_tree};
pub use types::{Failure, ScanResult};
