use anyhow::{Result, anyhow};
use clap::Parser;
use log::{debug, trace};
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "graph")]
#[command(about = "Extract the import/export graph of JavaScript/TypeScript modules")]
pub struct Config {
    /// Root directory of the project (defaults to git root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Only scan files whose path relative to the root contains this pattern
    #[arg(long)]
    pub entry_glob: Option<String>,

    /// Print the graphs as JSON instead of a tree
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Root to scan: the configured one (canonicalized when possible) or the git root.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(r) => {
                debug!("Using provided root directory: {:?}", r);
                Ok(r.canonicalize().unwrap_or_else(|_| r.clone()))
            }
            None => {
                debug!("No root provided, searching for git root");
                find_git_root()
            }
        }
    }
}

pub(crate) fn find_git_root() -> Result<PathBuf> {
    debug!("Searching for git root");
    let current_dir = env::current_dir()?;
    trace!("Starting search from: {:?}", current_dir);

    for dir in current_dir.ancestors() {
        trace!("Checking for .git in: {:?}", dir);
        if dir.join(".git").exists() {
            debug!("Found git root at: {:?}", dir);
            return Ok(dir.to_path_buf());
        }
    }

    debug!("Could not find .git directory in any parent folder");
    Err(anyhow!("Could not find .git directory in any parent folder"))
}
