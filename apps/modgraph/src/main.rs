use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use modgraph_scan::Config;
use std::io::{BufWriter, Write};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "modgraph")]
#[command(about = "Import/export graph tools for JavaScript/TypeScript codebases", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract the import/export graph of every source file in a project
    Graph(Config),
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Graph(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!("Running graph scan (using {} threads)", num_threads);
            debug!("Config: root={:?}, entry_glob={:?}", cfg.root, cfg.entry_glob);

            let json = cfg.json;
            let result = modgraph_scan::run_graph_scan(cfg)?;
            debug!("Built {} graphs, {} failures", result.graphs.len(), result.failures.len());

            if json {
                modgraph_scan::print_graph_json(&mut stdout, &result)?;
            } else {
                modgraph_scan::print_graph_tree(&mut stdout, &result)?;
                writeln!(
                    stdout,
                    "\n{} Finished in {}ms on {} files (using {} threads).",
                    "●".bright_blue(),
                    start.elapsed().as_millis().to_string().cyan(),
                    result.files_analyzed().to_string().cyan(),
                    num_threads.to_string().cyan()
                )?;
            }
            stdout.flush()?;

            if result.has_failures() {
                // Non-zero exit to fail CI
                std::process::exit(1);
            }

            Ok(())
        }
    }
}
