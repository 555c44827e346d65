//! Athen CLI Application
//!
//! Command-line front end for the athen-core runtime. It adds:
//! - Athen.toml loading
//! - Project scaffolding (`gen`)
//! - An HTTP server that routes requests to mounted documents (`run`)

use anyhow::{Context, Result};
use athen_core::{Catalog, Host};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod config;
mod generator;
mod server;

/// Athen - Serve registered handler documents over HTTP
#[derive(Parser, Debug)]
#[command(name = "athen")]
#[command(about = "Serve registered handler documents over HTTP", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load Athen.toml and serve its documents
    Run {
        /// Project directory containing Athen.toml
        #[arg(short, long, value_name = "DIR", default_value = "./")]
        path: PathBuf,
    },
    /// Write a starter Athen.toml
    Gen {
        /// Directory to scaffold into
        #[arg(short, long, value_name = "DIR", default_value = "./")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::debug!("Athen CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using runtime library v{}", athen_core::VERSION);

    match &args.command {
        Command::Run { path } => run_mode(path),
        Command::Gen { path } => gen_mode(path),
    }
}

/// Run mode - load config, mount documents, serve
fn run_mode(project_dir: &Path) -> Result<()> {
    log::info!("Loading configuration from: {:?}", project_dir);
    let config = config::load_config(project_dir)?;

    let catalog = Catalog::builtin();
    let host = Host::from_config(config, &catalog).context("Failed to mount documents")?;
    for name in host.document_names() {
        log::info!("Serving /{}", name);
    }

    server::serve(Arc::new(host))
}

/// Gen mode - scaffold a project directory
fn gen_mode(project_dir: &Path) -> Result<()> {
    let path = generator::generate_files(project_dir)?;
    println!("Created {}", path.display());
    println!("Start the server with: athen run --path {}", project_dir.display());
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
