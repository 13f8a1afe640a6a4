//! Generate the C API headers from the function catalog.
//!
//! Usage:
//!   capigen generate [--strict] [--update-lock]
//!   capigen check [--strict]
//!   capigen lock
//!
//! The project is located from `--config`, `CAPIGEN_CONFIG`, or the nearest
//! `capigen.json` above the current directory.

use anyhow::{Context, Result};
use capigen::{CommentMode, Project, RunMode, RunOptions, logging};
use clap::{Args, Parser, Subcommand};
use std::env;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "capigen")]
#[command(about = "Compile the declarative C API catalog into the direct and extension headers")]
struct Cli {
    /// Project config file (defaults to the nearest capigen.json).
    #[arg(long, global = true, env = "CAPIGEN_CONFIG")]
    config: Option<PathBuf>,
    /// Project root that relative config paths resolve against.
    #[arg(long, global = true, env = "CAPIGEN_ROOT")]
    root: Option<PathBuf>,
    /// Log directive, e.g. `info` or `capigen=debug`.
    #[arg(long, global = true, env = "CAPIGEN_LOG")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write both headers.
    Generate {
        #[command(flatten)]
        render: RenderArgs,
        /// Rewrite the layout lock after writing.
        #[arg(long)]
        update_lock: bool,
    },
    /// Fail if either header on disk differs from a fresh generation.
    Check {
        #[command(flatten)]
        render: RenderArgs,
    },
    /// Rewrite the layout lock from the versioned API index.
    Lock,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Fail on parameters without a doc note.
    #[arg(long)]
    strict: bool,
}

impl RenderArgs {
    fn comment_mode(&self) -> Option<CommentMode> {
        self.strict.then_some(CommentMode::Strict)
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("capigen: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref()).context("initializing logging")?;

    let cwd = env::current_dir().context("reading current directory")?;
    let project = Project::discover(cli.config.as_deref(), cli.root.as_deref(), &cwd)
        .context("loading project configuration")?;

    match cli.command {
        Command::Generate {
            render,
            update_lock,
        } => {
            let options = RunOptions {
                mode: RunMode::Write,
                comment_mode: render.comment_mode(),
                update_lock,
            };
            let outcome = capigen::run(&project, &options).context("generating headers")?;
            for path in &outcome.written {
                println!("Generated header: {}", path.display());
            }
        }
        Command::Check { render } => {
            let options = RunOptions {
                mode: RunMode::Check,
                comment_mode: render.comment_mode(),
                update_lock: false,
            };
            capigen::run(&project, &options).context("checking headers")?;
            println!("Headers are up to date.");
        }
        Command::Lock => {
            let lock = capigen::update_layout_lock(&project).context("updating layout lock")?;
            println!("Layout lock holds {} members.", lock.members.len());
        }
    }

    Ok(())
}
