//! CLI argument parsing for the builder.
//!
//! The CLI is thin: it resolves configuration and hands off to the builder.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ubuild",
    version,
    about = "Generate a site tree from uploaded module specs",
    after_help = "Examples:\n  ubuild build\n  ubuild build --uploads ./uploads --output ./generated_app --json\n  ubuild build --encoding utf-8 --encoding latin-1\n  ubuild preview --output ./generated_app",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Log debug events to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Build(BuildArgs),
    Preview(PreviewArgs),
}

/// Build command inputs; flags override the config file.
#[derive(Parser, Debug)]
#[command(about = "Rebuild the generated tree from every current upload")]
pub struct BuildArgs {
    /// JSON build config (uploads_dir, output_dir, encodings, templates_dir)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory scanned for uploads [default: uploads]
    #[arg(long, value_name = "DIR")]
    pub uploads: Option<PathBuf>,

    /// Directory the generated tree is written to [default: generated_app]
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Candidate encoding, tried in the order given (repeatable)
    #[arg(long = "encoding", value_name = "NAME")]
    pub encodings: Vec<String>,

    /// Directory of templates overriding the built-ins (index.html enables a custom entry page)
    #[arg(long, value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Emit the build outcome as JSON
    #[arg(long)]
    pub json: bool,
}

/// Preview command inputs.
#[derive(Parser, Debug)]
#[command(about = "List the files of a generated tree")]
pub struct PreviewArgs {
    /// Generated directory to list
    #[arg(long, value_name = "DIR", default_value = crate::config::DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Emit the listing as JSON
    #[arg(long)]
    pub json: bool,
}
