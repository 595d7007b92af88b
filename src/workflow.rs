use crate::builder::{BuildOutcome, Builder, Summary};
use crate::cli::{BuildArgs, PreviewArgs};
use crate::config::{resolve_config, ConfigOverrides};
use crate::extract::Encoding;
use crate::output::list_files;
use crate::templates::Templates;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::PathBuf;

/// Run a build and print its outcome. Returns whether the build succeeded.
pub fn run_build(args: BuildArgs) -> Result<bool> {
    let encodings = args
        .encodings
        .iter()
        .map(|name| name.parse::<Encoding>().map_err(|err| anyhow!(err)))
        .collect::<Result<Vec<_>>>()?;
    let overrides = ConfigOverrides {
        uploads_dir: args.uploads,
        output_dir: args.output,
        encodings,
        templates_dir: args.templates,
    };
    let config = resolve_config(args.config.as_deref(), overrides)?;

    let templates = match &config.templates_dir {
        Some(dir) => Templates::with_overrides(dir)?,
        None => Templates::builtin(),
    };
    let builder = Builder::new(&templates, config.encodings.clone());
    let outcome = builder.run(&config.uploads_dir, &config.output_dir);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(!outcome.is_error())
}

fn print_outcome(outcome: &BuildOutcome) {
    match outcome {
        BuildOutcome::Summary(summary) => print_summary(summary),
        BuildOutcome::Error { error } => println!("build failed: {error}"),
    }
}

fn print_summary(summary: &Summary) {
    println!("uploads: {}", summary.uploads.display());
    println!("output: {}", summary.output.display());
    println!("folders: {}", summary.folders_created.join(", "));
    println!("files written: {}", summary.files_written.len());
    for path in &summary.files_written {
        println!("  {path}");
    }
    if !summary.skipped.is_empty() {
        println!("skipped: {}", summary.skipped.len());
        for skipped in &summary.skipped {
            println!("  {} ({})", skipped.path, skipped.reason);
        }
    }
}

#[derive(Serialize)]
struct PreviewListing {
    output: PathBuf,
    files: Vec<String>,
}

pub fn run_preview(args: PreviewArgs) -> Result<()> {
    let files = list_files(&args.output)?;
    if args.json {
        let listing = PreviewListing {
            output: args.output,
            files,
        };
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }
    if files.is_empty() {
        println!(
            "No generated files yet. Add uploads and run `ubuild build` (looked in {}).",
            args.output.display()
        );
        return Ok(());
    }
    for file in files {
        println!("{file}");
    }
    Ok(())
}
