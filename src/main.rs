use anyhow::{Context, Result};
use clap::Parser;
use gitdeps_core::{resolve_ref, Error, Repository};
use graph::{AncestorResolver, GraphBuilder, GraphStats, PlantUmlRenderer};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod external;

use config::Settings;

#[derive(Parser, Debug)]
#[command(name = "gitdeps")]
#[command(about = "Draw the commits, trees and blobs of a branch as of a given date", long_about = None)]
pub struct Cli {
    /// Branch, ref or full commit hash to start from
    reference: String,

    /// Cutoff: YYYY-MM-DD, YYYY-MM-DDTHH:MM:SS (UTC) or RFC 3339
    before: String,

    /// Path to the repository (work tree or bare)
    #[arg(short, long)]
    repo: Option<PathBuf>,

    /// Where to write the PlantUML description
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// PlantUML jar; when set, the diagram is rendered to PNG
    #[arg(long)]
    plantuml_jar: Option<PathBuf>,

    /// Java executable used to run PlantUML
    #[arg(long)]
    java: Option<String>,

    /// Open the rendered image
    #[arg(long)]
    open: bool,

    /// TOML file with defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::from_cli(&cli)?;
    let written = run(&settings)?;
    println!("{}", written.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("warn,gitdeps={0},gitdeps_core={0},graph={0}", level))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Write the diagram (and optionally the image) and return the last file produced
fn run(settings: &Settings) -> Result<PathBuf> {
    let repo = Repository::open(&settings.repo)
        .with_context(|| format!("Failed to open repository {}", settings.repo.display()))?;

    let head = resolve_ref(&repo, &settings.reference)
        .with_context(|| format!("Failed to resolve '{}'", settings.reference))?;

    let start = AncestorResolver::new(&repo)
        .resolve(&head, settings.cutoff)?
        .ok_or_else(|| Error::NoQualifyingAncestor {
            start: head.clone(),
            cutoff: settings.cutoff,
        })?;

    let graph = GraphBuilder::new(&repo).build(&start, settings.cutoff)?;
    report(&graph.stats());

    let diagram = PlantUmlRenderer::new().render(&graph);
    fs::write(&settings.output, diagram)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;
    tracing::info!(path = %settings.output.display(), "wrote diagram");

    let Some(jar) = &settings.plantuml_jar else {
        if settings.open {
            tracing::warn!("--open needs a PlantUML jar to render an image; skipping");
        }
        return Ok(settings.output.clone());
    };

    let image = external::render_image(&settings.java, jar, &settings.output)?;
    if settings.open {
        external::open_in_viewer(settings.viewer.as_deref(), &image)?;
    }
    Ok(image)
}

fn report(stats: &GraphStats) {
    eprintln!(
        "{} commits ({} merges, {} roots), {} trees, {} blobs, {} edges",
        stats.commits,
        stats.merge_commits,
        stats.root_commits,
        stats.trees,
        stats.blobs,
        stats.total_edges
    );
}
