use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pt_assistant_transit::prelude::*;
use std::path::{Path, PathBuf};

mod directions;
mod document;
mod pbf;

use directions::PrecomputedDirections;
use document::{read_document, write_document};

#[derive(Parser, Debug)]
#[command(
    name = "route-segmenter",
    author,
    version,
    about = "Validate and split public transport route relations",
    long_about = "Reads route relations from an OSM PBF file or a JSON route document, \
                  checks them against oneway roads, and moves their ways into segment \
                  routes shared by the same lines.\n\n\
                  Every edit is applied as one transaction; pass --output to write the \
                  edited document as JSON."
)]
struct Args {
    /// Input OSM PBF file or JSON route document
    #[arg(short, long)]
    input: PathBuf,

    /// Write the edited document to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check two-direction routes against oneway roads and roundabouts
    Validate {
        /// JSON file mapping route ids to the direction of each of their ways
        #[arg(short, long)]
        directions: Option<PathBuf>,

        /// Remove ways that are used against their oneway direction
        #[arg(long)]
        fix: bool,
    },

    /// Move members of a route into a new route
    Extract {
        /// Route relation id
        #[arg(short, long)]
        route: i64,

        /// Member positions to extract, starting at 0
        #[arg(long, value_delimiter = ',', required = true)]
        indices: Vec<usize>,

        /// Name of the new route (defaults to the name of the route)
        #[arg(long)]
        name: Option<String>,

        /// The new route is a proposed line
        #[arg(long)]
        proposed: bool,

        /// The new route is a deviation
        #[arg(long)]
        deviation: bool,

        /// Turn the route into a superroute
        #[arg(long)]
        convert: bool,

        /// Leave the superroutes of the route alone
        #[arg(long)]
        no_link: bool,
    },

    /// Split one route into segment routes
    Split {
        /// Route relation id
        #[arg(short, long)]
        route: i64,

        /// Turn the route into a superroute
        #[arg(long)]
        convert: bool,
    },

    /// Split every version 2 public transport route
    SplitAll {
        /// Turn the routes into superroutes
        #[arg(long)]
        convert: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("=== Route Segmenter ===");
    log::info!("Input: {}", args.input.display());

    // Validate input file exists
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let mut document = read_document(&args.input).context("Failed to load routes")?;
    let mut history = EditHistory::new();

    match &args.command {
        Commands::Validate { directions, fix } => {
            let directions = match directions {
                Some(path) => PrecomputedDirections::read(path)?,
                None => {
                    log::warn!("No --directions given, only routes with known directions are checked");
                    PrecomputedDirections::default()
                }
            };
            let fixed = validate(&mut document, &mut history, &directions, *fix)?;
            if *fix {
                log::info!("Fixed {} issues", fixed);
            }
        }
        Commands::Extract {
            route,
            indices,
            name,
            proposed,
            deviation,
            convert,
            no_link,
        } => {
            let options = ExtractOptions {
                name: name.clone(),
                proposed: *proposed,
                deviation: *deviation,
                convert_to_superroute: *convert,
                link_superroutes: !*no_link,
            };
            match extract_members(&document, RouteId::new(*route), indices, &options) {
                Some(tx) => history.commit(&mut document, tx)?,
                None => log::warn!("Nothing to extract from route {}", route),
            }
        }
        Commands::Split { route, convert } => {
            match split_in_segments(&document, &TagClassifier, RouteId::new(*route), *convert) {
                Some(tx) => history.commit(&mut document, tx)?,
                None => log::warn!("Nothing to split in route {}", route),
            }
        }
        Commands::SplitAll { convert } => {
            let split = split_all(&mut document, &mut history, *convert)?;
            log::info!("Split {} routes", split);
        }
    }

    save(&document, &history, args.output.as_deref())
}

/// Print the issues; with `fix`, repair the fixable ones one by one
fn validate(
    document: &mut RouteDocument,
    history: &mut EditHistory,
    directions: &PrecomputedDirections,
    fix: bool,
) -> Result<usize> {
    let issues = DirectionValidator::new(document, &TagClassifier, directions).validate_all();
    for issue in &issues {
        println!("{}", issue);
    }
    if !fix {
        return Ok(0);
    }

    let mut fixed = 0;
    for issue in issues.iter().filter(|issue| issue.is_fixable()) {
        let outcome = DirectionValidator::new(document, &TagClassifier, directions).fix_issue(issue);
        match outcome {
            FixOutcome::Fixed(tx) => {
                history.commit(document, tx)?;
                fixed += 1;
            }
            FixOutcome::NoFixAvailable => log::debug!("No fix for {}", issue),
        }
    }
    Ok(fixed)
}

/// Split every version 2 route, one transaction per route
fn split_all(document: &mut RouteDocument, history: &mut EditHistory, convert: bool) -> Result<usize> {
    let ids: Vec<RouteId> = document
        .routes()
        .iter()
        .filter(|route| TagClassifier.is_version_two_pt_route(route))
        .map(|route| route.id)
        .collect();

    let pb = ProgressBar::new(ids.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress template")?,
    );

    let mut split = 0;
    for id in ids {
        pb.set_message(format!("route {}", id));
        if let Some(tx) = split_in_segments(document, &TagClassifier, id, convert) {
            history.commit(document, tx)?;
            split += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    Ok(split)
}

fn save(document: &RouteDocument, history: &EditHistory, output: Option<&Path>) -> Result<()> {
    log::info!("{} edits", history.entries().len());
    match output {
        Some(path) => write_document(document, path).context("Failed to write output"),
        None => {
            if history.can_undo() {
                log::warn!("Edits were made but no --output was given, nothing written");
            }
            Ok(())
        }
    }
}
