//! sparsenet CLI - split a network into its connected components.
//!
//! # Usage
//!
//! ```bash
//! # Write comp1.gml, comp2.gml, ... to the current directory and a run summary
//! sparsenet components input.gml output.bfs
//!
//! # Component files into their own directory, edges treated as directed
//! sparsenet components input.gml output.bfs --out-dir comps --directed
//!
//! # Counts only, no files written
//! sparsenet stats input.csv --json
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use sparsenet_core::algo::components::{component_stats, extract_components, write_components};
use sparsenet_core::formats::{Csv, Gml, GmlComponentWriter, LoadOptions, LoadedNetwork};
use sparsenet_core::RunSummary;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sparsenet")]
#[command(about = "Sparse network connected components", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find connected components and write each one to compK.gml
    Components {
        /// Input file (GML, or CSV edge list by extension)
        input: PathBuf,

        /// Run summary file
        summary: PathBuf,

        /// Directory for the component files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        #[command(flatten)]
        direction: DirectionArgs,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show network and component statistics
    Stats {
        /// Input file (GML, or CSV edge list by extension)
        input: PathBuf,

        #[command(flatten)]
        direction: DirectionArgs,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct DirectionArgs {
    /// Treat edges as directed
    #[arg(long, conflicts_with = "undirected")]
    directed: bool,

    /// Treat edges as undirected, even if the input declares `directed 1`
    #[arg(long)]
    undirected: bool,
}

impl DirectionArgs {
    fn load_options(&self) -> LoadOptions {
        let directed = match (self.directed, self.undirected) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        LoadOptions { directed }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Components {
            input,
            summary,
            out_dir,
            direction,
            json,
        } => cmd_components(&input, &summary, &out_dir, &direction, json),
        Commands::Stats {
            input,
            direction,
            json,
        } => cmd_stats(&input, &direction, json),
    }
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_network(path: &Path, options: LoadOptions) -> Result<LoadedNetwork> {
    let start = Instant::now();
    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Reading {}...", path.display()));

    let is_csv = path.extension().is_some_and(|ext| ext == "csv");
    let loaded = if is_csv {
        Csv::read_file(path, options)
            .with_context(|| format!("Failed to parse CSV {}", path.display()))?
    } else {
        Gml::read_file(path, options)
            .with_context(|| format!("Failed to load {}", path.display()))?
    };

    pb.finish_with_message(format!("Loaded in {:.2?}", start.elapsed()));
    Ok(loaded)
}

fn cmd_components(
    input: &Path,
    summary: &Path,
    out_dir: &Path,
    direction: &DirectionArgs,
    json: bool,
) -> Result<()> {
    let start = Instant::now();

    // Refuse before the (possibly long) load if component files are already there
    let writer = GmlComponentWriter::new(out_dir)
        .with_context(|| format!("Cannot write components to {}", out_dir.display()))?;

    let loaded = load_network(input, direction.load_options())?;
    let stats = loaded.stats;
    if let (Some(min), Some(max)) = (stats.min_id, stats.max_id) {
        info!("Node numbers range from {} to {}", min, max);
    }

    info!(
        "Finding components and printing them to compX.gml files in {}",
        out_dir.display()
    );
    let mut writer = writer.with_node_ids(loaded.node_ids);
    let extraction = write_components(&loaded.network, &mut writer)
        .with_context(|| format!("Failed to extract components from {}", input.display()))?;

    let run = RunSummary::new(
        input.display().to_string(),
        &stats,
        &extraction,
        start.elapsed().as_secs_f64(),
    );

    let file = File::create(summary)
        .with_context(|| format!("Failed to create {}", summary.display()))?;
    let mut out = BufWriter::new(file);
    run.write_text(&mut out)
        .and_then(|()| out.flush().map_err(Into::into))
        .with_context(|| format!("Failed to write {}", summary.display()))?;

    if json {
        println!("{}", run.to_json()?);
        return Ok(());
    }

    println!("{} edges explored", run.distinct_edges);
    println!(
        "{} duplicate edges not counted in edge count",
        run.duplicate_edges
    );
    println!("Components found:       {}", run.component_count);
    println!("Largest component size: {}", run.largest_component_size);
    println!("Singleton components:   {}", run.singleton_count);
    println!(
        "Wrote {} component files to {}",
        writer.written().len(),
        out_dir.display()
    );
    println!("{:.6} seconds", run.elapsed_secs);

    Ok(())
}

fn cmd_stats(input: &Path, direction: &DirectionArgs, json: bool) -> Result<()> {
    let loaded = load_network(input, direction.load_options())?;
    let network = loaded.network.stats();

    let components = extract_components(&loaded.network)
        .with_context(|| format!("Failed to extract components from {}", input.display()))?;
    let comp_stats = component_stats(&components);

    if json {
        let report = serde_json::json!({
            "network": network,
            "components": comp_stats,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Network Statistics");
    println!("==================");
    println!("Vertices:       {}", network.vertex_count);
    println!("Edges:          {}", network.edge_count);
    println!("Duplicates:     {}", network.duplicate_count);
    println!("Directed:       {}", network.directed);
    println!("Isolated:       {}", network.isolated_vertices);
    println!("Max degree:     {}", network.max_degree);
    println!();
    println!("Component Statistics");
    println!("====================");
    println!("Number of components: {}", comp_stats.num_components);
    println!("Max component size:   {}", comp_stats.max_component_size);
    println!("Min component size:   {}", comp_stats.min_component_size);
    println!("Avg component size:   {:.2}", comp_stats.avg_component_size);

    Ok(())
}
