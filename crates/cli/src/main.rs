use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsasu::sample::random_sites;
use dsasu::AsuMappings;
use nalgebra::Vector3;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::fmt::SubscriberBuilder;

mod config;
mod io;
mod provenance;

use config::JobConfig;
use provenance::Payload;

#[derive(Parser)]
#[command(name = "dsasu")]
#[command(about = "Map crystal sites into a buffered asymmetric unit")]
struct Cmd {
    /// Optional free-form tag; propagated to provenance sidecars and logs
    #[arg(long)]
    tag: Option<String>,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Map every site of a CSV (columns x,y,z) and write one row per image
    Map {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        sites: PathBuf,
        /// Output table (.csv or .parquet); a provenance sidecar is written next to it
        #[arg(long)]
        out: PathBuf,
        #[arg(long)]
        parallel: bool,
    },
    /// Print the vertices and bounding box of the configured ASU as JSON
    Vertices {
        #[arg(long)]
        config: PathBuf,
        /// Use the buffered ASU instead of the configured one
        #[arg(long)]
        buffered: bool,
        #[arg(long)]
        cartesian: bool,
        #[arg(long, default_value_t = 0.0)]
        epsilon: f64,
    },
    /// Time mapping of seeded random sites
    Bench {
        #[arg(long)]
        config: PathBuf,
        #[arg(long, default_value_t = 10_000)]
        n_sites: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        parallel: bool,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Map {
            config,
            sites,
            out,
            parallel,
        } => map(config, sites, out, parallel, cmd.tag),
        Action::Vertices {
            config,
            buffered,
            cartesian,
            epsilon,
        } => vertices(config, buffered, cartesian, epsilon),
        Action::Bench {
            config,
            n_sites,
            seed,
            parallel,
        } => bench(config, n_sites, seed, parallel),
        Action::Report => report(cmd.tag),
    }
}

fn process(am: &mut AsuMappings, sites: &[Vector3<f64>], parallel: bool) {
    am.reserve(sites.len());
    if parallel {
        am.process_sites_par(sites);
    } else {
        am.process_sites(sites);
    }
}

fn map(
    config: PathBuf,
    sites: PathBuf,
    out: PathBuf,
    parallel: bool,
    tag: Option<String>,
) -> Result<()> {
    tracing::info!(config = %config.display(), sites = %sites.display(), out = %out.display(), tag = ?tag, "map");
    let job = JobConfig::load(&config)?;
    let mut am = job.mappings()?;
    let site_list = io::read_sites(&sites)?;
    process(&mut am, &site_list, parallel);

    let n_empty = am.mappings().iter().filter(|m| m.is_empty()).count();
    if n_empty > 0 {
        tracing::warn!(n_empty, "sites without images; consider a larger buffer_thickness");
    }
    let rows = io::write_mappings(&out, &am)?;
    tracing::info!(n_sites = am.n_sites(), rows, "mappings_written");

    let params = serde_json::json!({
        "config": serde_json::to_value(&job)?,
        "sites": sites.display().to_string(),
        "n_sites": am.n_sites(),
        "n_mappings": rows,
        "n_empty": n_empty,
        "parallel": parallel
    });
    provenance::write_sidecar(&out, Payload::new(params, tag))
        .context("writing provenance sidecar")?;
    Ok(())
}

fn vertices(config: PathBuf, buffered: bool, cartesian: bool, epsilon: f64) -> Result<()> {
    tracing::info!(config = %config.display(), buffered, cartesian, "vertices");
    let job = JobConfig::load(&config)?;
    let asu = if buffered {
        job.asu()?.add_buffer(job.buffer_thickness)?
    } else {
        job.asu()?
    };
    let to_rows = |pts: Vec<Vector3<f64>>| -> Vec<[f64; 3]> {
        pts.into_iter().map(|p| [p.x, p.y, p.z]).collect()
    };
    let doc = serde_json::json!({
        "cartesian": cartesian,
        "vertices": to_rows(asu.volume_vertices(cartesian, epsilon)),
        "box_min": to_rows(vec![*asu.box_min()])[0],
        "box_max": to_rows(vec![*asu.box_max()])[0]
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn bench(config: PathBuf, n_sites: usize, seed: u64, parallel: bool) -> Result<()> {
    tracing::info!(config = %config.display(), n_sites, seed, parallel, "bench");
    let job = JobConfig::load(&config)?;
    let mut am = job.mappings()?;
    let sites = random_sites(n_sites, seed);
    let start = Instant::now();
    process(&mut am, &sites, parallel);
    let elapsed = start.elapsed();
    let n_mappings: usize = am.mappings().iter().map(Vec::len).sum();
    tracing::info!(
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        n_mappings,
        mappings_per_site = n_mappings as f64 / n_sites.max(1) as f64,
        "bench_done"
    );
    Ok(())
}

fn report(tag: Option<String>) -> Result<()> {
    let payload = Payload::new(serde_json::json!({}), tag);
    let doc = provenance::document(&payload, &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}
