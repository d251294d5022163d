use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;

use skillsphere_engine::cluster::elbow;
use skillsphere_engine::features::prepare_features;
use skillsphere_engine::report::{cluster_report, write_assignments};
use skillsphere_engine::CatalogSnapshot;

use crate::commands::open_store;
use crate::input::RunConfig;
use crate::output::{format_courses, format_descriptions};

fn fitted_snapshot(config: &RunConfig) -> Result<Arc<CatalogSnapshot>> {
    let store = open_store(config);
    let snapshot = store.refit(config.engine.n_clusters)?;
    Ok(snapshot)
}

pub fn run_describe(config: &RunConfig) -> Result<()> {
    let snapshot = fitted_snapshot(config)?;
    print!("{}", format_descriptions(snapshot.clusters()?));
    Ok(())
}

pub fn run_top(config: &RunConfig, cluster: usize, n: usize) -> Result<()> {
    let snapshot = fitted_snapshot(config)?;
    let model = snapshot.clusters()?;
    let courses = snapshot.top_courses(cluster, n)?;
    println!("Top courses in cluster {} ({}):", cluster, model.describe(cluster)?);
    print!("{}", format_courses(&courses));
    Ok(())
}

pub fn run_predict(config: &RunConfig, price: f64, popularity: f64) -> Result<()> {
    let snapshot = fitted_snapshot(config)?;
    let cluster = snapshot.predict_cluster(price, popularity)?;
    println!("Cluster {}: {}", cluster, snapshot.describe(cluster)?);
    Ok(())
}

pub fn run_elbow(config: &RunConfig, max_k: usize) -> Result<()> {
    let store = open_store(config);
    let snapshot = store.current();
    let features = prepare_features(snapshot.catalog(), 1)?;
    let curve = elbow(&features, 1..=max_k, &config.engine.kmeans)?;
    println!("k\tinertia");
    for (k, inertia) in curve {
        println!("{}\t{:.4}", k, inertia);
    }
    Ok(())
}

/// Write the per-course assignment CSV and, optionally, the HTML report.
pub fn run_export(config: &RunConfig, output: &Path, report: Option<&Path>) -> Result<()> {
    let snapshot = fitted_snapshot(config)?;
    let model = snapshot.clusters()?;

    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {:?}", output))?;
    let rows = write_assignments(BufWriter::new(file), snapshot.catalog(), model)?;
    log::info!("Wrote {} cluster assignments to {:?}", rows, output);

    if let Some(report_path) = report {
        let features = prepare_features(snapshot.catalog(), 1)?;
        let max_k = (config.engine.n_clusters * 2).clamp(2, 10);
        let curve = elbow(&features, 1..=max_k, &config.engine.kmeans)?;
        let html = cluster_report(snapshot.catalog(), model, Some(curve.as_slice()), &config.engine)?;
        html.save_to_file(report_path)?;
    }
    Ok(())
}
