use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::catalog::Catalog;
use crate::cluster::ClusterModel;

/// One line of the cluster assignment export. Courses left out of the fit
/// have an empty `cluster` cell.
#[derive(Debug, Serialize)]
pub struct AssignmentRecord<'a> {
    pub title: &'a str,
    pub subject: Option<&'a str>,
    pub price: f64,
    pub num_subscribers: u64,
    pub cluster: Option<usize>,
}

/// Write `title, subject, price, num_subscribers, cluster` for every course.
pub fn write_assignments<W: Write>(writer: W, catalog: &Catalog, model: &ClusterModel) -> Result<usize> {
    if catalog.len() != model.catalog_len() {
        anyhow::bail!(
            "Cluster model was fitted on {} courses but the catalog has {}",
            model.catalog_len(),
            catalog.len()
        );
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for (idx, course) in catalog.iter().enumerate() {
        wtr.serialize(AssignmentRecord {
            title: &course.title,
            subject: course.subject.as_deref(),
            price: course.price,
            num_subscribers: course.num_subscribers,
            cluster: model.cluster_of(idx),
        })
        .with_context(|| format!("Failed to write assignment for '{}'", course.title))?;
    }
    wtr.flush().context("Failed to flush assignment export")?;
    Ok(catalog.len())
}
