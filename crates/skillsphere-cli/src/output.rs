use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use skillsphere_engine::catalog::Course;
use skillsphere_engine::cluster::ClusterModel;
use skillsphere_engine::recommend::{MatchTier, Recommendation, RecommendationSet};
use skillsphere_engine::Catalog;

fn subject_or_dash(subject: Option<&str>) -> &str {
    subject.unwrap_or("-")
}

/// Plain-text rendering of one recommendation list.
pub fn format_recommendations(catalog: &Catalog, set: &RecommendationSet) -> String {
    let mut out = String::new();
    match set.tier {
        MatchTier::Anchored { anchor } => {
            let anchor_title = catalog.get(anchor).map(|c| c.title.as_str()).unwrap_or("?");
            let _ = writeln!(out, "Courses similar to \"{}\":", anchor_title);
        }
        MatchTier::Centrality => {
            let _ = writeln!(
                out,
                "No course matches \"{}\"; showing the most representative courses:",
                set.query
            );
        }
    }
    out.push_str(&format_items(&set.items));
    out
}

pub fn format_items(items: &[Recommendation]) -> String {
    let mut out = String::new();
    for (rank, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} [{}] ({:.3})",
            rank + 1,
            item.title,
            subject_or_dash(item.subject.as_deref()),
            item.score
        );
    }
    out
}

pub fn format_descriptions(model: &ClusterModel) -> String {
    let sizes = model.cluster_sizes();
    let mut out = String::new();
    for summary in model.summaries() {
        let _ = match &summary.profile {
            Some(profile) => writeln!(
                out,
                "Cluster {}: {} ({} courses, mean price {:.2}, mean subscribers {:.0})",
                summary.cluster,
                summary.label(),
                sizes[summary.cluster],
                profile.mean_price,
                profile.mean_subscribers
            ),
            None => writeln!(out, "Cluster {}: {}", summary.cluster, summary.label()),
        };
    }
    out
}

pub fn format_courses(courses: &[&Course]) -> String {
    let mut out = String::new();
    for (rank, course) in courses.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {} [{}] price {:.2}, {} subscribers",
            rank + 1,
            course.title,
            subject_or_dash(course.subject.as_deref()),
            course.price,
            course.num_subscribers
        );
    }
    out
}

/// Write recommendations to a CSV or TSV file based on file extension.
pub fn write_recommendations<P: AsRef<Path>>(items: &[Recommendation], output_path: P) -> Result<()> {
    let path = output_path.as_ref();
    let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("csv");
    let delimiter = match extension {
        "tsv" => '\t',
        _ => ',',
    };

    let file = File::create(path).with_context(|| format!("Failed to create output file: {:?}", path))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(BufWriter::new(file));

    writer.write_record(["rank", "title", "subject", "score"])?;
    for (rank, item) in items.iter().enumerate() {
        writer.write_record([
            (rank + 1).to_string(),
            item.title.clone(),
            item.subject.clone().unwrap_or_default(),
            format!("{:.6}", item.score),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
