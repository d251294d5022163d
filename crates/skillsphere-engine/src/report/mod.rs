//! HTML cluster reports and CSV exports.
pub mod export;
pub mod plots;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::catalog::Catalog;
use crate::cluster::ClusterModel;
use crate::config::EngineConfig;

pub use export::{write_assignments, AssignmentRecord};
pub use plots::{plot_cluster_scatter, plot_elbow};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// One titled block of a report: free-form markup and plots, in order.
pub struct ReportSection {
    title: String,
    blocks: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            blocks: Vec::new(),
        }
    }

    pub fn add_content(&mut self, content: Markup) {
        self.blocks.push(content);
    }

    pub fn add_plot(&mut self, plot: Plot) {
        let div_id = format!(
            "plot-{}-{}",
            self.title.to_lowercase().replace(' ', "-"),
            self.blocks.len()
        );
        self.blocks
            .push(PreEscaped(plot.to_inline_html(Some(div_id.as_str()))));
    }

    fn render(&self) -> Markup {
        html! {
            section {
                h2 { (self.title) }
                @for block in &self.blocks {
                    div class="block" { (block) }
                }
            }
        }
    }
}

pub struct Report {
    app_name: String,
    version: String,
    logo_url: Option<String>,
    title: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(app_name: &str, version: &str, logo_url: Option<&str>, title: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
            version: version.to_string(),
            logo_url: logo_url.map(str::to_string),
            title: title.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> Markup {
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style {
                        "body { font-family: sans-serif; margin: 2em; }
                         table { border-collapse: collapse; }
                         td, th { border: 1px solid #ccc; padding: 4px 8px; }"
                    }
                }
                body {
                    header {
                        @if let Some(logo) = &self.logo_url {
                            img src=(logo) alt=(self.app_name) height="48";
                        }
                        h1 { (self.title) }
                        p { (self.app_name) " v" (self.version) ", generated " (generated) }
                    }
                    @for section in &self.sections {
                        (section.render())
                    }
                }
            }
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.render().into_string())
            .with_context(|| format!("Failed to write report to {:?}", path))?;
        log::info!("Report saved to {:?}", path);
        Ok(())
    }
}

/// Overview, per-cluster table, plots and run configuration for one fit.
pub fn cluster_report(
    catalog: &Catalog,
    model: &ClusterModel,
    elbow_curve: Option<&[(usize, f64)]>,
    config: &EngineConfig,
) -> Result<Report> {
    let mut report = Report::new(
        "SkillSphere",
        env!("CARGO_PKG_VERSION"),
        None,
        "Course Cluster Report",
    );

    /* Section 1: Overview */
    {
        let mut overview = ReportSection::new("Overview");
        let sizes = model.cluster_sizes();
        overview.add_content(html! {
            p {
                (catalog.len()) " courses, " (model.assignments().len())
                " clustered into " (model.k()) " groups on "
                (model.feature_names().join(", ")) "."
            }
            table {
                tr { th { "Cluster" } th { "Courses" } th { "Mean price" } th { "Mean subscribers" } th { "Description" } }
                @for summary in model.summaries() {
                    tr {
                        td { (summary.cluster) }
                        td { (sizes[summary.cluster]) }
                        @match &summary.profile {
                            Some(profile) => {
                                td { (format!("{:.2}", profile.mean_price)) }
                                td { (format!("{:.0}", profile.mean_subscribers)) }
                            }
                            None => {
                                td { "-" }
                                td { "-" }
                            }
                        }
                        td { (summary.label()) }
                    }
                }
            }
        });
        let scatter = plot_cluster_scatter(catalog, model, "Courses by price and popularity")
            .map_err(anyhow::Error::msg)?;
        overview.add_plot(scatter);
        report.add_section(overview);
    }

    /* Section 2: Elbow */
    if let Some(curve) = elbow_curve {
        let mut elbow_section = ReportSection::new("Choosing k");
        elbow_section.add_content(html! {
            "Within-cluster sum of squares for each candidate number of clusters."
        });
        elbow_section.add_plot(plot_elbow(curve, "Elbow method").map_err(anyhow::Error::msg)?);
        report.add_section(elbow_section);
    }

    /* Section 3: Configuration */
    {
        let mut config_section = ReportSection::new("Configuration");
        config_section.add_content(html! {
            pre {
                code { (serde_json::to_string_pretty(config)?) }
            }
        });
        report.add_section(config_section);
    }

    Ok(report)
}
