use plotly::common::{Marker, MarkerSymbol, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::catalog::Catalog;
use crate::cluster::ClusterModel;

/// Price vs. subscribers, one trace per cluster, with the cluster means
/// drawn as crosses. Empty clusters have no mean to draw.
pub fn plot_cluster_scatter(catalog: &Catalog, model: &ClusterModel, title: &str) -> Result<Plot, String> {
    if catalog.len() != model.catalog_len() {
        return Err("Catalog does not match the cluster model".to_string());
    }

    let mut plot = Plot::new();
    for (cluster, summary) in model.summaries().iter().enumerate() {
        let (prices, subscribers): (Vec<f64>, Vec<f64>) = catalog
            .iter()
            .enumerate()
            .filter(|(idx, _)| model.cluster_of(*idx) == Some(cluster))
            .map(|(_, course)| (course.price, course.num_subscribers as f64))
            .unzip();

        let trace = Scatter::new(prices, subscribers)
            .mode(Mode::Markers)
            .name(&format!("Cluster {}: {}", cluster, summary.label()));
        plot.add_trace(trace);
    }

    let (mean_prices, mean_subscribers): (Vec<f64>, Vec<f64>) = model
        .summaries()
        .iter()
        .filter_map(|s| s.profile.as_ref())
        .map(|p| (p.mean_price, p.mean_subscribers))
        .unzip();
    let centers = Scatter::new(mean_prices, mean_subscribers)
        .mode(Mode::Markers)
        .name("Cluster means")
        .marker(Marker::new().size(14).symbol(MarkerSymbol::X).color("black"));
    plot.add_trace(centers);

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Price"))
            .y_axis(Axis::new().title("Number of subscribers")),
    );
    Ok(plot)
}

/// Inertia against k for the Elbow heuristic.
pub fn plot_elbow(curve: &[(usize, f64)], title: &str) -> Result<Plot, String> {
    if curve.is_empty() {
        return Err("Elbow curve is empty".to_string());
    }
    let (ks, inertia): (Vec<usize>, Vec<f64>) = curve.iter().copied().unzip();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(ks, inertia)
            .mode(Mode::LinesMarkers)
            .name("Inertia"),
    );
    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("Number of clusters (k)"))
            .y_axis(Axis::new().title("Inertia")),
    );
    Ok(plot)
}
