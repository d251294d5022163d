use std::fs;
use std::path::PathBuf;

use skillsphere_cli::input::RunConfig;
use skillsphere_cli::output::{format_items, write_recommendations};
use skillsphere_cli::commands::load_catalog;
use skillsphere_engine::catalog::sample_catalog;
use skillsphere_engine::config::InitMethod;
use skillsphere_engine::{recommend, CatalogSource, SimilarityIndex};
use tempfile::tempdir;

#[test]
fn partial_config_keeps_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("partial.json");
    fs::write(
        &path,
        r#"{"catalog_path": "courses.csv", "n_clusters": 6, "kmeans": {"seed": 11, "init": "random"}}"#,
    )
    .unwrap();

    let config = RunConfig::from_file(&path).unwrap();
    assert_eq!(config.catalog_path, Some(PathBuf::from("courses.csv")));
    assert_eq!(config.engine.n_clusters, 6);
    assert_eq!(config.engine.recommend_limit, 5);
    assert_eq!(config.engine.kmeans.seed, 11);
    assert_eq!(config.engine.kmeans.init, InitMethod::Random);
}

#[test]
fn invalid_fields_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("invalid.json");
    fs::write(&path, r#"{"n_clusters": "many", "recommend_limit": 8}"#).unwrap();

    let config = RunConfig::from_file(&path).unwrap();
    assert_eq!(config.engine.n_clusters, 4);
    assert_eq!(config.engine.recommend_limit, 8);
}

#[test]
fn unreadable_config_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(RunConfig::from_file(&dir.path().join("missing.json")).is_err());

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(RunConfig::from_file(&broken).is_err());
}

#[test]
fn catalogs_load_whatever_their_extension() {
    let dir = tempdir().unwrap();
    let mut config = RunConfig::new();

    let csv = dir.path().join("courses.CSV");
    fs::write(&csv, "course_title,price,num_subscribers
Learn Guitar,20,100
").unwrap();
    config.catalog_path = Some(csv.clone());
    let catalog = load_catalog(&config);
    assert_eq!(catalog.source(), &CatalogSource::File(csv));
    assert_eq!(catalog.len(), 1);

    let txt = dir.path().join("courses.txt");
    fs::write(&txt, "course_title,price,num_subscribers
Learn Piano,30,200
Learn Drums,0,50
").unwrap();
    config.catalog_path = Some(txt.clone());
    let catalog = load_catalog(&config);
    assert_eq!(catalog.source(), &CatalogSource::File(txt));
    assert_eq!(catalog.len(), 2);
}

#[test]
fn configured_delimiter_reads_unusual_files() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("courses.dat");
    fs::write(&path, "course_title;price;num_subscribers
Learn Guitar;20;100
").unwrap();

    let mut config = RunConfig::new();
    config.catalog_path = Some(path.clone());
    config.engine.catalog.delimiter = Some(';');
    let catalog = load_catalog(&config);
    assert_eq!(catalog.source(), &CatalogSource::File(path));
    assert_eq!(catalog.get(0).unwrap().title, "Learn Guitar");

    config.catalog_path = Some(dir.path().join("missing.tsv"));
    assert_eq!(load_catalog(&config).source(), &CatalogSource::Sample);
}

#[test]
fn recommendations_are_ranked_in_output() {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog);
    let set = recommend(&catalog, &index, "piano", 3).unwrap();

    let text = format_items(&set.items);
    assert_eq!(text.lines().count(), 3);
    assert!(text.starts_with("  1. "));

    let dir = tempdir().unwrap();
    let path = dir.path().join("recs.csv");
    write_recommendations(&set.items, &path).unwrap();
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("rank,title,subject,score\n1,"));
    assert_eq!(written.lines().count(), 4);
}
