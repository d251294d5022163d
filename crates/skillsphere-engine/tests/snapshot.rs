use std::sync::Arc;
use std::thread;

use skillsphere_engine::catalog::{sample_catalog, Catalog, Course};
use skillsphere_engine::recommend::MatchTier;
use skillsphere_engine::snapshot::{CatalogSnapshot, SnapshotStore};
use skillsphere_engine::{EngineConfig, EngineError};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn cluster_queries_before_fit_are_not_fitted() {
    init_logger();
    let snapshot = CatalogSnapshot::build(sample_catalog(), 1);
    assert!(!snapshot.has_clusters());
    assert_eq!(snapshot.predict_cluster(10.0, 100.0), Err(EngineError::NotFitted));
    assert_eq!(snapshot.describe(0), Err(EngineError::NotFitted));
    assert!(matches!(snapshot.top_courses(0, 3), Err(EngineError::NotFitted)));

    // recommendations do not need a cluster model
    assert!(snapshot.recommend("guitar", 3).is_ok());
}

#[test]
fn refit_publishes_a_new_snapshot_and_keeps_old_readers_coherent() {
    init_logger();
    let store = SnapshotStore::new(sample_catalog(), EngineConfig::default());
    let before = store.current();
    assert!(!before.has_clusters());

    let fitted = store.refit(3).unwrap();
    assert!(fitted.has_clusters());
    assert!(fitted.version() > before.version());
    assert!(Arc::ptr_eq(&store.current(), &fitted));

    // the old snapshot is untouched
    assert!(!before.has_clusters());
    assert_eq!(before.catalog().len(), fitted.catalog().len());

    let cluster = fitted.predict_cluster(20.0, 5_000.0).unwrap();
    assert!(cluster < 3);
    assert!(!fitted.describe(cluster).unwrap().is_empty());
}

#[test]
fn reload_drops_the_cluster_model() {
    init_logger();
    let store = SnapshotStore::new(sample_catalog(), EngineConfig::default());
    let fitted = store.refit(2).unwrap();

    let catalog = Catalog::from_courses(vec![
        Course::new("Python Basics", 0.0, 1000),
        Course::new("Advanced Python", 50.0, 50000),
        Course::new("Yoga 101", 20.0, 200),
    ])
    .unwrap();
    let reloaded = store.reload(catalog);
    assert!(!reloaded.has_clusters());
    assert!(reloaded.version() > fitted.version());
    assert_eq!(store.current().catalog().len(), 3);

    let result = store.current().recommend("python", 1).unwrap();
    assert_eq!(result.tier, MatchTier::Anchored { anchor: 0 });
    assert_eq!(result.titles(), vec!["Advanced Python"]);

    // readers still holding the fitted snapshot see the old catalog
    assert_eq!(fitted.catalog().len(), sample_catalog().len());
    assert!(fitted.predict_cluster(10.0, 10.0).is_ok());
}

#[test]
fn overlapping_fits_are_rejected_not_interleaved() {
    init_logger();
    let store = Arc::new(SnapshotStore::new(sample_catalog(), EngineConfig::default()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || store.refit(4))
        })
        .collect();

    let mut succeeded = 0;
    for handle in handles {
        match handle.join().unwrap() {
            Ok(snapshot) => {
                assert!(snapshot.has_clusters());
                succeeded += 1;
            }
            Err(e) => assert_eq!(e, EngineError::FitInProgress),
        }
    }
    assert!(succeeded >= 1);
    assert!(store.current().has_clusters());
}

#[test]
fn fit_errors_leave_the_current_snapshot_in_place() {
    init_logger();
    let store = SnapshotStore::new(sample_catalog(), EngineConfig::default());
    let before = store.current();
    let err = store.refit(1000).unwrap_err();
    assert!(matches!(err, EngineError::InsufficientData { .. }));
    assert!(Arc::ptr_eq(&before, &store.current()));
}
