use std::collections::HashSet;

use skillsphere_engine::catalog::{sample_catalog, Catalog, Course};
use skillsphere_engine::recommend::{find_anchor, recommend, recommend_for_skills, MatchTier};
use skillsphere_engine::similarity::SimilarityIndex;
use skillsphere_engine::EngineError;

fn small_catalog() -> Catalog {
    Catalog::from_courses(vec![
        Course::new("Python Basics", 0.0, 1000),
        Course::new("Advanced Python", 50.0, 50000),
        Course::new("Yoga 101", 20.0, 200),
    ])
    .unwrap()
}

#[test]
fn python_query_returns_the_other_python_course() {
    let catalog = small_catalog();
    let index = SimilarityIndex::build(&catalog);

    let result = recommend(&catalog, &index, "python", 1).unwrap();
    assert_eq!(result.tier, MatchTier::Anchored { anchor: 0 });
    assert_eq!(result.titles(), vec!["Advanced Python"]);
    assert!(result.items[0].score > 0.0);
}

#[test]
fn anchor_is_excluded_and_ties_keep_catalog_order() {
    let catalog = small_catalog();
    let index = SimilarityIndex::build(&catalog);

    let result = recommend(&catalog, &index, "PYTHON", 5).unwrap();
    assert_eq!(result.titles(), vec!["Advanced Python", "Yoga 101"]);
    assert!(!result.titles().contains(&"Python Basics"));
}

#[test]
fn substring_matches_inside_words() {
    let catalog = small_catalog();
    assert_eq!(find_anchor(&catalog, "yog"), Some(2));
    assert_eq!(find_anchor(&catalog, "  "), None);
    assert_eq!(find_anchor(&catalog, "cooking"), None);
}

#[test]
fn no_match_falls_back_to_centrality() {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog);

    for query in ["", "   ", "underwater basket weaving"] {
        let result = recommend(&catalog, &index, query, 5).unwrap();
        assert_eq!(result.tier, MatchTier::Centrality);
        assert_eq!(result.len(), 5);
        let scores: Vec<f64> = result.items.iter().map(|r| r.score).collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn results_are_bounded_and_unique() {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog);

    for limit in [1, 3, 10, 100] {
        let result = recommend(&catalog, &index, "guitar", limit).unwrap();
        assert!(result.len() <= limit);
        assert_eq!(result.len(), limit.min(catalog.len() - 1));
        let unique: HashSet<&str> = result.titles().into_iter().collect();
        assert_eq!(unique.len(), result.len());
    }
}

#[test]
fn ranking_is_deterministic() {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog);
    let first = recommend(&catalog, &index, "web", 8).unwrap();
    let second = recommend(&catalog, &index, "web", 8).unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_limit_is_invalid() {
    let catalog = small_catalog();
    let index = SimilarityIndex::build(&catalog);
    assert!(matches!(
        recommend(&catalog, &index, "python", 0),
        Err(EngineError::InvalidArgument(_))
    ));
    assert!(matches!(
        recommend_for_skills(&catalog, &index, &["python"], 0),
        Err(EngineError::InvalidArgument(_))
    ));
}

#[test]
fn skills_are_merged_without_duplicates() {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog);

    let merged = recommend_for_skills(&catalog, &index, &["python", "javascript"], 6).unwrap();
    assert_eq!(merged.len(), 6);
    let unique: HashSet<&str> = merged.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(unique.len(), merged.len());

    let python_only = recommend(&catalog, &index, "python", 6).unwrap();
    assert_eq!(merged[0].title, python_only.items[0].title);
}
