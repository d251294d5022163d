use skillsphere_engine::catalog::{sample_catalog, Catalog, Course};
use skillsphere_engine::similarity::SimilarityIndex;
use skillsphere_engine::text::Tokenizer;

#[test]
fn matrix_is_symmetric_with_unit_diagonal() {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog);
    let n = index.len();
    assert_eq!(n, catalog.len());

    for i in 0..n {
        assert_eq!(index.similarity(i, i), Some(1.0));
        for j in 0..n {
            let s = index.similarity(i, j).unwrap();
            assert!((0.0..=1.0).contains(&s), "similarity({}, {}) = {}", i, j, s);
            assert_eq!(Some(s), index.similarity(j, i));
        }
    }
}

#[test]
fn shared_terms_score_higher_than_unrelated_titles() {
    let index = SimilarityIndex::from_titles(
        &["Python Basics", "Advanced Python", "Yoga 101"],
        Tokenizer::default(),
    );
    assert!(index.similarity(0, 1).unwrap() > 0.0);
    assert_eq!(index.similarity(0, 2), Some(0.0));
    assert_eq!(index.similarity(1, 2), Some(0.0));
}

#[test]
fn stop_word_titles_have_zero_vectors_but_unit_self_similarity() {
    let catalog = Catalog::from_courses(vec![
        Course::new("The One", 10.0, 10),
        Course::new("Learn Guitar", 10.0, 10),
    ])
    .unwrap();
    let index = SimilarityIndex::build(&catalog);
    assert!(index.vector(0).unwrap().is_zero());
    assert_eq!(index.similarity(0, 0), Some(1.0));
    assert_eq!(index.similarity(0, 1), Some(0.0));
    assert_eq!(index.similarity(0, 2), None);
}

#[test]
fn centrality_is_the_mean_row_similarity() {
    let catalog = sample_catalog();
    let index = SimilarityIndex::build(&catalog);
    let n = index.len() as f64;
    for i in 0..index.len() {
        let expected: f64 = index.row(i).iter().sum::<f64>() / n;
        assert!((index.centrality()[i] - expected).abs() < 1e-12);
    }
}
