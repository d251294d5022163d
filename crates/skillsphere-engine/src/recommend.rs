//! Two-tier course recommendation.
//!
//! A query is first matched as a case-insensitive substring against every
//! title. The first hit becomes the anchor and the rest of the catalog is
//! ranked by similarity to it. When nothing matches, courses are ranked by
//! their centrality in the catalog instead. Callers can tell which tier
//! fired from `RecommendationSet::tier`.
use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::Catalog;
use crate::error::{EngineError, Result};
use crate::similarity::SimilarityIndex;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub index: usize,
    pub title: String,
    pub subject: Option<String>,
    pub score: f64,
}

/// Which ranking produced a result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// The query matched a title; `anchor` is its catalog index.
    Anchored { anchor: usize },
    /// No title matched; ranked by catalog-wide centrality.
    Centrality,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationSet {
    pub query: String,
    pub tier: MatchTier,
    pub items: Vec<Recommendation>,
}

impl RecommendationSet {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.title.as_str()).collect()
    }
}

/// Index of the first title containing `query`, ignoring case.
///
/// Blank queries never match.
pub fn find_anchor(catalog: &Catalog, query: &str) -> Option<usize> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }
    catalog
        .iter()
        .position(|course| course.title.to_lowercase().contains(&needle))
}

/// Recommend up to `limit` courses for a free-text query.
///
/// Fails only when `limit` is zero; a query that matches nothing degrades
/// to the centrality ranking.
pub fn recommend(
    catalog: &Catalog,
    index: &SimilarityIndex,
    query: &str,
    limit: usize,
) -> Result<RecommendationSet> {
    if limit == 0 {
        return Err(EngineError::InvalidArgument(
            "recommendation limit must be at least 1".to_string(),
        ));
    }
    if catalog.len() != index.len() {
        return Err(EngineError::InvalidArgument(format!(
            "similarity index covers {} titles but the catalog has {}",
            index.len(),
            catalog.len()
        )));
    }

    let (tier, scored): (MatchTier, Vec<(usize, f64)>) = match find_anchor(catalog, query) {
        Some(anchor) => {
            let row = index.row(anchor);
            let scored = row
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != anchor)
                .map(|(i, &s)| (i, s))
                .collect();
            (MatchTier::Anchored { anchor }, scored)
        }
        None => {
            let scored = index.centrality().iter().copied().enumerate().collect();
            (MatchTier::Centrality, scored)
        }
    };

    let items = rank(catalog, scored, limit);
    log::debug!(
        "recommend({:?}, {}): {:?}, {} results",
        query,
        limit,
        tier,
        items.len()
    );

    Ok(RecommendationSet {
        query: query.to_string(),
        tier,
        items,
    })
}

/// Recommend for several skills at once.
///
/// Each skill is queried in order, results are concatenated, repeated titles
/// are dropped and the list is capped at `limit`.
pub fn recommend_for_skills<S: AsRef<str>>(
    catalog: &Catalog,
    index: &SimilarityIndex,
    skills: &[S],
    limit: usize,
) -> Result<Vec<Recommendation>> {
    if limit == 0 {
        return Err(EngineError::InvalidArgument(
            "recommendation limit must be at least 1".to_string(),
        ));
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut merged = Vec::with_capacity(limit);
    for skill in skills {
        let set = recommend(catalog, index, skill.as_ref(), limit)?;
        for item in set.items {
            if merged.len() == limit {
                return Ok(merged);
            }
            if seen.insert(item.title.clone()) {
                merged.push(item);
            }
        }
    }
    Ok(merged)
}

/// Sort by score descending with ties on the lowest catalog index, then
/// keep the first `limit` distinct titles.
fn rank(catalog: &Catalog, mut scored: Vec<(usize, f64)>, limit: usize) -> Vec<Recommendation> {
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });

    let mut seen: HashSet<&str> = HashSet::new();
    scored
        .into_iter()
        .filter_map(|(i, score)| catalog.get(i).map(|course| (i, score, course)))
        .filter(|(_, _, course)| seen.insert(course.title.as_str()))
        .take(limit)
        .map(|(i, score, course)| Recommendation {
            index: i,
            title: course.title.clone(),
            subject: course.subject.clone(),
            score,
        })
        .collect()
}
