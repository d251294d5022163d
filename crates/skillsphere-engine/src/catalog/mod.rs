//! Course catalog: loading, cleaning and the built-in sample fallback.
//!
//! A `Catalog` is immutable once built. Construction drops rows that are
//! missing a required field and keeps only the first occurrence of every
//! title, so row indices are stable for the lifetime of a snapshot.
pub mod course;
pub mod reader;
pub mod sample;

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

pub use course::{Course, Level, LevelCodes};
pub use reader::{load_catalog_or_sample, read_catalog, CatalogReaderConfig};
pub use sample::sample_catalog;

use crate::error::{EngineError, Result};

/// Where a catalog came from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    File(PathBuf),
    Sample,
    InMemory,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    extra_columns: Vec<String>,
    source: CatalogSource,
}

impl Catalog {
    /// Clean and deduplicate `courses`.
    ///
    /// Fails with `DataUnavailable` if nothing survives cleaning.
    pub fn new(
        courses: Vec<Course>,
        extra_columns: Vec<String>,
        source: CatalogSource,
    ) -> Result<Self> {
        let total = courses.len();
        let mut seen: HashSet<String> = HashSet::with_capacity(total);
        let mut invalid = 0usize;
        let mut duplicates = 0usize;
        let mut kept = Vec::with_capacity(total);

        for mut course in courses {
            let title = course.title.trim().to_string();
            if title.is_empty() || !course.price.is_finite() || course.price < 0.0 {
                invalid += 1;
                continue;
            }
            course.title = title;
            if !seen.insert(course.title.clone()) {
                duplicates += 1;
                continue;
            }
            course.extra.resize(extra_columns.len(), None);
            kept.push(course);
        }

        log::debug!(
            "Catalog cleaning: {} rows in, {} invalid, {} duplicate titles, {} kept",
            total,
            invalid,
            duplicates,
            kept.len()
        );

        if kept.is_empty() {
            return Err(EngineError::DataUnavailable(format!(
                "no usable courses after cleaning {} rows",
                total
            )));
        }

        Ok(Self {
            courses: kept,
            extra_columns,
            source,
        })
    }

    /// Convenience constructor for in-memory course lists.
    pub fn from_courses(courses: Vec<Course>) -> Result<Self> {
        Self::new(courses, Vec::new(), CatalogSource::InMemory)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn get(&self, index: usize) -> Option<&Course> {
        self.courses.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Course> {
        self.courses.iter()
    }

    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Course counts per subject; courses without a subject are not counted.
    pub fn subject_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for course in &self.courses {
            if let Some(subject) = course.subject.as_deref() {
                *counts.entry(subject).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn log_summary(&self) {
        let paid = self
            .courses
            .iter()
            .filter(|c| c.is_paid.unwrap_or(c.price > 0.0))
            .count();
        log::info!(
            "Catalog ({:?}): {} courses, {} paid / {} free, {} extra numeric columns",
            self.source,
            self.courses.len(),
            paid,
            self.courses.len() - paid,
            self.extra_columns.len()
        );
        for (subject, count) in self.subject_counts() {
            log::debug!("  {}: {} courses", subject, count);
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Course;
    type IntoIter = std::slice::Iter<'a, Course>;

    fn into_iter(self) -> Self::IntoIter {
        self.courses.iter()
    }
}
