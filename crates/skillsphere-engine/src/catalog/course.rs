use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Difficulty level of a course.
///
/// The four known levels have fixed codes by difficulty, so the same label
/// maps to the same code on every run independent of row order. Labels
/// outside that set are kept verbatim as `Other`; their codes are assigned
/// per catalog by `LevelCodes`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    AllLevels,
    Other(String),
}

impl Level {
    pub const KNOWN: [Level; 4] = [
        Level::Beginner,
        Level::Intermediate,
        Level::Advanced,
        Level::AllLevels,
    ];

    /// Code of a known level; `None` for `Other`.
    pub fn fixed_code(&self) -> Option<u32> {
        match self {
            Level::Beginner => Some(0),
            Level::Intermediate => Some(1),
            Level::Advanced => Some(2),
            Level::AllLevels => Some(3),
            Level::Other(_) => None,
        }
    }

    /// Parse a dataset label. Unknown non-empty labels become `Other`.
    pub fn from_label(label: &str) -> Option<Level> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let normalized = label.to_lowercase();
        let stem = normalized.strip_suffix(" level").unwrap_or(&normalized);
        let level = match stem {
            "beginner" => Level::Beginner,
            "intermediate" => Level::Intermediate,
            "advanced" | "expert" => Level::Advanced,
            "all levels" | "all" => Level::AllLevels,
            _ => Level::Other(label.to_string()),
        };
        Some(level)
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::from_label(s).ok_or_else(|| "Course level is empty".to_string())
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Beginner => "Beginner Level",
            Level::Intermediate => "Intermediate Level",
            Level::Advanced => "Expert Level",
            Level::AllLevels => "All Levels",
            Level::Other(label) => label.as_str(),
        };
        write!(f, "{}", label)
    }
}

/// Integer codes for every level seen in a catalog.
///
/// Known levels keep their fixed codes 0..=3. `Other` labels follow from 4
/// in sorted label order, so the mapping depends only on the set of labels.
#[derive(Debug, Clone, Default)]
pub struct LevelCodes {
    others: BTreeMap<String, u32>,
}

impl LevelCodes {
    pub fn from_levels<'a, I>(levels: I) -> Self
    where
        I: IntoIterator<Item = &'a Level>,
    {
        let labels: BTreeSet<&str> = levels
            .into_iter()
            .filter_map(|level| match level {
                Level::Other(label) => Some(label.as_str()),
                _ => None,
            })
            .collect();
        let first_free = Level::KNOWN.len() as u32;
        let others = labels
            .into_iter()
            .enumerate()
            .map(|(offset, label)| (label.to_string(), first_free + offset as u32))
            .collect();
        Self { others }
    }

    pub fn code(&self, level: &Level) -> Option<u32> {
        match level {
            Level::Other(label) => self.others.get(label).copied(),
            known => known.fixed_code(),
        }
    }

    pub fn other_labels(&self) -> usize {
        self.others.len()
    }
}

/// One row of the course catalog.
///
/// `title`, `price` and `num_subscribers` are required; every other field
/// may be missing in the source data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<String>,
    pub title: String,
    pub subject: Option<String>,
    pub is_paid: Option<bool>,
    pub price: f64,
    pub num_subscribers: u64,
    pub level: Option<Level>,
    /// Hours of video content.
    pub content_duration: Option<f64>,
    pub url: Option<String>,
    /// Additional numeric columns, aligned with `Catalog::extra_columns`.
    #[serde(default)]
    pub extra: Vec<Option<f64>>,
}

impl Course {
    /// Minimal course; `is_paid` is derived from the price.
    pub fn new(title: impl Into<String>, price: f64, num_subscribers: u64) -> Self {
        Self {
            id: None,
            title: title.into(),
            subject: None,
            is_paid: Some(price > 0.0),
            price,
            num_subscribers,
            level: None,
            content_duration: None,
            url: None,
            extra: Vec::new(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_duration(mut self, hours: f64) -> Self {
        self.content_duration = Some(hours);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_dataset_labels() {
        assert_eq!("Beginner Level".parse::<Level>().unwrap(), Level::Beginner);
        assert_eq!("intermediate level".parse::<Level>().unwrap(), Level::Intermediate);
        assert_eq!("Expert Level".parse::<Level>().unwrap(), Level::Advanced);
        assert_eq!("Advanced".parse::<Level>().unwrap(), Level::Advanced);
        assert_eq!("All Levels".parse::<Level>().unwrap(), Level::AllLevels);
        assert_eq!(" Guru ".parse::<Level>().unwrap(), Level::Other("Guru".to_string()));
        assert!("   ".parse::<Level>().is_err());
    }

    #[test]
    fn known_level_codes_are_fixed() {
        let codes: Vec<Option<u32>> = Level::KNOWN.iter().map(|l| l.fixed_code()).collect();
        assert_eq!(codes, vec![Some(0), Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn level_display_parses_back() {
        for level in Level::KNOWN {
            assert_eq!(level.to_string().parse::<Level>().unwrap(), level);
        }
        let other = Level::Other("Mixed".to_string());
        assert_eq!(other.to_string().parse::<Level>().unwrap(), other);
    }

    #[test]
    fn other_labels_are_coded_in_sorted_order() {
        let levels = vec![
            Level::Other("Mixed".to_string()),
            Level::Beginner,
            Level::Other("Kids".to_string()),
            Level::Other("Mixed".to_string()),
        ];
        let codes = LevelCodes::from_levels(&levels);
        assert_eq!(codes.other_labels(), 2);
        assert_eq!(codes.code(&Level::Beginner), Some(0));
        assert_eq!(codes.code(&Level::Other("Kids".to_string())), Some(4));
        assert_eq!(codes.code(&Level::Other("Mixed".to_string())), Some(5));
        assert_eq!(codes.code(&Level::Other("Unseen".to_string())), None);

        let reversed: Vec<Level> = levels.iter().rev().cloned().collect();
        let again = LevelCodes::from_levels(&reversed);
        assert_eq!(again.code(&Level::Other("Mixed".to_string())), Some(5));
    }
}
