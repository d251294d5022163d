//! Tabular course reader (CSV or TSV).
use std::collections::HashSet;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::catalog::{sample_catalog, Catalog, CatalogSource, Course, Level};
use crate::error::{EngineError, Result};

/// Configuration for reading a course table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogReaderConfig {
    /// Field delimiter. When `None` it is inferred from the file extension.
    pub delimiter: Option<char>,
    /// Explicit list of extra numeric columns to fold into clustering.
    /// When `None`, every unrecognised column whose values are all numeric
    /// is used.
    pub extra_numeric_columns: Option<Vec<String>>,
    /// Columns never treated as extra numeric features.
    pub ignore_columns: Vec<String>,
}

impl Default for CatalogReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            extra_numeric_columns: None,
            ignore_columns: vec![
                "course_id".to_string(),
                "id".to_string(),
                "published_timestamp".to_string(),
                "timestamp".to_string(),
            ],
        }
    }
}

const TITLE_COLUMNS: &[&str] = &["title", "course_title"];
const ID_COLUMNS: &[&str] = &["course_id", "id"];
const SUBJECT_COLUMNS: &[&str] = &["subject"];
const PAID_COLUMNS: &[&str] = &["is_paid"];
const PRICE_COLUMNS: &[&str] = &["price"];
const SUBSCRIBER_COLUMNS: &[&str] = &["num_subscribers", "subscribers"];
const LEVEL_COLUMNS: &[&str] = &["level"];
const DURATION_COLUMNS: &[&str] = &["content_duration", "duration"];
const URL_COLUMNS: &[&str] = &["url"];

struct ColumnMap {
    title: usize,
    price: usize,
    subscribers: usize,
    id: Option<usize>,
    subject: Option<usize>,
    is_paid: Option<usize>,
    level: Option<usize>,
    duration: Option<usize>,
    url: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Result<Self> {
        let required = |names: &[&str]| {
            find_any_column(headers, names).ok_or_else(|| {
                EngineError::DataUnavailable(format!("missing required column '{}'", names[0]))
            })
        };
        Ok(Self {
            title: required(TITLE_COLUMNS)?,
            price: required(PRICE_COLUMNS)?,
            subscribers: required(SUBSCRIBER_COLUMNS)?,
            id: find_any_column(headers, ID_COLUMNS),
            subject: find_any_column(headers, SUBJECT_COLUMNS),
            is_paid: find_any_column(headers, PAID_COLUMNS),
            level: find_any_column(headers, LEVEL_COLUMNS),
            duration: find_any_column(headers, DURATION_COLUMNS),
            url: find_any_column(headers, URL_COLUMNS),
        })
    }

    fn known(&self) -> HashSet<usize> {
        [self.title, self.price, self.subscribers]
            .into_iter()
            .chain(
                [self.id, self.subject, self.is_paid, self.level, self.duration, self.url]
                    .into_iter()
                    .flatten(),
            )
            .collect()
    }
}

/// Read and clean a course table.
///
/// Malformed records and rows missing a title, price or subscriber count
/// are dropped, as are repeated titles (first occurrence wins). Failing to
/// open the source or its header, or an empty result, is reported as
/// `DataUnavailable`.
pub fn read_catalog<P: AsRef<Path>>(path: P, config: &CatalogReaderConfig) -> Result<Catalog> {
    let path = path.as_ref();
    let delimiter = config.delimiter.unwrap_or_else(|| infer_delimiter(path));

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| {
            EngineError::DataUnavailable(format!("failed to open {}: {}", path.display(), e))
        })?;

    let headers = reader
        .headers()
        .map_err(|e| EngineError::DataUnavailable(format!("failed to read header row: {}", e)))?
        .clone();

    let columns = ColumnMap::resolve(&headers)?;

    let mut records = Vec::new();
    let mut malformed = 0usize;
    for (row_idx, result) in reader.records().enumerate() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                malformed += 1;
                log::warn!("Skipping row {} of {}: {}", row_idx + 1, path.display(), e);
            }
        }
    }

    let extra_indices = resolve_extra_columns(&headers, &records, &columns, config)?;
    let extra_columns: Vec<String> = extra_indices
        .iter()
        .map(|&idx| headers.get(idx).unwrap_or_default().to_string())
        .collect();

    let mut courses = Vec::with_capacity(records.len());
    let mut missing_required = 0usize;
    for record in &records {
        match parse_course(record, &columns, &extra_indices) {
            Some(course) => courses.push(course),
            None => missing_required += 1,
        }
    }

    log::info!(
        "Read {} rows from {} ({} malformed, {} missing a required field)",
        records.len() + malformed,
        path.display(),
        malformed,
        missing_required
    );

    Catalog::new(courses, extra_columns, CatalogSource::File(path.to_path_buf()))
}

/// Load the catalog at `path`, falling back to the built-in sample catalog
/// when the path is absent or the data is unavailable.
pub fn load_catalog_or_sample<P: AsRef<Path>>(
    path: Option<P>,
    config: &CatalogReaderConfig,
) -> Catalog {
    let Some(path) = path else {
        log::info!("No catalog path given; using the built-in sample catalog");
        return sample_catalog();
    };
    match read_catalog(path.as_ref(), config) {
        Ok(catalog) => catalog,
        Err(e) => {
            log::warn!("{}; falling back to the built-in sample catalog", e);
            sample_catalog()
        }
    }
}

fn infer_delimiter(path: &Path) -> char {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .as_deref()
    {
        Some("tsv") => '\t',
        _ => ',',
    }
}

fn find_column(headers: &StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

fn find_any_column(headers: &StringRecord, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| find_column(headers, name))
}

fn resolve_extra_columns(
    headers: &StringRecord,
    records: &[StringRecord],
    columns: &ColumnMap,
    config: &CatalogReaderConfig,
) -> Result<Vec<usize>> {
    if let Some(names) = &config.extra_numeric_columns {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = find_column(headers, name).ok_or_else(|| {
                EngineError::DataUnavailable(format!("missing extra column '{}'", name))
            })?;
            indices.push(idx);
        }
        return Ok(indices);
    }

    let known = columns.known();
    let ignore: HashSet<String> = config
        .ignore_columns
        .iter()
        .map(|name| name.to_ascii_lowercase())
        .collect();

    let indices = headers
        .iter()
        .enumerate()
        .filter(|(idx, header)| {
            !known.contains(idx) && !ignore.contains(&header.trim().to_ascii_lowercase())
        })
        .filter(|(idx, _)| is_numeric_column(records, *idx))
        .map(|(idx, _)| idx)
        .collect();
    Ok(indices)
}

/// A column is numeric when it has at least one value and every non-empty
/// value parses as a finite number.
fn is_numeric_column(records: &[StringRecord], idx: usize) -> bool {
    let mut seen_value = false;
    for record in records {
        let value = record.get(idx).unwrap_or_default().trim();
        if value.is_empty() {
            continue;
        }
        match value.parse::<f64>() {
            Ok(v) if v.is_finite() => seen_value = true,
            _ => return false,
        }
    }
    seen_value
}

fn field<'r>(record: &'r StringRecord, idx: Option<usize>) -> Option<&'r str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn parse_price(value: &str) -> Option<f64> {
    if value.eq_ignore_ascii_case("free") {
        return Some(0.0);
    }
    value
        .trim_start_matches('$')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn parse_count(value: &str) -> Option<u64> {
    value.parse::<u64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u64)
    })
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Some(true),
        "false" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn parse_course(record: &StringRecord, columns: &ColumnMap, extra: &[usize]) -> Option<Course> {
    let title = field(record, Some(columns.title))?;
    let price = field(record, Some(columns.price)).and_then(parse_price)?;
    let num_subscribers = field(record, Some(columns.subscribers)).and_then(parse_count)?;

    Some(Course {
        id: field(record, columns.id).map(str::to_string),
        title: title.to_string(),
        subject: field(record, columns.subject).map(str::to_string),
        // An unreadable paid flag is taken from the price.
        is_paid: field(record, columns.is_paid).map(|v| parse_bool(v).unwrap_or(price > 0.0)),
        price,
        num_subscribers,
        level: field(record, columns.level).and_then(Level::from_label),
        content_duration: field(record, columns.duration)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|v| v.is_finite()),
        url: field(record, columns.url).map(str::to_string),
        extra: extra
            .iter()
            .map(|&idx| {
                field(record, Some(idx))
                    .and_then(|v| v.parse::<f64>().ok())
                    .filter(|v| v.is_finite())
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_accepts_free_and_dollar_prefix() {
        assert_eq!(parse_price("Free"), Some(0.0));
        assert_eq!(parse_price("$20"), Some(20.0));
        assert_eq!(parse_price("-5"), None);
        assert_eq!(parse_price("abc"), None);
    }

    #[test]
    fn counts_accept_float_notation() {
        assert_eq!(parse_count("1200"), Some(1200));
        assert_eq!(parse_count("1200.0"), Some(1200));
        assert_eq!(parse_count("-3"), None);
    }

    #[test]
    fn bools_accept_common_spellings() {
        assert_eq!(parse_bool("True"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn delimiter_follows_extension() {
        assert_eq!(infer_delimiter(Path::new("courses.tsv")), '\t');
        assert_eq!(infer_delimiter(Path::new("courses.CSV")), ',');
        assert_eq!(infer_delimiter(Path::new("courses")), ',');
    }
}
