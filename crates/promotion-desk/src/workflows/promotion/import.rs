use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{ActivityCategory, ActivityDraft};

#[derive(Debug)]
pub enum ActivityImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    UnknownCategory { row: usize, value: String },
    InvalidDate { row: usize, value: String },
}

impl std::fmt::Display for ActivityImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityImportError::Io(err) => write!(f, "failed to read activity export: {}", err),
            ActivityImportError::Csv(err) => write!(f, "invalid activity CSV data: {}", err),
            ActivityImportError::UnknownCategory { row, value } => {
                write!(f, "row {row}: unknown activity category '{value}'")
            }
            ActivityImportError::InvalidDate { row, value } => {
                write!(f, "row {row}: '{value}' is not a YYYY-MM-DD date")
            }
        }
    }
}

impl std::error::Error for ActivityImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActivityImportError::Io(err) => Some(err),
            ActivityImportError::Csv(err) => Some(err),
            ActivityImportError::UnknownCategory { .. }
            | ActivityImportError::InvalidDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for ActivityImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ActivityImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads activity spreadsheets exported from faculty records.
///
/// Expected header: `Category,Title,Venue,Published On,Authors,Lead Author`.
/// Rows become drafts; validation still runs when they are stored.
pub struct ActivityCsvImporter;

impl ActivityCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ActivityDraft>, ActivityImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ActivityDraft>, ActivityImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut drafts = Vec::new();

        for (index, record) in csv_reader.deserialize::<ActivityRow>().enumerate() {
            let row = record?;
            // Header is line 1.
            let line = index + 2;

            let category = ActivityCategory::from_code(&row.category).ok_or_else(|| {
                ActivityImportError::UnknownCategory {
                    row: line,
                    value: row.category.clone(),
                }
            })?;

            let published_on = match row.published_on.as_deref() {
                Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    ActivityImportError::InvalidDate {
                        row: line,
                        value: raw.to_string(),
                    }
                })?),
                None => None,
            };

            drafts.push(ActivityDraft {
                category: Some(category),
                title: row.title,
                venue: row.venue,
                published_on,
                author_count: row.authors,
                lead_author: row.lead_author.as_deref().map(is_affirmative),
                evidence_url: None,
            });
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct ActivityRow {
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Title", default, deserialize_with = "empty_string_as_none")]
    title: Option<String>,
    #[serde(rename = "Venue", default, deserialize_with = "empty_string_as_none")]
    venue: Option<String>,
    #[serde(
        rename = "Published On",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    published_on: Option<String>,
    #[serde(rename = "Authors", default)]
    authors: Option<u8>,
    #[serde(
        rename = "Lead Author",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    lead_author: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn is_affirmative(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "x"
    )
}
