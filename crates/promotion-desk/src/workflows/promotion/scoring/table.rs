use std::io::Write;

use serde::Serialize;

use super::ScoreSheet;

#[derive(Debug, thiserror::Error)]
pub enum ScoreTableError {
    #[error("failed to write score table: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush score table: {0}")]
    Io(#[from] std::io::Error),
    #[error("score table is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Serialize)]
struct TableRow<'a> {
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Activities")]
    activities: Option<u32>,
    #[serde(rename = "Raw Points")]
    raw_points: Option<f32>,
    #[serde(rename = "Counted Points")]
    counted_points: f32,
    #[serde(rename = "Minimum")]
    minimum: Option<f32>,
    #[serde(rename = "Maximum")]
    maximum: Option<f32>,
    #[serde(rename = "Minimum Count")]
    minimum_count: Option<u32>,
    #[serde(rename = "Status")]
    status: &'a str,
}

/// Writes one row per category followed by a total row.
pub fn write_score_table<W: Write>(sheet: &ScoreSheet, writer: W) -> Result<(), ScoreTableError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for line in &sheet.lines {
        csv_writer.serialize(TableRow {
            category: line.category_label,
            activities: Some(line.count),
            raw_points: Some(line.raw_points),
            counted_points: line.counted_points,
            minimum: line.min_points,
            maximum: line.max_points,
            minimum_count: line.min_count,
            status: if line.satisfied { "ok" } else { "short" },
        })?;
    }

    csv_writer.serialize(TableRow {
        category: "Total",
        activities: None,
        raw_points: None,
        counted_points: sheet.total_points,
        minimum: sheet.required_total,
        maximum: None,
        minimum_count: None,
        status: sheet.eligibility.label(),
    })?;

    csv_writer.flush()?;
    Ok(())
}

pub fn score_table_csv(sheet: &ScoreSheet) -> Result<String, ScoreTableError> {
    let mut buffer = Vec::new();
    write_score_table(sheet, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
