//! Output formatting and persistence for scored facilities and reports.
//!
//! Supports pretty-printing, JSON serialization, CSV append, and rendering
//! the hit list as CSV.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::scorecard::ScoreCard;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty(value: &impl std::fmt::Debug) {
    debug!("{:#?}", value);
}

/// Prints a value as pretty-printed JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, record: &impl Serialize) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}

/// Renders score cards as CSV with a header row.
pub fn hit_list_csv(cards: &[ScoreCard]) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for card in cards {
        writer.serialize(card)?;
    }
    Ok(writer.into_inner()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::grade::ScoreTier;
    use crate::facility::AdoptionStatus;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn card(id: &str) -> ScoreCard {
        ScoreCard {
            rank: 1,
            facility_id: id.into(),
            name: "Amazon ATL4".into(),
            region: "GA".into(),
            status: AdoptionStatus::NotStarted,
            yvs: 72.5,
            classification: ScoreTier::Standard,
            risk_score: None,
            risk_tier: None,
            projected_annual_roi: 120_000.0,
            demo_link: "https://app.freightroll.com/demo/amazon-atl4".into(),
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&card("a"));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&card("a")).unwrap();
    }

    #[test]
    fn test_append_record_creates_file() {
        let path = temp_path("yard_velocity_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_record(&path, &card("a")).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_record_writes_header_once() {
        let path = temp_path("yard_velocity_test_header.csv");
        let _ = fs::remove_file(&path);

        append_record(&path, &card("a")).unwrap();
        append_record(&path, &card("b")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines.iter().filter(|l| l.starts_with("rank,")).count(),
            1
        );

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_hit_list_csv_columns() {
        let bytes = hit_list_csv(&[card("atl4")]).unwrap();
        let content = String::from_utf8(bytes).unwrap();
        let mut lines = content.lines();

        assert_eq!(
            lines.next().unwrap(),
            "rank,facility_id,name,region,status,yvs,classification,risk_score,risk_tier,projected_annual_roi,demo_link"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,atl4,Amazon ATL4,GA,not_started,72.5,STANDARD,,,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_hit_list_has_no_rows() {
        let bytes = hit_list_csv(&[]).unwrap();
        assert!(bytes.is_empty());
    }
}
