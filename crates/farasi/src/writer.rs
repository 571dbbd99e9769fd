use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::types::RaceCardDocument;

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_record<W: Write>(mut w: W, record: &[String]) -> io::Result<()> {
    let mut first = true;
    for field in record {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(field) {
            write!(w, "\"{}\"", field.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", field)?;
        }
    }
    writeln!(w)
}

/// Render records as CSV text with RFC 4180 quoting.
pub fn records_to_string(records: &[Vec<String>]) -> String {
    let mut buf: Vec<u8> = Vec::new();
    for record in records {
        let _ = write_record(&mut buf, record);
    }
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// Write one racecard as a CSV file under `dir`, creating the directory if
/// needed. The file name is derived from the detected location and date, so
/// a rerun for the same page overwrites its previous output.
pub fn write_racecard(dir: &Path, document: &RaceCardDocument) -> Result<PathBuf, WriteError> {
    let path = dir.join(document.file_name());

    fs::create_dir_all(dir).map_err(|source| WriteError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    fs::write(&path, records_to_string(&document.records())).map_err(|source| WriteError::Io {
        path: path.clone(),
        source,
    })?;

    log::info!("Saved {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RaceCardHeader, RaceEntryRow};

    /// Minimal CSV reader for round-trip checks (quotes + CRLF tolerant).
    fn parse_records(text: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut field = String::new();
        let mut record: Vec<String> = Vec::new();
        let mut in_quotes = false;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '"' => {
                    if in_quotes {
                        if matches!(chars.peek(), Some('"')) {
                            chars.next();
                            field.push('"');
                        } else {
                            in_quotes = false;
                        }
                    } else {
                        in_quotes = true;
                    }
                }
                ',' if !in_quotes => record.push(std::mem::take(&mut field)),
                '\n' | '\r' if !in_quotes => {
                    if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                        chars.next();
                    }
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                }
                _ => field.push(ch),
            }
        }
        if !field.is_empty() || !record.is_empty() {
            record.push(field);
            records.push(record);
        }
        records
    }

    fn sample_document() -> RaceCardDocument {
        RaceCardDocument {
            header: RaceCardHeader {
                location: "PUNE".to_string(),
                date: "05 Jan 2025".to_string(),
            },
            races: vec![
                vec![
                    RaceEntryRow {
                        race: 1,
                        country: "India".to_string(),
                        ground: "Good".to_string(),
                        time: "13:30".to_string(),
                        horse_number: "4".to_string(),
                        horse_name: "Thunder, Bolt".to_string(),
                        jockey: "jockeyY".to_string(),
                        trainer: "trainerX".to_string(),
                        age: "5".to_string(),
                        draw: "3".to_string(),
                    },
                    RaceEntryRow {
                        race: 1,
                        country: "India".to_string(),
                        ground: "Good".to_string(),
                        horse_number: "7".to_string(),
                        horse_name: "Silver \"Arrow\"".to_string(),
                        ..Default::default()
                    },
                ],
                Vec::new(),
            ],
        }
    }

    #[test]
    fn test_quoting() {
        let records = vec![vec![
            "plain".to_string(),
            "with, comma".to_string(),
            "with \"quotes\"".to_string(),
            String::new(),
        ]];
        assert_eq!(
            records_to_string(&records),
            "plain,\"with, comma\",\"with \"\"quotes\"\"\",\n"
        );
    }

    #[test]
    fn test_round_trip_preserves_every_field() {
        let document = sample_document();
        let records = document.records();
        let reread = parse_records(&records_to_string(&records));
        assert_eq!(reread, records);
    }

    #[test]
    fn test_write_racecard_creates_directory_and_file() {
        let dir = std::env::temp_dir().join(format!("farasi-writer-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let document = sample_document();
        let path = write_racecard(&dir, &document).expect("write should succeed");
        assert_eq!(path, dir.join("PUNE_RaceCard_05_Jan_2025.csv"));

        let contents = fs::read_to_string(&path).expect("file should exist");
        let records = parse_records(&contents);
        assert_eq!(records, document.records());

        // rerun overwrites rather than failing
        let again = write_racecard(&dir, &document).expect("rewrite should succeed");
        assert_eq!(again, path);

        let _ = fs::remove_dir_all(&dir);
    }
}
