use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::utils::safe_filename;

/// Column order of the CSV output. The "HR NAME" column is reserved and
/// always written empty.
pub const COLUMNS: [&str; 11] = [
    "Race",
    "Country",
    "Ground",
    "Time",
    "Horse Number",
    "Horse Name",
    "HR NAME",
    "Horse Jockey",
    "Horse Trainer",
    "Horse Age",
    "Horse Draw",
];

/// One fetch attempt: a venue on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceCardRequest {
    pub venue: u32,
    pub date: NaiveDate,
}

impl RaceCardRequest {
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/Home/racingCenterEvent?venueId={}&event_date={}&race_type=RACECARD",
            base_url,
            self.venue,
            self.date.format("%Y-%m-%d")
        )
    }

    /// Display form of the date, e.g. "05 Jan 2025". Used as the header
    /// fallback when the page carries no parseable headline.
    pub fn date_label(&self) -> String {
        self.date.format("%d %b %Y").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceCardHeader {
    pub location: String,
    pub date: String,
}

impl RaceCardHeader {
    pub fn fallback(date_label: &str) -> Self {
        Self {
            location: "Unknown".to_string(),
            date: date_label.to_string(),
        }
    }
}

/// One horse entry. All fields are kept as strings because the source
/// markup is irregular; anything that cannot be located stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceEntryRow {
    pub race: usize,
    pub country: String,
    pub ground: String,
    /// Non-empty only on the first row of its race.
    pub time: String,
    pub horse_number: String,
    pub horse_name: String,
    pub jockey: String,
    pub trainer: String,
    pub age: String,
    pub draw: String,
}

impl RaceEntryRow {
    /// Field values in [`COLUMNS`] order.
    pub fn record(&self) -> Vec<String> {
        vec![
            self.race.to_string(),
            self.country.clone(),
            self.ground.clone(),
            self.time.clone(),
            self.horse_number.clone(),
            self.horse_name.clone(),
            String::new(),
            self.jockey.clone(),
            self.trainer.clone(),
            self.age.clone(),
            self.draw.clone(),
        ]
    }
}

/// Everything extracted from one racecard page, grouped by race. Race
/// numbers are positional: `races[i]` is race `i + 1` even when a block
/// yielded no valid rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceCardDocument {
    pub header: RaceCardHeader,
    pub races: Vec<Vec<RaceEntryRow>>,
}

impl RaceCardDocument {
    /// Flatten into CSV records: the fixed column header, then each race's
    /// rows followed by one all-empty separator row.
    pub fn records(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.entry_count() + self.races.len() + 1);
        out.push(COLUMNS.iter().map(|c| c.to_string()).collect());
        for race in &self.races {
            for row in race {
                out.push(row.record());
            }
            out.push(vec![String::new(); COLUMNS.len()]);
        }
        out
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_RaceCard_{}.csv",
            safe_filename(&self.header.location),
            safe_filename(&self.header.date)
        )
    }

    pub fn entry_count(&self) -> usize {
        self.races.iter().map(Vec::len).sum()
    }
}

impl Display for RaceCardDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {} ─ {}", self.header.location, self.header.date)?;
        writeln!(
            f,
            "└─ {} race(s), {} entr{}",
            self.races.len(),
            self.entry_count(),
            if self.entry_count() == 1 { "y" } else { "ies" }
        )?;
        for (i, race) in self.races.iter().enumerate() {
            let time = race.first().map(|r| r.time.as_str()).unwrap_or("");
            writeln!(f)?;
            if time.is_empty() {
                writeln!(f, "Race {} — {} runner(s)", i + 1, race.len())?;
            } else {
                writeln!(f, "Race {} at {} — {} runner(s)", i + 1, time, race.len())?;
            }
            for row in race {
                write!(f, "  ▸ {:>3}  {}", row.horse_number, row.horse_name)?;
                if !row.jockey.is_empty() {
                    write!(f, " — {}", row.jockey)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_request_url_and_label() {
        let request = RaceCardRequest {
            venue: 3,
            date: NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        };
        assert_eq!(
            request.url("https://www.indiarace.com"),
            "https://www.indiarace.com/Home/racingCenterEvent?venueId=3&event_date=2025-01-05&race_type=RACECARD"
        );
        assert_eq!(request.date_label(), "05 Jan 2025");
    }

    #[test]
    fn test_file_name_is_sanitized() {
        let document = RaceCardDocument {
            header: RaceCardHeader {
                location: "Royal Western / India".to_string(),
                date: "05 Jan 2025".to_string(),
            },
            races: Vec::new(),
        };
        assert_eq!(
            document.file_name(),
            "Royal_Western__India_RaceCard_05_Jan_2025.csv"
        );
    }

    #[test]
    fn test_records_emits_header_rows_and_separators() {
        let row = RaceEntryRow {
            race: 1,
            time: "13:30".to_string(),
            horse_number: "4".to_string(),
            horse_name: "Thunder Bolt".to_string(),
            ..Default::default()
        };
        let document = RaceCardDocument {
            header: RaceCardHeader::fallback("05 Jan 2025"),
            races: vec![vec![row], Vec::new()],
        };

        let records = document.records();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0][0], "Race");
        assert_eq!(records[1][3], "13:30");
        // one separator per race, even for the empty block
        assert!(records[2].iter().all(String::is_empty));
        assert!(records[3].iter().all(String::is_empty));
        for record in &records {
            assert_eq!(record.len(), COLUMNS.len());
        }
    }
}
