use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ModelError;
use crate::fixtures::ScheduledFixture;

// Column layout of the results file: Div, Date, Time, HomeTeam, AwayTeam, FTHG, FTAG, ...
const COL_DATE: usize = 1;
const COL_TIME: usize = 2;
const COL_HOME: usize = 3;
const COL_AWAY: usize = 4;
const COL_HOME_GOALS: usize = 5;
const COL_AWAY_GOALS: usize = 6;
const MIN_COLUMNS: usize = COL_AWAY_GOALS + 1;

const HEADER_MARKER: &str = "FTHG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinishedMatch {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub finished: Vec<FinishedMatch>,
    pub upcoming: Vec<ScheduledFixture>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldoutWindow {
    pub from: NaiveDate,
    pub until: Option<NaiveDate>,
}

impl HoldoutWindow {
    pub fn new(from: NaiveDate, until: Option<NaiveDate>) -> Self {
        Self { from, until }
    }

    pub fn season_year(year: i32) -> Option<Self> {
        Some(Self {
            from: NaiveDate::from_ymd_opt(year, 1, 1)?,
            until: NaiveDate::from_ymd_opt(year, 12, 31),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.from && self.until.is_none_or(|until| date <= until)
    }
}

impl Dataset {
    pub fn load(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("open match dataset {}", path.display()))?;
        let dataset = parse_dataset(file)
            .with_context(|| format!("parse match dataset {}", path.display()))?;
        info!(
            path = %path.display(),
            finished = dataset.finished.len(),
            upcoming = dataset.upcoming.len(),
            "loaded match dataset"
        );
        Ok(dataset)
    }

    pub fn split(&self, window: &HoldoutWindow) -> (Vec<FinishedMatch>, Vec<FinishedMatch>) {
        self.finished
            .iter()
            .cloned()
            .partition(|m| !window.contains(m.date))
    }
}

pub fn parse_dataset<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote(b'|')
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut dataset = Dataset::default();
    for (idx, record) in reader.records().enumerate() {
        let record = record.context("read dataset row")?;
        let line = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(idx + 1);

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }
        if record.len() < MIN_COLUMNS {
            return Err(ModelError::malformed(
                line,
                format!("expected at least {MIN_COLUMNS} columns, found {}", record.len()),
            )
            .into());
        }

        let home_goals_raw = &record[COL_HOME_GOALS];
        if home_goals_raw == HEADER_MARKER {
            debug!(line, "skipping header row");
            continue;
        }

        let home_team = required_field(&record[COL_HOME], "home team", line)?;
        let away_team = required_field(&record[COL_AWAY], "away team", line)?;

        if home_goals_raw.is_empty() {
            let kickoff = Some(record[COL_TIME].to_string()).filter(|t| !t.is_empty());
            dataset.upcoming.push(ScheduledFixture {
                date: record[COL_DATE].to_string(),
                home_team,
                away_team,
                kickoff,
            });
            continue;
        }

        dataset.finished.push(FinishedMatch {
            date: parse_match_date(&record[COL_DATE], line)?,
            home_team,
            away_team,
            home_goals: parse_goals(home_goals_raw, "home goals", line)?,
            away_goals: parse_goals(&record[COL_AWAY_GOALS], "away goals", line)?,
        });
    }

    Ok(dataset)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.contains('-') {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
    }
    // `%Y` also accepts two digits, so the year width decides.
    let year = raw.rsplit('/').next()?;
    let fmt = if year.len() == 2 { "%d/%m/%y" } else { "%d/%m/%Y" };
    NaiveDate::parse_from_str(raw, fmt).ok()
}

fn parse_match_date(raw: &str, line: usize) -> Result<NaiveDate, ModelError> {
    parse_date(raw).ok_or_else(|| ModelError::malformed(line, format!("invalid date '{raw}'")))
}

fn parse_goals(raw: &str, field: &str, line: usize) -> Result<u32, ModelError> {
    raw.parse::<u32>()
        .map_err(|_| ModelError::malformed(line, format!("invalid {field} '{raw}'")))
}

fn required_field(raw: &str, field: &str, line: usize) -> Result<String, ModelError> {
    if raw.is_empty() {
        return Err(ModelError::malformed(line, format!("missing {field}")));
    }
    Ok(raw.to_string())
}
