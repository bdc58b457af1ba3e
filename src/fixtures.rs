use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::ModelError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledFixture {
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub kickoff: Option<String>,
}

pub fn load_fixture_list(path: &Path) -> Result<Vec<ScheduledFixture>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read fixture list {}", path.display()))?;
    let fixtures = parse_fixture_list(&raw)
        .with_context(|| format!("parse fixture list {}", path.display()))?;
    Ok(fixtures)
}

pub fn parse_fixture_list(raw: &str) -> Result<Vec<ScheduledFixture>, ModelError> {
    let mut out = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let parts = line.split(',').map(str::trim).collect::<Vec<_>>();
        let [date, home, away, kickoff] = parts.as_slice() else {
            return Err(ModelError::malformed(
                idx + 1,
                format!("expected 4 fields (date,home,away,time), found {}", parts.len()),
            ));
        };
        if home.is_empty() || away.is_empty() {
            return Err(ModelError::malformed(idx + 1, "missing team name"));
        }
        out.push(ScheduledFixture {
            date: (*date).to_string(),
            home_team: (*home).to_string(),
            away_team: (*away).to_string(),
            kickoff: Some((*kickoff).to_string()).filter(|k| !k.is_empty()),
        });
    }
    Ok(out)
}
