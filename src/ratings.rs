use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::dataset::FinishedMatch;
use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeagueAverages {
    pub total_home_goals: u64,
    pub total_away_goals: u64,
    pub total_matches: u64,
    pub avg_home_goals_per_match: f64,
    pub avg_away_goals_per_match: f64,
}

impl LeagueAverages {
    fn from_totals(
        total_home_goals: u64,
        total_away_goals: u64,
        total_matches: u64,
    ) -> Result<Self, ModelError> {
        if total_matches == 0 {
            return Err(ModelError::NoData);
        }
        let n = total_matches as f64;
        Ok(Self {
            total_home_goals,
            total_away_goals,
            total_matches,
            avg_home_goals_per_match: total_home_goals as f64 / n,
            avg_away_goals_per_match: total_away_goals as f64 / n,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamRating {
    pub home_matches: u32,
    pub away_matches: u32,
    pub total_home_goals_scored: u64,
    pub total_home_goals_conceded: u64,
    pub total_away_goals_scored: u64,
    pub total_away_goals_conceded: u64,
    pub avg_home_goals_scored: f64,
    pub avg_home_goals_conceded: f64,
    pub avg_away_goals_scored: f64,
    pub avg_away_goals_conceded: f64,
}

impl TeamRating {
    fn record_home(&mut self, scored: u32, conceded: u32) {
        self.home_matches += 1;
        self.total_home_goals_scored += u64::from(scored);
        self.total_home_goals_conceded += u64::from(conceded);
    }

    fn record_away(&mut self, scored: u32, conceded: u32) {
        self.away_matches += 1;
        self.total_away_goals_scored += u64::from(scored);
        self.total_away_goals_conceded += u64::from(conceded);
    }

    fn derive_averages(&mut self) {
        self.avg_home_goals_scored = per_match(self.total_home_goals_scored, self.home_matches);
        self.avg_home_goals_conceded = per_match(self.total_home_goals_conceded, self.home_matches);
        self.avg_away_goals_scored = per_match(self.total_away_goals_scored, self.away_matches);
        self.avg_away_goals_conceded = per_match(self.total_away_goals_conceded, self.away_matches);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RatingTable {
    pub league: LeagueAverages,
    pub teams: HashMap<String, TeamRating>,
}

impl RatingTable {
    pub fn build(matches: &[FinishedMatch]) -> Result<Self, ModelError> {
        let mut total_home_goals = 0u64;
        let mut total_away_goals = 0u64;
        let mut total_matches = 0u64;
        let mut teams: HashMap<String, TeamRating> = HashMap::new();

        for m in matches {
            total_home_goals += u64::from(m.home_goals);
            total_away_goals += u64::from(m.away_goals);
            total_matches += 1;

            teams
                .entry(m.home_team.clone())
                .or_default()
                .record_home(m.home_goals, m.away_goals);
            teams
                .entry(m.away_team.clone())
                .or_default()
                .record_away(m.away_goals, m.home_goals);
        }

        let league =
            LeagueAverages::from_totals(total_home_goals, total_away_goals, total_matches)?;
        for rating in teams.values_mut() {
            rating.derive_averages();
        }

        debug!(
            matches = total_matches,
            teams = teams.len(),
            avg_home = league.avg_home_goals_per_match,
            avg_away = league.avg_away_goals_per_match,
            "built rating table"
        );
        Ok(Self { league, teams })
    }

    pub fn get(&self, team: &str) -> Result<&TeamRating, ModelError> {
        self.teams.get(team).ok_or_else(|| ModelError::UnknownTeam {
            team: team.to_string(),
        })
    }

    pub fn contains(&self, team: &str) -> bool {
        self.teams.contains_key(team)
    }

    pub fn knows_both(&self, home: &str, away: &str) -> bool {
        self.contains(home) && self.contains(away)
    }

    pub fn sorted(&self) -> Vec<(&str, &TeamRating)> {
        let mut rows = self
            .teams
            .iter()
            .map(|(name, rating)| (name.as_str(), rating))
            .collect::<Vec<_>>();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }
}

fn per_match(total: u64, matches: u32) -> f64 {
    if matches == 0 {
        0.0
    } else {
        total as f64 / f64::from(matches)
    }
}
