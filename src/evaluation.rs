use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use crate::dataset::FinishedMatch;
use crate::error::ModelError;
use crate::predictor::{self, Scoreline, round_dp};
use crate::ratings::RatingTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Draw,
}

pub fn classify_outcome(home_goals: u32, away_goals: u32) -> Outcome {
    if home_goals > away_goals {
        Outcome::HomeWin
    } else if home_goals < away_goals {
        Outcome::AwayWin
    } else {
        Outcome::Draw
    }
}

impl Scoreline {
    pub fn outcome(&self) -> Outcome {
        classify_outcome(self.home, self.away)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccuracyReport {
    pub total_scores: u32,
    pub correct_scores: u32,
    pub total_wdl: u32,
    pub correct_wdl: u32,
    pub skipped: u32,
    pub correct_predictions: Vec<String>,
}

impl AccuracyReport {
    pub fn record(
        &mut self,
        home_team: &str,
        away_team: &str,
        predicted: Scoreline,
        actual: Scoreline,
    ) {
        self.total_scores += 1;
        self.total_wdl += 1;

        if predicted == actual {
            self.correct_scores += 1;
            self.correct_predictions
                .push(format!("{home_team} {predicted} {away_team}"));
        }
        if predicted.outcome() == actual.outcome() {
            self.correct_wdl += 1;
        }
    }

    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.total_scores == 0
    }

    pub fn score_accuracy(&self) -> Option<f64> {
        percent(self.correct_scores, self.total_scores)
    }

    pub fn wdl_accuracy(&self) -> Option<f64> {
        percent(self.correct_wdl, self.total_wdl)
    }
}

impl fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "no scoreable fixtures");
        }
        let wdl = self.wdl_accuracy().unwrap_or_default();
        let score = self.score_accuracy().unwrap_or_default();
        writeln!(
            f,
            "WDL Accuracy: {wdl:.1}% ({}/{})",
            self.correct_wdl, self.total_wdl
        )?;
        writeln!(
            f,
            "Score Accuracy: {score:.1}% ({}/{})",
            self.correct_scores, self.total_scores
        )?;
        writeln!(f, "Correct score predictions:")?;
        for line in &self.correct_predictions {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub fn evaluate<'a, I>(fixtures: I, table: &RatingTable) -> Result<AccuracyReport, ModelError>
where
    I: IntoIterator<Item = &'a FinishedMatch>,
{
    let mut report = AccuracyReport::default();
    for fixture in fixtures {
        if !table.knows_both(&fixture.home_team, &fixture.away_team) {
            debug!(
                home = %fixture.home_team,
                away = %fixture.away_team,
                "skipping fixture with unrated team"
            );
            report.record_skipped();
            continue;
        }

        let prediction = predictor::predict(&fixture.home_team, &fixture.away_team, table)?;
        report.record(
            &fixture.home_team,
            &fixture.away_team,
            prediction.scoreline,
            Scoreline::new(fixture.home_goals, fixture.away_goals),
        );
    }

    info!(
        scored = report.total_scores,
        skipped = report.skipped,
        exact = report.correct_scores,
        wdl = report.correct_wdl,
        "evaluation finished"
    );
    Ok(report)
}

fn percent(correct: u32, total: u32) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(round_dp(100.0 * f64::from(correct) / f64::from(total), 1))
}
