use std::fmt::Write as _;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::evaluation::AccuracyReport;
use crate::predictor::Prediction;
use crate::ratings::RatingTable;

pub fn render_predictions(predictions: &[Prediction]) -> String {
    let mut out = String::new();
    for p in predictions {
        let _ = writeln!(
            out,
            "{} | {} vs {} | {} | {:.2}% | {}",
            p.date.as_deref().unwrap_or("-"),
            p.home_team,
            p.away_team,
            p.scoreline,
            p.probability_percent,
            p.kickoff.as_deref().unwrap_or("-"),
        );
    }
    out
}

pub fn render_ratings(table: &RatingTable) -> String {
    let league = &table.league;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "League: matches={} avg_home={:.3} avg_away={:.3}",
        league.total_matches, league.avg_home_goals_per_match, league.avg_away_goals_per_match
    );
    let _ = writeln!(
        out,
        "{:<24} {:>4} {:>6} {:>6} {:>4} {:>6} {:>6}",
        "Team", "HP", "H-GF", "H-GA", "AP", "A-GF", "A-GA"
    );
    for (name, r) in table.sorted() {
        let _ = writeln!(
            out,
            "{:<24} {:>4} {:>6.2} {:>6.2} {:>4} {:>6.2} {:>6.2}",
            name,
            r.home_matches,
            r.avg_home_goals_scored,
            r.avg_home_goals_conceded,
            r.away_matches,
            r.avg_away_goals_scored,
            r.avg_away_goals_conceded,
        );
    }
    out
}

#[derive(Debug, Serialize)]
struct AccuracyJson<'a> {
    score_accuracy: Option<f64>,
    wdl_accuracy: Option<f64>,
    #[serde(flatten)]
    report: &'a AccuracyReport,
}

pub fn predictions_json(predictions: &[Prediction]) -> Result<String> {
    serde_json::to_string_pretty(predictions).context("serialize predictions")
}

pub fn accuracy_json(report: &AccuracyReport) -> Result<String> {
    let payload = AccuracyJson {
        score_accuracy: report.score_accuracy(),
        wdl_accuracy: report.wdl_accuracy(),
        report,
    };
    serde_json::to_string_pretty(&payload).context("serialize accuracy report")
}
