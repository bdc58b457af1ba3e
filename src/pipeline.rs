use tracing::{debug, info};

use crate::dataset::FinishedMatch;
use crate::error::ModelError;
use crate::evaluation::{self, AccuracyReport};
use crate::fixtures::ScheduledFixture;
use crate::predictor::{self, Prediction};
use crate::ratings::RatingTable;
use crate::source::MatchSource;

#[derive(Debug, Clone)]
pub struct PredictionRun {
    pub table: RatingTable,
    pub predictions: Vec<Prediction>,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct BacktestRun {
    pub table: RatingTable,
    pub report: AccuracyReport,
}

pub fn run_predictions<S>(source: &S) -> Result<PredictionRun, ModelError>
where
    S: MatchSource<Fixture = ScheduledFixture>,
{
    let table = RatingTable::build(source.history())?;

    let mut predictions = Vec::new();
    let mut skipped = 0usize;
    for fixture in source.fixtures() {
        if !table.knows_both(&fixture.home_team, &fixture.away_team) {
            debug!(
                home = %fixture.home_team,
                away = %fixture.away_team,
                "no rating for fixture team"
            );
            skipped += 1;
            continue;
        }
        let prediction = predictor::predict(&fixture.home_team, &fixture.away_team, &table)?
            .scheduled(fixture.date.clone(), fixture.kickoff.clone());
        predictions.push(prediction);
    }

    info!(
        predicted = predictions.len(),
        skipped,
        teams = table.teams.len(),
        "predictions ready"
    );
    Ok(PredictionRun {
        table,
        predictions,
        skipped,
    })
}

pub fn run_backtest<S>(source: &S) -> Result<BacktestRun, ModelError>
where
    S: MatchSource<Fixture = FinishedMatch>,
{
    let table = RatingTable::build(source.history())?;
    let report = evaluation::evaluate(source.fixtures(), &table)?;
    Ok(BacktestRun { table, report })
}
