use std::fmt;

use serde::Serialize;

use crate::error::ModelError;
use crate::ratings::{LeagueAverages, RatingTable, TeamRating};

pub const MAX_GOALS: u32 = 5;
const GRID: usize = MAX_GOALS as usize + 1;
// Smallest percentage a prediction reports; the best cell is never shown as zero.
const MIN_REPORTED_PERCENT: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
}

impl Scoreline {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }
}

impl fmt::Display for Scoreline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.home, self.away)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub date: Option<String>,
    pub home_team: String,
    pub away_team: String,
    pub scoreline: Scoreline,
    pub probability_percent: f64,
    pub kickoff: Option<String>,
    pub expected_goals: ExpectedGoals,
    pub outcome_probs: OutcomeProbs,
}

impl Prediction {
    pub fn scheduled(mut self, date: impl Into<String>, kickoff: Option<String>) -> Self {
        self.date = Some(date.into());
        self.kickoff = kickoff;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreGrid {
    cells: [[f64; GRID]; GRID],
}

impl ScoreGrid {
    pub fn from_expected(xg: ExpectedGoals) -> Self {
        let pmf_h = poisson_pmf(xg.home, MAX_GOALS);
        let pmf_a = poisson_pmf(xg.away, MAX_GOALS);
        let mut cells = [[0.0; GRID]; GRID];
        for (h, p_h) in pmf_h.iter().enumerate() {
            for (a, p_a) in pmf_a.iter().enumerate() {
                cells[h][a] = p_h * p_a;
            }
        }
        Self { cells }
    }

    pub fn probability(&self, scoreline: Scoreline) -> f64 {
        self.cells
            .get(scoreline.home as usize)
            .and_then(|row| row.get(scoreline.away as usize))
            .copied()
            .unwrap_or(0.0)
    }

    // Strictly greatest cell wins; ties keep the first one visited (home goals
    // outer, away goals inner, ascending).
    pub fn most_likely(&self) -> (Scoreline, f64) {
        let mut best = Scoreline::new(0, 0);
        let mut best_p = -1.0;
        for (h, row) in self.cells.iter().enumerate() {
            for (a, &p) in row.iter().enumerate() {
                if p > best_p {
                    best = Scoreline::new(h as u32, a as u32);
                    best_p = p;
                }
            }
        }
        (best, best_p)
    }

    pub fn outcome_probs(&self) -> OutcomeProbs {
        let mut p_home = 0.0;
        let mut p_draw = 0.0;
        let mut p_away = 0.0;
        for (h, row) in self.cells.iter().enumerate() {
            for (a, &p) in row.iter().enumerate() {
                if h > a {
                    p_home += p;
                } else if h < a {
                    p_away += p;
                } else {
                    p_draw += p;
                }
            }
        }

        // Renormalize over the truncated grid.
        let sum = p_home + p_draw + p_away;
        if sum > 0.0 {
            OutcomeProbs {
                home: p_home / sum,
                draw: p_draw / sum,
                away: p_away / sum,
            }
        } else {
            OutcomeProbs {
                home: 1.0 / 3.0,
                draw: 1.0 / 3.0,
                away: 1.0 / 3.0,
            }
        }
    }
}

pub fn expected_goals(
    home: &TeamRating,
    away: &TeamRating,
    league: &LeagueAverages,
) -> ExpectedGoals {
    let home_attack = home.avg_home_goals_scored;
    let home_defense = home.avg_home_goals_conceded;
    let away_attack = away.avg_away_goals_scored;
    let away_defense = away.avg_away_goals_conceded;

    ExpectedGoals {
        home: home_attack * relative_to_league(away_defense, league.avg_away_goals_per_match),
        away: away_attack * relative_to_league(home_defense, league.avg_home_goals_per_match),
    }
}

pub fn predict(
    home_team: &str,
    away_team: &str,
    table: &RatingTable,
) -> Result<Prediction, ModelError> {
    let home = table.get(home_team)?;
    let away = table.get(away_team)?;

    let xg = expected_goals(home, away, &table.league);
    let grid = ScoreGrid::from_expected(xg);
    let (scoreline, p) = grid.most_likely();

    Ok(Prediction {
        date: None,
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        scoreline,
        probability_percent: reported_percent(p),
        kickoff: None,
        expected_goals: xg,
        outcome_probs: grid.outcome_probs(),
    })
}

pub fn poisson_pmf(lambda: f64, max_k: u32) -> Vec<f64> {
    let max_k = max_k as usize;
    let mut out = vec![0.0; max_k + 1];
    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    out
}

fn reported_percent(p: f64) -> f64 {
    round_dp(p * 100.0, 2).max(MIN_REPORTED_PERCENT)
}

pub(crate) fn round_dp(v: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (v * scale).round() / scale
}

fn relative_to_league(rate: f64, league_avg: f64) -> f64 {
    if league_avg == 0.0 {
        0.0
    } else {
        rate / league_avg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn league(avg_home: f64, avg_away: f64) -> LeagueAverages {
        LeagueAverages {
            total_home_goals: 0,
            total_away_goals: 0,
            total_matches: 1,
            avg_home_goals_per_match: avg_home,
            avg_away_goals_per_match: avg_away,
        }
    }

    fn rating(
        home_scored: f64,
        home_conceded: f64,
        away_scored: f64,
        away_conceded: f64,
    ) -> TeamRating {
        TeamRating {
            avg_home_goals_scored: home_scored,
            avg_home_goals_conceded: home_conceded,
            avg_away_goals_scored: away_scored,
            avg_away_goals_conceded: away_conceded,
            ..TeamRating::default()
        }
    }

    #[test]
    fn pmf_matches_closed_form() {
        let pmf = poisson_pmf(1.5, MAX_GOALS);
        assert_eq!(pmf.len(), 6);
        assert_approx_eq!(pmf[0], (-1.5f64).exp());
        assert_approx_eq!(pmf[2], (-1.5f64).exp() * 1.5 * 1.5 / 2.0);
        assert_approx_eq!(pmf[5], (-1.5f64).exp() * 1.5f64.powi(5) / 120.0);
    }

    #[test]
    fn zero_rate_puts_all_mass_on_nil() {
        let pmf = poisson_pmf(0.0, MAX_GOALS);
        assert_eq!(pmf[0], 1.0);
        assert!(pmf[1..].iter().all(|p| *p == 0.0));

        let grid = ScoreGrid::from_expected(ExpectedGoals { home: 0.0, away: 0.0 });
        let (best, p) = grid.most_likely();
        assert_eq!(best, Scoreline::new(0, 0));
        assert_eq!(p, 1.0);
    }

    #[test]
    fn genuine_tie_keeps_first_cell_visited() {
        // With home rate 1 and away rate 2, pmf(0;1) == pmf(1;1) and pmf(1;2) == pmf(2;2),
        // so (0,1), (0,2), (1,1) and (1,2) share the maximum.
        let grid = ScoreGrid::from_expected(ExpectedGoals { home: 1.0, away: 2.0 });
        assert_eq!(
            grid.probability(Scoreline::new(1, 1)),
            grid.probability(Scoreline::new(0, 2))
        );
        let (best, p) = grid.most_likely();
        assert_eq!(best, Scoreline::new(0, 1));
        assert_eq!(p, grid.probability(Scoreline::new(1, 2)));
    }

    #[test]
    fn expected_goals_normalizes_by_league() {
        let home = rating(2.0, 1.0, 0.0, 0.0);
        let away = rating(0.0, 0.0, 1.5, 3.0);
        let xg = expected_goals(&home, &away, &league(1.5, 1.2));
        assert_approx_eq!(xg.home, 2.0 * (3.0 / 1.2));
        assert_approx_eq!(xg.away, 1.5 * (1.0 / 1.5));
    }

    #[test]
    fn zero_league_average_gives_zero_rate() {
        let home = rating(2.0, 1.0, 0.0, 0.0);
        let away = rating(0.0, 0.0, 0.0, 2.0);
        let xg = expected_goals(&home, &away, &league(1.5, 0.0));
        assert_eq!(xg.home, 0.0);
        assert_eq!(xg.away, 0.0);
    }

    #[test]
    fn outcome_probs_sum_to_one() {
        let grid = ScoreGrid::from_expected(ExpectedGoals { home: 1.7, away: 0.9 });
        let probs = grid.outcome_probs();
        assert_approx_eq!(probs.home + probs.draw + probs.away, 1.0);
        assert!(probs.home > probs.away);
    }

    #[test]
    fn tiny_best_cell_is_reported_above_zero() {
        let grid = ScoreGrid::from_expected(ExpectedGoals { home: 40.0, away: 0.0 });
        let (best, p) = grid.most_likely();
        assert_eq!(best, Scoreline::new(5, 0));
        assert!(p > 0.0 && round_dp(p * 100.0, 2) == 0.0);
        assert_eq!(reported_percent(p), MIN_REPORTED_PERCENT);
        assert_approx_eq!(reported_percent(0.5), 50.0);
    }

    #[test]
    fn extreme_rates_still_predict_inside_range() {
        let day = chrono::NaiveDate::from_ymd_opt(2023, 8, 12).unwrap();
        let played = |home: &str, away: &str, hg: u32, ag: u32| crate::dataset::FinishedMatch {
            date: day,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_goals: hg,
            away_goals: ag,
        };
        // One away goal in ten matches drags the league away average to 0.1.
        let mut history = vec![played("A", "B", 9, 0), played("C", "D", 0, 1)];
        history.extend((0..8).map(|_| played("E", "F", 0, 0)));
        let table = RatingTable::build(&history).unwrap();

        let p = predict("A", "B", &table).unwrap();
        assert!(p.expected_goals.home > 100.0);
        assert!(p.probability_percent > 0.0 && p.probability_percent <= 100.0);
        assert!(p.scoreline.home <= MAX_GOALS && p.scoreline.away <= MAX_GOALS);
    }

    #[test]
    fn scoreline_display_uses_dash() {
        assert_eq!(Scoreline::new(2, 1).to_string(), "2 - 1");
    }

    #[test]
    fn round_dp_rounds_half_away_from_zero() {
        assert_approx_eq!(round_dp(12.3456, 2), 12.35);
        assert_approx_eq!(round_dp(66.66666, 1), 66.7);
    }
}
