use std::fs;
use std::path::PathBuf;

use poisson_predictor::ModelError;
use poisson_predictor::dataset::{Dataset, parse_dataset};
use poisson_predictor::fixtures::load_fixture_list;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loads_league_dataset_fixture() {
    let dataset = Dataset::load(&fixture_path("league.csv")).expect("fixture should parse");
    assert_eq!(dataset.finished.len(), 16);
    assert_eq!(dataset.upcoming.len(), 1);
    assert_eq!(dataset.upcoming[0].home_team, "Fulham");
    assert_eq!(dataset.upcoming[0].away_team, "Luton");
    assert_eq!(dataset.upcoming[0].date, "27/01/2024");

    let last = dataset.finished.last().expect("at least one match");
    assert_eq!(last.home_team, "Luton");
    assert_eq!((last.home_goals, last.away_goals), (1, 3));
}

#[test]
fn loads_fixture_list_fixture() {
    let fixtures = load_fixture_list(&fixture_path("fixtures.txt")).expect("fixture should parse");
    assert_eq!(fixtures.len(), 3);
    assert_eq!(fixtures[1].home_team, "Chelsea");
    assert_eq!(fixtures[1].kickoff.as_deref(), Some("17:30"));
    assert_eq!(fixtures[2].home_team, "Ipswich");
}

#[test]
fn header_only_dataset_has_no_matches() {
    let dataset = parse_dataset("Div,Date,Time,HomeTeam,AwayTeam,FTHG,FTAG\n".as_bytes())
        .expect("header should be skipped");
    assert!(dataset.finished.is_empty());
    assert!(dataset.upcoming.is_empty());
}

#[test]
fn malformed_row_aborts_load_with_line_number() {
    let raw =
        fs::read_to_string(fixture_path("league.csv")).expect("fixture file should be readable");
    let broken = raw.replacen("Everton,Fulham,1,1", "Everton,Fulham,1,x", 1);
    let err = parse_dataset(broken.as_bytes()).unwrap_err();
    let model = err.downcast_ref::<ModelError>().expect("typed error");
    assert_eq!(
        model,
        &ModelError::MalformedRow {
            line: 3,
            reason: "invalid away goals 'x'".to_string()
        }
    );
}
