use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use crate::dataset::{HoldoutWindow, parse_date};

pub const DEFAULT_DATASET_PATH: &str = "data/final_dataset.csv";
pub const DEFAULT_HOLDOUT_YEAR: i32 = 2024;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub fixture_list_path: Option<PathBuf>,
    pub holdout: HoldoutWindow,
    pub json: bool,
    pub show_ratings: bool,
}

impl Config {
    // `.env.local`, then `.env`, then the process environment, then CLI flags.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        let args = env::args().skip(1).collect::<Vec<_>>();
        Self::resolve(&args, opt_env)
    }

    pub fn resolve<F>(args: &[String], env_lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dataset_path = arg_value(args, "--dataset")
            .or_else(|| env_lookup("MATCH_DATASET_PATH"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH));
        let fixture_list_path = arg_value(args, "--fixtures")
            .or_else(|| env_lookup("FIXTURE_LIST_PATH"))
            .map(PathBuf::from);

        let from = arg_value(args, "--holdout-from").or_else(|| env_lookup("HOLDOUT_FROM"));
        let until = arg_value(args, "--holdout-until").or_else(|| env_lookup("HOLDOUT_UNTIL"));
        let holdout = resolve_holdout(from.as_deref(), until.as_deref())?;

        Ok(Self {
            dataset_path,
            fixture_list_path,
            holdout,
            json: has_flag(args, "--json"),
            show_ratings: has_flag(args, "--ratings"),
        })
    }
}

fn resolve_holdout(from: Option<&str>, until: Option<&str>) -> Result<HoldoutWindow> {
    let until = until
        .map(|raw| parse_date(raw).with_context(|| format!("invalid holdout end date '{raw}'")))
        .transpose()?;
    let window = match from {
        Some(raw) => {
            let from =
                parse_date(raw).with_context(|| format!("invalid holdout start date '{raw}'"))?;
            HoldoutWindow::new(from, until)
        }
        None => {
            let mut season = HoldoutWindow::season_year(DEFAULT_HOLDOUT_YEAR)
                .context("default holdout season")?;
            if until.is_some() {
                season.until = until;
            }
            season
        }
    };
    if let Some(end) = window.until {
        if end < window.from {
            return Err(anyhow!(
                "holdout window ends ({end}) before it starts ({})",
                window.from
            ));
        }
    }
    Ok(window)
}

fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn defaults_without_args_or_env() {
        let cfg = Config::resolve(&[], no_env).unwrap();
        assert_eq!(cfg.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
        assert_eq!(cfg.fixture_list_path, None);
        assert_eq!(cfg.holdout, HoldoutWindow::season_year(2024).unwrap());
        assert!(!cfg.json);
        assert!(!cfg.show_ratings);
    }

    #[test]
    fn args_override_env() {
        let env = |key: &str| match key {
            "MATCH_DATASET_PATH" => Some("env.csv".to_string()),
            "FIXTURE_LIST_PATH" => Some("env_fixtures.txt".to_string()),
            _ => None,
        };
        let cfg = Config::resolve(&args(&["--dataset=cli.csv", "--json"]), env).unwrap();
        assert_eq!(cfg.dataset_path, PathBuf::from("cli.csv"));
        assert_eq!(cfg.fixture_list_path, Some(PathBuf::from("env_fixtures.txt")));
        assert!(cfg.json);
    }

    #[test]
    fn parses_holdout_window() {
        let cfg = Config::resolve(
            &args(&["--holdout-from", "2023-08-01", "--holdout-until=31/12/2023"]),
            no_env,
        )
        .unwrap();
        assert_eq!(cfg.holdout.from, NaiveDate::from_ymd_opt(2023, 8, 1).unwrap());
        assert_eq!(
            cfg.holdout.until,
            Some(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap())
        );
    }

    #[test]
    fn rejects_bad_holdout_dates() {
        assert!(Config::resolve(&args(&["--holdout-from", "someday"]), no_env).is_err());
        assert!(
            Config::resolve(
                &args(&["--holdout-from=2024-05-01", "--holdout-until=2024-01-01"]),
                no_env
            )
            .is_err()
        );
    }
}
