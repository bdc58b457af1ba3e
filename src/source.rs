use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::dataset::{Dataset, FinishedMatch, HoldoutWindow};
use crate::fixtures::{self, ScheduledFixture};

/// Where the training history and the fixtures to predict come from.
pub trait MatchSource {
    type Fixture;

    fn history(&self) -> &[FinishedMatch];

    fn fixtures(&self) -> &[Self::Fixture];
}

#[derive(Debug, Clone)]
pub struct LiveFixtures {
    history: Vec<FinishedMatch>,
    fixtures: Vec<ScheduledFixture>,
}

impl LiveFixtures {
    pub fn new(dataset: Dataset, fixture_list: Option<Vec<ScheduledFixture>>) -> Self {
        let fixtures = fixture_list.unwrap_or(dataset.upcoming);
        Self {
            history: dataset.finished,
            fixtures,
        }
    }

    pub fn load(dataset_path: &Path, fixture_list_path: Option<&Path>) -> Result<Self> {
        let dataset = Dataset::load(dataset_path)?;
        let fixture_list = match fixture_list_path {
            Some(path) => Some(fixtures::load_fixture_list(path)?),
            None => None,
        };
        let source = Self::new(dataset, fixture_list);
        info!(
            history = source.history.len(),
            fixtures = source.fixtures.len(),
            from_list = fixture_list_path.is_some(),
            "live fixture source ready"
        );
        Ok(source)
    }
}

impl MatchSource for LiveFixtures {
    type Fixture = ScheduledFixture;

    fn history(&self) -> &[FinishedMatch] {
        &self.history
    }

    fn fixtures(&self) -> &[ScheduledFixture] {
        &self.fixtures
    }
}

#[derive(Debug, Clone)]
pub struct HeldOutFixtures {
    history: Vec<FinishedMatch>,
    fixtures: Vec<FinishedMatch>,
}

impl HeldOutFixtures {
    pub fn new(dataset: &Dataset, window: HoldoutWindow) -> Self {
        let (history, fixtures) = dataset.split(&window);
        Self {
            history,
            fixtures,
        }
    }

    pub fn load(dataset_path: &Path, window: HoldoutWindow) -> Result<Self> {
        let dataset = Dataset::load(dataset_path)?;
        let source = Self::new(&dataset, window);
        info!(
            history = source.history.len(),
            held_out = source.fixtures.len(),
            from = %window.from,
            "held-out fixture source ready"
        );
        Ok(source)
    }
}

impl MatchSource for HeldOutFixtures {
    type Fixture = FinishedMatch;

    fn history(&self) -> &[FinishedMatch] {
        &self.history
    }

    fn fixtures(&self) -> &[FinishedMatch] {
        &self.fixtures
    }
}
