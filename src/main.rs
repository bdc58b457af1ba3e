use anyhow::{Context, Result};

use poisson_predictor::config::Config;
use poisson_predictor::pipeline;
use poisson_predictor::report;
use poisson_predictor::source::LiveFixtures;

fn main() -> Result<()> {
    poisson_predictor::init_tracing();
    let config = Config::load()?;

    let source = LiveFixtures::load(&config.dataset_path, config.fixture_list_path.as_deref())?;
    let run = pipeline::run_predictions(&source).context("predict fixtures")?;

    if config.show_ratings {
        print!("{}", report::render_ratings(&run.table));
        println!();
    }
    if config.json {
        println!("{}", report::predictions_json(&run.predictions)?);
    } else {
        print!("{}", report::render_predictions(&run.predictions));
    }
    Ok(())
}
