use anyhow::{Context, Result};

use poisson_predictor::config::Config;
use poisson_predictor::pipeline;
use poisson_predictor::report;
use poisson_predictor::source::HeldOutFixtures;

fn main() -> Result<()> {
    poisson_predictor::init_tracing();
    let config = Config::load()?;

    let source = HeldOutFixtures::load(&config.dataset_path, config.holdout)?;
    let run = pipeline::run_backtest(&source).context("back-test held-out fixtures")?;

    if config.show_ratings {
        print!("{}", report::render_ratings(&run.table));
        println!();
    }
    if config.json {
        println!("{}", report::accuracy_json(&run.report)?);
    } else {
        print!("{}", run.report);
    }
    Ok(())
}
