pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod fixtures;
pub mod pipeline;
pub mod predictor;
pub mod ratings;
pub mod report;
pub mod source;

pub use error::ModelError;

use tracing_subscriber::{EnvFilter, fmt};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
