//! Offline training diagnostic.
//!
//! Fetches the global sales log (all merchants - wider than the per-merchant
//! `/retrain` endpoint), holds out 20% with a seeded shuffle, fits on the
//! rest, and reports held-out MAE and R². Serving is unaffected: the
//! in-process model only changes through `/retrain`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::{info, warn};

use raincheck_server::config::StoreConfig;
use raincheck_server::db::{SalesRepository, StoreClient};
use raincheck_server::services::demand::{DemandModel, SaleSample};

use super::UPSTREAM_TIMEOUT;

/// Shuffle seed, fixed so successive runs evaluate the same split.
const EVAL_SEED: u64 = 42;

/// Fraction of the log held out for evaluation.
const TEST_FRACTION: f64 = 0.2;

/// Run the offline evaluation.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the store call
/// fails, or the log is too small to split.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let store_config = StoreConfig::from_env()?;
    let client = StoreClient::new(&store_config, UPSTREAM_TIMEOUT)?;

    let sales = SalesRepository::new(&client).all().await?;
    if sales.len() < 2 {
        return Err("not enough sales to hold out a test split - run `raincheck-cli seed` first".into());
    }

    let mut samples: Vec<SaleSample> = sales.iter().map(SaleSample::from).collect();
    let mut rng = StdRng::seed_from_u64(EVAL_SEED);
    samples.shuffle(&mut rng);

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let test_len = ((samples.len() as f64) * TEST_FRACTION).round() as usize;
    let test_len = test_len.clamp(1, samples.len() - 1);
    let (test, train) = samples.split_at(test_len);

    info!(
        total = samples.len(),
        train = train.len(),
        test = test.len(),
        "split sales log for evaluation"
    );

    let model = DemandModel::fit(train)?;
    let held_out = model.evaluate(test);

    info!("held-out mean absolute error: {:.2} units", held_out.mae);
    info!("held-out R²: {:.2}", held_out.r2);

    if held_out.r2 > 0.7 {
        info!("model captures the weather-demand pattern well");
    } else if held_out.r2 > 0.4 {
        info!("model is usable but noisy");
    } else {
        warn!("poor fit - sales may be uncorrelated with weather");
    }

    Ok(())
}
