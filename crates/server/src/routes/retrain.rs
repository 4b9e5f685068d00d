//! Model retraining route handler.

use axum::{Json, extract::State};
use serde::Serialize;

use crate::db::SalesRepository;
use crate::error::Result;
use crate::middleware::RequireMerchant;
use crate::services::demand::{DemandModel, SaleSample};
use crate::state::AppState;

/// Body of a successful retrain.
#[derive(Debug, Serialize)]
pub struct RetrainResponse {
    pub status: &'static str,
    pub accuracy: Accuracy,
    pub total_data: usize,
}

/// In-sample fit quality of the freshly trained model.
#[derive(Debug, Serialize)]
pub struct Accuracy {
    pub r2_score: f64,
    pub mae: f64,
}

/// `POST /retrain` - retrain the demand model from the merchant's sales.
///
/// The active model is replaced only after training succeeds; retraining
/// with an empty sales log responds 422 and leaves the previous model
/// active. Note the model slot is process-wide: the freshly trained model
/// serves every merchant's predictions until the next retrain.
pub async fn run(
    State(state): State<AppState>,
    RequireMerchant(merchant): RequireMerchant,
) -> Result<Json<RetrainResponse>> {
    let sales = SalesRepository::new(state.store())
        .all_for_merchant(&merchant)
        .await?;
    let samples: Vec<SaleSample> = sales.iter().map(SaleSample::from).collect();

    let model = DemandModel::fit(&samples)?;
    let metrics = model.metrics;
    let total_data = model.sample_count;

    state.model().replace(model);
    tracing::info!(
        merchant = %merchant,
        samples = total_data,
        r2 = metrics.r2,
        "demand model retrained"
    );

    Ok(Json(RetrainResponse {
        status: "success",
        accuracy: Accuracy {
            r2_score: metrics.r2,
            mae: metrics.mae,
        },
        total_data,
    }))
}
