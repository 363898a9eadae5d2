use axum::extract::State;
use axum::Json;
use tdd_core::bootstrap::FocusedTest;
use tdd_core::repo::Repo;

use super::checklist::RepoBody;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartBody {
    #[serde(default)]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub test_path: Option<String>,
    #[serde(default)]
    pub test_filter: Option<String>,
}

/// POST /tdd/start: install dependencies and run the test suite.
///
/// Precondition failures and failing commands come back as 200 with
/// `ok: false`; they are results, not errors.
pub async fn start(
    State(app): State<AppState>,
    Json(body): Json<StartBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let focused = FocusedTest::new(body.test_path, body.test_filter);
        let report = Repo::open(&root)?.bootstrap(body.language.as_deref(), &focused);
        Ok::<_, tdd_core::TddError>(serde_json::to_value(report)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /orchestrate: run the generated aggregator module.
pub async fn orchestrate(
    State(app): State<AppState>,
    Json(body): Json<RepoBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let outcome = Repo::open(&root)?.orchestrate()?;
        let mut value = serde_json::to_value(&outcome)?;
        value["ok"] = serde_json::json!(outcome.success());
        Ok::<_, tdd_core::TddError>(value)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
