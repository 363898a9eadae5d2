use axum::extract::State;
use axum::Json;
use tdd_core::repo::Repo;

use super::checklist::RepoBody;
use crate::error::AppError;
use crate::state::AppState;

fn default_checked() -> bool {
    true
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkBody {
    #[serde(default)]
    pub repo_path: Option<String>,
    pub task_id: String,
    #[serde(default = "default_checked")]
    pub checked: bool,
}

/// POST /scaffold: write the progress document, stubs, and aggregator.
pub async fn scaffold(
    State(app): State<AppState>,
    Json(body): Json<RepoBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let outcome = Repo::open(&root)?.scaffold()?;
        Ok::<_, tdd_core::TddError>(serde_json::to_value(outcome)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /status: per-task stub and wiring state.
pub async fn status(
    State(app): State<AppState>,
    Json(body): Json<RepoBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let report = Repo::open(&root)?.status()?;
        let summary = report.summary();
        let mut value = serde_json::to_value(report)?;
        value["summary"] = serde_json::json!(summary);
        Ok::<_, tdd_core::TddError>(value)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /mark: check or uncheck a task in the progress document.
pub async fn mark(
    State(app): State<AppState>,
    Json(body): Json<MarkBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let outcome = Repo::open(&root)?.mark(&body.task_id, body.checked)?;
        Ok::<_, tdd_core::TddError>(serde_json::to_value(outcome)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
