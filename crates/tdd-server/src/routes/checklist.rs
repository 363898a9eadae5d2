use axum::extract::State;
use axum::Json;
use tdd_core::repo::Repo;

use super::ok_json;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoBody {
    #[serde(default)]
    pub repo_path: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsureBody {
    #[serde(default)]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    #[serde(default)]
    pub repo_path: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// POST /introduce: describe the engine and list checklists found.
pub async fn introduce(
    State(app): State<AppState>,
    Json(body): Json<RepoBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let report = Repo::open(&root)?.introduce();
        Ok::<_, tdd_core::TddError>(ok_json(&report)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /ensure-checklist: create a checklist unless one exists.
pub async fn ensure_checklist(
    State(app): State<AppState>,
    Json(body): Json<EnsureBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let report =
            Repo::open(&root)?.ensure_checklist(body.dry_run, body.language.as_deref())?;
        Ok::<_, tdd_core::TddError>(ok_json(&report)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /checklist: the selected checklist with a progress preview.
pub async fn get_checklist(
    State(app): State<AppState>,
    Json(body): Json<RepoBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let view = Repo::open(&root)?.get_checklist()?;
        Ok::<_, tdd_core::TddError>(ok_json(&view)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}

/// POST /refresh-checklist: regenerate and overwrite the checklist.
pub async fn refresh_checklist(
    State(app): State<AppState>,
    Json(body): Json<RefreshBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let root = app.resolve(body.repo_path.as_deref());
    let result = tokio::task::spawn_blocking(move || {
        let report = Repo::open(&root)?.refresh_checklist(body.language.as_deref())?;
        Ok::<_, tdd_core::TddError>(ok_json(&report)?)
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(result))
}
