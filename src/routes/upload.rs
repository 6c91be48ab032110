use axum::extract::{Extension, State};
use axum::Json as JsonResponse;
use tracing::instrument;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{AnalyzeData, PresignData};
use crate::types::response::{AnalysisStarted, Presigned};
use crate::utils::auth::Session;
use crate::utils::extract::Json;

#[instrument(skip(state))]
pub(crate) async fn presign(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(params): Json<PresignData>,
) -> Result<JsonResponse<Presigned>, Error> {
    let (Some(creator_id), Some(filename), Some(content_type)) = (
        params.creator_id.or(session.creator_id),
        params.filename.filter(|name| !name.is_empty()),
        params.content_type.filter(|ct| !ct.is_empty()),
    ) else {
        return Err(Error::Validation(
            "Missing creator_id, filename, or content_type".into(),
        ));
    };

    let presigned = state
        .upload_controller
        .presign(creator_id, &filename, &content_type)
        .await?;

    Ok(JsonResponse(presigned))
}

#[instrument(skip(state))]
pub(crate) async fn analyze(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(params): Json<AnalyzeData>,
) -> Result<JsonResponse<AnalysisStarted>, Error> {
    let creator_id = params
        .creator_id
        .or(session.creator_id)
        .ok_or_else(|| Error::Validation("Missing creator_id".into()))?;

    let started = state.upload_controller.start_analysis(creator_id).await?;

    Ok(JsonResponse(started))
}
