use axum::extract::{Extension, Path, State};
use axum::Json as JsonResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{CreatorQuery, ProfileUpdate, RatesData};
use crate::types::response::{
    Benchmarks, CreatorProfile, MediaKit, RateCard, Rates, Success, UploadsCount,
};
use crate::utils::auth::Session;
use crate::utils::extract::{Json, QueryParams};

fn target_creator(requested: Option<Uuid>, session: &Session) -> Result<Uuid, Error> {
    requested
        .or(session.creator_id)
        .ok_or_else(|| Error::Validation("creator_id is required".into()))
}

#[instrument(skip(state))]
pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<JsonResponse<CreatorProfile>, Error> {
    let profile = state.creator_controller.get_profile(&session).await?;

    Ok(JsonResponse(profile))
}

#[instrument(skip(state))]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(params): Json<ProfileUpdate>,
) -> Result<JsonResponse<Success>, Error> {
    let creator_id = session
        .creator_id
        .ok_or(Error::NotFound("No creator linked to this account"))?;

    state
        .creator_controller
        .update_profile(creator_id, params.niche.as_deref(), params.city.as_deref())
        .await?;

    Ok(JsonResponse(Success::ok()))
}

#[instrument(skip(state))]
pub(crate) async fn get_rates(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    QueryParams(params): QueryParams<CreatorQuery>,
) -> Result<JsonResponse<RateCard>, Error> {
    let creator_id = target_creator(params.creator_id, &session)?;

    let card = state.rate_controller.get(creator_id).await?;

    Ok(JsonResponse(card))
}

#[instrument(skip(state))]
pub(crate) async fn save_rates(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(params): Json<RatesData>,
) -> Result<JsonResponse<Success>, Error> {
    let creator_id = target_creator(params.creator_id, &session)?;

    let rates = Rates {
        reel_rate: params.reel_rate.unwrap_or_default(),
        story_rate: params.story_rate.unwrap_or_default(),
        post_rate: params.post_rate.unwrap_or_default(),
        accepts_barter: params.accepts_barter.unwrap_or_default(),
    };

    state.rate_controller.upsert(creator_id, &rates).await?;

    Ok(JsonResponse(Success::ok()))
}

#[instrument(skip(state))]
pub(crate) async fn get_benchmarks(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    QueryParams(params): QueryParams<CreatorQuery>,
) -> Result<JsonResponse<Benchmarks>, Error> {
    let creator_id = target_creator(params.creator_id, &session)?;

    let benchmarks = state.rate_controller.benchmarks(creator_id).await?;

    Ok(JsonResponse(benchmarks))
}

#[instrument(skip(state))]
pub(crate) async fn uploads_count(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<JsonResponse<UploadsCount>, Error> {
    let count = match session.creator_id {
        Some(creator_id) => state.upload_controller.uploads_count(creator_id).await?,
        None => 0,
    };

    Ok(JsonResponse(UploadsCount { count }))
}

#[instrument(skip(state))]
pub(crate) async fn media_kit(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<JsonResponse<MediaKit>, Error> {
    let kit = state.creator_controller.get_media_kit(&username).await?;

    Ok(JsonResponse(kit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::user::Role;

    #[test]
    fn test_target_creator_prefers_explicit_id() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let session = Session {
            user_id: Uuid::new_v4(),
            creator_id: Some(own),
            role: Role::Creator,
            username: "me".into(),
            cognito_sub: String::new(),
        };

        assert_eq!(target_creator(Some(other), &session).unwrap(), other);
        assert_eq!(target_creator(None, &session).unwrap(), own);

        let brand = Session {
            creator_id: None,
            role: Role::Brand,
            ..session
        };
        assert!(matches!(
            target_creator(None, &brand),
            Err(Error::Validation(_))
        ));
    }
}
