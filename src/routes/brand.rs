use axum::extract::{Extension, State};
use axum::Json as JsonResponse;
use tracing::instrument;
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::state::AppState;
use crate::types::request::{BrandQuery, SearchData, WishlistData};
use crate::types::response::{Brands, Parsed, SearchResults, Success, Wishlist};
use crate::types::user::Role;
use crate::utils::auth::Session;
use crate::utils::extract::{Json, QueryParams};
use crate::utils::keywords;

#[instrument(skip(state))]
pub(crate) async fn list_creators(
    State(state): State<AppState>,
) -> Result<JsonResponse<SearchResults>, Error> {
    let results = state.search_controller.all().await?;

    Ok(JsonResponse(SearchResults {
        results,
        parsed: None,
    }))
}

#[instrument(skip(state))]
pub(crate) async fn search_creators(
    State(state): State<AppState>,
    Json(params): Json<SearchData>,
) -> Result<JsonResponse<SearchResults>, Error> {
    if params.query.trim().is_empty() {
        return Err(Error::Validation("query is required".into()));
    }

    let keywords = keywords::extract(&params.query);
    let results = state.search_controller.search(&keywords).await?;

    Ok(JsonResponse(SearchResults {
        results,
        parsed: Some(Parsed { keywords }),
    }))
}

fn required_creator(params: WishlistData) -> Result<Uuid, Error> {
    params
        .creator_id
        .ok_or_else(|| Error::Validation("creator_id is required".into()))
}

#[instrument(skip(state))]
pub(crate) async fn get_wishlist(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<JsonResponse<Wishlist>, Error> {
    session.require(Role::Brand)?;

    let wishlist = state.wishlist_controller.list(session.user_id).await?;

    Ok(JsonResponse(Wishlist { wishlist }))
}

#[instrument(skip(state))]
pub(crate) async fn add_to_wishlist(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(params): Json<WishlistData>,
) -> Result<JsonResponse<Success>, Error> {
    session.require(Role::Brand)?;

    let creator_id = required_creator(params)?;

    state
        .wishlist_controller
        .add(session.user_id, creator_id)
        .await?;

    Ok(JsonResponse(Success::ok()))
}

#[instrument(skip(state))]
pub(crate) async fn remove_from_wishlist(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(params): Json<WishlistData>,
) -> Result<JsonResponse<Success>, Error> {
    session.require(Role::Brand)?;

    let creator_id = required_creator(params)?;

    state
        .wishlist_controller
        .remove(session.user_id, creator_id)
        .await?;

    Ok(JsonResponse(Success::ok()))
}

#[instrument(skip(state))]
pub(crate) async fn search_brands(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<BrandQuery>,
) -> Result<JsonResponse<Brands>, Error> {
    let brands = state
        .user_controller
        .search_brands(params.q.as_deref())
        .await?;

    Ok(JsonResponse(Brands { brands }))
}
