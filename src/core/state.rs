use sqlx::postgres::PgPool;
use std::sync::Arc;

use crate::controllers::creator::CreatorController;
use crate::controllers::rates::RateController;
use crate::controllers::search::SearchController;
use crate::controllers::upload::UploadController;
use crate::controllers::user::UserController;
use crate::controllers::wishlist::WishlistController;
use crate::core::error::ConfigError;
use crate::core::pipeline::Pipeline;
use crate::core::storage::ObjectStorage;
use crate::utils::auth::SessionKeys;

#[derive(Clone, Debug)]
pub(crate) struct AppState {
    pub(crate) session_keys: SessionKeys,
    pub(crate) user_controller: UserController,
    pub(crate) creator_controller: CreatorController,
    pub(crate) search_controller: SearchController,
    pub(crate) rate_controller: RateController,
    pub(crate) wishlist_controller: WishlistController,
    pub(crate) upload_controller: UploadController,
}

impl AppState {
    pub(crate) fn new(
        pool: PgPool,
        secret: &str,
        videos: Arc<dyn ObjectStorage>,
        frames: Option<Arc<dyn ObjectStorage>>,
        pipeline: Arc<dyn Pipeline>,
    ) -> Result<Self, ConfigError> {
        let session_keys = SessionKeys::new(secret);

        Ok(AppState {
            user_controller: UserController::new(pool.clone(), session_keys.clone())?,
            creator_controller: CreatorController::new(pool.clone(), frames),
            search_controller: SearchController::new(pool.clone()),
            rate_controller: RateController::new(pool.clone()),
            wishlist_controller: WishlistController::new(pool.clone()),
            upload_controller: UploadController::new(pool, videos, pipeline),
            session_keys,
        })
    }
}
