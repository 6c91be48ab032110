use crate::core::error;
use crate::core::state::AppState;
use crate::routes::{auth, brand, creator, upload};
use crate::utils;
use axum::error_handling::HandleErrorLayer;
use axum::{
    extract::{MatchedPath, Request},
    http::Method,
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::info_span;

pub(crate) fn routes(state: AppState, rate_limit: u64) -> Router {
    let authorized_routes = Router::new()
        .route(
            "/brand/search",
            get(brand::list_creators).post(brand::search_creators),
        )
        .route(
            "/brand/wishlist",
            get(brand::get_wishlist)
                .post(brand::add_to_wishlist)
                .delete(brand::remove_from_wishlist),
        )
        .route(
            "/creator/profile",
            get(creator::get_profile).put(creator::update_profile),
        )
        .route(
            "/creator/rates",
            get(creator::get_rates).post(creator::save_rates),
        )
        .route("/creator/rates/benchmarks", get(creator::get_benchmarks))
        .route("/creator/uploads-count", get(creator::uploads_count))
        .route("/search/brands", get(brand::search_brands))
        .route("/upload/presign", post(upload::presign))
        .route("/upload/analyze", post(upload::analyze))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            utils::auth::authorize,
        ));

    Router::new()
        .route("/", get(|| async { "ReachEzy" }))
        .route("/auth/user", post(auth::user))
        .route("/mediakit/{username}", get(creator::media_kit))
        .merge(authorized_routes)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                        let matched_path = request
                            .extensions()
                            .get::<MatchedPath>()
                            .map(MatchedPath::as_str);

                        info_span!(
                            "request",
                            method = ?request.method(),
                            matched_path,
                        )
                    }),
                )
                .layer(HandleErrorLayer::new(error::handle_middleware_errors))
                .buffer(128)
                .rate_limit(rate_limit, Duration::from_secs(1))
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                        .allow_headers(cors::Any)
                        .allow_origin(cors::Any),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::upload::tests::{FakePipeline, FakeStorage};
    use crate::types::user::Role;
    use crate::utils::auth::{Claims, SessionKeys};
    use axum::body::Body;
    use axum::http::{header, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use sqlx::PgPool;
    use std::sync::Arc;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "router-secret";

    fn app() -> Router {
        app_with(PgPool::connect_lazy("postgres://localhost/unused").unwrap())
    }

    fn app_with(pool: PgPool) -> Router {
        let state = AppState::new(
            pool,
            SECRET,
            Arc::new(FakeStorage),
            None,
            Arc::new(FakePipeline::default()),
        )
        .unwrap();

        routes(state, 100)
    }

    fn token(role: Role, creator_id: Option<Uuid>) -> String {
        SessionKeys::new(SECRET)
            .issue(Uuid::new_v4(), creator_id, role, "tester")
            .unwrap()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        builder.body(Body::from(body.to_owned())).unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        send_to(app(), request).await
    }

    async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();

        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let (status, body) = send(request(Method::POST, "/brand/search", None, r#"{"query":"food"}"#)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn test_unsigned_token_is_unauthorized() {
        let forged = r#"{"user_id":"00000000-0000-0000-0000-000000000000","role":"brand"}"#;

        let (status, _) = send(request(Method::GET, "/brand/wishlist", Some(forged), "")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let now = Utc::now().timestamp();
        let expired = SessionKeys::new(SECRET)
            .encode(&Claims {
                user_id: Uuid::new_v4(),
                creator_id: None,
                role: Role::Brand,
                username: String::new(),
                cognito_sub: String::new(),
                iat: now - 8 * 86400,
                exp: now - 86400,
                jti: String::new(),
            })
            .unwrap();

        let (status, _) = send(request(Method::GET, "/search/brands", Some(&expired), "")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wishlist_rejects_creator_role() {
        let token = token(Role::Creator, Some(Uuid::new_v4()));

        for method in [Method::GET, Method::POST, Method::DELETE] {
            let body = format!(r#"{{"creator_id":"{}"}}"#, Uuid::new_v4());
            let (status, body) = send(request(method, "/brand/wishlist", Some(&token), &body)).await;

            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"], "Unauthorized - brand role required");
        }
    }

    #[tokio::test]
    async fn test_wishlist_requires_creator_id() {
        let token = token(Role::Brand, None);

        let (status, body) = send(request(Method::POST, "/brand/wishlist", Some(&token), "{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "creator_id is required");
    }

    #[tokio::test]
    async fn test_empty_search_query_is_rejected() {
        let token = token(Role::Brand, None);

        let (status, body) = send(request(
            Method::POST,
            "/brand/search",
            Some(&token),
            r#"{"query":"   "}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "query is required");
    }

    #[tokio::test]
    async fn test_unknown_auth_action() {
        let (status, body) = send(request(Method::POST, "/auth/user", None, r#"{"action":"reset"}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "action must be 'signup' or 'login'");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_json_validation_error() {
        let (status, body) = send(request(Method::POST, "/auth/user", None, "{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_rates_need_a_creator() {
        let token = token(Role::Brand, None);

        let (status, body) = send(request(
            Method::POST,
            "/creator/rates",
            Some(&token),
            r#"{"reel_rate":2000}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "creator_id is required");
    }

    #[tokio::test]
    async fn test_profile_update_without_linked_creator() {
        let token = token(Role::Brand, None);

        let (status, body) = send(request(
            Method::PUT,
            "/creator/profile",
            Some(&token),
            r#"{"niche":"Food"}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "No creator linked to this account");
    }

    #[tokio::test]
    async fn test_presign_validates_fields_and_content_type() {
        let token = token(Role::Creator, Some(Uuid::new_v4()));

        let (status, body) = send(request(
            Method::POST,
            "/upload/presign",
            Some(&token),
            r#"{"filename":"clip.mp4"}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing creator_id, filename, or content_type");

        let (status, _) = send(request(
            Method::POST,
            "/upload/presign",
            Some(&token),
            r#"{"filename":"clip.avi","content_type":"video/x-msvideo"}"#,
        ))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_uploads_count_without_creator_is_zero() {
        let token = token(Role::Brand, None);

        let (status, body) = send(request(Method::GET, "/creator/uploads-count", Some(&token), "")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    async fn insert_creator(pool: &PgPool, username: &str, niche: &str, followers: i32) -> Uuid {
        sqlx::query_scalar(
            "INSERT INTO creators (cognito_sub, username, niche, city, followers_count)
            VALUES ($1, $1, $2, 'Mumbai', $3) RETURNING id",
        )
        .bind(username)
        .bind(niche)
        .bind(followers)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_saved_rates_default_missing_fields(pool: PgPool) {
        let creator_id = insert_creator(&pool, "rohan", "Food", 9000).await;
        let token = token(Role::Creator, Some(creator_id));

        let (status, body) = send_to(
            app_with(pool.clone()),
            request(Method::POST, "/creator/rates", Some(&token), r#"{"reel_rate":2500}"#),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        let (status, card) = send_to(
            app_with(pool),
            request(Method::GET, "/creator/rates", Some(&token), ""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(card["creator_id"], creator_id.to_string());
        assert_eq!(card["reel_rate"], 2500.0);
        assert_eq!(card["story_rate"], 0.0);
        assert_eq!(card["post_rate"], 0.0);
        assert_eq!(card["accepts_barter"], false);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_listing_creators_has_no_parsed_query(pool: PgPool) {
        insert_creator(&pool, "small", "Tech", 6000).await;
        insert_creator(&pool, "big", "Travel", 60000).await;
        let token = token(Role::Brand, None);

        let (status, body) = send_to(
            app_with(pool),
            request(Method::GET, "/brand/search", Some(&token), ""),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["parsed"].is_null());
        assert_eq!(body["results"][0]["username"], "big");
        assert_eq!(body["results"][1]["username"], "small");
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_filler_only_search_returns_everyone(pool: PgPool) {
        insert_creator(&pool, "small", "Tech", 6000).await;
        insert_creator(&pool, "big", "Travel", 60000).await;
        let token = token(Role::Brand, None);

        let (status, body) = send_to(
            app_with(pool),
            request(
                Method::POST,
                "/brand/search",
                Some(&token),
                r#"{"query":"the influencer in a"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["parsed"]["keywords"], serde_json::json!([]));
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
    }
}
