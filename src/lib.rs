pub(crate) mod controllers;
pub(crate) mod core;
pub(crate) mod routes;
pub(crate) mod types;
pub(crate) mod utils;

use config::Config;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::core::error::ConfigError as Error;
use crate::core::pipeline::StepFunctions;
use crate::core::storage::{ObjectStorage, S3Storage};
use crate::core::{config::Args, state::AppState, store};

pub async fn run() -> Result<(), Error> {
    let config = Config::builder()
        .add_source(config::Environment::with_prefix("REACHEZY"))
        .build()
        .map_err(Error::Config)?;

    let config = config.try_deserialize::<Args>().map_err(Error::Config)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_level).unwrap_or_default())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = store::connect(&config.database_url())?;

    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(Error::DatabaseMigration)?;

    let credentials = s3::creds::Credentials::new(
        Some(&config.aws_access_key_id),
        Some(&config.aws_secret_access_key),
        None,
        None,
        None,
    )?;

    let videos = S3Storage::new(credentials.clone(), &config.aws_region, &config.videos_bucket)?;

    let frames = match &config.frames_bucket {
        Some(bucket) => Some(Arc::new(S3Storage::new(
            credentials,
            &config.aws_region,
            bucket,
        )?) as Arc<dyn ObjectStorage>),
        None => None,
    };

    let pipeline = StepFunctions::new(
        aws_sdk_sfn::config::Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "reachezy",
        ),
        &config.aws_region,
        &config.state_machine_arn,
        config.pipeline_endpoint.as_deref(),
    );

    let state = AppState::new(
        pool,
        &config.secret,
        Arc::new(videos),
        frames,
        Arc::new(pipeline),
    )?;

    let app = routes::router::routes(state, config.rate_limit);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .map_err(Error::IO)?;

    tracing::info!("listening on port {}", config.port);

    axum::serve(listener, app).await.map_err(Error::IO)?;

    Ok(())
}
