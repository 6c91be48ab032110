use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::Error;
use crate::core::pipeline::{AnalysisInput, Pipeline};
use crate::core::storage::ObjectStorage;
use crate::types::response::{AnalysisStarted, Presigned};

pub(crate) const ALLOWED_CONTENT_TYPES: [&str; 2] = ["video/mp4", "video/quicktime"];

const UPLOAD_URL_TTL: Duration = Duration::from_secs(600);

/// Videos a dispatch may claim: fresh uploads, and claims abandoned for longer
/// than a dispatch can take.
const CLAIMABLE: &str = "(status = 'uploaded'
    OR (status = 'dispatching' AND claimed_at < NOW() - INTERVAL '15 minutes'))";

pub(crate) fn upload_key(creator_id: Uuid, filename: &str, millis: i64) -> String {
    format!("uploads/{}/{}_{}", creator_id, millis, filename)
}

#[derive(Clone, Debug)]
pub(crate) struct UploadController {
    pool: PgPool,
    storage: Arc<dyn ObjectStorage>,
    pipeline: Arc<dyn Pipeline>,
}

impl UploadController {
    pub(crate) fn new(
        pool: PgPool,
        storage: Arc<dyn ObjectStorage>,
        pipeline: Arc<dyn Pipeline>,
    ) -> Self {
        Self {
            pool,
            storage,
            pipeline,
        }
    }

    /// Issues a presigned PUT URL. A failure to record the upload only clears `recorded`.
    pub(crate) async fn presign(
        &self,
        creator_id: Uuid,
        filename: &str,
        content_type: &str,
    ) -> Result<Presigned, Error> {
        if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
            return Err(Error::Validation(
                "content_type must be video/mp4 or video/quicktime".into(),
            ));
        }

        let s3_key = upload_key(creator_id, filename, Utc::now().timestamp_millis());
        let url = self
            .storage
            .presign_put(&s3_key, content_type, UPLOAD_URL_TTL)
            .await?;

        let recorded = match self.record_upload(creator_id, &s3_key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not record upload {}: {}", s3_key, e);
                false
            }
        };

        Ok(Presigned {
            url,
            s3_key,
            recorded,
        })
    }

    pub(crate) async fn record_upload(&self, creator_id: Uuid, s3_key: &str) -> Result<(), Error> {
        sqlx::query(
            "INSERT INTO video_uploads (creator_id, s3_key, status)
            VALUES ($1, $2, 'uploaded')
            ON CONFLICT (s3_key) DO NOTHING",
        )
        .bind(creator_id)
        .bind(s3_key)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Starts one analysis run per uploaded video. Each video is claimed
    /// before its run is started, so concurrent calls never dispatch the same
    /// video twice. Any failure, whether claiming, starting or recording the
    /// run, only affects that video.
    pub(crate) async fn start_analysis(&self, creator_id: Uuid) -> Result<AnalysisStarted, Error> {
        let videos = sqlx::query(&format!(
            "SELECT id, s3_key FROM video_uploads
            WHERE creator_id = $1 AND {}
            ORDER BY created_at",
            CLAIMABLE
        ))
        .bind(creator_id)
        .map(|row: PgRow| (row.get::<Uuid, _>("id"), row.get::<String, _>("s3_key")))
        .fetch_all(&self.pool)
        .await?;

        if videos.is_empty() {
            return Err(Error::NotFound("No uploaded videos found"));
        }

        let mut claimed = 0;
        let mut execution_arns = Vec::new();
        let mut failed = Vec::new();

        for (video_id, s3_key) in videos {
            match self.claim(video_id).await {
                Ok(true) => claimed += 1,
                Ok(false) => {
                    tracing::debug!("Video {} was claimed by another request", video_id);
                    continue;
                }
                Err(e) => {
                    tracing::error!("Could not claim video {}: {}", video_id, e);
                    failed.push(video_id);
                    continue;
                }
            }

            let name = format!("analysis-{}-{}", video_id, Utc::now().timestamp_millis());
            let input = AnalysisInput {
                source_bucket: self.storage.bucket().to_owned(),
                s3_key,
                video_id,
                creator_id,
            };

            match self.pipeline.start(&name, &input).await {
                Ok(execution_arn) => {
                    if let Err(e) = self
                        .mark(video_id, "processing", Some(&execution_arn))
                        .await
                    {
                        tracing::error!(
                            "Started {} for video {} but could not record it: {}",
                            execution_arn,
                            video_id,
                            e
                        );
                        failed.push(video_id);
                    }
                    execution_arns.push(execution_arn);
                }
                Err(e) => {
                    tracing::error!("Failed to start analysis for video {}: {}", video_id, e);
                    if let Err(e) = self.mark(video_id, "dispatch_failed", None).await {
                        tracing::error!("Could not mark video {} as failed: {}", video_id, e);
                    }
                    failed.push(video_id);
                }
            }
        }

        if claimed == 0 && failed.is_empty() {
            return Err(Error::NotFound("No uploaded videos found"));
        }

        if execution_arns.is_empty() {
            return Err(Error::Pipeline(format!(
                "every dispatch failed for creator {}",
                creator_id
            )));
        }

        tracing::info!(
            "Started {} analysis run(s) for creator {}",
            execution_arns.len(),
            creator_id
        );

        Ok(AnalysisStarted {
            success: failed.is_empty(),
            executions: execution_arns.len(),
            execution_arns,
            failed,
        })
    }

    async fn claim(&self, video_id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query(&format!(
            "UPDATE video_uploads SET status = 'dispatching', claimed_at = NOW()
            WHERE id = $1 AND {}",
            CLAIMABLE
        ))
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn mark(
        &self,
        video_id: Uuid,
        status: &str,
        execution_arn: Option<&str>,
    ) -> Result<(), Error> {
        sqlx::query(
            "UPDATE video_uploads SET status = $1, execution_arn = $2
            WHERE id = $3 AND status = 'dispatching'",
        )
        .bind(status)
        .bind(execution_arn)
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub(crate) async fn uploads_count(&self, creator_id: Uuid) -> Result<i64, Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM video_uploads WHERE creator_id = $1")
                .bind(creator_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}
