use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::controllers::rates;
use crate::core::error::Error;
use crate::core::storage::ObjectStorage;
use crate::types::response::{CreatorProfile, CreatorSummary, MediaKit, Rates, VideoAnalysis};
use crate::utils::auth::Session;
use crate::utils::benchmark;

const THUMBNAIL_URL_TTL: Duration = Duration::from_secs(3600);

pub(crate) const NICHES: [&str; 10] = [
    "Fashion",
    "Beauty/Cosmetics",
    "Fitness/Health",
    "Food",
    "Tech",
    "Travel",
    "Education",
    "Comedy/Entertainment",
    "Lifestyle",
    "Parenting",
];

/// Creator columns plus the optional rate card, selected from
/// `creators c LEFT JOIN rate_cards r`. Rows are read with [`map_creator_summary`].
pub(crate) const SUMMARY_COLUMNS: &str = "c.id AS creator_id,
    c.username,
    c.display_name,
    c.bio,
    c.niche,
    c.city,
    c.followers_count,
    c.media_count,
    c.profile_picture_url,
    c.style_profile,
    r.reel_rate,
    r.story_rate,
    r.post_rate,
    r.accepts_barter";

#[derive(Clone, Debug)]
pub(crate) struct CreatorController {
    pool: PgPool,
    frames: Option<Arc<dyn ObjectStorage>>,
}

impl CreatorController {
    pub(crate) fn new(pool: PgPool, frames: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self { pool, frames }
    }

    pub(crate) async fn get_profile(&self, session: &Session) -> Result<CreatorProfile, Error> {
        let query = match (session.creator_id, session.cognito_sub.as_str()) {
            (Some(creator_id), _) => sqlx::query(
                "SELECT id AS creator_id, cognito_sub, username, display_name, bio,
                    followers_count, niche, city, profile_picture_url, media_count,
                    style_profile, updated_at
                FROM creators WHERE id = $1",
            )
            .bind(creator_id),
            (None, sub) if !sub.is_empty() => sqlx::query(
                "SELECT id AS creator_id, cognito_sub, username, display_name, bio,
                    followers_count, niche, city, profile_picture_url, media_count,
                    style_profile, updated_at
                FROM creators WHERE cognito_sub = $1",
            )
            .bind(sub.to_owned()),
            _ => return Err(Error::NotFound("No creator linked to this account")),
        };

        match query.map(map_profile).fetch_one(&self.pool).await {
            Ok(profile) => Ok(profile),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("Creator not found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn update_profile(
        &self,
        creator_id: Uuid,
        niche: Option<&str>,
        city: Option<&str>,
    ) -> Result<(), Error> {
        let niche_is_custom = niche.is_some_and(|niche| !NICHES.contains(&niche));

        let result = sqlx::query(
            "UPDATE creators
            SET niche = $1, niche_is_custom = $2, city = $3, updated_at = NOW()
            WHERE id = $4",
        )
        .bind(niche)
        .bind(niche_is_custom)
        .bind(city)
        .bind(creator_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Creator not found"));
        }

        Ok(())
    }

    pub(crate) async fn get_media_kit(&self, username: &str) -> Result<MediaKit, Error> {
        let creator = match sqlx::query(&format!(
            "SELECT {} FROM creators c
            LEFT JOIN rate_cards r ON c.id = r.creator_id
            WHERE c.username = $1",
            SUMMARY_COLUMNS
        ))
        .bind(username)
        .map(map_creator_summary)
        .fetch_one(&self.pool)
        .await
        {
            Ok(creator) => creator,
            Err(sqlx::Error::RowNotFound) => return Err(Error::NotFound("Creator not found")),
            Err(e) => return Err(Error::Sql(e)),
        };

        let follower_bucket = benchmark::follower_bucket(Some(creator.followers_count));

        let benchmarks = match &creator.niche {
            Some(niche) => rates::seed_ranges(&self.pool, niche, follower_bucket).await?,
            None => BTreeMap::new(),
        };

        let mut videos = sqlx::query(
            "SELECT va.video_id, va.energy_level, va.aesthetic, va.setting,
                va.production_quality, va.content_type, va.topics, va.summary,
                vu.duration_seconds
            FROM video_analyses va
            JOIN video_uploads vu ON va.video_id = vu.id
            WHERE va.creator_id = $1
            ORDER BY vu.created_at DESC",
        )
        .bind(creator.creator_id)
        .map(map_video_analysis)
        .fetch_all(&self.pool)
        .await?;

        if let Some(frames) = &self.frames {
            for video in videos.iter_mut() {
                let key = format!("{}/{}/frame_0.jpg", creator.creator_id, video.video_id);

                video.thumbnail_url = match frames.presign_get(&key, THUMBNAIL_URL_TTL).await {
                    Ok(url) => Some(url),
                    Err(e) => {
                        tracing::warn!("Could not presign thumbnail {}: {}", key, e);
                        None
                    }
                };
            }
        }

        sqlx::query("UPDATE creators SET mediakit_views = mediakit_views + 1 WHERE id = $1")
            .bind(creator.creator_id)
            .execute(&self.pool)
            .await?;

        Ok(MediaKit {
            creator,
            follower_bucket,
            benchmarks,
            videos,
        })
    }
}

pub(crate) fn map_creator_summary(row: PgRow) -> CreatorSummary {
    let reel_rate: Option<f64> = row.get("reel_rate");

    let rates = reel_rate.map(|reel_rate| Rates {
        reel_rate,
        story_rate: row.get::<Option<f64>, _>("story_rate").unwrap_or_default(),
        post_rate: row.get::<Option<f64>, _>("post_rate").unwrap_or_default(),
        accepts_barter: row.get::<Option<bool>, _>("accepts_barter").unwrap_or_default(),
    });

    CreatorSummary {
        creator_id: row.get("creator_id"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        bio: row.get("bio"),
        niche: row.get("niche"),
        city: row.get("city"),
        followers_count: row.get("followers_count"),
        media_count: row.get("media_count"),
        profile_picture_url: row.get("profile_picture_url"),
        style_profile: row.get("style_profile"),
        rates,
    }
}

fn map_video_analysis(row: PgRow) -> VideoAnalysis {
    VideoAnalysis {
        video_id: row.get("video_id"),
        energy_level: row.get("energy_level"),
        aesthetic: row.get("aesthetic"),
        setting: row.get("setting"),
        production_quality: row.get("production_quality"),
        content_type: row.get("content_type"),
        topics: row.get("topics"),
        summary: row.get("summary"),
        duration_seconds: row.get("duration_seconds"),
        thumbnail_url: None,
    }
}

fn map_profile(row: PgRow) -> CreatorProfile {
    CreatorProfile {
        creator_id: row.get("creator_id"),
        cognito_sub: row.get("cognito_sub"),
        username: row.get("username"),
        display_name: row.get("display_name"),
        bio: row.get("bio"),
        followers_count: row.get("followers_count"),
        niche: row.get("niche"),
        city: row.get("city"),
        profile_picture_url: row.get("profile_picture_url"),
        media_count: row.get("media_count"),
        style_profile: row.get("style_profile"),
        updated_at: row.get("updated_at"),
    }
}
