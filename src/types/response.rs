use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::types::user::Role;

#[derive(Debug, Serialize)]
pub(crate) struct Success {
    pub(crate) success: bool,
}

impl Success {
    pub(crate) fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Login {
    pub(crate) user_id: Uuid,
    pub(crate) role: Role,
    pub(crate) email: String,
    pub(crate) session_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) creator_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) company_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Rates {
    pub(crate) reel_rate: f64,
    pub(crate) story_rate: f64,
    pub(crate) post_rate: f64,
    pub(crate) accepts_barter: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct RateCard {
    pub(crate) creator_id: Uuid,
    #[serde(flatten)]
    pub(crate) rates: Rates,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct CreatorSummary {
    pub(crate) creator_id: Uuid,
    pub(crate) username: String,
    pub(crate) display_name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) niche: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) followers_count: i32,
    pub(crate) media_count: i32,
    pub(crate) profile_picture_url: Option<String>,
    pub(crate) style_profile: Option<Value>,
    pub(crate) rates: Option<Rates>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Parsed {
    pub(crate) keywords: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchResults {
    pub(crate) results: Vec<CreatorSummary>,
    pub(crate) parsed: Option<Parsed>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Wishlist {
    pub(crate) wishlist: Vec<CreatorSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreatorProfile {
    pub(crate) creator_id: Uuid,
    pub(crate) cognito_sub: String,
    pub(crate) username: String,
    pub(crate) display_name: Option<String>,
    pub(crate) bio: Option<String>,
    pub(crate) followers_count: i32,
    pub(crate) niche: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) profile_picture_url: Option<String>,
    pub(crate) media_count: i32,
    pub(crate) style_profile: Option<Value>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadsCount {
    pub(crate) count: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct Brand {
    pub(crate) user_id: Uuid,
    pub(crate) company_name: Option<String>,
    pub(crate) industry: Option<String>,
    pub(crate) city: Option<String>,
    pub(crate) contact_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Brands {
    pub(crate) brands: Vec<Brand>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Presigned {
    pub(crate) url: String,
    pub(crate) s3_key: String,
    /// False when the upload could not be recorded. The URL is still usable.
    pub(crate) recorded: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalysisStarted {
    pub(crate) success: bool,
    pub(crate) executions: usize,
    pub(crate) execution_arns: Vec<String>,
    pub(crate) failed: Vec<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct Benchmark {
    pub(crate) percentile: Option<f64>,
    pub(crate) label: Option<&'static str>,
    pub(crate) source: &'static str,
    pub(crate) sample_size: usize,
    pub(crate) range_low: Option<f64>,
    pub(crate) range_high: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Benchmarks {
    pub(crate) niche: Option<String>,
    pub(crate) follower_bucket: &'static str,
    pub(crate) rate_card: Rates,
    pub(crate) benchmarks: BTreeMap<&'static str, Benchmark>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SeedRange {
    pub(crate) p25: f64,
    pub(crate) p50: f64,
    pub(crate) p75: f64,
    pub(crate) min_rate: f64,
    pub(crate) max_rate: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct VideoAnalysis {
    pub(crate) video_id: Uuid,
    pub(crate) energy_level: Option<String>,
    pub(crate) aesthetic: Option<String>,
    pub(crate) setting: Option<String>,
    pub(crate) production_quality: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) topics: Option<Value>,
    pub(crate) summary: Option<String>,
    pub(crate) duration_seconds: Option<f64>,
    pub(crate) thumbnail_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct MediaKit {
    pub(crate) creator: CreatorSummary,
    pub(crate) follower_bucket: &'static str,
    pub(crate) benchmarks: BTreeMap<&'static str, SeedRange>,
    pub(crate) videos: Vec<VideoAnalysis>,
}
