use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AuthData {
    pub(crate) action: String,
    pub(crate) role: String,
    pub(crate) email: String,
    pub(crate) password: String,
    pub(crate) full_name: String,
    pub(crate) instagram_handle: String,
    pub(crate) niche: String,
    pub(crate) city: String,
    pub(crate) followers_count: Option<Value>,
    pub(crate) bio: String,
    pub(crate) company_name: String,
    pub(crate) industry: String,
    pub(crate) contact_name: String,
}

impl AuthData {
    /// Follower counts arrive either as numbers or as numeric strings.
    /// Anything unparseable counts as zero.
    pub(crate) fn followers(&self) -> i32 {
        match &self.followers_count {
            Some(Value::Number(number)) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|f| f as i64))
                .and_then(|n| i32::try_from(n).ok())
                .unwrap_or(0),
            Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SearchData {
    pub(crate) query: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WishlistData {
    pub(crate) creator_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileUpdate {
    pub(crate) niche: Option<String>,
    pub(crate) city: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RatesData {
    pub(crate) creator_id: Option<Uuid>,
    pub(crate) reel_rate: Option<f64>,
    pub(crate) story_rate: Option<f64>,
    pub(crate) post_rate: Option<f64>,
    pub(crate) accepts_barter: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatorQuery {
    pub(crate) creator_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BrandQuery {
    pub(crate) q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PresignData {
    pub(crate) creator_id: Option<Uuid>,
    pub(crate) filename: Option<String>,
    pub(crate) content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeData {
    pub(crate) creator_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_followers(value: Value) -> AuthData {
        AuthData {
            followers_count: Some(value),
            ..Default::default()
        }
    }

    #[test]
    fn test_followers_accepts_numbers_and_strings() {
        assert_eq!(with_followers(Value::from(12500)).followers(), 12500);
        assert_eq!(with_followers(Value::from("48000")).followers(), 48000);
        assert_eq!(with_followers(Value::from("lots")).followers(), 0);
        assert_eq!(AuthData::default().followers(), 0);
    }

    #[test]
    fn test_auth_data_tolerates_missing_fields() {
        let data: AuthData = serde_json::from_str(r#"{"action":"login"}"#).unwrap();

        assert_eq!(data.action, "login");
        assert!(data.email.is_empty());
    }
}
