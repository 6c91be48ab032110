use sqlx::PgPool;

use crate::controllers::creator::{map_creator_summary, SUMMARY_COLUMNS};
use crate::core::error::Error;
use crate::types::response::CreatorSummary;
use crate::utils::keywords;

pub(crate) const RESULT_LIMIT: i64 = 50;

const SEARCH_FIELDS: [&str; 6] = [
    "c.niche",
    "c.city",
    "c.display_name",
    "c.bio",
    "c.username",
    "COALESCE(c.style_profile::text, '')",
];

/// `WHERE` clause requiring every keyword (`$1..=$count`) to match at least
/// one search field.
pub(crate) fn keyword_predicate(count: usize) -> String {
    (1..=count)
        .map(|param| {
            let alternatives = SEARCH_FIELDS
                .iter()
                .map(|field| format!("{} ILIKE ${}", field, param))
                .collect::<Vec<_>>()
                .join(" OR ");

            format!("({})", alternatives)
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn search_sql(keyword_count: usize) -> String {
    let filter = match keyword_count {
        0 => String::new(),
        n => format!("WHERE {}", keyword_predicate(n)),
    };

    format!(
        "SELECT {}
        FROM creators c
        LEFT JOIN rate_cards r ON c.id = r.creator_id
        {}
        ORDER BY c.followers_count DESC, c.id
        LIMIT {}",
        SUMMARY_COLUMNS, filter, RESULT_LIMIT
    )
}

#[derive(Clone, Debug)]
pub(crate) struct SearchController {
    pool: PgPool,
}

impl SearchController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn search(&self, keywords: &[String]) -> Result<Vec<CreatorSummary>, Error> {
        let sql = search_sql(keywords.len());

        let query = keywords
            .iter()
            .fold(sqlx::query(&sql), |query, keyword| {
                query.bind(keywords::like_pattern(keyword))
            });

        Ok(query
            .map(map_creator_summary)
            .fetch_all(&self.pool)
            .await?)
    }

    pub(crate) async fn all(&self) -> Result<Vec<CreatorSummary>, Error> {
        self.search(&[]).await
    }
}
