use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::core::error::Error;
use crate::types::response::{Benchmarks, RateCard, Rates, SeedRange};
use crate::utils::benchmark::{self, CONTENT_TYPES};

struct PeerRates {
    niche: Option<String>,
    bucket: &'static str,
    rates: Rates,
}

impl Rates {
    pub(crate) fn get(&self, content_type: &str) -> f64 {
        match content_type {
            "reel" => self.reel_rate,
            "story" => self.story_rate,
            "post" => self.post_rate,
            _ => 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RateController {
    pool: PgPool,
}

impl RateController {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn get(&self, creator_id: Uuid) -> Result<RateCard, Error> {
        match sqlx::query(
            "SELECT creator_id, reel_rate, story_rate, post_rate, accepts_barter
            FROM rate_cards
            WHERE creator_id = $1",
        )
        .bind(creator_id)
        .map(|row: PgRow| RateCard {
            creator_id: row.get("creator_id"),
            rates: map_rates(&row),
        })
        .fetch_one(&self.pool)
        .await
        {
            Ok(card) => Ok(card),
            Err(sqlx::Error::RowNotFound) => Err(Error::NotFound("No rates found")),
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn upsert(&self, creator_id: Uuid, rates: &Rates) -> Result<(), Error> {
        let result = sqlx::query(
            "INSERT INTO rate_cards (creator_id, reel_rate, story_rate, post_rate, accepts_barter)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (creator_id) DO UPDATE SET
                reel_rate = EXCLUDED.reel_rate,
                story_rate = EXCLUDED.story_rate,
                post_rate = EXCLUDED.post_rate,
                accepts_barter = EXCLUDED.accepts_barter,
                updated_at = NOW()",
        )
        .bind(creator_id)
        .bind(rates.reel_rate)
        .bind(rates.story_rate)
        .bind(rates.post_rate)
        .bind(rates.accepts_barter)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(Error::NotFound("Creator not found"))
            }
            Err(e) => Err(Error::Sql(e)),
        }
    }

    pub(crate) async fn benchmarks(&self, creator_id: Uuid) -> Result<Benchmarks, Error> {
        let (niche, followers): (Option<String>, i32) =
            match sqlx::query_as("SELECT niche, followers_count FROM creators WHERE id = $1")
                .bind(creator_id)
                .fetch_one(&self.pool)
                .await
            {
                Ok(creator) => creator,
                Err(sqlx::Error::RowNotFound) => return Err(Error::NotFound("Creator not found")),
                Err(e) => return Err(Error::Sql(e)),
            };

        let rate_card = self.get(creator_id).await?.rates;
        let follower_bucket = benchmark::follower_bucket(Some(followers));

        let peers = sqlx::query(
            "SELECT c.niche, c.followers_count, r.reel_rate, r.story_rate, r.post_rate, r.accepts_barter
            FROM rate_cards r
            JOIN creators c ON c.id = r.creator_id",
        )
        .map(|row: PgRow| PeerRates {
            niche: row.get("niche"),
            bucket: benchmark::follower_bucket(Some(row.get("followers_count"))),
            rates: map_rates(&row),
        })
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .filter(|peer| peer.bucket == follower_bucket)
        .collect::<Vec<_>>();

        let seeds = match &niche {
            Some(niche) => seed_ranges(&self.pool, niche, follower_bucket).await?,
            None => BTreeMap::new(),
        };

        let mut benchmarks = BTreeMap::new();

        for content_type in CONTENT_TYPES {
            let community = match &niche {
                Some(niche) => benchmark::without_outliers(
                    peers
                        .iter()
                        .filter(|peer| peer.niche.as_deref() == Some(niche.as_str()))
                        .map(|peer| peer.rates.get(content_type))
                        .collect(),
                ),
                None => Vec::new(),
            };

            benchmarks.insert(
                content_type,
                benchmark::niche_benchmark(
                    rate_card.get(content_type),
                    &community,
                    seeds.get(content_type),
                ),
            );
        }

        let overall_sample =
            benchmark::without_outliers(peers.iter().map(|peer| peer.rates.reel_rate).collect());

        let card_rates = CONTENT_TYPES.map(|content_type| rate_card.get(content_type));

        benchmarks.insert(
            "overall",
            benchmark::overall_benchmark(&card_rates, &overall_sample),
        );

        Ok(Benchmarks {
            niche,
            follower_bucket,
            rate_card,
            benchmarks,
        })
    }
}

/// Seeded industry ranges for a niche and follower bucket, by content type.
pub(crate) async fn seed_ranges(
    pool: &PgPool,
    niche: &str,
    follower_bucket: &str,
) -> Result<BTreeMap<&'static str, SeedRange>, Error> {
    let rows = sqlx::query(
        "SELECT content_type, rate_low, rate_high
        FROM rate_benchmarks
        WHERE niche = $1 AND follower_bucket = $2",
    )
    .bind(niche)
    .bind(follower_bucket)
    .fetch_all(pool)
    .await?;

    let mut ranges = BTreeMap::new();

    for row in rows {
        let content_type: String = row.get("content_type");

        if let Some(content_type) = CONTENT_TYPES.iter().find(|ct| **ct == content_type) {
            let low: Option<f64> = row.get("rate_low");
            let high: Option<f64> = row.get("rate_high");
            ranges.insert(
                *content_type,
                SeedRange::new(low.unwrap_or_default(), high.unwrap_or_default()),
            );
        }
    }

    Ok(ranges)
}

fn map_rates(row: &PgRow) -> Rates {
    Rates {
        reel_rate: row.get("reel_rate"),
        story_rate: row.get("story_rate"),
        post_rate: row.get("post_rate"),
        accepts_barter: row.get("accepts_barter"),
    }
}
