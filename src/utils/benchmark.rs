use crate::types::response::{Benchmark, SeedRange};

pub(crate) const CONTENT_TYPES: [&str; 3] = ["reel", "story", "post"];

pub(crate) const MIN_COMMUNITY_SAMPLE: usize = 5;

const OUTLIER_FACTOR: f64 = 3.0;

const FOLLOWER_BUCKETS: [(i32, i32, &str); 4] = [
    (5_000, 10_000, "5K-10K"),
    (10_000, 25_000, "10K-25K"),
    (25_000, 50_000, "25K-50K"),
    (50_000, 100_000, "50K-100K"),
];

pub(crate) fn follower_bucket(followers: Option<i32>) -> &'static str {
    let Some(count) = followers else {
        return FOLLOWER_BUCKETS[0].2;
    };

    FOLLOWER_BUCKETS
        .iter()
        .find(|(low, high, _)| (*low..*high).contains(&count))
        .map(|(_, _, label)| *label)
        .unwrap_or(if count >= 100_000 {
            FOLLOWER_BUCKETS[3].2
        } else {
            FOLLOWER_BUCKETS[0].2
        })
}

/// Display label for a percentile. Each band includes its lower bound.
pub(crate) fn label(percentile: f64) -> &'static str {
    if percentile >= 80.0 {
        "Premium"
    } else if percentile >= 60.0 {
        "Above Average"
    } else if percentile >= 40.0 {
        "Average"
    } else if percentile >= 20.0 {
        "Below Average"
    } else {
        "Budget"
    }
}

fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 0 => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
        _ => Some(sorted[n / 2]),
    }
}

pub(crate) fn without_outliers(mut rates: Vec<f64>) -> Vec<f64> {
    rates.retain(|rate| rate.is_finite() && *rate > 0.0);
    rates.sort_by(f64::total_cmp);

    match median(&rates) {
        Some(median) => rates
            .into_iter()
            .filter(|rate| *rate <= median * OUTLIER_FACTOR)
            .collect(),
        None => rates,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Share of the sample below `rate`, counting ties as half.
pub(crate) fn percentile_in(rate: f64, sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 50.0;
    }

    let below = sorted.iter().filter(|r| **r < rate).count() as f64;
    let equal = sorted.iter().filter(|r| **r == rate).count() as f64;

    round1((below + 0.5 * equal) / sorted.len() as f64 * 100.0)
}

impl SeedRange {
    pub(crate) fn new(rate_low: f64, rate_high: f64) -> Self {
        let spread = rate_high - rate_low;

        Self {
            p25: rate_low + spread * 0.25,
            p50: (rate_low + rate_high) / 2.0,
            p75: rate_low + spread * 0.75,
            min_rate: rate_low,
            max_rate: rate_high,
        }
    }
}

pub(crate) fn interpolate(rate: f64, seed: Option<&SeedRange>) -> f64 {
    let Some(seed) = seed else {
        return 50.0;
    };

    let points: Vec<(f64, f64)> = [
        (seed.min_rate, 0.0),
        (seed.p25, 25.0),
        (seed.p50, 50.0),
        (seed.p75, 75.0),
        (seed.max_rate, 100.0),
    ]
    .into_iter()
    .filter(|(value, _)| *value > 0.0)
    .collect();

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 50.0;
    };

    if rate <= first.0 {
        return first.1;
    }
    if rate >= last.0 {
        return last.1;
    }

    for pair in points.windows(2) {
        let ((v1, p1), (v2, p2)) = (pair[0], pair[1]);

        if v1 <= rate && rate <= v2 {
            if v2 == v1 {
                return (p1 + p2) / 2.0;
            }
            return round1(p1 + (rate - v1) / (v2 - v1) * (p2 - p1));
        }
    }

    50.0
}

impl Benchmark {
    fn new(
        percentile: Option<f64>,
        source: &'static str,
        sample_size: usize,
        range_low: Option<f64>,
        range_high: Option<f64>,
    ) -> Self {
        Self {
            percentile,
            label: percentile.map(label),
            source,
            sample_size,
            range_low,
            range_high,
        }
    }

    pub(crate) fn insufficient() -> Self {
        Self::new(None, "insufficient_data", 0, None, None)
    }
}

/// Benchmark for one content type. `community` must already be filtered to
/// the creator's niche and bucket and passed through [`without_outliers`].
pub(crate) fn niche_benchmark(rate: f64, community: &[f64], seed: Option<&SeedRange>) -> Benchmark {
    if rate <= 0.0 {
        return Benchmark::insufficient();
    }

    if community.len() >= MIN_COMMUNITY_SAMPLE {
        return Benchmark::new(
            Some(percentile_in(rate, community)),
            "community",
            community.len(),
            community.first().copied(),
            community.last().copied(),
        );
    }

    Benchmark::new(
        Some(interpolate(rate, seed)),
        "seed",
        community.len(),
        seed.map(|s| s.min_rate),
        seed.map(|s| s.max_rate),
    )
}

pub(crate) fn overall_benchmark(rates: &[f64], sample: &[f64]) -> Benchmark {
    let present: Vec<f64> = rates.iter().copied().filter(|r| *r > 0.0).collect();

    if present.is_empty() {
        return Benchmark::insufficient();
    }

    let average = present.iter().sum::<f64>() / present.len() as f64;

    let (percentile, source) = if sample.len() >= MIN_COMMUNITY_SAMPLE {
        (percentile_in(average, sample), "community")
    } else {
        (50.0, "insufficient_data")
    };

    Benchmark::new(
        Some(percentile),
        source,
        sample.len(),
        sample.first().copied(),
        sample.last().copied(),
    )
}
