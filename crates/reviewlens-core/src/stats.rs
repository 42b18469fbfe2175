//! Overview figures shown above the generated reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{ReviewRecord, SentimentLabel};
use crate::temporal::parse_review_date;

/// Sentiment counts within one topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl SentimentBreakdown {
    fn add(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Negative => self.negative += 1,
            SentimentLabel::Neutral => self.neutral += 1,
        }
    }
}

/// One point of the sentiment-over-time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub review_date: DateTime<Utc>,
    pub sentiment_score: f64,
}

/// Dataset-wide summary statistics.
///
/// Review dates are resolved with [`parse_review_date`] against the `now`
/// passed to [`Overview::compute`]; a missing date resolves to `now`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_reviews: usize,
    /// Mean sentiment score over records that have one.
    pub average_sentiment: Option<f64>,
    /// Mean star rating over records that have one.
    pub average_rating: Option<f64>,
    /// Share of all reviews labeled Positive, in percent.
    pub positive_percent: f64,
    /// Review count per topic label; `-1` collects outliers.
    pub topic_counts: BTreeMap<i64, usize>,
    pub sentiment_by_topic: BTreeMap<i64, SentimentBreakdown>,
    /// Whole days between the oldest and newest review.
    pub date_range_days: Option<i64>,
    pub highest_sentiment: Option<f64>,
    pub lowest_sentiment: Option<f64>,
    /// Scored reviews ordered by resolved date, oldest first.
    pub sentiment_trend: Vec<TrendPoint>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

impl Overview {
    pub fn compute(records: &[ReviewRecord], now: DateTime<Utc>) -> Self {
        let total_reviews = records.len();
        let average_sentiment = mean(records.iter().filter_map(|r| r.sentiment_score));
        let average_rating = mean(records.iter().filter_map(|r| r.rating));

        let positive = records
            .iter()
            .filter(|r| r.effective_sentiment() == Some(SentimentLabel::Positive))
            .count();
        let positive_percent = if total_reviews == 0 {
            0.0
        } else {
            positive as f64 / total_reviews as f64 * 100.0
        };

        let mut topic_counts = BTreeMap::new();
        let mut sentiment_by_topic: BTreeMap<i64, SentimentBreakdown> = BTreeMap::new();
        for record in records {
            let Some(topic) = record.topic else { continue };
            *topic_counts.entry(topic).or_insert(0) += 1;
            if let Some(label) = record.effective_sentiment() {
                sentiment_by_topic.entry(topic).or_default().add(label);
            }
        }

        let dates: Vec<DateTime<Utc>> = records
            .iter()
            .map(|r| parse_review_date(r.review_date.as_deref().unwrap_or_default(), now))
            .collect();
        let date_range_days = dates
            .iter()
            .min()
            .zip(dates.iter().max())
            .map(|(oldest, newest)| (*newest - *oldest).num_days());

        let scores = || records.iter().filter_map(|r| r.sentiment_score);
        let highest_sentiment = scores().reduce(f64::max);
        let lowest_sentiment = scores().reduce(f64::min);

        let mut sentiment_trend: Vec<TrendPoint> = records
            .iter()
            .zip(&dates)
            .filter_map(|(record, date)| {
                record.sentiment_score.map(|score| TrendPoint {
                    review_date: *date,
                    sentiment_score: score,
                })
            })
            .collect();
        sentiment_trend.sort_by_key(|point| point.review_date);

        Self {
            total_reviews,
            average_sentiment,
            average_rating,
            positive_percent,
            topic_counts,
            sentiment_by_topic,
            date_range_days,
            highest_sentiment,
            lowest_sentiment,
            sentiment_trend,
        }
    }
}
