//! Review records and the labels attached to them by pipeline stages.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

use crate::defaults;

// =============================================================================
// SENTIMENT
// =============================================================================

/// Sentiment class derived from a compound polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// Classify a compound score in `[-1, 1]`.
    ///
    /// Scores at or beyond ±0.05 are polar; everything in between is Neutral.
    pub fn from_score(score: f64) -> Self {
        if score >= defaults::SENTIMENT_POSITIVE_THRESHOLD {
            Self::Positive
        } else if score <= defaults::SENTIMENT_NEGATIVE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// REVIEW RECORD
// =============================================================================

/// One customer review as it moves through the pipeline.
///
/// Columns are filled progressively: cleaning sets the text fields, the
/// sentiment stage sets `sentiment_*`, and the topic model sets
/// `cleaned_text` and `topic`. Every column is optional on read so that
/// datasets from any stage load with the same type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    #[serde(default)]
    pub reviewer_name: Option<String>,
    /// Free-text date as delivered by the review source ("4 weeks ago").
    #[serde(default)]
    pub review_date: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_text: String,
    /// Business the review was fetched for.
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub sentiment_label: Option<SentimentLabel>,
    /// Normalized text the topic model was fit on.
    #[serde(default)]
    pub cleaned_text: Option<String>,
    /// Topic model label; `None` or `-1` means no topic.
    #[serde(default, deserialize_with = "deserialize_topic")]
    pub topic: Option<i64>,
}

impl ReviewRecord {
    /// The topic label if one was genuinely assigned.
    pub fn assigned_topic(&self) -> Option<i64> {
        self.topic.filter(|t| *t != defaults::OUTLIER_TOPIC)
    }

    /// The cleaned text, if present and not blank.
    pub fn report_text(&self) -> Option<&str> {
        self.cleaned_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Sentiment label, derived from the score when only the score is present.
    pub fn effective_sentiment(&self) -> Option<SentimentLabel> {
        self.sentiment_label
            .or_else(|| self.sentiment_score.map(SentimentLabel::from_score))
    }
}

/// Texts and topic labels fed to report generation.
///
/// Built from records with non-blank `cleaned_text`; order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledText {
    pub text: String,
    pub topic: Option<i64>,
}

impl LabeledText {
    pub fn new(text: impl Into<String>, topic: Option<i64>) -> Self {
        Self {
            text: text.into(),
            topic,
        }
    }
}

/// Project records onto report inputs, dropping rows without cleaned text.
pub fn report_inputs(records: &[ReviewRecord]) -> Vec<LabeledText> {
    records
        .iter()
        .filter_map(|r| r.report_text().map(|t| LabeledText::new(t, r.topic)))
        .collect()
}

// Topic columns written by dataframe tools come back as ints ("3"), floats
// ("3.0", when the column held nulls), or blanks.
fn deserialize_topic<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct TopicVisitor;

    impl<'de> Visitor<'de> for TopicVisitor {
        type Value = Option<i64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            f.write_str("an integer topic label, a whole float, or null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<Self::Value, D2::Error> {
            d.deserialize_any(TopicVisitor)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Some(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            i64::try_from(v)
                .map(Some)
                .map_err(|_| E::custom(format!("topic label {v} out of range")))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_nan() {
                return Ok(None);
            }
            if v.fract() != 0.0 {
                return Err(E::custom(format!("topic label {v} is not whole")));
            }
            Ok(Some(v as i64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            let v = v.trim();
            if v.is_empty() || v.eq_ignore_ascii_case("nan") {
                return Ok(None);
            }
            if let Ok(n) = v.parse::<i64>() {
                return Ok(Some(n));
            }
            match v.parse::<f64>() {
                Ok(f) => self.visit_f64(f),
                Err(_) => Err(E::custom(format!("invalid topic label '{v}'"))),
            }
        }
    }

    deserializer.deserialize_option(TopicVisitor)
}
