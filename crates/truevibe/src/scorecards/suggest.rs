//! Advisory pre-fill values derived from ingested influencer metrics.
//!
//! Nothing here writes to a scorecard: a reviewer still submits Reach, Interest and
//! Engagement through the regular edit path, optionally starting from these numbers.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{Attribute, ComponentInput};

/// Follower-count floors and the reach estimate each one unlocks.
const REACH_THRESHOLDS: [(u64, f64); 5] = [
    (10_000, 2.0),
    (50_000, 3.0),
    (200_000, 4.0),
    (500_000, 4.5),
    (1_000_000, 5.0),
];

const MIN_KEYWORD_LEN: usize = 3;

/// Metrics as transcribed from the ingestion collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeMetrics {
    #[serde(default)]
    pub follower_count: Option<u64>,
    /// Either a bare number or text such as `"4.2%"`.
    #[serde(default)]
    pub engagement_rate: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub campaign_objective: Option<String>,
}

/// A raw estimate and the slider value a reviewer would enter for it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub estimate: f64,
    pub slider: u8,
}

impl Suggestion {
    fn from_estimate(estimate: f64) -> Self {
        Self {
            estimate,
            slider: estimate.round().clamp(1.0, 5.0) as u8,
        }
    }

    pub fn as_input(&self) -> ComponentInput {
        ComponentInput::rating(self.slider)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestedRatings {
    pub reach: Suggestion,
    pub interest: Suggestion,
    pub engagement: Suggestion,
    pub engagement_rate_percent: f64,
}

impl SuggestedRatings {
    pub fn for_attribute(&self, attribute: Attribute) -> Option<Suggestion> {
        match attribute {
            Attribute::Reach => Some(self.reach),
            Attribute::Interest => Some(self.interest),
            Attribute::Engagement => Some(self.engagement),
            _ => None,
        }
    }
}

pub fn suggest(metrics: &QuantitativeMetrics) -> SuggestedRatings {
    let rate = metrics
        .engagement_rate
        .as_deref()
        .and_then(parse_percentage)
        .unwrap_or(0.0);
    let topics = metrics.topics.join(" ");

    SuggestedRatings {
        reach: Suggestion::from_estimate(reach_estimate(metrics.follower_count)),
        interest: Suggestion::from_estimate(interest_estimate(
            Some(topics.as_str()),
            metrics.campaign_objective.as_deref(),
        )),
        engagement: Suggestion::from_estimate(engagement_estimate(rate)),
        engagement_rate_percent: rate,
    }
}

pub fn reach_estimate(follower_count: Option<u64>) -> f64 {
    let followers = match follower_count {
        Some(count) if count > 0 => count,
        _ => return 1.0,
    };

    REACH_THRESHOLDS
        .iter()
        .filter(|(floor, _)| followers >= *floor)
        .map(|(_, estimate)| *estimate)
        .last()
        .unwrap_or(1.5)
}

pub fn engagement_estimate(rate_percent: f64) -> f64 {
    if rate_percent >= 6.0 {
        5.0
    } else if rate_percent >= 4.0 {
        4.0
    } else if rate_percent >= 2.0 {
        3.0
    } else if rate_percent >= 1.0 {
        2.0
    } else if rate_percent > 0.0 {
        1.5
    } else {
        1.0
    }
}

/// Keyword overlap between what the influencer covers and what the campaign wants.
pub fn interest_estimate(topic_text: Option<&str>, objective_text: Option<&str>) -> f64 {
    let topics = keywords(topic_text.unwrap_or_default());
    let objective = keywords(objective_text.unwrap_or_default());
    if topics.is_empty() || objective.is_empty() {
        return 3.0;
    }

    match topics.intersection(&objective).count() {
        0 => 2.5,
        1 => 3.5,
        2 => 4.0,
        _ => 5.0,
    }
}

/// First `number %` anywhere in `raw`. Text that is only a bare number is read as a percentage.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value.is_finite().then_some(value);
    }

    trimmed
        .char_indices()
        .filter(|(_, c)| c.is_ascii_digit())
        .find_map(|(start, _)| percent_at(&trimmed[start..]))
}

/// `digits[.digits]` at the start of `text`, kept only when whitespace and `%` follow.
fn percent_at(text: &str) -> Option<f64> {
    let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let mut end = digits(text);
    if let Some(fraction) = text[end..].strip_prefix('.') {
        let len = digits(fraction);
        if len > 0 {
            end += 1 + len;
        }
    }

    let (number, rest) = text.split_at(end);
    if !rest.trim_start().starts_with('%') {
        return None;
    }
    number.parse::<f64>().ok()
}

fn keywords(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| token.len() >= MIN_KEYWORD_LEN)
        .map(str::to_ascii_lowercase)
        .collect()
}
