mod aggregate;
mod bands;
mod rules;

pub use aggregate::{missing_attributes, total_score};
pub use bands::{classify, GOOD_ALTERNATIVE_FLOOR, IDEAL_FIT_FLOOR};
pub use rules::score_attribute;

use std::collections::BTreeMap;

use super::domain::{Attribute, AttributeScore, ComponentInput, ComponentStore, FitTier, TotalScore};
use serde::{Deserialize, Serialize};

/// Stateless evaluator turning stored raw components into derived scores.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    /// Recompute every derived value from scratch.
    pub fn derive(&self, components: &ComponentStore) -> DerivedScores {
        let attribute_scores = Attribute::ordered()
            .into_iter()
            .filter_map(|attribute| {
                score_attribute(attribute, components.get(attribute))
                    .map(|score| (attribute, score))
            })
            .collect();
        DerivedScores::from_attribute_scores(attribute_scores)
    }

    /// Per-attribute notes describing how each derived score came about.
    pub fn explain(&self, components: &ComponentStore) -> Vec<ScoreExplanation> {
        Attribute::ordered()
            .into_iter()
            .map(|attribute| {
                let input = components.get(attribute);
                let score = score_attribute(attribute, input);
                ScoreExplanation {
                    attribute,
                    score,
                    notes: explanation_notes(attribute, input),
                }
            })
            .collect()
    }
}

/// Derived values for a full component set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedScores {
    pub attribute_scores: BTreeMap<Attribute, AttributeScore>,
    pub total_score: Option<TotalScore>,
    pub fit_tier: FitTier,
}

impl DerivedScores {
    pub fn from_attribute_scores(attribute_scores: BTreeMap<Attribute, AttributeScore>) -> Self {
        let total_score = total_score(&attribute_scores);
        Self {
            fit_tier: classify(total_score),
            total_score,
            attribute_scores,
        }
    }
}

/// Transparent account of one attribute's contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreExplanation {
    pub attribute: Attribute,
    pub score: Option<AttributeScore>,
    pub notes: String,
}

fn explanation_notes(attribute: Attribute, input: Option<&ComponentInput>) -> String {
    match input {
        None => "no reviewer input yet".to_string(),
        Some(ComponentInput::Rating { value }) | Some(ComponentInput::Authority { value }) => {
            format!("{} rated {value}", attribute.label())
        }
        Some(ComponentInput::Content {
            originality: Some(originality),
            creative: Some(creative),
        }) => format!("mean of originality {originality} and creative {creative}"),
        Some(ComponentInput::Content { originality, .. }) => {
            let missing = if originality.is_none() {
                "originality"
            } else {
                "creative"
            };
            format!("waiting on {missing} slider")
        }
        Some(ComponentInput::Values {
            value,
            window_months,
        }) => format!("aligned statements over the last {window_months} months rated {value}"),
    }
}
