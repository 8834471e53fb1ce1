use std::collections::BTreeMap;

use super::super::domain::{Attribute, AttributeScore, TotalScore};

/// Exact, unweighted sum of all six attribute scores; `None` until every one is present.
pub fn total_score(scores: &BTreeMap<Attribute, AttributeScore>) -> Option<TotalScore> {
    let tenths = Attribute::ordered()
        .into_iter()
        .map(|attribute| scores.get(&attribute).map(|score| score.tenths()))
        .sum::<Option<u16>>()?;
    TotalScore::from_tenths(tenths)
}

/// Attributes still lacking a derived score, in display order.
pub fn missing_attributes(scores: &BTreeMap<Attribute, AttributeScore>) -> Vec<Attribute> {
    Attribute::ordered()
        .into_iter()
        .filter(|attribute| !scores.contains_key(attribute))
        .collect()
}
