use super::super::domain::{Attribute, AttributeScore, ComponentInput};

/// Score one attribute from its raw set, or `None` while the raw set is incomplete.
///
/// A raw set of the wrong shape for `attribute` is treated as incomplete; such input
/// never reaches storage because the guard rejects it first.
pub fn score_attribute(
    attribute: Attribute,
    input: Option<&ComponentInput>,
) -> Option<AttributeScore> {
    let input = input?;
    if !input.fits(attribute) {
        return None;
    }

    match *input {
        ComponentInput::Rating { value }
        | ComponentInput::Authority { value }
        | ComponentInput::Values { value, .. } => slider(value).and_then(AttributeScore::whole),
        ComponentInput::Content {
            originality: Some(originality),
            creative: Some(creative),
        } => mean_in_tenths(&[slider(originality)?, slider(creative)?])
            .and_then(AttributeScore::from_tenths),
        ComponentInput::Content { .. } => None,
    }
}

fn slider(value: i64) -> Option<u8> {
    u8::try_from(value).ok()
}

/// Arithmetic mean of slider values in tenths, rounded half to even.
pub(crate) fn mean_in_tenths(values: &[u8]) -> Option<u16> {
    if values.is_empty() {
        return None;
    }
    let sum: u32 = values.iter().map(|value| u32::from(*value)).sum();
    let rounded = round_half_even(sum * 10, values.len() as u32);
    u16::try_from(rounded).ok()
}

/// Integer division `numerator / denominator` rounded half to even.
pub(crate) fn round_half_even(numerator: u32, denominator: u32) -> u32 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder * 2;

    if twice > denominator || (twice == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}
