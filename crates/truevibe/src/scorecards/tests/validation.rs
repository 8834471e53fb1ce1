use crate::config::ScorecardConfig;
use crate::scorecards::domain::{Attribute, ComponentInput, EditorId};
use crate::scorecards::validation::{InputGuard, ValidationError};

fn guard() -> InputGuard {
    InputGuard::default()
}

#[test]
fn rejects_out_of_range_sliders_instead_of_clamping() {
    for value in [-1, 0, 6, 255, 300] {
        match guard().check_component(Attribute::Reach, &ComponentInput::Rating { value }) {
            Err(ValidationError::OutOfRange {
                attribute: Attribute::Reach,
                field: "value",
                value: found,
            }) => assert_eq!(found, value),
            other => panic!("expected out of range for {value}, got {other:?}"),
        }
    }
}

#[test]
fn rejects_out_of_range_content_slider_by_name() {
    let input = ComponentInput::Content {
        originality: Some(3),
        creative: Some(9),
    };
    match guard().check_component(Attribute::Content, &input) {
        Err(ValidationError::OutOfRange { field, .. }) => assert_eq!(field, "creative"),
        other => panic!("expected creative out of range, got {other:?}"),
    }
}

#[test]
fn rejects_inputs_shaped_for_another_attribute() {
    let result = guard().check_component(Attribute::Content, &ComponentInput::rating(3));
    assert_eq!(
        result,
        Err(ValidationError::SchemaMismatch {
            attribute: Attribute::Content,
            received: "rating",
        })
    );
    assert!(guard()
        .check_component(Attribute::Values, &ComponentInput::authority(3))
        .is_err());
}

#[test]
fn accepts_half_filled_content_but_not_empty_content() {
    let half = ComponentInput::Content {
        originality: None,
        creative: Some(2),
    };
    assert!(guard().check_component(Attribute::Content, &half).is_ok());

    let empty = ComponentInput::Content {
        originality: None,
        creative: None,
    };
    assert_eq!(
        guard().check_component(Attribute::Content, &empty),
        Err(ValidationError::EmptyInput {
            attribute: Attribute::Content
        })
    );
}

#[test]
fn values_window_must_cover_three_to_six_months() {
    for months in [3, 4, 6] {
        let input = ComponentInput::Values {
            value: 4,
            window_months: months,
        };
        assert!(guard().check_component(Attribute::Values, &input).is_ok());
    }
    let input = ComponentInput::Values {
        value: 4,
        window_months: 12,
    };
    assert_eq!(
        guard().check_component(Attribute::Values, &input),
        Err(ValidationError::ReviewWindow { months: 12 })
    );
}

#[test]
fn wire_values_outside_u8_reach_the_guard() {
    for (raw, expected) in [
        (r#"{"kind":"rating","value":300}"#, 300),
        (r#"{"kind":"authority","value":-1}"#, -1),
    ] {
        let input: ComponentInput = serde_json::from_str(raw).expect("parses");
        let attribute = if input.kind() == "rating" {
            Attribute::Engagement
        } else {
            Attribute::Authority
        };
        match guard().check_component(attribute, &input) {
            Err(ValidationError::OutOfRange { value, .. }) => assert_eq!(value, expected),
            other => panic!("expected out of range for {raw}, got {other:?}"),
        }
    }

    let input: ComponentInput =
        serde_json::from_str(r#"{"kind":"values","value":4,"window_months":-3}"#)
            .expect("parses");
    assert_eq!(
        guard().check_component(Attribute::Values, &input),
        Err(ValidationError::ReviewWindow { months: -3 })
    );
}

#[test]
fn half_filled_content_only_replaces_incomplete_content() {
    let half = ComponentInput::Content {
        originality: Some(4),
        creative: None,
    };
    let complete = ComponentInput::content(4, 4);

    assert!(guard().check_transition(Attribute::Content, None, &half).is_ok());
    assert!(guard().check_transition(Attribute::Content, Some(&half), &half).is_ok());
    assert!(guard().check_transition(Attribute::Content, Some(&complete), &complete).is_ok());
    assert_eq!(
        guard().check_transition(Attribute::Content, Some(&complete), &half),
        Err(ValidationError::WouldClear {
            attribute: Attribute::Content
        })
    );
}

#[test]
fn values_window_defaults_when_omitted() {
    let input: ComponentInput =
        serde_json::from_str(r#"{"kind":"values","value":3}"#).expect("parses");
    assert_eq!(input, ComponentInput::values(3));
}

#[test]
fn requires_an_editor() {
    assert_eq!(
        guard().check_editor(&EditorId("  ".to_string())),
        Err(ValidationError::MissingEditor)
    );
    assert!(guard().check_editor(&EditorId::from("reviewer")).is_ok());
}

#[test]
fn notes_are_trimmed_and_bounded() {
    let guard = InputGuard::from_config(&ScorecardConfig { max_notes_len: 5 });
    assert_eq!(guard.sanitize_notes("  solid  ").expect("fits"), "solid");
    assert_eq!(
        guard.sanitize_notes("too long"),
        Err(ValidationError::NotesTooLong { limit: 5 })
    );
}
