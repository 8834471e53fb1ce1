use super::domain::{Attribute, ComponentInput, EditorId};
use crate::config::ScorecardConfig;

/// Lowest and highest value any reviewer slider may take.
pub const SLIDER_MIN: i64 = 1;
pub const SLIDER_MAX: i64 = 5;

/// Inclusive bounds of the Values review window, in months.
pub const VALUES_WINDOW_MONTHS: std::ops::RangeInclusive<i64> = 3..=6;

/// Input rejected before any mutation took place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{attribute:?} {field} must be between 1 and 5 (found {value})")]
    OutOfRange {
        attribute: Attribute,
        field: &'static str,
        value: i64,
    },
    #[error("{attribute:?} does not accept a `{received}` input")]
    SchemaMismatch {
        attribute: Attribute,
        received: &'static str,
    },
    #[error("{attribute:?} input carries no values; clear the attribute instead")]
    EmptyInput { attribute: Attribute },
    #[error("{attribute:?} is complete; clear it before leaving a slider blank")]
    WouldClear { attribute: Attribute },
    #[error("values review window must cover 3 to 6 months (found {months})")]
    ReviewWindow { months: i64 },
    #[error("editor id is required")]
    MissingEditor,
    #[error("qualitative notes exceed {limit} characters")]
    NotesTooLong { limit: usize },
}

/// Checks raw reviewer input against each attribute's schema and range.
#[derive(Debug, Clone)]
pub struct InputGuard {
    max_notes_len: usize,
}

impl Default for InputGuard {
    fn default() -> Self {
        Self::from_config(&ScorecardConfig::default())
    }
}

impl InputGuard {
    pub fn from_config(config: &ScorecardConfig) -> Self {
        Self {
            max_notes_len: config.max_notes_len,
        }
    }

    pub fn check_editor(&self, editor: &EditorId) -> Result<(), ValidationError> {
        if editor.0.trim().is_empty() {
            return Err(ValidationError::MissingEditor);
        }
        Ok(())
    }

    pub fn check_component(
        &self,
        attribute: Attribute,
        input: &ComponentInput,
    ) -> Result<(), ValidationError> {
        if !input.fits(attribute) {
            return Err(ValidationError::SchemaMismatch {
                attribute,
                received: input.kind(),
            });
        }

        match *input {
            ComponentInput::Rating { value } | ComponentInput::Authority { value } => {
                check_slider(attribute, "value", value)
            }
            ComponentInput::Content {
                originality,
                creative,
            } => {
                if originality.is_none() && creative.is_none() {
                    return Err(ValidationError::EmptyInput { attribute });
                }
                if let Some(value) = originality {
                    check_slider(attribute, "originality", value)?;
                }
                if let Some(value) = creative {
                    check_slider(attribute, "creative", value)?;
                }
                Ok(())
            }
            ComponentInput::Values {
                value,
                window_months,
            } => {
                check_slider(attribute, "value", value)?;
                if !VALUES_WINDOW_MONTHS.contains(&window_months) {
                    return Err(ValidationError::ReviewWindow {
                        months: window_months,
                    });
                }
                Ok(())
            }
        }
    }

    /// Reject an edit that would regress a complete attribute without an explicit clear.
    pub fn check_transition(
        &self,
        attribute: Attribute,
        current: Option<&ComponentInput>,
        next: &ComponentInput,
    ) -> Result<(), ValidationError> {
        let complete =
            current.is_some_and(|input| input.fits(attribute) && !input.is_half_filled());
        if complete && next.is_half_filled() {
            return Err(ValidationError::WouldClear { attribute });
        }
        Ok(())
    }

    /// Trim reviewer notes and enforce the configured length limit.
    pub fn sanitize_notes(&self, notes: &str) -> Result<String, ValidationError> {
        let trimmed = notes.trim();
        if trimmed.chars().count() > self.max_notes_len {
            return Err(ValidationError::NotesTooLong {
                limit: self.max_notes_len,
            });
        }
        Ok(trimmed.to_string())
    }
}

fn check_slider(
    attribute: Attribute,
    field: &'static str,
    value: i64,
) -> Result<(), ValidationError> {
    if (SLIDER_MIN..=SLIDER_MAX).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            attribute,
            field,
            value,
        })
    }
}
