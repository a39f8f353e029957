use super::points::RawScorePoints;
use crate::catalog::{Combination, Subject};

pub const MIN_SUBJECTS: usize = 3;
pub const MAX_SUBJECTS: usize = 4;

/// A single reason the entered points cannot be submitted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected 3 to 4 subjects, got {count}")]
    SubjectCount { count: usize },

    #[error("{0}: no points entered")]
    Missing(Subject),

    #[error("{subject}: not part of the {combination} combination")]
    NotInCombination {
        subject: Subject,
        combination: Combination,
    },

    #[error("{0}: value is not a number")]
    NotFinite(Subject),

    #[error("{subject}: {value} is not a whole number")]
    NotInteger { subject: Subject, value: f64 },

    #[error("{subject}: {value} is outside 0..={max}")]
    OutOfRange { subject: Subject, value: f64, max: u32 },
}

/// Validate raw points against the selected combination.
/// Returns all validation errors at once (not just the first).
pub fn validate_points(
    points: &RawScorePoints,
    combination: Combination,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !(MIN_SUBJECTS..=MAX_SUBJECTS).contains(&points.len()) {
        errors.push(ValidationError::SubjectCount {
            count: points.len(),
        });
    }

    for subject in combination.subjects() {
        if points.get(subject).is_none() {
            errors.push(ValidationError::Missing(subject));
        }
    }

    for (subject, value) in points.iter() {
        if !combination.includes(subject) {
            errors.push(ValidationError::NotInCombination {
                subject,
                combination,
            });
            continue;
        }

        let max = subject.max_score();
        if !value.is_finite() {
            errors.push(ValidationError::NotFinite(subject));
        } else if value.fract() != 0.0 {
            errors.push(ValidationError::NotInteger { subject, value });
        } else if value < 0.0 || value > max as f64 {
            errors.push(ValidationError::OutOfRange {
                subject,
                value,
                max,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
