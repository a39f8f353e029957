use super::points::RawScorePoints;
use crate::selection::{FacultyRef, FacultySelector};
use serde::Serialize;
use std::collections::BTreeMap;

/// Request body for `POST /analysis`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedPayload {
    /// Subject label (`GEORGIAN LANGUAGE`) to fraction of the maximum
    pub points: BTreeMap<String, f64>,
    pub faculties: Vec<FacultyRef>,
}

/// Round half away from zero to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Convert raw points into fractions of each subject's maximum.
///
/// Callers must validate first with [`super::validate_points`]; no range
/// checks happen here.
pub fn normalize(points: &RawScorePoints, faculties: &[FacultySelector]) -> NormalizedPayload {
    let points = points
        .iter()
        .map(|(subject, raw)| {
            let fraction = round3(raw / subject.max_score() as f64);
            (subject.label().to_string(), fraction)
        })
        .collect();

    NormalizedPayload {
        points,
        faculties: faculties.iter().map(FacultySelector::identity).collect(),
    }
}
