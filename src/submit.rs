use crate::api::{AnalysisResponse, ApiClient, ApiError};
use crate::catalog::Combination;
use crate::scoring::{
    group_by_year, match_enrollments, normalize, validate_points, EnrollmentRow, GrantYear,
    RawScorePoints, ValidationError,
};
use crate::selection::FacultySelection;

/// Everything shown after a successful submission. Replaced wholesale on
/// every new response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub grants: Vec<GrantYear>,
    pub enrollments: Vec<EnrollmentRow>,
}

impl AnalysisReport {
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty() && self.enrollments.is_empty()
    }

    /// Any matched faculty that triggers the extra-seats footnote.
    pub fn has_extra_seats_note(&self) -> bool {
        self.enrollments
            .iter()
            .filter_map(|row| row.outcome.as_ref())
            .any(|o| o.is_first_unseated_rank())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    #[error(transparent)]
    Api(#[from] ApiError),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub fn build_report(response: AnalysisResponse, selection: &FacultySelection) -> AnalysisReport {
    AnalysisReport {
        grants: group_by_year(&response.grants),
        enrollments: match_enrollments(selection, &response.enrollments),
    }
}

/// Validate, normalize and submit. Nothing is sent when validation fails.
pub async fn submit_analysis(
    client: &ApiClient,
    combination: Combination,
    points: &RawScorePoints,
    selection: &FacultySelection,
) -> Result<AnalysisReport, SubmitError> {
    validate_points(points, combination).map_err(SubmitError::Validation)?;

    let payload = normalize(points, selection.as_slice());
    let response = client.analyze(&payload).await.inspect_err(|e| {
        tracing::warn!("analysis submission failed: {}", e);
    })?;

    tracing::info!(
        years = response.grants.len(),
        enrollments = response.enrollments.len(),
        "analysis received"
    );
    Ok(build_report(response, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EnrollmentOutcome, SubjectGrant, YearlyGrants};
    use crate::catalog::Subject;
    use crate::selection::FacultySelector;
    use std::time::Duration;

    fn selection() -> FacultySelection {
        vec![FacultySelector {
            faculty_id: "17".to_string(),
            year: 2024,
            university_name: "TSU".to_string(),
            faculty_name: "Physics".to_string(),
            subjects: vec![],
        }]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_build_report() {
        let response = AnalysisResponse {
            grants: vec![YearlyGrants {
                year: 2024,
                grants: vec![SubjectGrant {
                    subject: Subject::Physics,
                    grant_score: 6200.0,
                    grant_amount: Some(100),
                }],
            }],
            enrollments: vec![EnrollmentOutcome {
                faculty_id: "17".to_string(),
                year: 2024,
                contest_score: 900.0,
                rank: 11,
                total_enrolled: 10,
                total_available: 12,
                seats_with_subject: 5,
                thresholds: None,
            }],
        };

        let report = build_report(response, &selection());
        assert_eq!(report.grants.len(), 1);
        assert_eq!(report.grants[0].best, None);
        assert!(report.enrollments[0].outcome.is_some());
        assert!(report.has_extra_seats_note());
    }

    #[test]
    fn test_empty_response() {
        let report = build_report(AnalysisResponse::default(), &FacultySelection::new());
        assert!(report.is_empty());
        assert!(!report.has_extra_seats_note());
    }

    #[tokio::test]
    async fn test_invalid_points_never_reach_network() {
        // unroutable address: a request would fail as Transport, not Validation
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap();
        let points: RawScorePoints = [(Subject::Mathematics, 40.0)].into_iter().collect();

        let err = submit_analysis(&client, Combination::Mathematics, &points, &selection())
            .await
            .unwrap_err();

        match err {
            SubmitError::Validation(errors) => assert!(!errors.is_empty()),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_message_joins_all() {
        let err = SubmitError::Validation(vec![
            ValidationError::SubjectCount { count: 1 },
            ValidationError::Missing(Subject::History),
        ]);
        assert_eq!(
            err.to_string(),
            "expected 3 to 4 subjects, got 1; HISTORY: no points entered"
        );
    }
}
