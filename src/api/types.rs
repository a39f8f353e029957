use crate::catalog::Subject;
use serde::{Deserialize, Serialize};

/// One grant evaluation for a single elective subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectGrant {
    pub subject: Subject,
    pub grant_score: f64,
    /// Percentage awarded; the service may send `null` when nothing was won
    #[serde(default)]
    pub grant_amount: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyGrants {
    pub year: u16,
    #[serde(default)]
    pub grants: Vec<SubjectGrant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentThresholds {
    #[serde(default)]
    pub min_score: Option<f64>,
    #[serde(default)]
    pub max_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollmentOutcome {
    pub faculty_id: String,
    pub year: u16,
    pub contest_score: f64,
    pub rank: u32,
    pub total_enrolled: u32,
    pub total_available: u32,
    pub seats_with_subject: u32,
    #[serde(default)]
    pub thresholds: Option<EnrollmentThresholds>,
}

/// Body of a successful `POST /analysis`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub grants: Vec<YearlyGrants>,
    #[serde(default)]
    pub enrollments: Vec<EnrollmentOutcome>,
}

/// A faculty offering for one year, as listed by `GET /faculties`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacultyRow {
    pub faculty_id: String,
    pub year: u16,
    pub faculty_name: String,
    #[serde(default)]
    pub university_id: String,
    pub university_name: String,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl FacultyRow {
    /// Georgian names of the row's recognised subjects, comma-joined
    pub fn subject_names(&self) -> String {
        subject_names(&self.subjects)
    }
}

pub(crate) fn subject_names(subjects: &[String]) -> String {
    subjects
        .iter()
        .filter_map(|s| s.parse::<Subject>().ok())
        .map(|s| s.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Body of a successful `GET /faculties`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacultyPage {
    #[serde(default)]
    pub items: Vec<FacultyRow>,
    pub total: usize,
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_response() {
        let body = r#"{
            "grants": [
                {"year": 2023, "grants": [
                    {"subject": "BIOLOGY", "grant_score": 6010.5, "grant_amount": 70},
                    {"subject": "CHEMISTRY", "grant_score": 5900.0, "grant_amount": null}
                ]}
            ],
            "enrollments": [
                {"faculty_id": "0412", "year": 2023, "contest_score": 812.25,
                 "thresholds": {"faculty_id": "0412", "year": 2023, "min_score": 700.5, "max_score": null},
                 "rank": 14, "total_enrolled": 40, "total_available": 45, "seats_with_subject": 12}
            ]
        }"#;
        let response: AnalysisResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.grants[0].grants[0].subject, Subject::Biology);
        assert_eq!(response.grants[0].grants[1].grant_amount, None);
        let thresholds = response.enrollments[0].thresholds.as_ref().unwrap();
        assert_eq!(thresholds.min_score, Some(700.5));
        assert_eq!(thresholds.max_score, None);
    }

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let response: AnalysisResponse = serde_json::from_str("{}").unwrap();
        assert!(response.grants.is_empty());
        assert!(response.enrollments.is_empty());
    }

    #[test]
    fn test_subject_names_skip_unknown() {
        let row = FacultyRow {
            faculty_id: "1".to_string(),
            year: 2024,
            faculty_name: "Law".to_string(),
            university_id: "U1".to_string(),
            university_name: "TSU".to_string(),
            subjects: vec![
                "GEORGIAN LANGUAGE".to_string(),
                "HISTORY".to_string(),
                "LATIN".to_string(),
            ],
        };
        assert_eq!(row.subject_names(), "ქართული, ისტორია");
    }
}
