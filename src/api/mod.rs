//! Client for the remote analysis service.

pub mod analysis;
pub mod client;
pub mod faculties;
pub mod types;

pub use client::{ApiClient, ApiError};
pub use types::{
    AnalysisResponse, EnrollmentOutcome, EnrollmentThresholds, FacultyPage, FacultyRow,
    SubjectGrant, YearlyGrants,
};
