pub mod enrollment;
pub mod grants;
pub mod normalize;
pub mod points;
pub mod scale;
pub mod validation;

pub use enrollment::{match_enrollments, EnrollmentRow};
pub use grants::{best_grant, best_grant_per_year, group_by_year, rank_outcomes, GrantOutcome, GrantYear};
pub use normalize::{normalize, round3, NormalizedPayload};
pub use points::RawScorePoints;
pub use scale::{
    column, enrollment_scale, grant_scale, layout, MarkerPosition, ScaleLayout, ScaleMarker,
    ENROLLMENT_SCALE_PAD, GRANT_SCALE_PAD, USER_TAG,
};
pub use validation::{validate_points, ValidationError, MAX_SUBJECTS, MIN_SUBJECTS};
