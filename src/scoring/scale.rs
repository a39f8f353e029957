use crate::api::types::EnrollmentThresholds;
use crate::catalog::GrantThreshold;

/// Default padding around grant-threshold scales, in service score units.
pub const GRANT_SCALE_PAD: f64 = 300.0;
/// Default padding around enrollment scales.
pub const ENROLLMENT_SCALE_PAD: f64 = 150.0;

pub const USER_TAG: &str = "you";

#[derive(Debug, Clone, PartialEq)]
pub struct ScaleMarker {
    pub value: f64,
    pub tag: String,
}

impl ScaleMarker {
    pub fn new(value: f64, tag: impl Into<String>) -> Self {
        Self {
            value,
            tag: tag.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerPosition {
    pub tag: String,
    pub value: f64,
    pub percent: f64,
}

/// Marker placement along a padded linear scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleLayout {
    pub scale_start: f64,
    pub scale_end: f64,
    /// Markers in input order
    pub positions: Vec<MarkerPosition>,
    pub user: MarkerPosition,
}

impl ScaleLayout {
    pub fn position(&self, tag: &str) -> Option<f64> {
        if tag == self.user.tag {
            return Some(self.user.percent);
        }
        self.positions
            .iter()
            .find(|p| p.tag == tag)
            .map(|p| p.percent)
    }

    /// Percent offset of an arbitrary value on this scale.
    ///
    /// A zero-width (or non-finite) scale puts everything at the midpoint.
    pub fn percent_of(&self, value: f64) -> f64 {
        percent_between(self.scale_start, self.scale_end, value)
    }

    /// Markers followed by the user marker.
    pub fn all_positions(&self) -> impl Iterator<Item = &MarkerPosition> {
        self.positions.iter().chain(std::iter::once(&self.user))
    }
}

fn percent_between(start: f64, end: f64, value: f64) -> f64 {
    let span = end - start;
    if !span.is_finite() || span <= 0.0 {
        return 50.0;
    }
    ((value - start) / span * 100.0).clamp(0.0, 100.0)
}

/// Lay out `markers` and the user's value on a scale padded by `pad` on both
/// sides of the lowest and highest plotted value.
pub fn layout(markers: &[ScaleMarker], user_value: f64, pad: f64) -> ScaleLayout {
    let low = markers
        .iter()
        .map(|m| m.value)
        .fold(user_value, f64::min);
    let high = markers
        .iter()
        .map(|m| m.value)
        .fold(user_value, f64::max);

    let scale_start = low - pad;
    let scale_end = high + pad;

    let positions = markers
        .iter()
        .map(|m| MarkerPosition {
            tag: m.tag.clone(),
            value: m.value,
            percent: percent_between(scale_start, scale_end, m.value),
        })
        .collect();

    ScaleLayout {
        scale_start,
        scale_end,
        positions,
        user: MarkerPosition {
            tag: USER_TAG.to_string(),
            value: user_value,
            percent: percent_between(scale_start, scale_end, user_value),
        },
    }
}

/// Cell index for `percent` on a track `width` cells wide.
pub fn column(percent: f64, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let last = (width - 1) as f64;
    let percent = if percent.is_finite() { percent } else { 50.0 };
    (percent.clamp(0.0, 100.0) / 100.0 * last).round() as usize
}

/// Scale of the 50/70/100 percent thresholds against a grant score.
pub fn grant_scale(threshold: &GrantThreshold, grant_score: f64, pad: f64) -> ScaleLayout {
    let markers: Vec<ScaleMarker> = threshold
        .tiers()
        .iter()
        .map(|(amount, value)| ScaleMarker::new(*value, format!("{}%", amount)))
        .collect();
    layout(&markers, grant_score, pad)
}

/// Scale of a faculty's min/max admitted scores against the contest score.
/// Only drawn when both bounds are known.
pub fn enrollment_scale(
    thresholds: &EnrollmentThresholds,
    contest_score: f64,
    pad: f64,
) -> Option<ScaleLayout> {
    let min = thresholds.min_score?;
    let max = thresholds.max_score?;
    let markers = [ScaleMarker::new(min, "min"), ScaleMarker::new(max, "max")];
    Some(layout(&markers, contest_score, pad))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn test_layout_bounds_and_user_position() {
        let markers = [ScaleMarker::new(5807.5, "50%"), ScaleMarker::new(6014.5, "70%")];
        let scale = layout(&markers, 6400.0, GRANT_SCALE_PAD);

        assert_eq!(scale.scale_start, 5507.5);
        assert_eq!(scale.scale_end, 6700.0);
        assert!(approx(scale.user.percent, 74.86, 0.05), "{}", scale.user.percent);
        assert!(approx(scale.position("50%").unwrap(), 25.16, 0.05));
    }

    #[test]
    fn test_user_below_all_markers_extends_start() {
        let markers = [ScaleMarker::new(700.0, "min"), ScaleMarker::new(900.0, "max")];
        let scale = layout(&markers, 600.0, ENROLLMENT_SCALE_PAD);
        assert_eq!(scale.scale_start, 450.0);
        assert_eq!(scale.scale_end, 1050.0);
        assert!(approx(scale.user.percent, 25.0, 1e-9));
    }

    #[test]
    fn test_zero_width_scale_is_midpoint() {
        let markers = [ScaleMarker::new(500.0, "min"), ScaleMarker::new(500.0, "max")];
        let scale = layout(&markers, 500.0, 0.0);
        assert_eq!(scale.user.percent, 50.0);
        assert_eq!(scale.position("min"), Some(50.0));
        assert_eq!(scale.percent_of(123.0), 50.0);
    }

    #[test]
    fn test_positions_stay_in_range() {
        let markers = [
            ScaleMarker::new(-20.0, "a"),
            ScaleMarker::new(1e6, "b"),
            ScaleMarker::new(3.5, "c"),
        ];
        let scale = layout(&markers, 42.0, 10.0);
        for p in scale.all_positions() {
            assert!((0.0..=100.0).contains(&p.percent), "{} {}", p.tag, p.percent);
        }
        assert_eq!(scale.percent_of(-1e9), 0.0);
        assert_eq!(scale.percent_of(1e9), 100.0);
    }

    #[test]
    fn test_position_unknown_tag() {
        let scale = layout(&[], 10.0, 5.0);
        assert_eq!(scale.position("missing"), None);
        assert_eq!(scale.position(USER_TAG), Some(50.0));
    }

    #[test]
    fn test_column_rasterisation() {
        assert_eq!(column(0.0, 41), 0);
        assert_eq!(column(100.0, 41), 40);
        assert_eq!(column(50.0, 41), 20);
        assert_eq!(column(250.0, 10), 9);
        assert_eq!(column(f64::NAN, 11), 5);
        assert_eq!(column(30.0, 0), 0);
    }

    #[test]
    fn test_grant_scale_tags() {
        let threshold = GrantThreshold {
            year: 2024,
            p50: 5800.0,
            p70: 6000.0,
            p100: 6300.0,
        };
        let scale = grant_scale(&threshold, 6100.0, GRANT_SCALE_PAD);
        let tags: Vec<_> = scale.positions.iter().map(|p| p.tag.as_str()).collect();
        assert_eq!(tags, vec!["50%", "70%", "100%"]);
        assert_eq!(scale.scale_start, 5500.0);
        assert_eq!(scale.scale_end, 6600.0);
    }

    #[test]
    fn test_enrollment_scale_needs_both_bounds() {
        let partial = EnrollmentThresholds {
            min_score: Some(700.0),
            max_score: None,
        };
        assert!(enrollment_scale(&partial, 800.0, ENROLLMENT_SCALE_PAD).is_none());

        let full = EnrollmentThresholds {
            min_score: Some(700.0),
            max_score: Some(900.0),
        };
        let scale = enrollment_scale(&full, 800.0, ENROLLMENT_SCALE_PAD).unwrap();
        assert_eq!(scale.position("min").map(|p| p.round()), Some(30.0));
        assert_eq!(scale.position("max").map(|p| p.round()), Some(70.0));
    }
}
