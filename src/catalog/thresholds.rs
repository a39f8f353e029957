use super::subjects::Subject;

/// Exam years covered by the reference tables and the faculty search.
pub const EXAM_YEARS: [u16; 4] = [2021, 2022, 2023, 2024];

/// Lowest grant score that earned each grant tier in a given year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrantThreshold {
    pub year: u16,
    pub p50: f64,
    pub p70: f64,
    pub p100: f64,
}

impl GrantThreshold {
    /// (tier percentage, cut point) in ascending tier order
    pub fn tiers(&self) -> [(u32, f64); 3] {
        [(50, self.p50), (70, self.p70), (100, self.p100)]
    }
}

const fn t(year: u16, p50: f64, p70: f64, p100: f64) -> GrantThreshold {
    GrantThreshold {
        year,
        p50,
        p70,
        p100,
    }
}

const BIOLOGY: [GrantThreshold; 4] = [
    t(2021, 5807.5, 5940.0, 6014.5),
    t(2022, 5719.5, 5907.0, 5992.0),
    t(2023, 5752.0, 5934.0, 6030.0),
    t(2024, 5736.0, 5937.5, 6038.0),
];

const CHEMISTRY: [GrantThreshold; 4] = [
    t(2021, 5774.5, 5970.5, 6031.5),
    t(2022, 5638.0, 5886.0, 5981.0),
    t(2023, 5686.5, 5920.5, 6010.0),
    t(2024, 5651.5, 5932.5, 6030.5),
];

const HISTORY: [GrantThreshold; 4] = [
    t(2021, 5747.5, 5963.5, 6077.5),
    t(2022, 5810.5, 5990.5, 6086.0),
    t(2023, 5804.0, 5966.5, 6060.0),
    t(2024, 5801.5, 6008.0, 6109.0),
];

const MATHEMATICS: [GrantThreshold; 4] = [
    t(2021, 5623.0, 5932.0, 6106.0),
    t(2022, 5713.5, 5964.5, 6102.0),
    t(2023, 5713.5, 5986.0, 6141.5),
    t(2024, 5668.0, 5971.0, 6155.0),
];

const PHYSICS: [GrantThreshold; 4] = [
    t(2021, 4922.0, 5562.0, 5896.5),
    t(2022, 4769.0, 5116.5, 5651.0),
    t(2023, 4853.0, 5566.0, 5826.0),
    t(2024, 4920.0, 5638.0, 5866.0),
];

/// All yearly thresholds for a subject; empty for the language subjects.
pub fn thresholds_for(subject: Subject) -> &'static [GrantThreshold] {
    match subject {
        Subject::Biology => &BIOLOGY,
        Subject::Chemistry => &CHEMISTRY,
        Subject::History => &HISTORY,
        Subject::Mathematics => &MATHEMATICS,
        Subject::Physics => &PHYSICS,
        Subject::GeorgianLanguage | Subject::ForeignLanguage => &[],
    }
}

pub fn threshold(subject: Subject, year: u16) -> Option<&'static GrantThreshold> {
    thresholds_for(subject).iter().find(|t| t.year == year)
}
