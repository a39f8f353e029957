use crate::api::types::YearlyGrants;
use crate::catalog::Subject;
use std::cmp::Ordering;

/// One elective's grant result for one exam year.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantOutcome {
    pub year: u16,
    pub subject: Subject,
    pub grant_amount: Option<u32>,
    pub grant_score: f64,
}

impl GrantOutcome {
    /// Amount used for ranking; no grant ranks as 0.
    pub fn ranking_amount(&self) -> u32 {
        self.grant_amount.unwrap_or(0)
    }

    pub fn amount_label(&self) -> String {
        format!("{}%", self.ranking_amount())
    }
}

fn by_amount_then_score(a: &GrantOutcome, b: &GrantOutcome) -> Ordering {
    b.ranking_amount()
        .cmp(&a.ranking_amount())
        .then_with(|| b.grant_score.partial_cmp(&a.grant_score).unwrap_or(Ordering::Equal))
}

/// Sorted copy: amount descending, then score descending.
pub fn rank_outcomes(outcomes: &[GrantOutcome]) -> Vec<GrantOutcome> {
    let mut ranked = outcomes.to_vec();
    ranked.sort_by(by_amount_then_score);
    ranked
}

/// The winning subject of a two-elective year, or `None` when there is
/// nothing to compare.
pub fn best_grant(outcomes: &[GrantOutcome]) -> Option<Subject> {
    if outcomes.len() != 2 {
        return None;
    }
    rank_outcomes(outcomes).first().map(|o| o.subject)
}

/// Grant results of one year, in service order, with the highlighted winner.
#[derive(Debug, Clone, PartialEq)]
pub struct GrantYear {
    pub year: u16,
    pub outcomes: Vec<GrantOutcome>,
    pub best: Option<Subject>,
}

impl GrantYear {
    pub fn is_best(&self, subject: Subject) -> bool {
        self.best == Some(subject)
    }
}

pub fn group_by_year(grants: &[YearlyGrants]) -> Vec<GrantYear> {
    grants
        .iter()
        .map(|yearly| {
            let outcomes: Vec<GrantOutcome> = yearly
                .grants
                .iter()
                .map(|g| GrantOutcome {
                    year: yearly.year,
                    subject: g.subject,
                    grant_amount: g.grant_amount,
                    grant_score: g.grant_score,
                })
                .collect();
            let best = best_grant(&outcomes);
            GrantYear {
                year: yearly.year,
                outcomes,
                best,
            }
        })
        .collect()
}

/// `(year, winner)` for every year in the response.
pub fn best_grant_per_year(grants: &[YearlyGrants]) -> Vec<(u16, Option<Subject>)> {
    group_by_year(grants)
        .into_iter()
        .map(|y| (y.year, y.best))
        .collect()
}
