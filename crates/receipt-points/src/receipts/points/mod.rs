mod rules;

use serde::Serialize;

use super::domain::Receipt;

/// The independent scoring rules, in the order they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointRule {
    RetailerName,
    RoundDollar,
    QuarterMultiple,
    ItemPairs,
    ItemDescription,
    OddDay,
    AfternoonPurchase,
}

impl PointRule {
    pub const ALL: [PointRule; 7] = [
        PointRule::RetailerName,
        PointRule::RoundDollar,
        PointRule::QuarterMultiple,
        PointRule::ItemPairs,
        PointRule::ItemDescription,
        PointRule::OddDay,
        PointRule::AfternoonPurchase,
    ];
}

/// What a single rule contributed, with a note for audit logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleAward {
    pub rule: PointRule,
    pub points: u64,
    pub notes: String,
}

/// Per-rule awards plus their sum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PointsBreakdown {
    pub awards: Vec<RuleAward>,
    pub total: u64,
}

impl PointsBreakdown {
    pub fn points_for(&self, rule: PointRule) -> u64 {
        self.awards
            .iter()
            .filter(|award| award.rule == rule)
            .map(|award| award.points)
            .sum()
    }
}

/// Scores a validated receipt. Pure and infallible.
pub fn score(receipt: &Receipt) -> PointsBreakdown {
    let awards: Vec<RuleAward> = PointRule::ALL
        .iter()
        .map(|rule| rules::apply(*rule, receipt))
        .collect();
    let total = awards
        .iter()
        .fold(0u64, |sum, award| sum.saturating_add(award.points));

    PointsBreakdown { awards, total }
}
