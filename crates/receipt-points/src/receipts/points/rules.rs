use chrono::{Datelike, Timelike};
use super::super::domain::{Receipt, ReceiptItem};
use super::{PointRule, RuleAward};

const ROUND_DOLLAR_POINTS: u64 = 50;
const QUARTER_MULTIPLE_POINTS: u64 = 25;
const POINTS_PER_ITEM_PAIR: u64 = 5;
const ODD_DAY_POINTS: u64 = 6;
const AFTERNOON_POINTS: u64 = 10;
const DESCRIPTION_LENGTH_MULTIPLE: usize = 3;

const CENTS_PER_QUARTER: u64 = 25;
// 20% of the price, rounded up to a whole point: ceil(cents / 500).
const CENTS_PER_DESCRIPTION_POINT: u64 = 500;

// Exclusive bounds, in minutes after midnight (14:00 and 16:00).
const AFTERNOON_START_MINUTE: u32 = 14 * 60;
const AFTERNOON_END_MINUTE: u32 = 16 * 60;

pub(super) fn apply(rule: PointRule, receipt: &Receipt) -> RuleAward {
    match rule {
        PointRule::RetailerName => retailer_name(receipt),
        PointRule::RoundDollar => round_dollar(receipt),
        PointRule::QuarterMultiple => quarter_multiple(receipt),
        PointRule::ItemPairs => item_pairs(receipt),
        PointRule::ItemDescription => item_descriptions(receipt),
        PointRule::OddDay => odd_day(receipt),
        PointRule::AfternoonPurchase => afternoon_purchase(receipt),
    }
}

fn retailer_name(receipt: &Receipt) -> RuleAward {
    let alphanumeric = receipt
        .retailer()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .count() as u64;

    RuleAward {
        rule: PointRule::RetailerName,
        points: alphanumeric,
        notes: format!(
            "{alphanumeric} alphanumeric character(s) in '{}'",
            receipt.retailer()
        ),
    }
}

fn round_dollar(receipt: &Receipt) -> RuleAward {
    let total = receipt.total();
    if total.is_whole_dollar() {
        RuleAward {
            rule: PointRule::RoundDollar,
            points: ROUND_DOLLAR_POINTS,
            notes: format!("total {total} is a round dollar amount"),
        }
    } else {
        RuleAward {
            rule: PointRule::RoundDollar,
            points: 0,
            notes: format!("total {total} has cents"),
        }
    }
}

fn quarter_multiple(receipt: &Receipt) -> RuleAward {
    let total = receipt.total();
    let on_quarter = total.cents() % CENTS_PER_QUARTER == 0;

    RuleAward {
        rule: PointRule::QuarterMultiple,
        points: if on_quarter { QUARTER_MULTIPLE_POINTS } else { 0 },
        notes: if on_quarter {
            format!("total {total} is a multiple of 0.25")
        } else {
            format!("total {total} is not a multiple of 0.25")
        },
    }
}

fn item_pairs(receipt: &Receipt) -> RuleAward {
    let count = receipt.items().len() as u64;
    let pairs = count / 2;

    RuleAward {
        rule: PointRule::ItemPairs,
        points: pairs.saturating_mul(POINTS_PER_ITEM_PAIR),
        notes: format!("{count} item(s) make {pairs} complete pair(s)"),
    }
}

fn item_descriptions(receipt: &Receipt) -> RuleAward {
    let mut points: u64 = 0;
    let mut qualifying = 0usize;

    for item in receipt.items() {
        if let Some(item_points) = description_points(item) {
            qualifying += 1;
            points = points.saturating_add(item_points);
        }
    }

    RuleAward {
        rule: PointRule::ItemDescription,
        points,
        notes: format!(
            "{qualifying} of {} description(s) have a trimmed length divisible by {}",
            receipt.items().len(),
            DESCRIPTION_LENGTH_MULTIPLE
        ),
    }
}

/// `ceil(price * 0.2)` when the trimmed description length is a positive multiple of three.
fn description_points(item: &ReceiptItem) -> Option<u64> {
    let trimmed_len = item.short_description().trim().chars().count();
    if trimmed_len == 0 || trimmed_len % DESCRIPTION_LENGTH_MULTIPLE != 0 {
        return None;
    }

    Some(item.price().cents().div_ceil(CENTS_PER_DESCRIPTION_POINT))
}

fn odd_day(receipt: &Receipt) -> RuleAward {
    let date = receipt.purchase_date();
    let odd = date.day() % 2 == 1;

    RuleAward {
        rule: PointRule::OddDay,
        points: if odd { ODD_DAY_POINTS } else { 0 },
        notes: format!(
            "purchased on day {} ({})",
            date.day(),
            if odd { "odd" } else { "even" }
        ),
    }
}

fn afternoon_purchase(receipt: &Receipt) -> RuleAward {
    let time = receipt.purchase_time();
    let minute_of_day = time.hour() * 60 + time.minute();
    let inside = minute_of_day > AFTERNOON_START_MINUTE && minute_of_day < AFTERNOON_END_MINUTE;

    RuleAward {
        rule: PointRule::AfternoonPurchase,
        points: if inside { AFTERNOON_POINTS } else { 0 },
        notes: format!(
            "purchased at {} ({} the 14:00-16:00 window)",
            time.format("%H:%M"),
            if inside { "inside" } else { "outside" }
        ),
    }
}
