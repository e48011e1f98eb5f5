// src/domain/validator.rs
// Direction-aware consistency checks for target and stop-loss ranges

use crate::domain::models::{
    BoundField, BoundKind, TradeDirection, TradePayload, ValidationIssue, ValidationReport,
};

/// Pairs that carry a direction rule. Price passes through unchecked.
const CHECKED_BOUNDS: [BoundKind; 2] = [BoundKind::Target, BoundKind::Stoploss];

/// Whether `lower`/`upper` are ordered the way `direction` requires.
///
/// Buy ranges ascend, sell ranges descend. Equal bounds satisfy both.
pub fn direction_allows(direction: TradeDirection, lower: i64, upper: i64) -> bool {
    match direction {
        TradeDirection::Buy => lower <= upper,
        TradeDirection::Sell => lower >= upper,
    }
}

/// Stateless validator for extracted trade payloads.
///
/// Each checked pair is either accepted exactly as given or replaced by two
/// `Invalid` bounds. Values are never swapped or corrected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadValidator;

impl PayloadValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a payload, returning the corrected copy
    pub fn validate(&self, payload: TradePayload) -> TradePayload {
        self.validate_with_report(payload).payload
    }

    /// Validate a payload and report every rule that fired
    pub fn validate_with_report(&self, mut payload: TradePayload) -> ValidationReport {
        let direction = payload.trans_type;
        let mut issues = Vec::new();

        for kind in CHECKED_BOUNDS {
            let field = payload.bound_mut(kind);
            if let Some(issue) = check_pair(direction, kind, field) {
                log::warn!(
                    "{} {}: {}, both bounds invalidated",
                    direction,
                    payload.trading_symbol,
                    issue
                );
                issues.push(issue);
            }
        }

        if issues.is_empty() {
            log::debug!("{} {}: payload consistent", direction, payload.trading_symbol);
        }

        ValidationReport { payload, issues }
    }
}

/// Apply the presence and ordering rules to one pair in place.
fn check_pair(
    direction: TradeDirection,
    kind: BoundKind,
    field: &mut BoundField,
) -> Option<ValidationIssue> {
    if field.is_partial() {
        *field = BoundField::invalid();
        return Some(ValidationIssue::PartialBound { bound: kind });
    }

    let (lower, upper) = field.values()?;
    if direction_allows(direction, lower, upper) {
        return None;
    }

    *field = BoundField::invalid();
    Some(ValidationIssue::DirectionViolation {
        bound: kind,
        direction,
        lower,
        upper,
    })
}
