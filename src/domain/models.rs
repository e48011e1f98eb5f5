// src/domain/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Text the extraction step emits in place of a number it could not produce.
pub const INVALID_INPUT: &str = "Invalid Input";

/// Declared direction of a trade call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeDirection {
    Buy,
    Sell,
}

impl TradeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradeDirection::Buy => "Buy",
            TradeDirection::Sell => "Sell",
        }
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TradeDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(TradeDirection::Buy),
            "sell" => Ok(TradeDirection::Sell),
            other => Err(format!("unknown trade direction: {:?}", other)),
        }
    }
}

impl Serialize for TradeDirection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TradeDirection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One side of a price range: a usable integer or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bound {
    Valid(i64),
    #[default]
    Invalid,
}

impl Bound {
    /// Parse a textual bound. Anything that is not a whole number is `Invalid`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == INVALID_INPUT {
            return Bound::Invalid;
        }
        trimmed.parse::<i64>().map(Bound::Valid).unwrap_or(Bound::Invalid)
    }

    /// Interpret an arbitrary JSON value as a bound.
    ///
    /// Strings go through [`Bound::parse`]. Integers are taken as-is, floats only
    /// when they carry no fractional part and fit in an `i64`. Everything else
    /// (null, booleans, arrays, objects) is `Invalid`.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Bound::parse(s),
            serde_json::Value::Number(n) => {
                if let Some(v) = n.as_i64() {
                    Bound::Valid(v)
                } else if let Some(f) = n.as_f64() {
                    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                        Bound::Valid(f as i64)
                    } else {
                        Bound::Invalid
                    }
                } else {
                    Bound::Invalid
                }
            }
            _ => Bound::Invalid,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Bound::Valid(_))
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Bound::Valid(v) => write!(f, "{}", v),
            Bound::Invalid => write!(f, "{}", INVALID_INPUT),
        }
    }
}

impl Serialize for Bound {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Bound::from_json(&value))
    }
}

/// A (lower, upper) pair of bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundField {
    pub lower_bound: Bound,
    pub upper_bound: Bound,
}

impl BoundField {
    pub fn new(lower_bound: Bound, upper_bound: Bound) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }

    /// Both sides set to the same value, as for a single quoted price.
    pub fn both(value: i64) -> Self {
        Self::new(Bound::Valid(value), Bound::Valid(value))
    }

    pub fn invalid() -> Self {
        Self::new(Bound::Invalid, Bound::Invalid)
    }

    /// Both sides usable.
    pub fn values(&self) -> Option<(i64, i64)> {
        match (self.lower_bound, self.upper_bound) {
            (Bound::Valid(lo), Bound::Valid(hi)) => Some((lo, hi)),
            _ => None,
        }
    }

    /// Exactly one side usable.
    pub fn is_partial(&self) -> bool {
        self.lower_bound.is_valid() != self.upper_bound.is_valid()
    }

    pub fn is_invalid(&self) -> bool {
        !self.lower_bound.is_valid() && !self.upper_bound.is_valid()
    }
}

impl From<(i64, i64)> for BoundField {
    fn from((lo, hi): (i64, i64)) -> Self {
        Self::new(Bound::Valid(lo), Bound::Valid(hi))
    }
}

/// Which bound pair of a payload a rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundKind {
    Target,
    Stoploss,
}

impl fmt::Display for BoundKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoundKind::Target => write!(f, "target"),
            BoundKind::Stoploss => write!(f, "stoploss"),
        }
    }
}

/// Structured trade call as produced by the extraction step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePayload {
    pub trans_type: TradeDirection,
    pub trading_symbol: String,
    pub expiry_date: String,
    pub price: BoundField,
    pub target: BoundField,
    pub stoploss: BoundField,
}

impl TradePayload {
    pub fn bound_mut(&mut self, kind: BoundKind) -> &mut BoundField {
        match kind {
            BoundKind::Target => &mut self.target,
            BoundKind::Stoploss => &mut self.stoploss,
        }
    }
}

/// A rule that fired while reading or validating a payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationIssue {
    /// Field absent from the input, defaulted before validation
    MissingField { field: String },

    /// One side of the pair usable, the other not
    PartialBound { bound: BoundKind },

    /// Ordering contradicts the trade direction
    DirectionViolation {
        bound: BoundKind,
        direction: TradeDirection,
        lower: i64,
        upper: i64,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => write!(f, "missing field {}", field),
            ValidationIssue::PartialBound { bound } => {
                write!(f, "{} has only one usable bound", bound)
            }
            ValidationIssue::DirectionViolation {
                bound,
                direction,
                lower,
                upper,
            } => write!(
                f,
                "{} {}/{} contradicts {} direction",
                bound, lower, upper, direction
            ),
        }
    }
}

/// Validated payload together with the rules that fired on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub payload: TradePayload,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Trade call waiting to be stored
#[derive(Debug, Clone)]
pub struct NewTradeCall {
    pub payload: TradePayload,
    pub original_input: String,
    pub issues: Vec<ValidationIssue>,
}

/// Stored trade call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCall {
    pub id: u64,
    pub payload: TradePayload,
    pub original_input: String,
    pub issues: Vec<ValidationIssue>,
    pub created_at: DateTime<Utc>,
}

impl TradeCall {
    pub fn from_new(id: u64, new: NewTradeCall) -> Self {
        Self {
            id,
            payload: new.payload,
            original_input: new.original_input,
            issues: new.issues,
            created_at: Utc::now(),
        }
    }
}

/// One page of stored trade calls, newest first
#[derive(Debug, Clone, PartialEq)]
pub struct TradeCallPage {
    pub trade_calls: Vec<TradeCall>,
    pub total: usize,
    pub has_more: bool,
}
