// src/application/dto/mod.rs
// Interchange format of the extraction step

pub mod parser;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::errors::StorageError;
use crate::domain::models::{
    Bound, BoundField, TradeDirection, TradePayload, ValidationIssue, INVALID_INPUT,
};

pub use parser::{parse_input_line, parse_payload_json, InputLine};

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Payload has no transType")]
    MissingDirection,

    #[error("Unknown transType: {0}")]
    UnknownDirection(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Trade payload as exchanged with the extraction step and downstream consumers.
///
/// Every field is optional on input. Numeric fields accept strings or JSON
/// numbers; on output they are always strings, `"Invalid Input"` included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePayloadDto {
    pub trans_type: Option<String>,
    pub trading_symbol: Option<String>,
    pub expiry_date: Option<String>,
    pub price_lower_bound: Option<Bound>,
    pub price_upper_bound: Option<Bound>,
    pub target_lower_bound: Option<Bound>,
    pub target_upper_bound: Option<Bound>,
    pub stoploss_lower_bound: Option<Bound>,
    pub stoploss_upper_bound: Option<Bound>,
}

/// Typed payload plus the fields that had to be defaulted
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPayload {
    pub payload: TradePayload,
    pub missing: Vec<ValidationIssue>,
}

impl TradePayloadDto {
    /// Convert to the typed model, defaulting absent fields to the sentinel.
    pub fn decode(&self) -> Result<DecodedPayload, ApplicationError> {
        let trans_type = match self.trans_type.as_deref() {
            None => return Err(ApplicationError::MissingDirection),
            Some(raw) => raw
                .parse::<TradeDirection>()
                .map_err(|_| ApplicationError::UnknownDirection(raw.to_string()))?,
        };

        let mut missing = Vec::new();
        let mut text = |value: &Option<String>, field: &str| match value {
            Some(v) => v.clone(),
            None => {
                missing.push(missing_field(field));
                INVALID_INPUT.to_string()
            }
        };
        let trading_symbol = text(&self.trading_symbol, "tradingSymbol");
        let expiry_date = text(&self.expiry_date, "expiryDate");

        let mut bound = |value: Option<Bound>, field: &str| {
            value.unwrap_or_else(|| {
                missing.push(missing_field(field));
                Bound::Invalid
            })
        };
        let price = BoundField::new(
            bound(self.price_lower_bound, "priceLowerBound"),
            bound(self.price_upper_bound, "priceUpperBound"),
        );
        let target = BoundField::new(
            bound(self.target_lower_bound, "targetLowerBound"),
            bound(self.target_upper_bound, "targetUpperBound"),
        );
        let stoploss = BoundField::new(
            bound(self.stoploss_lower_bound, "stoplossLowerBound"),
            bound(self.stoploss_upper_bound, "stoplossUpperBound"),
        );

        Ok(DecodedPayload {
            payload: TradePayload {
                trans_type,
                trading_symbol,
                expiry_date,
                price,
                target,
                stoploss,
            },
            missing,
        })
    }
}

fn missing_field(field: &str) -> ValidationIssue {
    log::debug!("Field {} missing, defaulting to {:?}", field, INVALID_INPUT);
    ValidationIssue::MissingField {
        field: field.to_string(),
    }
}

impl From<&TradePayload> for TradePayloadDto {
    fn from(payload: &TradePayload) -> Self {
        Self {
            trans_type: Some(payload.trans_type.to_string()),
            trading_symbol: Some(payload.trading_symbol.clone()),
            expiry_date: Some(payload.expiry_date.clone()),
            price_lower_bound: Some(payload.price.lower_bound),
            price_upper_bound: Some(payload.price.upper_bound),
            target_lower_bound: Some(payload.target.lower_bound),
            target_upper_bound: Some(payload.target.upper_bound),
            stoploss_lower_bound: Some(payload.stoploss.lower_bound),
            stoploss_upper_bound: Some(payload.stoploss.upper_bound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_complete_payload() {
        let dto: TradePayloadDto = serde_json::from_value(json!({
            "transType": "Buy",
            "tradingSymbol": "NIFTY 23000 CE",
            "expiryDate": "2025-07-01",
            "priceLowerBound": "160",
            "priceUpperBound": "160",
            "targetLowerBound": "200",
            "targetUpperBound": "220",
            "stoplossLowerBound": "110",
            "stoplossUpperBound": "120"
        }))
        .unwrap();

        let decoded = dto.decode().unwrap();
        assert!(decoded.missing.is_empty());
        assert_eq!(decoded.payload.trans_type, TradeDirection::Buy);
        assert_eq!(decoded.payload.price, BoundField::both(160));
        assert_eq!(decoded.payload.target, BoundField::from((200, 220)));
        assert_eq!(decoded.payload.stoploss, BoundField::from((110, 120)));
    }

    #[test]
    fn absent_fields_become_invalid_and_are_reported() {
        let dto: TradePayloadDto = serde_json::from_value(json!({
            "transType": "sell",
            "tradingSymbol": "TATAMOTORS",
            "priceLowerBound": 1500,
            "priceUpperBound": 1500,
            "targetLowerBound": "Invalid Input",
            "targetUpperBound": "abc"
        }))
        .unwrap();

        let decoded = dto.decode().unwrap();
        let payload = decoded.payload;
        assert_eq!(payload.trans_type, TradeDirection::Sell);
        assert_eq!(payload.expiry_date, INVALID_INPUT);
        assert_eq!(payload.price, BoundField::both(1500));
        assert_eq!(payload.target, BoundField::invalid());
        assert_eq!(payload.stoploss, BoundField::invalid());

        let fields: Vec<String> = decoded
            .missing
            .iter()
            .map(|issue| match issue {
                ValidationIssue::MissingField { field } => field.clone(),
                other => panic!("unexpected issue {:?}", other),
            })
            .collect();
        assert_eq!(
            fields,
            vec!["expiryDate", "stoplossLowerBound", "stoplossUpperBound"]
        );
    }

    #[test]
    fn null_bounds_count_as_missing() {
        let dto: TradePayloadDto = serde_json::from_value(json!({
            "transType": "Buy",
            "tradingSymbol": "SBIN",
            "expiryDate": "",
            "priceLowerBound": "600",
            "priceUpperBound": "600",
            "targetLowerBound": null,
            "targetUpperBound": "620",
            "stoplossLowerBound": "590",
            "stoplossUpperBound": "595"
        }))
        .unwrap();

        let decoded = dto.decode().unwrap();
        assert_eq!(
            decoded.payload.target,
            BoundField::new(Bound::Invalid, Bound::Valid(620))
        );
        assert_eq!(
            decoded.missing,
            vec![ValidationIssue::MissingField {
                field: "targetLowerBound".to_string()
            }]
        );
    }

    #[test]
    fn direction_is_required() {
        let dto = TradePayloadDto::default();
        assert!(matches!(
            dto.decode(),
            Err(ApplicationError::MissingDirection)
        ));

        let dto = TradePayloadDto {
            trans_type: Some("Hold".to_string()),
            ..Default::default()
        };
        match dto.decode() {
            Err(ApplicationError::UnknownDirection(raw)) => assert_eq!(raw, "Hold"),
            other => panic!("expected UnknownDirection, got {:?}", other),
        }
    }

    #[test]
    fn encodes_sentinel_as_text() {
        let payload = TradePayload {
            trans_type: TradeDirection::Buy,
            trading_symbol: "SBIN".to_string(),
            expiry_date: "".to_string(),
            price: BoundField::both(600),
            target: BoundField::invalid(),
            stoploss: BoundField::from((595, 605)),
        };

        let value = serde_json::to_value(TradePayloadDto::from(&payload)).unwrap();
        assert_eq!(
            value,
            json!({
                "transType": "Buy",
                "tradingSymbol": "SBIN",
                "expiryDate": "",
                "priceLowerBound": "600",
                "priceUpperBound": "600",
                "targetLowerBound": "Invalid Input",
                "targetUpperBound": "Invalid Input",
                "stoplossLowerBound": "595",
                "stoplossUpperBound": "605"
            })
        );
    }
}
