//! Payment models

use crate::error::{PaymentError, PaymentResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every intent is charged in US dollars.
pub const CURRENCY: &str = "usd";

/// Payment method accepted for rent.
pub const CARD: &str = "card";

/// A rent amount in minor units (cents), at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RentAmount(i64);

impl RentAmount {
    /// Validate a major-unit amount and convert it to cents with `round(amount * 100)`.
    pub fn from_major(amount: f64) -> PaymentResult<Self> {
        if amount == 0.0 || !amount.is_finite() {
            return Err(PaymentError::InvalidAmount(format!(
                "rent must be a non-zero number, got {amount}"
            )));
        }

        let minor = (amount * 100.0).round();
        if minor < 1.0 {
            return Err(PaymentError::InvalidAmount(format!(
                "rent {amount} is less than one cent"
            )));
        }
        if minor >= i64::MAX as f64 {
            return Err(PaymentError::InvalidAmount(format!("rent {amount} is too large")));
        }

        Ok(Self(minor as i64))
    }

    /// Accepts a JSON number or a numeric string such as `"25"` or `" 12.5 "`.
    /// Anything else, including `null`, `""` and `0`, is rejected.
    pub fn from_json(value: &Value) -> PaymentResult<Self> {
        let amount = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };

        match amount {
            Some(amount) => Self::from_major(amount),
            None => Err(PaymentError::InvalidAmount(format!(
                "rent must be numeric, got {value}"
            ))),
        }
    }

    pub fn minor_units(&self) -> i64 {
        self.0
    }
}

/// Parameters of one single-use payment intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentIntentRequest {
    pub amount: i64,
    pub currency: String,
    pub payment_method_types: Vec<String>,
}

impl PaymentIntentRequest {
    /// Card-only intent in [`CURRENCY`].
    pub fn card(amount: RentAmount) -> Self {
        Self {
            amount: amount.minor_units(),
            currency: CURRENCY.to_string(),
            payment_method_types: vec![CARD.to_string()],
        }
    }

    /// Form fields in the bracketed array notation the Stripe API expects.
    pub fn form_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), self.amount.to_string()),
            ("currency".to_string(), self.currency.clone()),
        ];
        params.extend(
            self.payment_method_types
                .iter()
                .enumerate()
                .map(|(i, method)| (format!("payment_method_types[{i}]"), method.clone())),
        );
        params
    }
}

/// The subset of a created intent the service needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_major_units_are_rounded_to_cents() {
        assert_eq!(RentAmount::from_major(25.0).unwrap().minor_units(), 2500);
        assert_eq!(RentAmount::from_major(19.99).unwrap().minor_units(), 1999);
        assert_eq!(RentAmount::from_major(0.01).unwrap().minor_units(), 1);
        assert_eq!(RentAmount::from_major(0.005).unwrap().minor_units(), 1);
    }

    #[test]
    fn test_amounts_below_one_cent_are_rejected() {
        for amount in [0.0, -5.0, 0.004, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(RentAmount::from_major(amount), Err(PaymentError::InvalidAmount(_))),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn test_json_amounts() {
        assert_eq!(RentAmount::from_json(&json!(25)).unwrap().minor_units(), 2500);
        assert_eq!(RentAmount::from_json(&json!("25")).unwrap().minor_units(), 2500);
        assert_eq!(RentAmount::from_json(&json!(" 12.5 ")).unwrap().minor_units(), 1250);

        for value in [json!(null), json!(""), json!(0), json!("abc"), json!(true), json!([25])] {
            assert!(RentAmount::from_json(&value).is_err(), "{value} should be rejected");
        }
    }

    #[test]
    fn test_card_request_form_params() {
        let request = PaymentIntentRequest::card(RentAmount::from_major(25.0).unwrap());

        assert_eq!(
            request.form_params(),
            vec![
                ("amount".to_string(), "2500".to_string()),
                ("currency".to_string(), "usd".to_string()),
                ("payment_method_types[0]".to_string(), "card".to_string()),
            ]
        );
    }

    #[test]
    fn test_payment_intent_ignores_unknown_fields() {
        let intent: PaymentIntent = serde_json::from_value(json!({
            "id": "pi_123",
            "object": "payment_intent",
            "amount": 2500,
            "client_secret": "pi_123_secret_abc",
            "status": "requires_payment_method"
        }))
        .unwrap();

        assert_eq!(intent.client_secret, "pi_123_secret_abc");
        assert_eq!(intent.status.as_deref(), Some("requires_payment_method"));
    }
}
