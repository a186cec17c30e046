//! Card-on-file details attached to paid plans
//!
//! The tracker never drives a payment flow itself; a record of payment
//! details is the durable result of an already-authorized purchase.

use serde::{Deserialize, Serialize};

const DEFAULT_CARD_LAST4: &str = "1234";
const DEFAULT_CARD_BRAND: &str = "Visa";
const DEFAULT_EXPIRY_MONTH: u8 = 12;
const DEFAULT_EXPIRY_YEAR: u16 = 2025;

/// Payment details stored on a paid-plan record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub card_last4: String,
    pub card_brand: String,
    pub expiry_month: u8,
    pub expiry_year: u16,
}

/// Payment details as supplied by the caller. Missing fields are filled from
/// placeholder defaults rather than rejecting the call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsInput {
    pub card_last4: Option<String>,
    pub card_brand: Option<String>,
    pub expiry_month: Option<u8>,
    pub expiry_year: Option<u16>,
}

impl PaymentDetails {
    pub fn from_input(input: PaymentDetailsInput) -> Self {
        Self {
            card_last4: input
                .card_last4
                .unwrap_or_else(|| DEFAULT_CARD_LAST4.to_string()),
            card_brand: input
                .card_brand
                .unwrap_or_else(|| DEFAULT_CARD_BRAND.to_string()),
            expiry_month: input.expiry_month.unwrap_or(DEFAULT_EXPIRY_MONTH),
            expiry_year: input.expiry_year.unwrap_or(DEFAULT_EXPIRY_YEAR),
        }
    }
}

impl From<PaymentDetailsInput> for PaymentDetails {
    fn from(input: PaymentDetailsInput) -> Self {
        Self::from_input(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_fills_placeholders() {
        let details = PaymentDetails::from_input(PaymentDetailsInput::default());
        assert_eq!(details.card_last4, "1234");
        assert_eq!(details.card_brand, "Visa");
        assert_eq!(details.expiry_month, 12);
        assert_eq!(details.expiry_year, 2025);
    }

    #[test]
    fn test_partial_input_keeps_supplied_fields() {
        let details = PaymentDetails::from_input(PaymentDetailsInput {
            card_last4: Some("9876".to_string()),
            card_brand: None,
            expiry_month: Some(3),
            expiry_year: None,
        });
        assert_eq!(details.card_last4, "9876");
        assert_eq!(details.card_brand, "Visa");
        assert_eq!(details.expiry_month, 3);
        assert_eq!(details.expiry_year, 2025);
    }

    #[test]
    fn test_serde_camel_case_fields() {
        let details = PaymentDetails::from_input(PaymentDetailsInput::default());
        let json = serde_json::to_string(&details).unwrap();
        assert!(json.contains("\"cardLast4\""));
        assert!(json.contains("\"cardBrand\""));
        assert!(json.contains("\"expiryMonth\""));
        assert!(json.contains("\"expiryYear\""));
    }
}
