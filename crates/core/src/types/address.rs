//! Postal address attached to a marketplace user.

use serde::{Deserialize, Serialize};

/// Shipping/billing address as stored by the marketplace.
///
/// Every field may be missing on older accounts, so all of them default to
/// an empty string when absent from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Whether no field has been filled in.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .all(|field| field.trim().is_empty())
    }

    /// Single-line rendering, skipping empty parts.
    ///
    /// `12 Galle Rd, Colombo, Western, 00300, Sri Lanka`
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.postal_code,
            &self.country,
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default_to_empty() {
        let address: Address = serde_json::from_str(r#"{"city":"Kandy"}"#).unwrap();
        assert_eq!(address.city, "Kandy");
        assert!(address.street.is_empty());
        assert!(!address.is_blank());
    }

    #[test]
    fn test_one_line_skips_empty_parts() {
        let address = Address {
            street: "12 Galle Rd".to_owned(),
            city: "Colombo".to_owned(),
            country: "Sri Lanka".to_owned(),
            ..Address::default()
        };
        assert_eq!(address.one_line(), "12 Galle Rd, Colombo, Sri Lanka");
        assert!(Address::default().is_blank());
    }
}
