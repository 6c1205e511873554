use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AllowanceKind {
    #[serde(rename = "donation")]
    Donation,
    #[serde(rename = "k-receipt")]
    KReceipt,
}

impl AllowanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Donation => "donation",
            Self::KReceipt => "k-receipt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "donation" => Some(Self::Donation),
            "k-receipt" => Some(Self::KReceipt),
            _ => None,
        }
    }
}

/// A validated deductible amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Allowance {
    pub kind: AllowanceKind,
    pub amount: f64,
}

impl Allowance {
    pub fn donation(amount: f64) -> Self {
        Self {
            kind: AllowanceKind::Donation,
            amount,
        }
    }

    pub fn k_receipt(amount: f64) -> Self {
        Self {
            kind: AllowanceKind::KReceipt,
            amount,
        }
    }
}

/// An allowance as it arrives in a request, before its type is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceInput {
    pub allowance_type: String,
    pub amount: f64,
}

impl AllowanceInput {
    pub fn new(
        allowance_type: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            allowance_type: allowance_type.into(),
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_known_kinds() {
        assert_eq!(AllowanceKind::parse("donation"), Some(AllowanceKind::Donation));
        assert_eq!(AllowanceKind::parse("k-receipt"), Some(AllowanceKind::KReceipt));
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(AllowanceKind::parse("Donation"), None);
        assert_eq!(AllowanceKind::parse("k_receipt"), None);
        assert_eq!(AllowanceKind::parse(""), None);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for kind in [AllowanceKind::Donation, AllowanceKind::KReceipt] {
            assert_eq!(AllowanceKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn allowance_input_deserializes_camel_case() {
        let input: AllowanceInput =
            serde_json::from_str(r#"{"allowanceType":"k-receipt","amount":200000.0}"#)
                .expect("valid allowance json");

        assert_eq!(input, AllowanceInput::new("k-receipt", 200_000.0));
    }
}
