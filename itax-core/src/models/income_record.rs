use serde::{Deserialize, Deserializer, Serialize};

use super::allowance::{Allowance, AllowanceInput};

/// A calculation request as submitted by a caller.
///
/// Nothing here has been checked yet; see
/// [`validate_request`](crate::calculations::validate_request).
/// A missing `wht` reads as 0 and a missing or `null` `allowances` as none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRequest {
    pub total_income: f64,
    #[serde(default)]
    pub wht: f64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub allowances: Vec<AllowanceInput>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<AllowanceInput>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<AllowanceInput>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Income and expenses for one taxpayer, already validated.
///
/// Invariant: `0 <= withholding_tax <= total_income` and every allowance
/// amount is non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub total_income: f64,
    pub withholding_tax: f64,
    pub allowances: Vec<Allowance>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_a_full_request() {
        let request: IncomeRequest = serde_json::from_value(json!({
            "totalIncome": 500000.0,
            "wht": 25000.0,
            "allowances": [{ "allowanceType": "donation", "amount": 1000.0 }]
        }))
        .unwrap();

        assert_eq!(
            request,
            IncomeRequest {
                total_income: 500_000.0,
                wht: 25_000.0,
                allowances: vec![AllowanceInput::new("donation", 1_000.0)],
            }
        );
    }

    #[test]
    fn missing_wht_and_allowances_read_as_zero_and_none() {
        let request: IncomeRequest =
            serde_json::from_value(json!({ "totalIncome": 500000.0 })).unwrap();

        assert_eq!(request.wht, 0.0);
        assert!(request.allowances.is_empty());
    }

    #[test]
    fn null_allowances_read_as_none() {
        let request: IncomeRequest = serde_json::from_value(json!({
            "totalIncome": 500000.0,
            "wht": 0.0,
            "allowances": null
        }))
        .unwrap();

        assert!(request.allowances.is_empty());
    }

    #[test]
    fn total_income_is_required() {
        let err = serde_json::from_value::<IncomeRequest>(json!({ "wht": 0.0 })).unwrap_err();

        assert!(err.to_string().contains("totalIncome"));
    }
}
