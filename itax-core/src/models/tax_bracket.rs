use serde::Serialize;

/// A contiguous income range taxed at a single rate.
///
/// `rate` is a whole percentage. The last bracket of a table is unbounded and
/// carries `f64::INFINITY` as its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TaxBracket {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub rate: u8,
    pub label: &'static str,
}

/// Progressive personal income tax schedule.
pub static TAX_BRACKETS: [TaxBracket; 5] = [
    TaxBracket {
        lower_bound: 0.0,
        upper_bound: 150_000.0,
        rate: 0,
        label: "0-150,000",
    },
    TaxBracket {
        lower_bound: 150_000.0,
        upper_bound: 500_000.0,
        rate: 10,
        label: "150,001-500,000",
    },
    TaxBracket {
        lower_bound: 500_000.0,
        upper_bound: 1_000_000.0,
        rate: 15,
        label: "500,001-1,000,000",
    },
    TaxBracket {
        lower_bound: 1_000_000.0,
        upper_bound: 2_000_000.0,
        rate: 20,
        label: "1,000,001-2,000,000",
    },
    TaxBracket {
        lower_bound: 2_000_000.0,
        upper_bound: f64::INFINITY,
        rate: 35,
        label: "2,000,001 ขึ้นไป",
    },
];

/// Returns the bracket table in ascending order.
pub fn tax_brackets() -> &'static [TaxBracket] {
    &TAX_BRACKETS
}

impl TaxBracket {
    /// Portion of `net_income` that falls inside this bracket.
    ///
    /// Zero when the income does not reach the lower bound, which includes
    /// every negative net income.
    pub fn taxable_portion(&self, net_income: f64) -> f64 {
        if net_income <= self.lower_bound {
            return 0.0;
        }
        net_income.min(self.upper_bound) - self.lower_bound
    }

    /// Tax owed on the portion of `net_income` inside this bracket.
    pub fn tax_for(&self, net_income: f64) -> f64 {
        self.taxable_portion(net_income) * f64::from(self.rate) / 100.0
    }
}
