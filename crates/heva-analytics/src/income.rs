//! Monthly income brackets.
//!
//! A recorded income of zero means "not recorded" and falls in no
//! bracket, so the distribution can sum to less than the number of
//! beneficiaries.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum IncomeBracket {
    #[serde(rename = "0-10K")]
    UpTo10K,
    #[serde(rename = "10K-25K")]
    From10KTo25K,
    #[serde(rename = "25K-50K")]
    From25KTo50K,
    #[serde(rename = "50K-100K")]
    From50KTo100K,
    #[serde(rename = "100K+")]
    Over100K,
}

impl IncomeBracket {
    pub const ALL: [IncomeBracket; 5] = [
        IncomeBracket::UpTo10K,
        IncomeBracket::From10KTo25K,
        IncomeBracket::From25KTo50K,
        IncomeBracket::From50KTo100K,
        IncomeBracket::Over100K,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IncomeBracket::UpTo10K => "0-10K",
            IncomeBracket::From10KTo25K => "10K-25K",
            IncomeBracket::From25KTo50K => "25K-50K",
            IncomeBracket::From50KTo100K => "50K-100K",
            IncomeBracket::Over100K => "100K+",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for IncomeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bracket for a monthly income in KSh.
///
/// Returns `None` for zero (unrecorded), for negative values and for NaN.
pub fn bucket_income(income: f64) -> Option<IncomeBracket> {
    if income.is_nan() || income <= 0.0 {
        return None;
    }
    let bracket = if income < 10_000.0 {
        IncomeBracket::UpTo10K
    } else if income < 25_000.0 {
        IncomeBracket::From10KTo25K
    } else if income < 50_000.0 {
        IncomeBracket::From25KTo50K
    } else if income < 100_000.0 {
        IncomeBracket::From50KTo100K
    } else {
        IncomeBracket::Over100K
    };
    Some(bracket)
}

/// Count per income bracket, always listing all five brackets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomeDistribution {
    counts: [usize; 5],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketCount {
    pub range: IncomeBracket,
    pub count: usize,
}

impl IncomeDistribution {
    pub fn get(&self, bracket: IncomeBracket) -> usize {
        self.counts[bracket.index()]
    }

    /// Number of incomes that fell in some bracket.
    pub fn bucketed(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Brackets in ascending order with their counts.
    pub fn entries(&self) -> Vec<BracketCount> {
        IncomeBracket::ALL
            .into_iter()
            .map(|range| BracketCount {
                range,
                count: self.get(range),
            })
            .collect()
    }
}

impl Serialize for IncomeDistribution {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries().serialize(serializer)
    }
}

/// Tally incomes selected from `items` into brackets.
pub fn income_distribution<'a, T, I, F>(items: I, mut income: F) -> IncomeDistribution
where
    T: 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&'a T) -> f64,
{
    let mut distribution = IncomeDistribution::default();
    for item in items {
        if let Some(bracket) = bucket_income(income(item)) {
            distribution.counts[bracket.index()] += 1;
        }
    }
    distribution
}
