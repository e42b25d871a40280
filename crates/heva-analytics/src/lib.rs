//! HEVA Analytics: pure aggregation over user and business records.
//!
//! Nothing in this crate mutates its input or touches the store; callers
//! pass in the collections they are allowed to see.

pub mod aggregate;
pub mod income;
pub mod report;

pub use aggregate::{GroupCount, GroupCounts, OTHERS, UNKNOWN, average, group_count, percentage, top_n};
pub use income::{BracketCount, IncomeBracket, IncomeDistribution, bucket_income, income_distribution};
pub use report::{Accessibility, AdminOverview, BeneficiaryAnalytics, GroupShare, OfficerOverview, county_chart};
