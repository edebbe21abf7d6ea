pub mod calendar;
pub mod cashflow;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod hourly;
pub mod interest;
pub mod postpay;
pub mod pricing;
pub mod types;

// re-export key types
pub use cashflow::{compute_cash_flow, CashFlowResults, CashFlowRow, PeriodSummary};
pub use config::{
    ContractConfig, InterestConfig, PostpayTerms, PricingConfig, SideTerms, SupplyPeriod,
};
pub use decimal::{Money, Rate};
pub use errors::{CashFlowError, Result};
pub use hourly::{apply_paste, parse_paste_grid, HourlyRow, HourlyTable, HourlyTables};
pub use interest::{BalanceRates, DailyInterest};
pub use postpay::PostpayPeriod;
pub use types::{
    Direction, Discount, DiscountUnit, Entry, PaymentMode, PostpayType, PriceMode, VolumeMode,
    MAX_DAY_OFFSET,
};

// re-export external dependencies that users will need
pub use chrono;
pub use rust_decimal::Decimal;
