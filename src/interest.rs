use serde::{Deserialize, Serialize};

use crate::config::InterestConfig;
use crate::decimal::{Money, Rate};

/// daily rates for the two sides of the balance, converted once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRates {
    /// charged on a negative balance
    pub overdraft_daily: Rate,
    /// earned on a positive balance
    pub overnight_daily: Rate,
}

/// interest of one day on the closing balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyInterest {
    pub overdraft_expense: Money,
    pub overnight_income: Money,
}

impl DailyInterest {
    /// income minus expense
    pub fn net(&self) -> Money {
        self.overnight_income - self.overdraft_expense
    }
}

impl BalanceRates {
    /// annual percentages divided by the 365-day basis
    pub fn from_config(config: &InterestConfig) -> Self {
        Self {
            overdraft_daily: config.overdraft_rate().daily_rate(),
            overnight_daily: config.overnight_rate().daily_rate(),
        }
    }

    /// interest on a day's closing balance, at most one side non-zero
    pub fn accrue(&self, balance: Money) -> DailyInterest {
        if balance.is_negative() {
            DailyInterest {
                overdraft_expense: balance.abs().accrue(self.overdraft_daily),
                overnight_income: Money::ZERO,
            }
        } else if balance.is_positive() {
            DailyInterest {
                overdraft_expense: Money::ZERO,
                overnight_income: balance.accrue(self.overnight_daily),
            }
        } else {
            DailyInterest::default()
        }
    }

    pub fn overdraft_monthly(&self) -> Rate {
        self.overdraft_daily.monthly_from_daily()
    }

    pub fn overnight_monthly(&self) -> Rate {
        self.overnight_daily.monthly_from_daily()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entry;
    use rust_decimal_macros::dec;

    fn rates(overdraft: i64, overnight: i64) -> BalanceRates {
        BalanceRates::from_config(&InterestConfig {
            overdraft_annual_rate: Entry::from(overdraft),
            overnight_annual_rate: Entry::from(overnight),
        })
    }

    #[test]
    fn test_negative_balance_costs_overdraft() {
        let interest = rates(19, 10).accrue(Money::from_major(-365_000));

        assert_eq!(interest.overdraft_expense, Money::from_major(190));
        assert!(interest.overnight_income.is_zero());
        assert_eq!(interest.net(), Money::from_major(-190));
    }

    #[test]
    fn test_positive_balance_earns_overnight() {
        let interest = rates(19, 10).accrue(Money::from_major(365_000));

        assert_eq!(interest.overnight_income, Money::from_major(100));
        assert!(interest.overdraft_expense.is_zero());
    }

    #[test]
    fn test_zero_balance_accrues_nothing() {
        assert_eq!(rates(19, 10).accrue(Money::ZERO), DailyInterest::default());
    }

    #[test]
    fn test_blank_rates_are_zero() {
        let rates = BalanceRates::from_config(&InterestConfig {
            overdraft_annual_rate: Entry::EMPTY,
            overnight_annual_rate: Entry::EMPTY,
        });
        assert_eq!(rates.accrue(Money::from_major(-1_000)), DailyInterest::default());
    }

    #[test]
    fn test_monthly_equivalent() {
        let rates = rates(12, 6);
        assert_eq!(rates.overdraft_monthly().as_decimal().round_dp(12), dec!(0.01));
        assert_eq!(rates.overnight_monthly().as_decimal().round_dp(12), dec!(0.005));
    }
}
