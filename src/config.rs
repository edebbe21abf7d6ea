use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::{count_days, parse_load_type};
use crate::decimal::Rate;
use crate::errors::{CashFlowError, Result};
use crate::types::{
    Direction, Discount, DiscountUnit, Entry, PaymentMode, PostpayType, PriceMode, VolumeMode,
};

/// commercial configuration of one contract, a snapshot per calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub supply: SupplyPeriod,
    pub pricing: PricingConfig,
    pub buy: SideTerms,
    pub sell: SideTerms,
    pub interest: InterestConfig,
}

/// delivery window, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SupplyPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// number of supply days, zero when the period is inverted
    pub fn days(&self) -> i64 {
        count_days(self.start, self.end)
    }
}

/// price inputs shared by both sides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub price_mode: PriceMode,
    /// flat price per MWh
    pub plan_price: Entry,
    /// free-text load descriptor, e.g. "block 8 - 20"
    pub load_type: String,
}

/// terms for one trade direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideTerms {
    pub volume_mode: VolumeMode,
    /// flat volume per delivery hour
    pub volume: Entry,
    pub discount: Discount,
    pub payment_mode: PaymentMode,
    /// date of the first advance payment (prepay only)
    pub first_payment: NaiveDate,
    /// days of coverage bought by the first advance payment
    pub payment_terms: Entry,
    /// advance payments may fall on saturday/sunday
    pub weekend_payments: bool,
    pub postpay: PostpayTerms,
}

/// postpay parameters for one side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostpayTerms {
    pub postpay_type: PostpayType,
    /// settlement lag after a supply day (D+N)
    pub days: Entry,
    /// extra lag added on top of `days`
    pub offset_days: Entry,
    /// settlements may fall on saturday/sunday
    pub weekend_payments: bool,
    /// discounts for decades 1, 2 and 3
    pub decade_discounts: [Discount; 3],
}

/// annual rates in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestConfig {
    /// charged on a negative running balance
    pub overdraft_annual_rate: Entry,
    /// earned on a positive running balance
    pub overnight_annual_rate: Entry,
}

impl InterestConfig {
    pub fn overdraft_rate(&self) -> Rate {
        Rate::from_percentage(self.overdraft_annual_rate.value())
    }

    pub fn overnight_rate(&self) -> Rate {
        Rate::from_percentage(self.overnight_annual_rate.value())
    }
}

impl SideTerms {
    /// prepay side with no discount and empty volume
    pub fn prepay(first_payment: NaiveDate, payment_terms: i64, postpay_days: i64) -> Self {
        Self {
            volume_mode: VolumeMode::Single,
            volume: Entry::EMPTY,
            discount: Discount::default(),
            payment_mode: PaymentMode::Prepay,
            first_payment,
            payment_terms: Entry::from(payment_terms),
            weekend_payments: false,
            postpay: PostpayTerms {
                postpay_type: PostpayType::Days,
                days: Entry::from(postpay_days),
                offset_days: Entry::from(0),
                weekend_payments: false,
                decade_discounts: [Discount::default(); 3],
            },
        }
    }

    /// decade 1..=3 discount, the flat discount for any other index
    pub fn discount_for_decade(&self, decade: u8) -> Discount {
        match decade {
            1..=3 => self.postpay.decade_discounts[(decade - 1) as usize],
            _ => self.discount,
        }
    }

    pub fn is_prepay(&self) -> bool {
        self.payment_mode == PaymentMode::Prepay
    }

    pub fn is_postpay(&self) -> bool {
        self.payment_mode == PaymentMode::Postpay
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        let first_payment = NaiveDate::from_ymd_opt(2025, 9, 19).unwrap_or_default();
        Self {
            supply: SupplyPeriod {
                start: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap_or_default(),
                end: NaiveDate::from_ymd_opt(2025, 10, 31).unwrap_or_default(),
            },
            pricing: PricingConfig {
                price_mode: PriceMode::Single,
                plan_price: Entry::new(dec!(4800)),
                load_type: "block 1 - 24".to_string(),
            },
            buy: SideTerms::prepay(first_payment, 10, 1),
            sell: SideTerms::prepay(first_payment, 3, 2),
            interest: InterestConfig {
                overdraft_annual_rate: Entry::new(dec!(19)),
                overnight_annual_rate: Entry::new(dec!(10)),
            },
        }
    }
}

impl ContractConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn side(&self, direction: Direction) -> &SideTerms {
        match direction {
            Direction::Buy => &self.buy,
            Direction::Sell => &self.sell,
        }
    }

    pub fn side_mut(&mut self, direction: Direction) -> &mut SideTerms {
        match direction {
            Direction::Buy => &mut self.buy,
            Direction::Sell => &mut self.sell,
        }
    }

    pub fn hours_per_day(&self) -> u32 {
        parse_load_type(&self.pricing.load_type)
    }

    pub fn supply_days(&self) -> i64 {
        self.supply.days()
    }

    /// reject input before submission; the calculation itself never calls this
    pub fn validate(&self) -> Result<()> {
        if self.supply.end < self.supply.start {
            return Err(CashFlowError::InvalidDate {
                message: format!(
                    "supply end {} is before supply start {}",
                    self.supply.end, self.supply.start
                ),
            });
        }

        for direction in [Direction::Buy, Direction::Sell] {
            let side = self.side(direction);
            if side.payment_terms.value().is_sign_negative() {
                return Err(CashFlowError::InvalidConfiguration {
                    message: format!("{} payment terms must not be negative", direction),
                });
            }
            let fixed_without_price =
                side.discount.unit == DiscountUnit::Fixed && side.discount.magnitude.is_empty();
            if fixed_without_price {
                return Err(CashFlowError::InvalidConfiguration {
                    message: format!("{} fixed price discount has no price", direction),
                });
            }
        }

        Ok(())
    }
}
