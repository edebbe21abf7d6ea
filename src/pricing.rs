use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calendar::HOURS_PER_DAY;
use crate::config::ContractConfig;
use crate::decimal::Money;
use crate::hourly::HourlyTables;
use crate::types::{Direction, Discount, DiscountUnit, PriceMode, VolumeMode};

impl Discount {
    /// final price after this discount
    pub fn apply(&self, price: Decimal) -> Decimal {
        let magnitude = self.magnitude.value();
        match self.unit {
            DiscountUnit::Percent => {
                price.saturating_mul(Decimal::ONE.saturating_add(magnitude / dec!(100)))
            }
            DiscountUnit::Additive => price.saturating_add(magnitude),
            DiscountUnit::Fixed => magnitude,
        }
    }
}

/// discount for decade 1..=3 of a side, anything else gets the flat discount
pub fn discount_for_decade(
    decade: u8,
    direction: Direction,
    config: &ContractConfig,
) -> Discount {
    config.side(direction).discount_for_decade(decade)
}

/// whether `date` is priced hour by hour for this side
fn uses_hourly_pricing(
    date: NaiveDate,
    direction: Direction,
    config: &ContractConfig,
    tables: &HourlyTables,
) -> bool {
    config.pricing.price_mode == PriceMode::Hourly
        && config.side(direction).volume_mode == VolumeMode::Hourly
        && tables.prices.contains(date)
}

/// cost (buy) or revenue (sell) of one supply day.
/// hourly when the price row exists and both modes are hourly, flat otherwise.
/// `discount` overrides the side's own discount
pub fn daily_cost(
    date: NaiveDate,
    direction: Direction,
    config: &ContractConfig,
    tables: &HourlyTables,
    discount: Option<&Discount>,
) -> Money {
    let side = config.side(direction);
    let discount = discount.unwrap_or(&side.discount);

    if uses_hourly_pricing(date, direction, config, tables) {
        let volumes = tables.volumes(direction);
        if !volumes.contains(date) {
            return Money::ZERO;
        }
        let total = (0..HOURS_PER_DAY as usize)
            .map(|hour| {
                let price = discount.apply(tables.prices.value(date, hour));
                price.saturating_mul(volumes.value(date, hour))
            })
            .fold(Decimal::ZERO, Decimal::saturating_add);
        return Money::from_decimal(total);
    }

    let price = discount.apply(config.pricing.plan_price.value());
    let hours = Decimal::from(config.hours_per_day());
    Money::from_decimal(price.saturating_mul(side.volume.value()).saturating_mul(hours))
}

/// total of [`daily_cost`] over `start..=end`
pub fn range_cost(
    start: NaiveDate,
    end: NaiveDate,
    direction: Direction,
    config: &ContractConfig,
    tables: &HourlyTables,
    discount: Option<&Discount>,
) -> Money {
    crate::calendar::days_inclusive(start, end)
        .map(|day| daily_cost(day, direction, config, tables, discount))
        .sum()
}
