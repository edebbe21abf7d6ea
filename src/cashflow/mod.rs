pub mod prepay;

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calendar::{days_inclusive, shift_days};
use crate::config::ContractConfig;
use crate::decimal::{Money, Rate};
use crate::hourly::HourlyTables;
use crate::interest::BalanceRates;
use crate::postpay::{postpay_periods, PostpayPeriod};
use crate::types::{Direction, VolumeMode};

pub use prepay::{first_coverage, weekend_adjustment, AdvanceCursor, AdvancePayment};

/// days shown before the earliest payment
const LEAD_DAYS: i64 = 10;
/// days shown after the latest payment
const TRAIL_DAYS: i64 = 5;
/// prepay payments may run this far past supply end
const PREPAY_TAIL_DAYS: i64 = 3;
/// rows within this distance of a key date are always shown
const CONTEXT_DAYS: i64 = 5;

/// one shown day of the cash-flow table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowRow {
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// paid out for bought power
    pub outgoing: Money,
    /// received for sold power
    pub incoming: Money,
    /// incoming - outgoing
    pub delta: Money,
    /// running balance after this day's delta
    pub cumulative_delta: Money,
    pub day_interest_expense: Money,
    pub day_interest_income: Money,
    /// income - expense
    pub day_interest: Money,
    /// supply days paid for by the outgoing amount
    pub buy_coverage: String,
    /// supply days paid for by the incoming amount
    pub sell_coverage: String,
}

/// balance statistics over the shown rows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub average_balance: Money,
    /// lowest running balance
    pub max_overdraft: Money,
    /// highest running balance
    pub max_surplus: Money,
    /// supply days
    pub total_days: i64,
}

/// everything a calculation produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowResults {
    pub total_buy_volume: Decimal,
    pub total_sell_volume: Decimal,
    pub total_volume: Decimal,
    pub total_income: Money,
    pub total_expenses: Money,
    pub gross_profit: Money,
    /// overnight income - overdraft expense
    pub total_interest: Money,
    pub total_overdraft_interest: Money,
    pub total_overnight_interest: Money,
    pub overdraft_daily_rate: Rate,
    pub overnight_daily_rate: Rate,
    pub overdraft_monthly_rate: Rate,
    pub overnight_monthly_rate: Rate,
    /// income + overnight - overdraft - expenses
    pub net_income: Money,
    /// income - expenses + net interest
    pub net_cash_flow: Money,
    /// margin in percent
    pub margin: Decimal,
    pub rows: Vec<CashFlowRow>,
    pub summary: PeriodSummary,
}

/// postpay amounts settling on one date
#[derive(Debug, Default)]
struct DueSettlements {
    outgoing: Money,
    incoming: Money,
    buy_descriptions: Vec<String>,
    sell_descriptions: Vec<String>,
}

fn index_settlements(
    buy: &[PostpayPeriod],
    sell: &[PostpayPeriod],
) -> BTreeMap<NaiveDate, DueSettlements> {
    let mut index: BTreeMap<NaiveDate, DueSettlements> = BTreeMap::new();
    for period in buy {
        let due = index.entry(period.pay_date).or_default();
        due.outgoing += period.amount;
        due.buy_descriptions.push(period.description.clone());
    }
    for period in sell {
        let due = index.entry(period.pay_date).or_default();
        due.incoming += period.amount;
        due.sell_descriptions.push(period.description.clone());
    }
    index
}

fn total_volume(direction: Direction, config: &ContractConfig, tables: &HourlyTables) -> Decimal {
    let side = config.side(direction);
    match side.volume_mode {
        VolumeMode::Hourly => {
            tables.volumes(direction).total_over(config.supply.start, config.supply.end)
        }
        VolumeMode::Single => {
            side.volume
                .value()
                .saturating_mul(Decimal::from(config.hours_per_day()))
                .saturating_mul(Decimal::from(config.supply_days()))
        }
    }
}

/// first and last calendar day walked, plus the earliest relevant date
fn iteration_window(
    config: &ContractConfig,
    buy: &[PostpayPeriod],
    sell: &[PostpayPeriod],
) -> (NaiveDate, NaiveDate, NaiveDate) {
    let supply = config.supply;
    let key_date = |direction: Direction| {
        let side = config.side(direction);
        if side.is_prepay() {
            side.first_payment
        } else {
            supply.start
        }
    };
    let earliest = key_date(Direction::Buy).min(key_date(Direction::Sell));

    let mut latest = buy
        .iter()
        .chain(sell)
        .map(|p| p.pay_date)
        .fold(supply.end, NaiveDate::max);
    if config.buy.is_prepay() || config.sell.is_prepay() {
        latest = latest.max(shift_days(supply.end, PREPAY_TAIL_DAYS));
    }

    (shift_days(earliest, -LEAD_DAYS), shift_days(latest, TRAIL_DAYS), earliest)
}

fn within_context(date: NaiveDate, anchor: NaiveDate) -> bool {
    (date - anchor).num_days().abs() <= CONTEXT_DAYS
}

/// days kept in the visible table; hidden days still move the balance
fn is_notable(
    date: NaiveDate,
    earliest: NaiveDate,
    config: &ContractConfig,
    row: &CashFlowRow,
) -> bool {
    if date < earliest {
        return false;
    }
    !row.outgoing.is_zero()
        || !row.incoming.is_zero()
        || !row.day_interest.is_zero()
        || config.supply.contains(date)
        || within_context(date, config.buy.first_payment)
        || within_context(date, config.sell.first_payment)
        || within_context(date, config.supply.start)
}

fn margin(total_income: Money, total_expenses: Money, total_overdraft: Money) -> Decimal {
    if !total_income.is_positive() {
        return Decimal::ZERO;
    }
    let base = (total_income - total_overdraft).as_decimal();
    total_expenses
        .as_decimal()
        .checked_div(base)
        .map(|ratio| Decimal::ONE.saturating_sub(ratio).saturating_mul(dec!(100)))
        .unwrap_or(Decimal::ZERO)
}

/// incremental mean, saturating at the decimal bounds
fn running_mean(values: impl Iterator<Item = Decimal>) -> Money {
    let mut mean = Decimal::ZERO;
    for (index, value) in values.enumerate() {
        let step = value
            .saturating_sub(mean)
            .checked_div(Decimal::from(index + 1))
            .unwrap_or(Decimal::ZERO);
        mean = mean.saturating_add(step);
    }
    Money::from_decimal(mean)
}

fn summarize(rows: &[CashFlowRow], total_days: i64) -> PeriodSummary {
    let Some(first) = rows.first() else {
        return PeriodSummary {
            total_days,
            ..PeriodSummary::default()
        };
    };
    let balances = || rows.iter().map(|r| r.cumulative_delta);
    PeriodSummary {
        average_balance: running_mean(balances().map(|b| b.as_decimal())),
        max_overdraft: balances().fold(first.cumulative_delta, Money::min),
        max_surplus: balances().fold(first.cumulative_delta, Money::max),
        total_days,
    }
}

/// day-by-day cash flow of a contract.
/// walks from ten days before the earliest relevant date to five days after
/// the latest payment. never fails: blanks read as zero, amounts saturate and
/// an inverted supply period gives an empty schedule
pub fn compute_cash_flow(config: &ContractConfig, tables: &HourlyTables) -> CashFlowResults {
    let hours_per_day = config.hours_per_day();
    let total_days = config.supply_days();
    tracing::debug!(hours_per_day, total_days, "starting cash flow calculation");

    let total_buy_volume = total_volume(Direction::Buy, config, tables);
    let total_sell_volume = total_volume(Direction::Sell, config, tables);

    let rates = BalanceRates::from_config(&config.interest);
    tracing::debug!(
        overdraft_daily = %rates.overdraft_daily,
        overnight_daily = %rates.overnight_daily,
        "converted annual rates"
    );

    let buy_periods = if config.buy.is_postpay() {
        postpay_periods(Direction::Buy, config, tables)
    } else {
        Vec::new()
    };
    let sell_periods = if config.sell.is_postpay() {
        postpay_periods(Direction::Sell, config, tables)
    } else {
        Vec::new()
    };
    let settlements = index_settlements(&buy_periods, &sell_periods);

    let (window_start, window_end, earliest) =
        iteration_window(config, &buy_periods, &sell_periods);
    tracing::debug!(%window_start, %window_end, "cash flow window");

    let cursor = |direction: Direction| {
        let prepay = config.side(direction).is_prepay();
        prepay.then(|| AdvanceCursor::new(direction, config, tables))
    };
    let mut buy_cursor = cursor(Direction::Buy);
    let mut sell_cursor = cursor(Direction::Sell);

    let mut rows = Vec::new();
    let mut balance = Money::ZERO;
    let mut total_expenses = Money::ZERO;
    let mut total_income = Money::ZERO;
    let mut total_overdraft_interest = Money::ZERO;
    let mut total_overnight_interest = Money::ZERO;

    for date in days_inclusive(window_start, window_end) {
        let mut outgoing = Money::ZERO;
        let mut incoming = Money::ZERO;
        let mut buy_coverage = String::new();
        let mut sell_coverage = String::new();

        if let Some(due) = settlements.get(&date) {
            outgoing += due.outgoing;
            incoming += due.incoming;
            buy_coverage = due.buy_descriptions.join(", ");
            sell_coverage = due.sell_descriptions.join(", ");
        }

        if let Some(payment) = buy_cursor.as_mut().and_then(|c| c.settle(date)) {
            outgoing += payment.amount;
            buy_coverage = payment.description();
        }
        if let Some(payment) = sell_cursor.as_mut().and_then(|c| c.settle(date)) {
            incoming += payment.amount;
            sell_coverage = payment.description();
        }

        let delta = incoming - outgoing;
        balance += delta;

        let interest = rates.accrue(balance);
        total_overdraft_interest += interest.overdraft_expense;
        total_overnight_interest += interest.overnight_income;
        total_expenses += outgoing;
        total_income += incoming;

        let row = CashFlowRow {
            date,
            weekday: date.weekday(),
            outgoing,
            incoming,
            delta,
            cumulative_delta: balance,
            day_interest_expense: interest.overdraft_expense,
            day_interest_income: interest.overnight_income,
            day_interest: interest.net(),
            buy_coverage,
            sell_coverage,
        };
        if is_notable(date, earliest, config, &row) {
            rows.push(row);
        }
    }

    let total_interest = total_overnight_interest - total_overdraft_interest;
    let net_income =
        total_income + total_overnight_interest - total_overdraft_interest - total_expenses;
    let summary = summarize(&rows, total_days);

    tracing::debug!(
        rows = rows.len(),
        %total_income,
        %total_expenses,
        %net_income,
        "cash flow calculation finished"
    );

    CashFlowResults {
        total_buy_volume,
        total_sell_volume,
        total_volume: total_buy_volume.max(total_sell_volume),
        total_income,
        total_expenses,
        gross_profit: total_income - total_expenses,
        total_interest,
        total_overdraft_interest,
        total_overnight_interest,
        overdraft_daily_rate: rates.overdraft_daily,
        overnight_daily_rate: rates.overnight_daily,
        overdraft_monthly_rate: rates.overdraft_monthly(),
        overnight_monthly_rate: rates.overnight_monthly(),
        net_income,
        net_cash_flow: total_income - total_expenses + total_interest,
        margin: margin(total_income, total_expenses, total_overdraft_interest),
        rows,
        summary,
    }
}
