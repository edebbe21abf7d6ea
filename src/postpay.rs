use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::{
    adjust_to_business_day, days_inclusive, decade_periods, format_date, next_month_start,
    shift_days,
};
use crate::config::ContractConfig;
use crate::decimal::Money;
use crate::hourly::HourlyTables;
use crate::pricing::{daily_cost, range_cost};
use crate::types::{Direction, PostpayType};

/// one postpay settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostpayPeriod {
    /// first supply day covered
    pub start: NaiveDate,
    /// last supply day covered
    pub end: NaiveDate,
    pub pay_date: NaiveDate,
    pub amount: Money,
    pub description: String,
    /// decade index for decade settlements
    pub decade: Option<u8>,
}

/// settlements for one side in coverage order, non-positive amounts dropped
pub fn postpay_periods(
    direction: Direction,
    config: &ContractConfig,
    tables: &HourlyTables,
) -> Vec<PostpayPeriod> {
    let periods = match config.side(direction).postpay.postpay_type {
        PostpayType::Decade => decade_settlements(direction, config, tables),
        PostpayType::Days => daily_settlements(direction, config, tables),
    };
    tracing::debug!(%direction, count = periods.len(), "generated postpay periods");
    periods
}

fn decade_settlements(
    direction: Direction,
    config: &ContractConfig,
    tables: &HourlyTables,
) -> Vec<PostpayPeriod> {
    let supply = config.supply;
    let side = config.side(direction);
    let mut periods = Vec::new();

    let mut month = NaiveDate::from_ymd_opt(supply.start.year(), supply.start.month(), 1);
    while let Some(month_start) = month.filter(|m| *m <= supply.end) {
        let (year, month_no) = (month_start.year(), month_start.month());

        for decade in decade_periods(year, month_no) {
            let (Some(decade_start), Some(decade_end)) = (
                NaiveDate::from_ymd_opt(year, month_no, decade.start_day),
                NaiveDate::from_ymd_opt(year, month_no, decade.end_day),
            ) else {
                continue;
            };
            if decade_end < supply.start || decade_start > supply.end {
                continue;
            }

            let start = decade_start.max(supply.start);
            let end = decade_end.min(supply.end);
            let discount = side.discount_for_decade(decade.decade);
            let amount = range_cost(start, end, direction, config, tables, Some(&discount));

            if amount.is_positive() {
                let pay_date =
                    NaiveDate::from_ymd_opt(year, month_no, decade.pay_day).unwrap_or(decade_end);
                periods.push(PostpayPeriod {
                    start,
                    end,
                    pay_date,
                    amount,
                    description: format!("decade {} of {}", decade.decade, start.format("%B %Y")),
                    decade: Some(decade.decade),
                });
            }
        }

        month = next_month_start(month_start);
    }

    periods
}

fn daily_settlements(
    direction: Direction,
    config: &ContractConfig,
    tables: &HourlyTables,
) -> Vec<PostpayPeriod> {
    let postpay = &config.side(direction).postpay;
    let lag = postpay.days.days();
    let offset = postpay.offset_days.days();

    days_inclusive(config.supply.start, config.supply.end)
        .filter_map(|day| {
            let amount = daily_cost(day, direction, config, tables, None);
            if !amount.is_positive() {
                return None;
            }
            let pay_date =
                adjust_to_business_day(shift_days(day, lag + offset), postpay.weekend_payments);
            let terms = if offset > 0 {
                format!("D+{}+{}", lag, offset)
            } else {
                format!("D+{}", lag)
            };
            Some(PostpayPeriod {
                start: day,
                end: day,
                pay_date,
                amount,
                description: format!("for {} ({})", format_date(day), terms),
                decade: None,
            })
        })
        .collect()
}
