use chrono::{Datelike, NaiveDate, Weekday};

use crate::calendar::{count_days, format_date, is_weekend, shift_days};
use crate::config::ContractConfig;
use crate::decimal::Money;
use crate::hourly::HourlyTables;
use crate::pricing::range_cost;
use crate::types::Direction;

/// one advance payment and the supply days it pays for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvancePayment {
    pub amount: Money,
    pub covers_from: NaiveDate,
    pub covers_to: NaiveDate,
}

impl AdvancePayment {
    pub fn description(&self) -> String {
        if self.covers_from == self.covers_to {
            format_date(self.covers_from)
        } else {
            format!("{} - {}", format_date(self.covers_from), format_date(self.covers_to))
        }
    }
}

/// extra days on the first advance payment without weekend payments:
/// +2 paying on a friday, else +1 for a saturday supply start, else 0
pub fn weekend_adjustment(
    first_payment: NaiveDate,
    supply_start: NaiveDate,
    allow_weekends: bool,
) -> i64 {
    if allow_weekends {
        return 0;
    }
    if first_payment.weekday() == Weekday::Fri {
        2
    } else if supply_start.weekday() == Weekday::Sat {
        1
    } else {
        0
    }
}

/// supply days bought by the first advance payment, from supply start to
/// `first_payment + terms + weekend adjustment` clipped to supply end
pub fn first_coverage(
    direction: Direction,
    config: &ContractConfig,
) -> Option<(NaiveDate, NaiveDate)> {
    let side = config.side(direction);
    let supply = config.supply;
    let adjustment = weekend_adjustment(side.first_payment, supply.start, side.weekend_payments);
    let terms = side.payment_terms.days();
    let end = shift_days(side.first_payment, terms + adjustment).min(supply.end);

    tracing::trace!(
        %direction,
        first_payment = %side.first_payment,
        adjustment,
        coverage_end = %end,
        "first advance coverage"
    );

    (end >= supply.start).then_some((supply.start, end))
}

/// per-side cursor over the supply period handing out advance payments
pub struct AdvanceCursor<'a> {
    direction: Direction,
    config: &'a ContractConfig,
    tables: &'a HourlyTables,
    /// first supply day not yet paid for
    next_day: NaiveDate,
}

impl<'a> AdvanceCursor<'a> {
    pub fn new(direction: Direction, config: &'a ContractConfig, tables: &'a HourlyTables) -> Self {
        Self {
            direction,
            config,
            tables,
            next_day: config.supply.start,
        }
    }

    pub fn next_day(&self) -> NaiveDate {
        self.next_day
    }

    /// advance payment due on `date`; call once per day in ascending order
    pub fn settle(&mut self, date: NaiveDate) -> Option<AdvancePayment> {
        let side = self.config.side(self.direction);
        let supply_end = self.config.supply.end;

        if date == side.first_payment {
            let (from, to) = first_coverage(self.direction, self.config)?;
            self.next_day = shift_days(to, 1);
            return Some(self.pay(from, to));
        }

        if date < side.first_payment || self.next_day > supply_end {
            return None;
        }

        let days = if side.weekend_payments {
            1
        } else if is_weekend(date) {
            return None;
        } else if date.weekday() == Weekday::Fri {
            // friday pays for friday, saturday and sunday
            3
        } else {
            1
        };
        let days = days.min(count_days(self.next_day, supply_end));

        let from = self.next_day;
        let to = shift_days(from, days - 1);
        self.next_day = shift_days(from, days);
        Some(self.pay(from, to))
    }

    fn pay(&self, from: NaiveDate, to: NaiveDate) -> AdvancePayment {
        AdvancePayment {
            amount: range_cost(from, to, self.direction, self.config, self.tables, None),
            covers_from: from,
            covers_to: to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Entry;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn june_config(first_payment: NaiveDate, terms: i64) -> ContractConfig {
        let mut config = ContractConfig::default();
        config.supply.start = ymd(2025, 6, 1);
        config.supply.end = ymd(2025, 6, 30);
        config.pricing.plan_price = Entry::from(10);
        config.sell.volume = Entry::from(1);
        config.sell.first_payment = first_payment;
        config.sell.payment_terms = Entry::from(terms);
        config
    }

    #[test]
    fn test_weekend_adjustment_rules() {
        let friday = ymd(2025, 5, 30);
        let monday = ymd(2025, 5, 26);
        let saturday_start = ymd(2025, 5, 31);
        let sunday_start = ymd(2025, 6, 1);
        let monday_start = ymd(2025, 6, 2);

        assert_eq!(weekend_adjustment(friday, sunday_start, false), 2);
        assert_eq!(weekend_adjustment(friday, monday_start, false), 2);
        assert_eq!(weekend_adjustment(monday, saturday_start, false), 1);
        assert_eq!(weekend_adjustment(monday, sunday_start, false), 0);
        assert_eq!(weekend_adjustment(monday, monday_start, false), 0);
        assert_eq!(weekend_adjustment(friday, saturday_start, true), 0);
    }

    #[test]
    fn test_friday_first_payment_coverage() {
        // paid friday 30.05 on D-3 terms: 02.06 plus two weekend days
        let config = june_config(ymd(2025, 5, 30), 3);
        assert_eq!(
            first_coverage(Direction::Sell, &config),
            Some((ymd(2025, 6, 1), ymd(2025, 6, 4)))
        );
    }

    #[test]
    fn test_midweek_first_payment_with_sunday_start() {
        let config = june_config(ymd(2025, 5, 27), 10);
        assert_eq!(
            first_coverage(Direction::Sell, &config),
            Some((ymd(2025, 6, 1), ymd(2025, 6, 6)))
        );
    }

    #[test]
    fn test_coverage_before_supply_is_empty() {
        let config = june_config(ymd(2025, 5, 20), 3);
        assert_eq!(first_coverage(Direction::Sell, &config), None);
    }

    #[test]
    fn test_coverage_clipped_to_supply_end() {
        let config = june_config(ymd(2025, 5, 27), 100);
        assert_eq!(
            first_coverage(Direction::Sell, &config),
            Some((ymd(2025, 6, 1), ymd(2025, 6, 30)))
        );
    }

    #[test]
    fn test_cursor_pays_friday_for_weekend() {
        let config = june_config(ymd(2025, 5, 30), 3);
        let tables = HourlyTables::new();
        let mut cursor = AdvanceCursor::new(Direction::Sell, &config, &tables);

        let first = cursor.settle(ymd(2025, 5, 30)).unwrap();
        assert_eq!(first.description(), "01.06.2025 - 04.06.2025");
        assert_eq!(first.amount, Money::from_major(4 * 10 * 24));
        assert_eq!(cursor.next_day(), ymd(2025, 6, 5));

        // weekend days before supply pay nothing
        assert!(cursor.settle(ymd(2025, 5, 31)).is_none());
        assert!(cursor.settle(ymd(2025, 6, 1)).is_none());

        let monday = cursor.settle(ymd(2025, 6, 2)).unwrap();
        assert_eq!((monday.covers_from, monday.covers_to), (ymd(2025, 6, 5), ymd(2025, 6, 5)));

        cursor.settle(ymd(2025, 6, 3)).unwrap();
        cursor.settle(ymd(2025, 6, 4)).unwrap();
        cursor.settle(ymd(2025, 6, 5)).unwrap();

        let friday = cursor.settle(ymd(2025, 6, 6)).unwrap();
        assert_eq!((friday.covers_from, friday.covers_to), (ymd(2025, 6, 9), ymd(2025, 6, 11)));
        assert_eq!(friday.amount, Money::from_major(3 * 10 * 24));
    }

    #[test]
    fn test_cursor_with_weekend_payments_pays_daily() {
        let mut config = june_config(ymd(2025, 5, 30), 3);
        config.sell.weekend_payments = true;
        let tables = HourlyTables::new();
        let mut cursor = AdvanceCursor::new(Direction::Sell, &config, &tables);

        let first = cursor.settle(ymd(2025, 5, 30)).unwrap();
        assert_eq!(first.covers_to, ymd(2025, 6, 2));

        let saturday = cursor.settle(ymd(2025, 5, 31)).unwrap();
        assert_eq!(saturday.description(), "03.06.2025");
    }

    #[test]
    fn test_cursor_stops_at_supply_end() {
        let mut config = june_config(ymd(2025, 6, 25), 3);
        config.sell.weekend_payments = true;
        let tables = HourlyTables::new();
        let mut cursor = AdvanceCursor::new(Direction::Sell, &config, &tables);

        assert!(cursor.settle(ymd(2025, 6, 24)).is_none());
        let first = cursor.settle(ymd(2025, 6, 25)).unwrap();
        assert_eq!(first.covers_to, ymd(2025, 6, 28));
        assert!(cursor.settle(ymd(2025, 6, 26)).is_some());
        assert!(cursor.settle(ymd(2025, 6, 27)).is_some());
        assert!(cursor.settle(ymd(2025, 6, 28)).is_none());
    }

    #[test]
    fn test_friday_payment_clipped_to_remaining_days() {
        let mut config = june_config(ymd(2025, 6, 25), 1);
        config.supply.end = ymd(2025, 6, 28);
        let tables = HourlyTables::new();
        let mut cursor = AdvanceCursor::new(Direction::Sell, &config, &tables);

        // wed 25.06 covers 01.06..26.06, thu 26.06 covers 27.06
        cursor.settle(ymd(2025, 6, 25)).unwrap();
        cursor.settle(ymd(2025, 6, 26)).unwrap();

        let friday = cursor.settle(ymd(2025, 6, 27)).unwrap();
        assert_eq!((friday.covers_from, friday.covers_to), (ymd(2025, 6, 28), ymd(2025, 6, 28)));
        assert_eq!(friday.amount, Money::from_major(10 * 24));
        assert!(cursor.settle(ymd(2025, 6, 30)).is_none());
    }
}
