pub mod paste;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{days_inclusive, format_date, parse_date_key, HOURS_PER_DAY};
use crate::config::ContractConfig;
use crate::errors::{CashFlowError, Result};
use crate::types::{Direction, Entry};

pub use paste::{apply_paste, parse_paste_grid};

const HOURS: usize = HOURS_PER_DAY as usize;

/// 24 hourly values of one day
pub type HourlyRow = [Entry; HOURS];

/// per-date hourly values (prices or volumes).
/// serialized as a map keyed by `DD.MM.YYYY`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Vec<Entry>>", into = "BTreeMap<String, Vec<Entry>>")]
pub struct HourlyTable {
    rows: BTreeMap<NaiveDate, HourlyRow>,
}

impl HourlyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// every day of the period filled with the same value
    pub fn uniform(start: NaiveDate, end: NaiveDate, value: Entry) -> Self {
        Self {
            rows: days_inclusive(start, end).map(|d| (d, [value; HOURS])).collect(),
        }
    }

    pub fn row(&self, date: NaiveDate) -> Option<&HourlyRow> {
        self.rows.get(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.rows.contains_key(&date)
    }

    pub fn insert_row(&mut self, date: NaiveDate, row: HourlyRow) {
        self.rows.insert(date, row);
    }

    /// value for one hour; absent dates, hours and blanks read as zero
    pub fn value(&self, date: NaiveDate, hour: usize) -> Decimal {
        self.rows
            .get(&date)
            .and_then(|row| row.get(hour))
            .map(Entry::value)
            .unwrap_or(Decimal::ZERO)
    }

    /// update one cell, creating a zero row for a new date; false past hour 23
    pub fn set_cell(&mut self, date: NaiveDate, hour: usize, value: Entry) -> bool {
        if hour >= HOURS {
            return false;
        }
        let row = self.rows.entry(date).or_insert([Entry::from(0); HOURS]);
        row[hour] = value;
        true
    }

    pub fn day_total(&self, date: NaiveDate) -> Decimal {
        self.rows
            .get(&date)
            .map(|row| row.iter().map(Entry::value).fold(Decimal::ZERO, Decimal::saturating_add))
            .unwrap_or(Decimal::ZERO)
    }

    /// sum of all values for the dates in `start..=end`
    pub fn total_over(&self, start: NaiveDate, end: NaiveDate) -> Decimal {
        if end < start {
            return Decimal::ZERO;
        }
        self.rows
            .range(start..=end)
            .flat_map(|(_, row)| row.iter())
            .map(Entry::value)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// true when any cell holds a non-zero number
    pub fn has_data(&self) -> bool {
        self.rows
            .values()
            .flat_map(|row| row.iter())
            .any(|e| !e.value().is_zero())
    }

    /// table covering exactly `start..=end`, keeping rows still in range
    /// and filling new dates with `default`
    pub fn synced_to_period(&self, start: NaiveDate, end: NaiveDate, default: Entry) -> Self {
        let rows = days_inclusive(start, end)
            .map(|d| (d, self.rows.get(&d).copied().unwrap_or([default; HOURS])))
            .collect();
        Self { rows }
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.rows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl TryFrom<BTreeMap<String, Vec<Entry>>> for HourlyTable {
    type Error = CashFlowError;

    fn try_from(raw: BTreeMap<String, Vec<Entry>>) -> Result<Self> {
        let mut rows = BTreeMap::new();
        for (key, values) in raw {
            let date = parse_date_key(&key)?;
            if values.len() > HOURS {
                return Err(CashFlowError::InvalidHourlyRow {
                    date: key,
                    len: values.len(),
                });
            }
            let mut row = [Entry::EMPTY; HOURS];
            row[..values.len()].copy_from_slice(&values);
            rows.insert(date, row);
        }
        Ok(Self { rows })
    }
}

impl From<HourlyTable> for BTreeMap<String, Vec<Entry>> {
    fn from(table: HourlyTable) -> Self {
        table
            .rows
            .into_iter()
            .map(|(date, row)| (format_date(date), row.to_vec()))
            .collect()
    }
}

/// the three hourly inputs of a calculation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyTables {
    pub prices: HourlyTable,
    pub buy_volumes: HourlyTable,
    pub sell_volumes: HourlyTable,
}

impl HourlyTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// tables initialized from the flat defaults of a configuration
    pub fn for_config(config: &ContractConfig) -> Self {
        Self::default().sync_to_config(config)
    }

    pub fn volumes(&self, direction: Direction) -> &HourlyTable {
        match direction {
            Direction::Buy => &self.buy_volumes,
            Direction::Sell => &self.sell_volumes,
        }
    }

    pub fn volumes_mut(&mut self, direction: Direction) -> &mut HourlyTable {
        match direction {
            Direction::Buy => &mut self.buy_volumes,
            Direction::Sell => &mut self.sell_volumes,
        }
    }

    /// resize all three tables to the supply period, new dates take the flat defaults
    pub fn sync_to_config(&self, config: &ContractConfig) -> Self {
        let (start, end) = (config.supply.start, config.supply.end);
        Self {
            prices: self.prices.synced_to_period(start, end, config.pricing.plan_price),
            buy_volumes: self.buy_volumes.synced_to_period(start, end, config.buy.volume),
            sell_volumes: self.sell_volumes.synced_to_period(start, end, config.sell.volume),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_missing_values_read_as_zero() {
        let mut table = HourlyTable::new();
        let day = ymd(2025, 10, 1);

        assert_eq!(table.value(day, 3), Decimal::ZERO);

        table.set_cell(day, 3, Entry::EMPTY);
        assert_eq!(table.value(day, 3), Decimal::ZERO);
        assert_eq!(table.value(day, 99), Decimal::ZERO);
    }

    #[test]
    fn test_set_cell_creates_zero_row() {
        let mut table = HourlyTable::new();
        let day = ymd(2025, 10, 2);

        assert!(table.set_cell(day, 5, Entry::new(dec!(12.5))));
        let row = table.row(day).unwrap();
        assert_eq!(row[5].get(), Some(dec!(12.5)));
        assert_eq!(row[0].get(), Some(Decimal::ZERO));
        assert_eq!(table.day_total(day), dec!(12.5));

        assert!(!table.set_cell(day, 24, Entry::from(1)));
    }

    #[test]
    fn test_sync_preserves_overlap() {
        let mut table = HourlyTable::uniform(ymd(2025, 10, 1), ymd(2025, 10, 3), Entry::from(10));
        table.set_cell(ymd(2025, 10, 3), 0, Entry::from(99));

        let synced = table.synced_to_period(ymd(2025, 10, 3), ymd(2025, 10, 5), Entry::from(7));

        assert_eq!(synced.len(), 3);
        assert!(!synced.contains(ymd(2025, 10, 1)));
        assert_eq!(synced.value(ymd(2025, 10, 3), 0), dec!(99));
        assert_eq!(synced.value(ymd(2025, 10, 3), 1), dec!(10));
        assert_eq!(synced.value(ymd(2025, 10, 5), 23), dec!(7));
    }

    #[test]
    fn test_total_over_restricts_to_window() {
        let table = HourlyTable::uniform(ymd(2025, 9, 30), ymd(2025, 10, 2), Entry::from(1));

        assert_eq!(table.total_over(ymd(2025, 10, 1), ymd(2025, 10, 31)), dec!(48));
        assert_eq!(table.total_over(ymd(2025, 10, 2), ymd(2025, 10, 1)), Decimal::ZERO);
    }

    #[test]
    fn test_has_data() {
        let mut table = HourlyTable::uniform(ymd(2025, 10, 1), ymd(2025, 10, 1), Entry::EMPTY);
        assert!(!table.has_data());
        table.set_cell(ymd(2025, 10, 1), 0, Entry::from(0));
        assert!(!table.has_data());
        table.set_cell(ymd(2025, 10, 1), 1, Entry::from(3));
        assert!(table.has_data());
    }

    #[test]
    fn test_json_uses_date_keys() {
        let mut table = HourlyTable::new();
        table.set_cell(ymd(2025, 10, 1), 0, Entry::new(dec!(4800)));

        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("\"01.10.2025\""));

        let back: HourlyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_short_rows_are_padded_and_long_rows_rejected() {
        let table: HourlyTable = serde_json::from_str(r#"{"01.10.2025": ["5", null]}"#).unwrap();
        let row = table.row(ymd(2025, 10, 1)).unwrap();
        assert_eq!(row[0].get(), Some(dec!(5)));
        assert!(row[1].is_empty());
        assert!(row[23].is_empty());

        let long = format!(r#"{{"01.10.2025": [{}]}}"#, vec!["1"; 25].join(","));
        assert!(serde_json::from_str::<HourlyTable>(&long).is_err());
        assert!(serde_json::from_str::<HourlyTable>(r#"{"2025-10-01": []}"#).is_err());
    }

    #[test]
    fn test_tables_follow_config_defaults() {
        let mut config = ContractConfig::default();
        config.buy.volume = Entry::from(100);

        let tables = HourlyTables::for_config(&config);
        assert_eq!(tables.prices.len(), 31);
        assert_eq!(tables.prices.value(ymd(2025, 10, 15), 12), dec!(4800));
        assert_eq!(tables.volumes(Direction::Buy).value(ymd(2025, 10, 31), 23), dec!(100));
        assert!(tables.volumes(Direction::Sell).row(ymd(2025, 10, 1)).unwrap()[0].is_empty());
    }

    #[test]
    fn test_volumes_mut_edits_the_right_side() {
        let mut tables = HourlyTables::new();
        tables.volumes_mut(Direction::Sell).set_cell(ymd(2025, 10, 1), 3, Entry::from(7));

        assert_eq!(tables.sell_volumes.value(ymd(2025, 10, 1), 3), dec!(7));
        assert!(tables.buy_volumes.is_empty());
    }
}
