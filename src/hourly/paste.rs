use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::calendar::HOURS_PER_DAY;
use crate::hourly::HourlyTable;
use crate::types::Entry;

/// rows on newlines, cells on tabs; blank lines dropped, bad cells read as zero
pub fn parse_paste_grid(text: &str) -> Vec<Vec<Decimal>> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split('\t').map(parse_cell).collect())
        .collect()
}

fn parse_cell(cell: &str) -> Decimal {
    let cleaned: String = cell
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned == "-" {
        return Decimal::ZERO;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

/// write pasted text through [`HourlyTable::set_cell`] from `start_date` /
/// `start_hour`, rows down `dates` and cells across hours.
/// cells past hour 23 or the last date are skipped. returns cells written
pub fn apply_paste(
    table: &mut HourlyTable,
    dates: &[NaiveDate],
    start_date: NaiveDate,
    start_hour: usize,
    text: &str,
) -> usize {
    let Some(first_index) = dates.iter().position(|d| *d == start_date) else {
        return 0;
    };

    let mut written = 0;
    for (row_offset, cells) in parse_paste_grid(text).into_iter().enumerate() {
        let Some(date) = dates.get(first_index + row_offset) else {
            break;
        };
        for (cell_offset, value) in cells.into_iter().enumerate() {
            let hour = start_hour + cell_offset;
            if hour >= HOURS_PER_DAY as usize {
                break;
            }
            if table.set_cell(*date, hour, Entry::new(value)) {
                written += 1;
            }
        }
    }

    tracing::debug!(anchor = %start_date, start_hour, written, "applied pasted hourly values");
    written
}
