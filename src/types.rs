use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// side of the contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// we buy power and pay out
    Buy,
    /// we sell power and receive
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "buy"),
            Direction::Sell => write!(f, "sell"),
        }
    }
}

/// how a discount modifies the base price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiscountUnit {
    /// price * (1 + magnitude / 100)
    #[default]
    Percent,
    /// price + magnitude, in contract currency per MWh
    Additive,
    /// magnitude replaces the price
    Fixed,
}

/// discount applied to a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Discount {
    pub unit: DiscountUnit,
    pub magnitude: Entry,
}

impl Discount {
    pub fn new(unit: DiscountUnit, magnitude: impl Into<Entry>) -> Self {
        Self {
            unit,
            magnitude: magnitude.into(),
        }
    }

    pub fn percent(magnitude: Decimal) -> Self {
        Self::new(DiscountUnit::Percent, magnitude)
    }

    pub fn additive(magnitude: Decimal) -> Self {
        Self::new(DiscountUnit::Additive, magnitude)
    }

    pub fn fixed(price: Decimal) -> Self {
        Self::new(DiscountUnit::Fixed, price)
    }
}

/// price input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceMode {
    #[default]
    Single,
    Hourly,
}

/// volume input mode, per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VolumeMode {
    #[default]
    Single,
    Hourly,
}

/// when money changes hands relative to delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMode {
    /// advance payment covering a forward window
    #[default]
    Prepay,
    /// settlement after delivery
    Postpay,
}

/// postpay settlement cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostpayType {
    /// one settlement per supply day, shifted by a day offset
    #[default]
    Days,
    /// one settlement per ten-day period of the month
    Decade,
}

/// largest day offset read from an [`Entry`], about ten years
pub const MAX_DAY_OFFSET: i64 = 3660;

/// numeric input that keeps "left blank" distinct from zero.
/// calculations read it through [`Entry::value`], which treats blank as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entry(Option<Decimal>);

impl Entry {
    pub const EMPTY: Entry = Entry(None);

    pub fn new(value: Decimal) -> Self {
        Entry(Some(value))
    }

    /// parse raw user input: blank stays blank, garbage becomes zero
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Entry::EMPTY;
        }
        let normalized = trimmed.replace(',', ".");
        Entry(Some(Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<Decimal> {
        self.0
    }

    /// numeric value, blank reads as zero
    pub fn value(&self) -> Decimal {
        self.0.unwrap_or(Decimal::ZERO)
    }

    /// whole days, fractional part truncated, clamped to [`MAX_DAY_OFFSET`]
    pub fn days(&self) -> i64 {
        let bound = Decimal::from(MAX_DAY_OFFSET);
        self.value().trunc().clamp(-bound, bound).to_i64().unwrap_or(0)
    }
}

impl From<Decimal> for Entry {
    fn from(d: Decimal) -> Self {
        Entry::new(d)
    }
}

impl From<i64> for Entry {
    fn from(i: i64) -> Self {
        Entry::new(Decimal::from(i))
    }
}

impl From<Option<Decimal>> for Entry {
    fn from(value: Option<Decimal>) -> Self {
        Entry(value)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(d) => write!(f, "{}", d),
            None => Ok(()),
        }
    }
}
