use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use voyant_shared::{format_currency, Money};

pub const MS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("End date cannot be before start date")]
    InvalidRange,
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("Total is too large")]
    AmountOverflow,
}

/// Whole days between two instants, rounded up: `ceil((end - start) / 86_400_000ms)`.
pub fn days_between(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds();
    let whole = ms.div_euclid(MS_PER_DAY);
    if ms.rem_euclid(MS_PER_DAY) > 0 {
        whole + 1
    } else {
        whole
    }
}

/// Days charged for a rental or stay. Never less than one.
pub fn billable_days(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<u32, PricingError> {
    if end < start {
        return Err(PricingError::InvalidRange);
    }
    Ok(days_between(start, end).max(1) as u32)
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// A date-only stay or rental window, as picked in the booking forms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StayWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl StayWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PricingError> {
        if end < start {
            return Err(PricingError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Nights for a hotel, days for a car. `max(ceil(diff), 1)`.
    pub fn billable_days(&self) -> u32 {
        days_between(midnight(self.start), midnight(self.end)).max(1) as u32
    }

    pub fn tour_duration(&self) -> TourDuration {
        let duration_days = days_between(midnight(self.start), midnight(self.end)) as u32 + 1;
        TourDuration {
            duration_days,
            nights: duration_days - 1,
        }
    }
}

/// Length of a tour package, counted inclusively: Jan 1 to Jan 5 is 5 days, 4 nights.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TourDuration {
    pub duration_days: u32,
    pub nights: u32,
}

/// Advisory client-side price preview. The server's total on the created booking wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceQuote {
    pub unit_rate: Money,
    /// Days or nights charged; 1 for products not priced by time.
    pub units: u32,
    pub quantity: u32,
    pub total: Money,
    pub currency: String,
}

impl PriceQuote {
    /// `rate × max(days, 1) × quantity`, used for cars and hotel rooms.
    pub fn per_day(rate: Money, days: u32, quantity: u32, currency: &str) -> Result<Self, PricingError> {
        if quantity == 0 {
            return Err(PricingError::InvalidQuantity);
        }
        let units = days.max(1);
        Ok(Self {
            unit_rate: rate,
            units,
            quantity,
            total: rate
                .checked_mul(units)
                .and_then(|subtotal| subtotal.checked_mul(quantity))
                .ok_or(PricingError::AmountOverflow)?,
            currency: currency.to_string(),
        })
    }

    /// `price × quantity`, used for flight seats and tour travelers.
    pub fn per_unit(price: Money, quantity: u32, currency: &str) -> Result<Self, PricingError> {
        if quantity == 0 {
            return Err(PricingError::InvalidQuantity);
        }
        Ok(Self {
            unit_rate: price,
            units: 1,
            quantity,
            total: price.checked_mul(quantity).ok_or(PricingError::AmountOverflow)?,
            currency: currency.to_string(),
        })
    }

    pub fn formatted_total(&self) -> String {
        format_currency(self.total, &self.currency)
    }
}

/// Organizer commission on a sale: `price × pct / 100`, rounded to the cent.
pub fn commission(price: Money, pct: f64) -> Money {
    price.percent(pct.max(0.0))
}
