use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Mul};

/// A monetary amount held in minor units (cents).
///
/// The backend speaks decimal strings (`"150.00"`) and occasionally bare numbers,
/// both deserialize into the same value. Serialization always emits a two-place
/// decimal string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Saturates at the `i64` bounds; use [`Money::checked_from_major`] for untrusted input.
    pub fn from_major(major: i64) -> Self {
        Self(major.saturating_mul(100))
    }

    pub fn checked_from_major(major: i64) -> Option<Self> {
        major.checked_mul(100).map(Self)
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    pub fn checked_mul(self, rhs: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(rhs)).map(Money)
    }

    pub fn minor(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// `pct` percent of this amount, rounded to the nearest cent.
    pub fn percent(&self, pct: f64) -> Money {
        Money((self.0 as f64 * pct / 100.0).round() as i64)
    }

    pub fn from_f64(value: f64) -> Self {
        Money((value * 100.0).round() as i64)
    }

    pub fn parse(raw: &str) -> Result<Self, MoneyError> {
        let trimmed = raw.trim();
        let invalid = || MoneyError::InvalidAmount(raw.to_string());

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if unsigned.is_empty() {
            return Err(invalid());
        }

        let (whole, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        let whole_digits = if whole.is_empty() { "0" } else { whole };
        if !whole_digits.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let major: i64 = whole_digits.parse().map_err(|_| invalid())?;
        let mut frac_digits = frac.bytes().map(|b| (b - b'0') as i64);
        let tens = frac_digits.next().unwrap_or(0);
        let units = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().map(|d| d >= 5).unwrap_or(false);

        let minor = major
            .checked_mul(100)
            .and_then(|m| m.checked_add(tens * 10 + units + i64::from(round_up)))
            .ok_or_else(invalid)?;

        Ok(Money(if negative { -minor } else { minor }))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0.saturating_mul(i64::from(rhs)))
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Int(i64),
            Float(f64),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Text(s) => Money::parse(&s).map_err(de::Error::custom),
            Wire::Int(i) => Money::checked_from_major(i)
                .ok_or_else(|| de::Error::custom(format!("Amount out of range: {}", i))),
            Wire::Float(f) => Ok(Money::from_f64(f)),
        }
    }
}

/// Formats an amount the way the storefront displays prices: `$150.00`, `€1,250.50`,
/// or `KES 300.00` for currencies without a dedicated symbol.
pub fn format_currency(amount: Money, currency: &str) -> String {
    let code = currency.trim().to_ascii_uppercase();
    let prefix = match code.as_str() {
        "USD" | "" => "$".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        "INR" => "₹".to_string(),
        other => format!("{} ", other),
    };

    let abs = amount.minor().unsigned_abs();
    let sign = if amount.minor() < 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, prefix, group_thousands(abs / 100), abs % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_strings() {
        assert_eq!(Money::parse("150.00").unwrap().minor(), 15000);
        assert_eq!(Money::parse("150.5").unwrap().minor(), 15050);
        assert_eq!(Money::parse("150").unwrap().minor(), 15000);
        assert_eq!(Money::parse("0.999").unwrap().minor(), 100);
        assert_eq!(Money::parse("-3.20").unwrap().minor(), -320);
        assert!(Money::parse("12,00").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_wire_formats() {
        let from_str: Money = serde_json::from_str("\"99.90\"").unwrap();
        let from_int: Money = serde_json::from_str("99").unwrap();
        let from_float: Money = serde_json::from_str("99.9").unwrap();
        assert_eq!(from_str.minor(), 9990);
        assert_eq!(from_int.minor(), 9900);
        assert_eq!(from_float.minor(), 9990);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"99.90\"");
    }

    #[test]
    fn test_out_of_range_amounts_are_errors() {
        assert!(serde_json::from_str::<Money>("100000000000000000").is_err());
        assert!(serde_json::from_str::<Money>("\"100000000000000000.00\"").is_err());
        assert!(Money::parse("92233720368547758.079").is_err());
        assert_eq!(Money::from_minor(i64::MAX).checked_add(Money::from_minor(1)), None);
        assert_eq!(Money::from_minor(i64::MAX).checked_mul(2), None);
        assert_eq!(Money::from_major(3).checked_mul(4), Some(Money::from_major(12)));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Money::from_major(150), "USD"), "$150.00");
        assert_eq!(format_currency(Money::from_minor(125050), "eur"), "€1,250.50");
        assert_eq!(format_currency(Money::from_major(300), "KES"), "KES 300.00");
        assert_eq!(format_currency(Money::from_major(1_000_000), "USD"), "$1,000,000.00");
    }

    #[test]
    fn test_percent_rounds_to_cent() {
        assert_eq!(Money::from_major(200).percent(12.5).minor(), 2500);
        assert_eq!(Money::from_minor(333).percent(10.0).minor(), 33);
    }
}
