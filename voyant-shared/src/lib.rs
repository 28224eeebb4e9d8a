pub mod money;
pub mod pii;

pub use money::{format_currency, Money, MoneyError};
pub use pii::Masked;
