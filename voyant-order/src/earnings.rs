use serde::Serialize;
use voyant_core::{Booking, BookingStatus};
use voyant_catalog::pricing::commission;
use voyant_shared::{format_currency, Money};

/// Commission earned on one confirmed booking.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommissionLine {
    pub booking_id: Option<String>,
    pub item_name: Option<String>,
    pub sale: Money,
    pub rate: f64,
    pub commission: Money,
}

/// Organizer dashboard totals over the bookings made on their packages.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrganizerEarnings {
    pub lines: Vec<CommissionLine>,
    pub total_sales: Money,
    pub total_commission: Money,
    pub pending_bookings: usize,
    pub cancelled_bookings: usize,
    pub currency: String,
}

impl OrganizerEarnings {
    /// Only confirmed bookings earn commission. Pending and cancelled ones are counted, not paid.
    pub fn from_bookings<R>(bookings: &[Booking], currency: &str, rate_for: R) -> Self
    where
        R: Fn(&Booking) -> f64,
    {
        let mut lines = Vec::new();
        let mut pending_bookings = 0;
        let mut cancelled_bookings = 0;

        for booking in bookings {
            match booking.status {
                BookingStatus::Pending => pending_bookings += 1,
                BookingStatus::Cancelled => cancelled_bookings += 1,
                BookingStatus::Confirmed => {
                    let rate = rate_for(booking);
                    lines.push(CommissionLine {
                        booking_id: booking.id.clone(),
                        item_name: booking.item_name.clone(),
                        sale: booking.total,
                        rate,
                        commission: commission(booking.total, rate),
                    });
                }
            }
        }

        Self {
            total_sales: lines.iter().map(|l| l.sale).sum(),
            total_commission: lines.iter().map(|l| l.commission).sum(),
            lines,
            pending_bookings,
            cancelled_bookings,
            currency: currency.to_string(),
        }
    }

    pub fn formatted_commission(&self) -> String {
        format_currency(self.total_commission, &self.currency)
    }
}
