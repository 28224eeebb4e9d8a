use serde::Serialize;
use voyant_core::booking::BookingUser;
use voyant_core::{Booking, BookingStatus, BookingType, Passenger};
use voyant_shared::format_currency;

use crate::models::NavigationState;
use crate::payment::PaymentReceipt;

const NOT_AVAILABLE: &str = "N/A";

/// Customer fields printed on the receipt, always filled.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Traveler that represents the customer for each booking shape the backend produces.
fn lead_traveler(booking: &Booking) -> Option<&Passenger> {
    match booking.booking_type {
        BookingType::Flight => booking.passengers.first(),
        BookingType::Hotel => booking.guests.first(),
        BookingType::Car => booking.driver.as_ref().or_else(|| booking.passengers.first()),
        BookingType::Package => booking.travelers.first(),
        BookingType::Other => booking
            .passengers
            .first()
            .or_else(|| booking.guests.first())
            .or_else(|| booking.travelers.first()),
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn user_name(user: &BookingUser) -> Option<String> {
    let full = format!(
        "{} {}",
        user.first_name.as_deref().unwrap_or_default(),
        user.last_name.as_deref().unwrap_or_default()
    );
    non_empty(Some(full.as_str())).or_else(|| non_empty(user.username.as_deref()))
}

impl CustomerDetails {
    /// Booking-level fields, then the account owner, then the lead traveler, then `N/A`.
    pub fn from_booking(booking: &Booking) -> Self {
        let user = booking.user.as_ref();
        let lead = lead_traveler(booking);

        let name = non_empty(booking.customer_name.as_deref())
            .or_else(|| user.and_then(user_name))
            .or_else(|| lead.and_then(|p| non_empty(Some(p.name.as_str()))));
        let email = non_empty(booking.customer_email.as_deref())
            .or_else(|| user.and_then(|u| non_empty(u.email.as_deref())))
            .or_else(|| lead.and_then(|p| non_empty(Some(p.email.as_str()))));
        let phone = non_empty(booking.customer_phone.as_deref())
            .or_else(|| user.and_then(|u| non_empty(u.phone.as_deref())))
            .or_else(|| lead.and_then(|p| non_empty(p.phone.as_deref())));

        Self {
            name: name.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: email.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            phone: phone.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

/// Everything the receipt screen prints, already formatted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReceiptModel {
    pub booking_reference: String,
    pub booking_type: String,
    pub status: BookingStatus,
    pub item_name: String,
    pub dates: Option<String>,
    pub travelers: usize,
    pub customer: CustomerDetails,
    pub total: String,
    pub payment_method: String,
    pub card_hint: Option<String>,
    pub transaction_id: String,
    pub amount_paid: String,
    pub paid_at: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ReceiptView {
    /// Direct visit or reload: nothing arrived through navigation state.
    NoBookingFound { home_link: &'static str },
    Receipt(Box<ReceiptModel>),
}

impl ReceiptView {
    pub fn render(booking: Option<&Booking>, payment: Option<&PaymentReceipt>) -> Self {
        let (booking, payment) = match (booking, payment) {
            (Some(booking), Some(payment)) => (booking, payment),
            _ => return ReceiptView::NoBookingFound { home_link: "/" },
        };

        let travelers = match booking.booking_type {
            BookingType::Flight => booking.passengers.len(),
            BookingType::Hotel => booking.guests.len(),
            BookingType::Car => usize::from(booking.driver.is_some() || !booking.passengers.is_empty()),
            BookingType::Package => booking.travelers.len(),
            BookingType::Other => booking.passengers.len() + booking.guests.len() + booking.travelers.len(),
        };

        let dates = match (booking.start_date, booking.end_date) {
            (Some(start), Some(end)) if start != end => {
                Some(format!("{} – {}", start.format("%b %-d, %Y"), end.format("%b %-d, %Y")))
            }
            (Some(start), _) => Some(start.format("%b %-d, %Y").to_string()),
            _ => None,
        };

        ReceiptView::Receipt(Box::new(ReceiptModel {
            booking_reference: booking
                .id
                .as_deref()
                .map(|id| format!("#{}", id))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            booking_type: booking.booking_type.label().to_string(),
            status: booking.status,
            item_name: non_empty(booking.item_name.as_deref())
                .unwrap_or_else(|| booking.booking_type.label().to_string()),
            dates,
            travelers,
            customer: CustomerDetails::from_booking(booking),
            total: format_currency(booking.total, &booking.currency),
            payment_method: payment.method_label.clone(),
            card_hint: payment.card_hint.clone(),
            transaction_id: payment.transaction_id.clone(),
            amount_paid: payment.formatted_amount(),
            paid_at: payment.paid_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }))
    }

    pub fn from_navigation(state: &NavigationState) -> Self {
        Self::render(state.booking.as_ref(), state.payment.as_ref())
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ReceiptView::NoBookingFound { .. })
    }
}
