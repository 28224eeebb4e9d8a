use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use voyant_core::{Booking, Passenger};

use crate::payment::PaymentReceipt;

/// Everything a booking wizard has collected so far. Lives only as long as the wizard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingDraft {
    pub item_id: String,
    pub item_name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Rooms for hotels, cars for rentals. Seats and travelers follow the passenger list.
    pub quantity: u32,
    pub passengers: Vec<Passenger>,
    pub special_requests: String,
    pub pickup_location: Option<String>,
    pub dropoff_location: Option<String>,
}

impl BookingDraft {
    pub fn new(item_id: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            item_name: item_name.into(),
            quantity: 1,
            ..Default::default()
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_passenger(mut self, passenger: Passenger) -> Self {
        self.passengers.push(passenger);
        self
    }

    /// Applies a date change the way the stay forms do: an end date before the start date
    /// is cleared and an alert comes back instead of a negative duration.
    pub fn set_dates(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<String> {
        self.start_date = start;
        self.end_date = end;
        match (start, end) {
            (Some(start), Some(end)) if end < start => {
                self.end_date = None;
                Some("End date cannot be before start date".to_string())
            }
            _ => None,
        }
    }

    pub fn complete_passengers(&self) -> usize {
        self.passengers.iter().filter(|p| p.is_complete()).count()
    }

    pub fn special_requests(&self) -> Option<String> {
        let trimmed = self.special_requests.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Data handed from one view to the next by the router. Never persisted, so a reload
/// of `/payment` or `/receipt` arrives with an empty state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NavigationState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking: Option<Booking>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentReceipt>,
}

impl NavigationState {
    pub fn for_payment(booking: Booking) -> Self {
        Self {
            booking: Some(booking),
            payment: None,
        }
    }

    pub fn for_receipt(booking: Booking, payment: PaymentReceipt) -> Self {
        Self {
            booking: Some(booking),
            payment: Some(payment),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.booking.is_none() && self.payment.is_none()
    }
}

/// Holds a step in its in-flight state across an await. If the future is dropped before
/// [`InFlight::settle`], the step falls back to `fallback`.
pub(crate) struct InFlight<'a, S: Copy> {
    slot: &'a mut S,
    fallback: S,
    settled: bool,
}

impl<'a, S: Copy> InFlight<'a, S> {
    pub(crate) fn enter(slot: &'a mut S, in_flight: S, fallback: S) -> Self {
        *slot = in_flight;
        Self {
            slot,
            fallback,
            settled: false,
        }
    }

    /// The call resolved; the caller sets the final state itself.
    pub(crate) fn settle(mut self) {
        self.settled = true;
    }
}

impl<S: Copy> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if !self.settled {
            *self.slot = self.fallback;
        }
    }
}
