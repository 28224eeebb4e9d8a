use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use voyant_core::{
    Booking, CoreError, CreatePaymentRequest, Payment, PaymentGateway, PaymentMethod, PaymentStatus,
};
use voyant_shared::{format_currency, Masked, Money};

use crate::models::{InFlight, NavigationState};

pub const PAYMENT_FAILED_FALLBACK: &str = "Payment failed. Please try again.";

/// Raw card fields. Only presence is checked: the processor behind this form is a mock.
#[derive(Debug, Clone, Default)]
pub struct CardDetails {
    pub number: Masked<String>,
    pub holder_name: String,
    pub expiry: Masked<String>,
    pub cvv: Masked<String>,
}

impl CardDetails {
    fn missing_field(&self) -> Option<&'static str> {
        if self.number.is_blank() {
            Some("card number")
        } else if self.holder_name.trim().is_empty() {
            Some("cardholder name")
        } else if self.expiry.is_blank() {
            Some("expiry date")
        } else if self.cvv.is_blank() {
            Some("CVV")
        } else {
            None
        }
    }
}

/// Server payment merged with display-only fields. Travels to the receipt in navigation state
/// and is never sent back to the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentReceipt {
    pub payment_id: Option<String>,
    pub transaction_id: String,
    pub amount: Money,
    pub currency: String,
    pub method: PaymentMethod,
    pub method_label: String,
    pub status: PaymentStatus,
    pub card_hint: Option<String>,
    pub paid_at: DateTime<Utc>,
}

impl PaymentReceipt {
    /// Fills whatever the mock backend left out from what the client submitted.
    pub fn enrich(
        payment: Payment,
        request: &CreatePaymentRequest,
        card_hint: Option<String>,
        paid_at: DateTime<Utc>,
    ) -> Self {
        let method = payment.method.unwrap_or(request.payment_method);
        let amount = if payment.amount.is_positive() {
            payment.amount
        } else {
            request.amount
        };
        Self {
            payment_id: payment.id,
            transaction_id: payment
                .transaction_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(fallback_transaction_id),
            amount,
            currency: payment.currency,
            method,
            method_label: method.label().to_string(),
            status: payment.status,
            card_hint,
            paid_at: payment.created_at.unwrap_or(paid_at),
        }
    }

    pub fn formatted_amount(&self) -> String {
        format_currency(self.amount, &self.currency)
    }
}

/// `TXN-` followed by eight random upper-case alphanumerics.
pub fn fallback_transaction_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    format!("TXN-{}", suffix.to_uppercase())
}

/// `booking-<id>-<unix millis>`.
pub fn idempotency_key(booking_id: &str, at: DateTime<Utc>) -> String {
    format!("booking-{}-{}", booking_id, at.timestamp_millis())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStepState {
    /// No usable booking arrived; nothing can be submitted.
    InvalidBooking,
    Ready,
    Processing,
    Paid,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum PaymentStepError {
    #[error("Invalid booking. Please start your booking again.")]
    InvalidBooking,
    #[error("Please enter the {0}")]
    MissingCardField(&'static str),
    #[error("A payment is already being processed")]
    InProgress,
    #[error("This booking has already been paid")]
    AlreadyPaid,
    #[error("{0}")]
    Failed(String),
    #[error("Session expired")]
    SessionExpired,
}

/// The payment screen: method choice, card fields, one submission per click.
pub struct PaymentStep {
    booking: Option<Booking>,
    method: PaymentMethod,
    card: CardDetails,
    state: PaymentStepState,
    error: Option<String>,
}

impl PaymentStep {
    /// Opens the step from navigation state. A booking without an id or with a non-positive
    /// total puts the step straight into its terminal invalid state.
    pub fn new(booking: Option<Booking>) -> Self {
        let state = match &booking {
            Some(booking) if booking.is_payable() => PaymentStepState::Ready,
            _ => PaymentStepState::InvalidBooking,
        };
        Self {
            booking,
            method: PaymentMethod::Card,
            card: CardDetails::default(),
            state,
            error: None,
        }
    }

    pub fn from_navigation(state: &NavigationState) -> Self {
        Self::new(state.booking.clone())
    }

    pub fn state(&self) -> PaymentStepState {
        self.state
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn select_method(&mut self, method: PaymentMethod) {
        self.method = method;
    }

    pub fn set_card(&mut self, card: CardDetails) {
        self.card = card;
    }

    pub fn amount_due(&self) -> Option<String> {
        self.booking
            .as_ref()
            .map(|b| format_currency(b.total, &b.currency))
    }

    pub async fn submit(&mut self, gateway: &dyn PaymentGateway) -> Result<NavigationState, PaymentStepError> {
        self.submit_at(gateway, Utc::now()).await
    }

    /// Same as [`PaymentStep::submit`] with an explicit clock.
    pub async fn submit_at(
        &mut self,
        gateway: &dyn PaymentGateway,
        now: DateTime<Utc>,
    ) -> Result<NavigationState, PaymentStepError> {
        let booking = match (&self.state, &self.booking) {
            (PaymentStepState::InvalidBooking, _) | (_, None) => {
                return Err(PaymentStepError::InvalidBooking)
            }
            (PaymentStepState::Processing, _) => return Err(PaymentStepError::InProgress),
            (PaymentStepState::Paid, _) => return Err(PaymentStepError::AlreadyPaid),
            (_, Some(booking)) => booking.clone(),
        };
        let booking_id = booking.id.clone().ok_or(PaymentStepError::InvalidBooking)?;

        if self.method.requires_card_details() {
            if let Some(field) = self.card.missing_field() {
                let err = PaymentStepError::MissingCardField(field);
                self.error = Some(err.to_string());
                return Err(err);
            }
        }

        let request = CreatePaymentRequest {
            booking_id: booking_id.clone(),
            amount: booking.total,
            currency: booking.currency.clone(),
            payment_method: self.method,
            idempotency_key: idempotency_key(&booking_id, now),
        };

        self.error = None;
        info!(
            "Submitting {} payment of {} for booking {}",
            self.method.label(),
            booking.total,
            booking_id
        );

        let in_flight = InFlight::enter(
            &mut self.state,
            PaymentStepState::Processing,
            PaymentStepState::Ready,
        );
        let result = gateway.create_payment(&request).await;
        in_flight.settle();

        match result {
            Ok(payment) => {
                let card_hint = self
                    .method
                    .requires_card_details()
                    .then(|| self.card.number.hint());
                let receipt = PaymentReceipt::enrich(payment, &request, card_hint, now);
                info!("Payment recorded: {}", receipt.transaction_id);
                self.state = PaymentStepState::Paid;
                Ok(NavigationState::for_receipt(booking, receipt))
            }
            Err(CoreError::SessionExpired) => {
                self.state = PaymentStepState::Ready;
                Err(PaymentStepError::SessionExpired)
            }
            Err(err) => {
                let message = err.user_message();
                let message = if message.trim().is_empty() {
                    PAYMENT_FAILED_FALLBACK.to_string()
                } else {
                    message
                };
                warn!("Payment for booking {} failed: {}", booking_id, message);
                self.state = PaymentStepState::Ready;
                self.error = Some(message.clone());
                Err(PaymentStepError::Failed(message))
            }
        }
    }
}
