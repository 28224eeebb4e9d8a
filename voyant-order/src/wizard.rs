use tracing::{info, warn};
use voyant_catalog::{PriceQuote, PricingError};
use voyant_core::{Booking, BookingGateway, CoreError};

use crate::flows::ProductFlow;
use crate::models::{BookingDraft, InFlight};

pub const BOOKING_FAILED_FALLBACK: &str = "Booking failed. Please try again.";

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    /// Step 1: traveler details, dates, quantities.
    Details,
    /// Step 2: read-only summary with the price preview.
    Review,
    Submitting,
    /// The booking exists on the server; the wizard is done.
    Completed,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("{0}")]
    Validation(String),
    #[error("Cannot {action} from the {step:?} step")]
    InvalidTransition { action: &'static str, step: WizardStep },
    #[error("{0}")]
    Submission(String),
    #[error("Session expired")]
    SessionExpired,
}

impl From<PricingError> for WizardError {
    fn from(err: PricingError) -> Self {
        WizardError::Validation(err.to_string())
    }
}

/// Linear booking flow shared by every product: Details → Review → Completed.
///
/// Failed validation keeps the wizard on Details; a failed submission returns it to
/// Review with the message set and all data intact, ready for another attempt.
pub struct BookingWizard<F: ProductFlow> {
    flow: F,
    draft: BookingDraft,
    step: WizardStep,
    quote: Option<PriceQuote>,
    error: Option<String>,
    booking: Option<Booking>,
}

impl<F: ProductFlow> BookingWizard<F> {
    pub fn new(flow: F, draft: BookingDraft) -> Self {
        Self {
            flow,
            draft,
            step: WizardStep::Details,
            quote: None,
            error: None,
            booking: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn flow(&self) -> &F {
        &self.flow
    }

    /// Inline message for the current step, if the last action failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Quote fixed when the wizard entered Review.
    pub fn quote(&self) -> Option<&PriceQuote> {
        self.quote.as_ref()
    }

    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    /// Live preview while the user is still typing on the details step.
    pub fn preview(&self) -> Option<PriceQuote> {
        self.flow.compute_total(&self.draft).ok()
    }

    /// Edits are only accepted on the details step.
    pub fn edit<R>(&mut self, apply: impl FnOnce(&mut BookingDraft) -> R) -> Result<R, WizardError> {
        if self.step != WizardStep::Details {
            return Err(WizardError::InvalidTransition {
                action: "edit",
                step: self.step,
            });
        }
        Ok(apply(&mut self.draft))
    }

    /// "Next": validate locally and move to Review.
    pub fn next(&mut self) -> Result<&PriceQuote, WizardError> {
        if self.step != WizardStep::Details {
            return Err(WizardError::InvalidTransition {
                action: "advance",
                step: self.step,
            });
        }

        let quote = match self
            .flow
            .validate(&self.draft)
            .and_then(|_| self.flow.compute_total(&self.draft))
        {
            Ok(quote) => quote,
            Err(err) => {
                self.error = Some(err.to_string());
                return Err(err);
            }
        };

        self.error = None;
        self.step = WizardStep::Review;
        Ok(self.quote.insert(quote))
    }

    /// "Previous": back to Details with everything retained.
    pub fn previous(&mut self) -> Result<(), WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::InvalidTransition {
                action: "go back",
                step: self.step,
            });
        }
        self.step = WizardStep::Details;
        self.error = None;
        Ok(())
    }

    /// "Complete Booking": one call to the booking API, no automatic retry.
    pub async fn submit(&mut self, gateway: &dyn BookingGateway) -> Result<Booking, WizardError> {
        if self.step != WizardStep::Review {
            return Err(WizardError::InvalidTransition {
                action: "submit",
                step: self.step,
            });
        }
        let quote = match &self.quote {
            Some(quote) => quote.clone(),
            None => self.flow.compute_total(&self.draft)?,
        };

        let payload = self.flow.build_payload(&self.draft, &quote);
        self.error = None;
        info!(
            "Submitting {:?} booking for item {} ({} travelers)",
            payload.booking_type,
            payload.item_id,
            payload.passengers.len()
        );

        let in_flight = InFlight::enter(&mut self.step, WizardStep::Submitting, WizardStep::Review);
        let result = gateway.create_booking(&payload).await;
        in_flight.settle();

        match result {
            Ok(booking) => {
                info!("Booking created: {:?}", booking.id);
                self.step = WizardStep::Completed;
                self.booking = Some(booking.clone());
                Ok(booking)
            }
            Err(CoreError::SessionExpired) => {
                warn!("Booking submission hit an expired session");
                self.step = WizardStep::Review;
                Err(WizardError::SessionExpired)
            }
            Err(err) => {
                let message = err.user_message();
                let message = if message.trim().is_empty() {
                    BOOKING_FAILED_FALLBACK.to_string()
                } else {
                    message
                };
                warn!("Booking submission failed: {}", message);
                self.step = WizardStep::Review;
                self.error = Some(message.clone());
                Err(WizardError::Submission(message))
            }
        }
    }
}
