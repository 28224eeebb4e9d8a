pub mod booking;
pub mod identity;
pub mod payment;
pub mod wire;

pub use booking::{Booking, BookingGateway, BookingStatus, BookingType, CreateBookingRequest, Passenger};
pub use identity::{Credentials, RegistrationForm, Role, RoleFlags, TokenPair, User};
pub use payment::{CreatePaymentRequest, Payment, PaymentGateway, PaymentMethod, PaymentStatus};

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Session expired")]
    SessionExpired,
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl CoreError {
    /// The string a form shows inline after a failed action.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::ValidationError(msg) | CoreError::Rejected(msg) => msg.clone(),
            CoreError::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            CoreError::Unavailable(msg) | CoreError::InternalError(msg) => msg.clone(),
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
