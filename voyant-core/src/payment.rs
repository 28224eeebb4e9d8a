use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voyant_shared::Money;

use crate::CoreResult;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    #[serde(alias = "SUCCEEDED", alias = "SUCCESS")]
    Completed,
    Failed,
    Refunded,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[serde(alias = "CREDIT_CARD")]
    Card,
    Paypal,
    BankTransfer,
    MobileMoney,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Card,
        PaymentMethod::Paypal,
        PaymentMethod::BankTransfer,
        PaymentMethod::MobileMoney,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Paypal => "PayPal",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::MobileMoney => "Mobile Money",
        }
    }

    pub fn requires_card_details(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

/// Server response from the (mock) payment endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    #[serde(default, deserialize_with = "crate::wire::opt_id")]
    pub id: Option<String>,
    #[serde(default, alias = "reference")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub amount: Money,
    #[serde(default = "crate::booking::default_currency")]
    pub currency: String,
    #[serde(default, alias = "payment_method")]
    pub method: Option<PaymentMethod>,
    #[serde(default = "default_status")]
    pub status: PaymentStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_status() -> PaymentStatus {
    PaymentStatus::Pending
}

/// Payload for `POST /payments/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreatePaymentRequest {
    pub booking_id: String,
    pub amount: Money,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub idempotency_key: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Submit a payment for a booking. The backend in this storefront is a mock processor.
    async fn create_payment(&self, request: &CreatePaymentRequest) -> CoreResult<Payment>;
}
