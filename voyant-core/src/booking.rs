use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use voyant_shared::Money;

use crate::CoreResult;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
}

/// Which product a booking was made for. The backend shape of the booking differs per type.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingType {
    Flight,
    Hotel,
    Car,
    #[serde(alias = "TOUR", alias = "TOUR_PACKAGE")]
    Package,
    #[default]
    #[serde(other)]
    Other,
}

impl BookingType {
    pub fn label(&self) -> &'static str {
        match self {
            BookingType::Flight => "Flight",
            BookingType::Hotel => "Hotel",
            BookingType::Car => "Car Rental",
            BookingType::Package => "Tour Package",
            BookingType::Other => "Booking",
        }
    }
}

/// A traveler attached to a booking: flight passenger, hotel guest, car driver or tour traveler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Passenger {
    #[serde(default, alias = "full_name")]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passport_number: Option<String>,
}

impl Passenger {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Name and email are the two fields every product requires.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// Account owner embedded in some booking payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookingUser {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Server-owned booking. Read-only on the client once created.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(default, deserialize_with = "crate::wire::opt_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default, alias = "total_price")]
    pub total: Money,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub booking_type: BookingType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub guests: Vec<Passenger>,
    #[serde(default)]
    pub travelers: Vec<Passenger>,
    #[serde(default)]
    pub driver: Option<Passenger>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub user: Option<BookingUser>,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}

pub fn default_currency() -> String {
    "USD".to_string()
}

impl Booking {
    /// A booking can be paid for only once the server has assigned an id and a positive total.
    pub fn is_payable(&self) -> bool {
        self.id.is_some() && self.total.is_positive() && self.status != BookingStatus::Cancelled
    }

    pub fn is_cancellable(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }
}

/// Payload for `POST /booking/bookings/`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreateBookingRequest {
    pub booking_type: BookingType,
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub quantity: u32,
    pub passengers: Vec<Passenger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    /// Client-side preview. The server computes the authoritative total.
    pub total_price: Money,
    pub currency: String,
    /// Product-specific fields (rooms, pickup location, duration_days, ...).
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

#[async_trait]
pub trait BookingGateway: Send + Sync {
    /// Create a booking on the backend and return the server's view of it.
    async fn create_booking(&self, request: &CreateBookingRequest) -> CoreResult<Booking>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_from_backend_shape() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": 31,
            "status": "CONFIRMED",
            "total_price": "450.00",
            "currency": "USD",
            "booking_type": "TOUR_PACKAGE",
            "created_at": "2024-01-01T10:00:00Z",
            "travelers": [{"full_name": "Grace Hopper", "email": "grace@example.com"}]
        }))
        .unwrap();

        assert_eq!(booking.id.as_deref(), Some("31"));
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.total, Money::from_major(450));
        assert_eq!(booking.booking_type, BookingType::Package);
        assert_eq!(booking.travelers[0].name, "Grace Hopper");
        assert!(booking.is_payable());
    }

    #[test]
    fn test_booking_without_id_is_not_payable() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": null,
            "total": 100
        }))
        .unwrap();
        assert!(!booking.is_payable());
        assert_eq!(booking.booking_type, BookingType::Other);
        assert_eq!(booking.currency, "USD");
    }

    #[test]
    fn test_request_flattens_details() {
        let mut details = serde_json::Map::new();
        details.insert("rooms".to_string(), serde_json::json!(2));
        let request = CreateBookingRequest {
            booking_type: BookingType::Hotel,
            item_id: "h-1".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 4),
            quantity: 2,
            passengers: vec![Passenger::new("Ada", "ada@example.com")],
            special_requests: None,
            total_price: Money::from_major(600),
            currency: "USD".to_string(),
            details,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["rooms"], 2);
        assert_eq!(json["booking_type"], "HOTEL");
        assert_eq!(json["start_date"], "2024-03-01");
        assert!(json.get("special_requests").is_none());
    }
}
