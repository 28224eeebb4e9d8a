use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use voyant_core::booking::{default_currency, BookingType};
use voyant_core::wire;
use voyant_shared::Money;

/// Product families listed in the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    Destination,
    Hotel,
    Car,
    Flight,
    TourPackage,
}

impl ProductType {
    /// Destinations are browse-only; everything else goes through a booking wizard.
    pub fn booking_type(&self) -> Option<BookingType> {
        match self {
            ProductType::Destination => None,
            ProductType::Hotel => Some(BookingType::Hotel),
            ProductType::Car => Some(BookingType::Car),
            ProductType::Flight => Some(BookingType::Flight),
            ProductType::TourPackage => Some(BookingType::Package),
        }
    }

    /// Slug used for review endpoints and client routes.
    pub fn slug(&self) -> &'static str {
        match self {
            ProductType::Destination => "destinations",
            ProductType::Hotel => "hotels",
            ProductType::Car => "cars",
            ProductType::Flight => "flights",
            ProductType::TourPackage => "packages",
        }
    }
}

/// Anything a booking wizard can be opened on.
pub trait Bookable {
    fn product_type(&self) -> ProductType;
    fn item_id(&self) -> &str;
    fn display_name(&self) -> String;
    /// Price per night, per day, per seat or per traveler depending on the product.
    fn unit_rate(&self) -> Money;
    fn currency(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotel {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub stars: Option<u8>,
    #[serde(alias = "price_per_night")]
    pub nightly_rate: Money,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Bookable for Hotel {
    fn product_type(&self) -> ProductType {
        ProductType::Hotel
    }

    fn item_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn unit_rate(&self) -> Money {
        self.nightly_rate
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Car {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub year: Option<u16>,
    #[serde(default)]
    pub seats: Option<u8>,
    #[serde(default)]
    pub location: Option<String>,
    pub daily_rate: Money,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Bookable for Car {
    fn product_type(&self) -> ProductType {
        ProductType::Car
    }

    fn item_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }

    fn unit_rate(&self) -> Money {
        self.daily_rate
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flight {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(default)]
    pub airline: String,
    pub flight_number: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub price: Money,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub available_seats: Option<u32>,
    #[serde(default)]
    pub cabin_class: Option<String>,
}

impl Flight {
    pub fn duration_minutes(&self) -> i64 {
        (self.arrival_time - self.departure_time).num_minutes()
    }
}

impl Bookable for Flight {
    fn product_type(&self) -> ProductType {
        ProductType::Flight
    }

    fn item_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        format!("{} {} → {}", self.flight_number, self.origin, self.destination)
    }

    fn unit_rate(&self) -> Money {
        self.price
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

/// Tour package published by an organizer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TourPackage {
    #[serde(deserialize_with = "wire::id")]
    pub id: String,
    #[serde(alias = "name")]
    pub title: String,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Money,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub max_travelers: Option<u32>,
    /// Organizer's cut, in percent of the package price.
    #[serde(default)]
    pub commission_rate: Option<f64>,
    #[serde(default)]
    pub organizer: Option<String>,
}

impl Bookable for TourPackage {
    fn product_type(&self) -> ProductType {
        ProductType::TourPackage
    }

    fn item_id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.title.clone()
    }

    fn unit_rate(&self) -> Money {
        self.price
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}
