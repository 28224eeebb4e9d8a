//! Product-specific pieces of the booking wizard.
//!
//! Each product plugs the same three capabilities into [`crate::wizard::BookingWizard`]:
//! local validation, the price preview, and the booking payload.

use serde_json::{json, Map, Value};
use voyant_catalog::pricing::StayWindow;
use voyant_catalog::{Bookable, Car, Flight, Hotel, PriceQuote, TourPackage};
use voyant_core::{BookingType, CreateBookingRequest};

use crate::models::BookingDraft;
use crate::wizard::WizardError;

pub trait ProductFlow: Send + Sync {
    fn booking_type(&self) -> BookingType;

    /// Checks run on "Next" before leaving the details step.
    fn validate(&self, draft: &BookingDraft) -> Result<(), WizardError>;

    /// Advisory total shown on the review step.
    fn compute_total(&self, draft: &BookingDraft) -> Result<PriceQuote, WizardError>;

    fn build_payload(&self, draft: &BookingDraft, quote: &PriceQuote) -> CreateBookingRequest;
}

fn require_travelers(draft: &BookingDraft, noun: &str) -> Result<(), WizardError> {
    if draft.passengers.is_empty() {
        return Err(WizardError::Validation(format!("Please add at least one {}", noun)));
    }
    if draft.passengers.iter().any(|p| !p.is_complete()) {
        return Err(WizardError::Validation(format!(
            "Please enter a name and email for every {}",
            noun
        )));
    }
    Ok(())
}

fn require_window(draft: &BookingDraft) -> Result<StayWindow, WizardError> {
    match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) => Ok(StayWindow::new(start, end)?),
        _ => Err(WizardError::Validation("Please select both dates".to_string())),
    }
}

fn base_payload(
    booking_type: BookingType,
    item: &dyn Bookable,
    draft: &BookingDraft,
    quote: &PriceQuote,
    quantity: u32,
    details: Map<String, Value>,
) -> CreateBookingRequest {
    CreateBookingRequest {
        booking_type,
        item_id: item.item_id().to_string(),
        start_date: draft.start_date,
        end_date: draft.end_date,
        quantity,
        passengers: draft.passengers.clone(),
        special_requests: draft.special_requests(),
        total_price: quote.total,
        currency: quote.currency.clone(),
        details,
    }
}

fn details(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Seats on a scheduled flight. Dates come from the flight itself.
pub struct FlightFlow {
    pub flight: Flight,
}

impl ProductFlow for FlightFlow {
    fn booking_type(&self) -> BookingType {
        BookingType::Flight
    }

    fn validate(&self, draft: &BookingDraft) -> Result<(), WizardError> {
        require_travelers(draft, "passenger")?;
        if let Some(seats) = self.flight.available_seats {
            if draft.passengers.len() as u32 > seats {
                return Err(WizardError::Validation(format!(
                    "Only {} seats left on this flight",
                    seats
                )));
            }
        }
        Ok(())
    }

    fn compute_total(&self, draft: &BookingDraft) -> Result<PriceQuote, WizardError> {
        let seats = draft.passengers.len().max(1) as u32;
        Ok(PriceQuote::per_unit(self.flight.unit_rate(), seats, self.flight.currency())?)
    }

    fn build_payload(&self, draft: &BookingDraft, quote: &PriceQuote) -> CreateBookingRequest {
        let mut request = base_payload(
            BookingType::Flight,
            &self.flight,
            draft,
            quote,
            draft.passengers.len() as u32,
            details(json!({
                "flight_number": self.flight.flight_number,
                "cabin_class": self.flight.cabin_class,
            })),
        );
        request.start_date = Some(self.flight.departure_time.date_naive());
        request.end_date = Some(self.flight.arrival_time.date_naive());
        request
    }
}

/// Rooms in a hotel, priced per night.
pub struct HotelFlow {
    pub hotel: Hotel,
}

impl ProductFlow for HotelFlow {
    fn booking_type(&self) -> BookingType {
        BookingType::Hotel
    }

    fn validate(&self, draft: &BookingDraft) -> Result<(), WizardError> {
        require_window(draft)?;
        if draft.quantity == 0 {
            return Err(WizardError::Validation("Please book at least one room".to_string()));
        }
        require_travelers(draft, "guest")
    }

    fn compute_total(&self, draft: &BookingDraft) -> Result<PriceQuote, WizardError> {
        let nights = require_window(draft)?.billable_days();
        Ok(PriceQuote::per_day(
            self.hotel.unit_rate(),
            nights,
            draft.quantity,
            self.hotel.currency(),
        )?)
    }

    fn build_payload(&self, draft: &BookingDraft, quote: &PriceQuote) -> CreateBookingRequest {
        base_payload(
            BookingType::Hotel,
            &self.hotel,
            draft,
            quote,
            draft.quantity,
            details(json!({
                "rooms": draft.quantity,
                "nights": quote.units,
                "guests": draft.passengers.len(),
            })),
        )
    }
}

/// A single car, priced per day. The first passenger is the driver.
pub struct CarFlow {
    pub car: Car,
}

impl ProductFlow for CarFlow {
    fn booking_type(&self) -> BookingType {
        BookingType::Car
    }

    fn validate(&self, draft: &BookingDraft) -> Result<(), WizardError> {
        if !self.car.is_available {
            return Err(WizardError::Validation("This car is not available".to_string()));
        }
        require_window(draft)?;
        require_travelers(draft, "driver")
    }

    fn compute_total(&self, draft: &BookingDraft) -> Result<PriceQuote, WizardError> {
        let days = require_window(draft)?.billable_days();
        Ok(PriceQuote::per_day(self.car.unit_rate(), days, 1, self.car.currency())?)
    }

    fn build_payload(&self, draft: &BookingDraft, quote: &PriceQuote) -> CreateBookingRequest {
        let pickup = draft
            .pickup_location
            .clone()
            .or_else(|| self.car.location.clone());
        let dropoff = draft.dropoff_location.clone().or_else(|| pickup.clone());
        base_payload(
            BookingType::Car,
            &self.car,
            draft,
            quote,
            1,
            details(json!({
                "rental_days": quote.units,
                "pickup_location": pickup,
                "dropoff_location": dropoff,
                "driver": draft.passengers.first(),
            })),
        )
    }
}

/// Organizer tour packages, priced per traveler.
pub struct PackageFlow {
    pub package: TourPackage,
}

impl PackageFlow {
    fn window(&self, draft: &BookingDraft) -> Result<StayWindow, WizardError> {
        let start = draft.start_date.or(self.package.start_date);
        let end = draft.end_date.or(self.package.end_date);
        match (start, end) {
            (Some(start), Some(end)) => Ok(StayWindow::new(start, end)?),
            _ => Err(WizardError::Validation("Please select both dates".to_string())),
        }
    }
}

impl ProductFlow for PackageFlow {
    fn booking_type(&self) -> BookingType {
        BookingType::Package
    }

    fn validate(&self, draft: &BookingDraft) -> Result<(), WizardError> {
        self.window(draft)?;
        require_travelers(draft, "traveler")?;
        if let Some(max) = self.package.max_travelers {
            if draft.passengers.len() as u32 > max {
                return Err(WizardError::Validation(format!(
                    "This package allows at most {} travelers",
                    max
                )));
            }
        }
        Ok(())
    }

    fn compute_total(&self, draft: &BookingDraft) -> Result<PriceQuote, WizardError> {
        let travelers = draft.passengers.len().max(1) as u32;
        Ok(PriceQuote::per_unit(self.package.unit_rate(), travelers, self.package.currency())?)
    }

    fn build_payload(&self, draft: &BookingDraft, quote: &PriceQuote) -> CreateBookingRequest {
        let window = self.window(draft).ok();
        let duration = window.map(|w| w.tour_duration());
        let mut request = base_payload(
            BookingType::Package,
            &self.package,
            draft,
            quote,
            draft.passengers.len() as u32,
            details(json!({
                "duration_days": duration.map(|d| d.duration_days),
                "nights": duration.map(|d| d.nights),
                "travelers": draft.passengers.len(),
            })),
        );
        request.start_date = window.map(|w| w.start);
        request.end_date = window.map(|w| w.end);
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use voyant_core::Passenger;
    use voyant_shared::Money;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn car() -> Car {
        serde_json::from_value(json!({
            "id": 1, "make": "Toyota", "model": "RAV4", "daily_rate": "50.00",
            "location": "JKIA"
        }))
        .unwrap()
    }

    fn package() -> TourPackage {
        serde_json::from_value(json!({
            "id": 8, "title": "Maasai Mara Safari", "price": "300.00",
            "start_date": "2024-01-01", "end_date": "2024-01-05", "max_travelers": 2
        }))
        .unwrap()
    }

    #[test]
    fn test_car_total_and_payload() {
        let flow = CarFlow { car: car() };
        let draft = BookingDraft::new("1", "Toyota RAV4")
            .with_dates(date(2024, 6, 10), date(2024, 6, 13))
            .with_passenger(Passenger::new("Ada", "ada@example.com"));

        flow.validate(&draft).unwrap();
        let quote = flow.compute_total(&draft).unwrap();
        assert_eq!(quote.formatted_total(), "$150.00");

        let payload = flow.build_payload(&draft, &quote);
        assert_eq!(payload.details["rental_days"], 3);
        assert_eq!(payload.details["pickup_location"], "JKIA");
        assert_eq!(payload.details["dropoff_location"], "JKIA");
    }

    #[test]
    fn test_hotel_requires_dates_and_guests() {
        let hotel: Hotel = serde_json::from_value(json!({
            "id": 2, "name": "Serena", "nightly_rate": 120
        }))
        .unwrap();
        let flow = HotelFlow { hotel };

        let no_dates = BookingDraft::new("2", "Serena");
        assert!(matches!(flow.validate(&no_dates), Err(WizardError::Validation(_))));

        let incomplete_guest = BookingDraft::new("2", "Serena")
            .with_dates(date(2024, 3, 1), date(2024, 3, 3))
            .with_passenger(Passenger::new("Ada", ""));
        assert!(matches!(flow.validate(&incomplete_guest), Err(WizardError::Validation(_))));

        let mut ok = incomplete_guest.clone();
        ok.passengers[0].email = "ada@example.com".to_string();
        ok.quantity = 2;
        flow.validate(&ok).unwrap();
        assert_eq!(flow.compute_total(&ok).unwrap().total, Money::from_major(480));
    }

    #[test]
    fn test_package_duration_from_package_dates() {
        let flow = PackageFlow { package: package() };
        let draft = BookingDraft::new("8", "Maasai Mara Safari")
            .with_passenger(Passenger::new("Ada", "ada@example.com"))
            .with_passenger(Passenger::new("Alan", "alan@example.com"));

        flow.validate(&draft).unwrap();
        let quote = flow.compute_total(&draft).unwrap();
        assert_eq!(quote.total, Money::from_major(600));

        let payload = flow.build_payload(&draft, &quote);
        assert_eq!(payload.details["duration_days"], 5);
        assert_eq!(payload.details["nights"], 4);
        assert_eq!(payload.start_date, Some(date(2024, 1, 1)));
    }

    #[test]
    fn test_package_traveler_limit() {
        let flow = PackageFlow { package: package() };
        let mut draft = BookingDraft::new("8", "Maasai Mara Safari");
        for i in 0..3 {
            draft.passengers.push(Passenger::new(format!("T{}", i), "t@example.com"));
        }
        assert!(matches!(flow.validate(&draft), Err(WizardError::Validation(_))));
    }

    #[test]
    fn test_flight_uses_flight_dates() {
        let flight: Flight = serde_json::from_value(json!({
            "id": 4, "flight_number": "KQ100", "origin": "NBO", "destination": "LHR",
            "departure_time": "2024-02-01T23:00:00Z", "arrival_time": "2024-02-02T06:30:00Z",
            "price": "700.00", "available_seats": 1
        }))
        .unwrap();
        let flow = FlightFlow { flight };
        let draft = BookingDraft::new("4", "KQ100")
            .with_passenger(Passenger::new("Ada", "ada@example.com"));
        let quote = flow.compute_total(&draft).unwrap();
        let payload = flow.build_payload(&draft, &quote);
        assert_eq!(payload.start_date, Some(date(2024, 2, 1)));
        assert_eq!(payload.end_date, Some(date(2024, 2, 2)));
        assert_eq!(payload.quantity, 1);

        let crowded = draft.clone().with_passenger(Passenger::new("Alan", "alan@example.com"));
        assert!(flow.validate(&crowded).is_err());
    }
}
