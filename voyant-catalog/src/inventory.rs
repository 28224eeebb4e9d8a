use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use voyant_shared::Money;

/// Room availability for a hotel over a requested window (`/inventory/hotels/{id}/rooms/`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomAvailability {
    pub room_type: String,
    pub available_rooms: u32,
    #[serde(default)]
    pub total_rooms: Option<u32>,
    #[serde(alias = "price")]
    pub price_per_night: Money,
    #[serde(default)]
    pub max_guests: Option<u32>,
}

impl RoomAvailability {
    pub fn can_accommodate(&self, rooms: u32, guests: u32) -> bool {
        if rooms == 0 || rooms > self.available_rooms {
            return false;
        }
        match self.max_guests {
            Some(per_room) => guests <= per_room * rooms,
            None => true,
        }
    }
}

/// Availability of a single car over a rental window (`/inventory/cars/{id}/availability/`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CarAvailability {
    #[serde(deserialize_with = "voyant_core::wire::id")]
    pub car_id: String,
    pub available: bool,
    #[serde(default)]
    pub next_available_date: Option<NaiveDate>,
}

/// Query window shared by the inventory endpoints.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AvailabilityQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<u32>,
}

/// First room type that fits the request, cheapest first.
pub fn best_room(options: &[RoomAvailability], rooms: u32, guests: u32) -> Option<&RoomAvailability> {
    options
        .iter()
        .filter(|option| option.can_accommodate(rooms, guests))
        .min_by_key(|option| option.price_per_night)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(room_type: &str, available: u32, price: i64, max_guests: Option<u32>) -> RoomAvailability {
        RoomAvailability {
            room_type: room_type.to_string(),
            available_rooms: available,
            total_rooms: None,
            price_per_night: Money::from_major(price),
            max_guests,
        }
    }

    #[test]
    fn test_capacity_checks() {
        let double = room("DOUBLE", 2, 120, Some(2));
        assert!(double.can_accommodate(1, 2));
        assert!(!double.can_accommodate(1, 3));
        assert!(!double.can_accommodate(3, 2));
        assert!(!double.can_accommodate(0, 1));
    }

    #[test]
    fn test_best_room_prefers_cheapest_fit() {
        let options = vec![
            room("SUITE", 1, 300, Some(4)),
            room("DOUBLE", 5, 120, Some(2)),
            room("SINGLE", 0, 80, Some(1)),
        ];
        assert_eq!(best_room(&options, 1, 2).unwrap().room_type, "DOUBLE");
        assert_eq!(best_room(&options, 1, 4).unwrap().room_type, "SUITE");
        assert!(best_room(&options, 6, 2).is_none());
    }
}
