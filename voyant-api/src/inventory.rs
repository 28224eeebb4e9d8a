use voyant_catalog::inventory::best_room;
use voyant_catalog::{AvailabilityQuery, CarAvailability, RoomAvailability};

use crate::error::ApiError;
use crate::http::HttpClient;

fn window_pairs(query: &AvailabilityQuery) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("start_date".to_string(), query.start_date.to_string()),
        ("end_date".to_string(), query.end_date.to_string()),
    ];
    if let Some(guests) = query.guests {
        pairs.push(("guests".to_string(), guests.to_string()));
    }
    pairs
}

/// `/inventory/*` endpoints: live availability for a date window.
#[derive(Clone)]
pub struct InventoryApi {
    http: HttpClient,
}

impl InventoryApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn hotel_rooms(
        &self,
        hotel_id: &str,
        query: &AvailabilityQuery,
    ) -> Result<Vec<RoomAvailability>, ApiError> {
        if query.end_date < query.start_date {
            return Err(ApiError::Validation("End date cannot be before start date".to_string()));
        }
        self.http
            .list(&format!("/inventory/hotels/{}/rooms/", hotel_id), window_pairs(query))
            .await
    }

    /// Cheapest room type with enough rooms and capacity, if any.
    pub async fn cheapest_room(
        &self,
        hotel_id: &str,
        query: &AvailabilityQuery,
        rooms: u32,
    ) -> Result<Option<RoomAvailability>, ApiError> {
        let options = self.hotel_rooms(hotel_id, query).await?;
        Ok(best_room(&options, rooms, query.guests.unwrap_or(1)).cloned())
    }

    pub async fn car_availability(
        &self,
        car_id: &str,
        query: &AvailabilityQuery,
    ) -> Result<CarAvailability, ApiError> {
        if query.end_date < query.start_date {
            return Err(ApiError::Validation("End date cannot be before start date".to_string()));
        }
        self.http
            .get_with_query(&format!("/inventory/cars/{}/availability/", car_id), window_pairs(query))
            .await
    }
}
