use chrono::NaiveDate;
use voyant_catalog::Flight;

use crate::error::ApiError;
use crate::http::HttpClient;

#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearch {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub passengers: u32,
    pub cabin_class: Option<String>,
}

impl FlightSearch {
    fn validate(&self) -> Result<(), ApiError> {
        if self.origin.trim().is_empty() || self.destination.trim().is_empty() {
            return Err(ApiError::Validation("Please enter an origin and a destination".to_string()));
        }
        if self.origin.trim().eq_ignore_ascii_case(self.destination.trim()) {
            return Err(ApiError::Validation("Origin and destination must differ".to_string()));
        }
        if self.passengers == 0 {
            return Err(ApiError::Validation("At least one passenger is required".to_string()));
        }
        Ok(())
    }

    fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("origin".to_string(), self.origin.trim().to_uppercase()),
            ("destination".to_string(), self.destination.trim().to_uppercase()),
            ("date".to_string(), self.date.to_string()),
            ("passengers".to_string(), self.passengers.to_string()),
        ];
        if let Some(cabin) = &self.cabin_class {
            pairs.push(("cabin_class".to_string(), cabin.clone()));
        }
        pairs
    }
}

/// `/flights/*` endpoints.
#[derive(Clone)]
pub struct FlightsApi {
    http: HttpClient,
}

impl FlightsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn search(&self, search: &FlightSearch) -> Result<Vec<Flight>, ApiError> {
        search.validate()?;
        self.http.list("/flights/search/", search.to_pairs()).await
    }

    pub async fn flight(&self, id: &str) -> Result<Flight, ApiError> {
        self.http.get(&format!("/flights/{}/", id)).await
    }
}
