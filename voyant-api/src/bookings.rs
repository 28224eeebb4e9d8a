use async_trait::async_trait;
use reqwest::Method;
use tracing::info;
use voyant_core::{Booking, BookingGateway, CoreResult, CreateBookingRequest};

use crate::error::ApiError;
use crate::http::{HttpClient, RequestOptions};

/// `/booking/*` endpoints.
#[derive(Clone)]
pub struct BookingsApi {
    http: HttpClient,
}

impl BookingsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn create(&self, request: &CreateBookingRequest) -> Result<Booking, ApiError> {
        self.http.post("/booking/bookings/", request).await
    }

    /// Bookings of the signed-in customer.
    pub async fn mine(&self) -> Result<Vec<Booking>, ApiError> {
        self.http.list("/booking/bookings/mine/", Vec::new()).await
    }

    /// Bookings made on the signed-in organizer's packages.
    pub async fn for_organizer(&self) -> Result<Vec<Booking>, ApiError> {
        self.http.list("/booking/bookings/organizer/", Vec::new()).await
    }

    /// Every booking. Admin only on the backend.
    pub async fn all(&self) -> Result<Vec<Booking>, ApiError> {
        self.http.list("/booking/bookings/", Vec::new()).await
    }

    pub async fn get(&self, id: &str) -> Result<Booking, ApiError> {
        self.http.get(&format!("/booking/bookings/{}/", id)).await
    }

    /// Asks the server to cancel. The returned booking carries the server's new status.
    pub async fn cancel(&self, booking: &Booking) -> Result<Booking, ApiError> {
        let id = booking
            .id
            .as_deref()
            .ok_or_else(|| ApiError::Validation("Booking has no id".to_string()))?;
        if !booking.is_cancellable() {
            return Err(ApiError::Validation("Booking is already cancelled".to_string()));
        }
        let json = self
            .http
            .request(
                &format!("/booking/bookings/{}/cancel/", id),
                RequestOptions::with_method(Method::POST),
            )
            .await?;
        info!("Booking {} cancelled", id);
        Ok(serde_json::from_value(json)?)
    }
}

#[async_trait]
impl BookingGateway for BookingsApi {
    async fn create_booking(&self, request: &CreateBookingRequest) -> CoreResult<Booking> {
        Ok(self.create(request).await?)
    }
}
