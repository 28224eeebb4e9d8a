use async_trait::async_trait;
use voyant_core::{CoreResult, CreatePaymentRequest, Payment, PaymentGateway};

use crate::error::ApiError;
use crate::http::HttpClient;

/// `/payments/*` endpoints. The backend processor is a mock.
#[derive(Clone)]
pub struct PaymentsApi {
    http: HttpClient,
}

impl PaymentsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn create(&self, request: &CreatePaymentRequest) -> Result<Payment, ApiError> {
        self.http.post("/payments/", request).await
    }

    pub async fn mine(&self) -> Result<Vec<Payment>, ApiError> {
        self.http.list("/payments/", Vec::new()).await
    }

    pub async fn for_booking(&self, booking_id: &str) -> Result<Vec<Payment>, ApiError> {
        self.http
            .list(
                "/payments/",
                vec![("booking".to_string(), booking_id.to_string())],
            )
            .await
    }
}

#[async_trait]
impl PaymentGateway for PaymentsApi {
    async fn create_payment(&self, request: &CreatePaymentRequest) -> CoreResult<Payment> {
        Ok(self.create(request).await?)
    }
}
