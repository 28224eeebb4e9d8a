use voyant_catalog::{NewReview, ProductType, Review};

use crate::error::ApiError;
use crate::http::{FilePart, HttpClient, MultipartBody};

/// `/reviews/*` endpoints. Creation is multipart because of the optional photo.
#[derive(Clone)]
pub struct ReviewsApi {
    http: HttpClient,
}

impl ReviewsApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn for_item(&self, product_type: ProductType, item_id: &str) -> Result<Vec<Review>, ApiError> {
        self.http
            .list(
                "/reviews/",
                vec![
                    ("item_type".to_string(), product_type.slug().to_string()),
                    ("item_id".to_string(), item_id.to_string()),
                ],
            )
            .await
    }

    pub async fn create(&self, review: &NewReview) -> Result<Review, ApiError> {
        review.validate().map_err(ApiError::Validation)?;
        self.http.post_multipart("/reviews/", multipart_for(review)).await
    }
}

fn multipart_for(review: &NewReview) -> MultipartBody {
    let mut body = MultipartBody::new()
        .text("item_type", review.product_type.slug())
        .text("item_id", review.item_id.clone())
        .text("rating", review.rating.to_string())
        .text("comment", review.comment.trim());
    if let Some(image) = &review.image {
        body = body.file(FilePart {
            field: "image".to_string(),
            file_name: image.file_name.clone(),
            mime_type: image.mime_type.clone(),
            bytes: image.bytes.clone(),
        });
    }
    body
}
