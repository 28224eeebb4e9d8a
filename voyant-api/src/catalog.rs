use voyant_catalog::{Car, Destination, Hotel, TourPackage};
use voyant_shared::Money;

use crate::error::ApiError;
use crate::http::HttpClient;

/// Filters shared by the catalog list endpoints. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogQuery {
    pub search: Option<String>,
    pub destination: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
}

impl CatalogQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                pairs.push((key.to_string(), value));
            }
        };
        push("search", self.search.clone());
        push("destination", self.destination.clone());
        push("min_price", self.min_price.map(|m| m.to_string()));
        push("max_price", self.max_price.map(|m| m.to_string()));
        push("ordering", self.ordering.clone());
        push("page", self.page.map(|p| p.to_string()));
        pairs
    }
}

/// `/catalog/*` endpoints. Public, but the token is still sent when one is held.
#[derive(Clone)]
pub struct CatalogApi {
    http: HttpClient,
}

impl CatalogApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    pub async fn destinations(&self, query: &CatalogQuery) -> Result<Vec<Destination>, ApiError> {
        self.http.list("/catalog/destinations/", query.to_pairs()).await
    }

    pub async fn featured_destinations(&self) -> Result<Vec<Destination>, ApiError> {
        self.http
            .list("/catalog/destinations/", vec![("is_featured".to_string(), "true".to_string())])
            .await
    }

    pub async fn destination(&self, id: &str) -> Result<Destination, ApiError> {
        self.http.get(&format!("/catalog/destinations/{}/", id)).await
    }

    pub async fn hotels(&self, query: &CatalogQuery) -> Result<Vec<Hotel>, ApiError> {
        self.http.list("/catalog/hotels/", query.to_pairs()).await
    }

    pub async fn hotel(&self, id: &str) -> Result<Hotel, ApiError> {
        self.http.get(&format!("/catalog/hotels/{}/", id)).await
    }

    pub async fn cars(&self, query: &CatalogQuery) -> Result<Vec<Car>, ApiError> {
        self.http.list("/catalog/cars/", query.to_pairs()).await
    }

    pub async fn car(&self, id: &str) -> Result<Car, ApiError> {
        self.http.get(&format!("/catalog/cars/{}/", id)).await
    }

    pub async fn packages(&self, query: &CatalogQuery) -> Result<Vec<TourPackage>, ApiError> {
        self.http.list("/catalog/packages/", query.to_pairs()).await
    }

    pub async fn package(&self, id: &str) -> Result<TourPackage, ApiError> {
        self.http.get(&format!("/catalog/packages/{}/", id)).await
    }

    /// Packages owned by the signed-in organizer.
    pub async fn my_packages(&self) -> Result<Vec<TourPackage>, ApiError> {
        self.http.list("/catalog/packages/mine/", Vec::new()).await
    }
}
