use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};
use voyant_order::OrganizerEarnings;
use voyant_store::{Config, FileTokenStorage, MemoryTokenStorage, TokenStorage};

use crate::auth::AuthApi;
use crate::bookings::BookingsApi;
use crate::catalog::CatalogApi;
use crate::error::ApiError;
use crate::flights::FlightsApi;
use crate::http::HttpClient;
use crate::inventory::InventoryApi;
use crate::navigation::Navigator;
use crate::payments::PaymentsApi;
use crate::reviews::ReviewsApi;
use crate::session::{SessionStore, StorageKeys};

/// Everything a view needs, wired once at start-up and cloned into each consumer.
/// All facades share one [`SessionStore`] through the same [`HttpClient`].
#[derive(Clone)]
pub struct Storefront {
    pub config: Arc<Config>,
    pub session: Arc<SessionStore>,
    pub http: HttpClient,
    pub auth: AuthApi,
    pub catalog: CatalogApi,
    pub inventory: InventoryApi,
    pub flights: FlightsApi,
    pub bookings: BookingsApi,
    pub payments: PaymentsApi,
    pub reviews: ReviewsApi,
}

impl Storefront {
    /// Token storage comes from `storage.path` when set, otherwise tokens stay in memory.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let storage: Arc<dyn TokenStorage> = match &config.storage.path {
            Some(path) => match FileTokenStorage::open(path) {
                Ok(file) => Arc::new(file),
                Err(e) => {
                    warn!("Token file {} unusable ({}), keeping tokens in memory", path.display(), e);
                    Arc::new(MemoryTokenStorage::new())
                }
            },
            None => Arc::new(MemoryTokenStorage::new()),
        };
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn TokenStorage>) -> Result<Self, ApiError> {
        let session = Arc::new(SessionStore::new(storage, StorageKeys::from(&config.storage)));
        let http = HttpClient::new(&config.api, session.clone())?;
        info!("Storefront client ready for {}", config.api.base_url);

        Ok(Self {
            config: Arc::new(config),
            session,
            auth: AuthApi::new(http.clone()),
            catalog: CatalogApi::new(http.clone()),
            inventory: InventoryApi::new(http.clone()),
            flights: FlightsApi::new(http.clone()),
            bookings: BookingsApi::new(http.clone()),
            payments: PaymentsApi::new(http.clone()),
            reviews: ReviewsApi::new(http.clone()),
            http,
        })
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.session.clone())
    }

    pub fn currency(&self) -> &str {
        &self.config.display.currency
    }

    /// Organizer dashboard totals: bookings on the organizer's packages, each paid at the
    /// commission rate of the package it was made on.
    pub async fn organizer_earnings(&self) -> Result<OrganizerEarnings, ApiError> {
        let packages = self.catalog.my_packages().await?;
        let bookings = self.bookings.for_organizer().await?;

        let rates: HashMap<String, f64> = packages
            .into_iter()
            .map(|p| (p.title, p.commission_rate.unwrap_or(0.0)))
            .collect();

        Ok(OrganizerEarnings::from_bookings(&bookings, self.currency(), |booking| {
            booking
                .item_name
                .as_ref()
                .and_then(|name| rates.get(name))
                .copied()
                .unwrap_or(0.0)
        }))
    }
}
