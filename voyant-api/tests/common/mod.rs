use std::sync::Arc;

use voyant_api::Storefront;
use voyant_store::{Config, MemoryTokenStorage};
use wiremock::MockServer;

pub struct Harness {
    pub server: MockServer,
    pub storage: Arc<MemoryTokenStorage>,
    pub storefront: Storefront,
}

/// Mock backend plus a storefront pointed at it, with the given tokens already stored.
pub async fn harness(tokens: &[(&str, &str)]) -> Harness {
    let server = MockServer::start().await;
    let storage = Arc::new(MemoryTokenStorage::with_entries(tokens.iter().copied()));
    let storefront = Storefront::with_storage(Config::for_base_url(server.uri()), storage.clone())
        .expect("storefront");
    Harness {
        server,
        storage,
        storefront,
    }
}

pub fn customer_json() -> serde_json::Value {
    serde_json::json!({
        "id": 5,
        "username": "ada",
        "email": "ada@example.com",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "role": "CUSTOMER",
        "is_staff": false
    })
}
