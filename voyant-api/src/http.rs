use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use voyant_core::TokenPair;
use voyant_store::app_config::ApiConfig;

use crate::error::ApiError;
use crate::session::SessionStore;

pub const REFRESH_PATH: &str = "/users/auth/token/refresh/";

/// A file attached to a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart payload kept in owned form so it can be rebuilt for the 401 replay.
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    fn to_form(&self) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type)
                .map_err(|e| ApiError::Validation(format!("Invalid file type: {}", e)))?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    /// Binary form payload (image uploads). Content type comes from the multipart encoder.
    Multipart(MultipartBody),
}

#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Body,
    pub query: Vec<(String, String)>,
    /// Skip the bearer header and the refresh-on-401 path (login, register, refresh).
    pub anonymous: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: Body::Empty,
            query: Vec::new(),
            anonymous: false,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn json<B: Serialize>(method: Method, body: &B) -> Result<Self, ApiError> {
        Ok(Self {
            method,
            body: Body::Json(serde_json::to_value(body)?),
            ..Self::default()
        })
    }

    pub fn multipart(method: Method, body: MultipartBody) -> Self {
        Self {
            method,
            body: Body::Multipart(body),
            ..Self::default()
        }
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn anonymous(mut self) -> Self {
        self.anonymous = true;
        self
    }
}

/// List endpoints answer either with a bare array or with a paginated envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Paged { results, .. } => results,
            Listing::Plain(items) => items,
        }
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// JSON client for the storefront backend.
///
/// Adds the bearer token when one is held, and on a 401 performs exactly one
/// refresh-and-replay. Concurrent requests that all see a 401 each refresh on their own;
/// there is no queueing or de-duplication.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(
        &self,
        path: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path);
        debug!("{} {}", options.method, url);

        let mut request = self.client.request(options.method.clone(), &url);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| ApiError::Validation("Malformed access token".to_string()))?;
            request = request.header(AUTHORIZATION, value);
        }
        request = match &options.body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::Multipart(body) => request.multipart(body.to_form()?),
        };

        Ok(request.send().await?)
    }

    async fn parse(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::from_response(status, &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Sends a request and returns the parsed JSON body (`Null` for empty bodies).
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        if options.anonymous {
            let response = self.send(path, &options, None).await?;
            return Self::parse(response).await;
        }

        let token = self.session.access_token();
        let response = self.send(path, &options, token.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::parse(response).await;
        }

        warn!("401 from {}, attempting token refresh", path);
        if !self.refresh_session().await {
            return Err(ApiError::session_expired());
        }

        let token = self.session.access_token();
        let replay = self.send(path, &options, token.as_deref()).await;
        match replay {
            Ok(response) if response.status() == StatusCode::UNAUTHORIZED => {
                warn!("Replay of {} still unauthorized, logging out", path);
                self.session.logout();
                Err(ApiError::session_expired())
            }
            Ok(response) => Self::parse(response).await,
            Err(err) => {
                warn!("Replay of {} failed ({}), logging out", path, err);
                self.session.logout();
                Err(ApiError::session_expired())
            }
        }
    }

    /// Exchanges the stored refresh token for a new access token.
    /// Any failure, including a missing refresh token, clears the session and returns false.
    pub async fn refresh_session(&self) -> bool {
        let Some(refresh) = self.session.refresh_token() else {
            warn!("No refresh token held, logging out");
            self.session.logout();
            return false;
        };

        let options = match RequestOptions::json(Method::POST, &RefreshRequest { refresh: &refresh }) {
            Ok(options) => options.anonymous(),
            Err(_) => {
                self.session.logout();
                return false;
            }
        };

        let outcome = match self.send(REFRESH_PATH, &options, None).await {
            Ok(response) => Self::parse(response).await,
            Err(err) => Err(err),
        };

        match outcome.and_then(|json| Ok(serde_json::from_value::<TokenPair>(json)?)) {
            Ok(pair) => {
                self.session.store_tokens(&pair);
                info!("Access token refreshed");
                true
            }
            Err(err) => {
                warn!("Token refresh failed: {}", err);
                self.session.logout();
                false
            }
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, Vec::new()).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        let json = self.request(path, RequestOptions::get().query(query)).await?;
        Ok(serde_json::from_value(json)?)
    }

    pub async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<Vec<T>, ApiError> {
        let listing: Listing<T> = self.get_with_query(path, query).await?;
        Ok(listing.into_vec())
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let json = self.request(path, RequestOptions::json(Method::POST, body)?).await?;
        Ok(serde_json::from_value(json)?)
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        body: MultipartBody,
    ) -> Result<T, ApiError> {
        let json = self
            .request(path, RequestOptions::multipart(Method::POST, body))
            .await?;
        Ok(serde_json::from_value(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StorageKeys;
    use voyant_store::MemoryTokenStorage;

    fn client(base_url: &str) -> HttpClient {
        let session = Arc::new(SessionStore::new(
            Arc::new(MemoryTokenStorage::new()),
            StorageKeys::default(),
        ));
        let config = ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: None,
        };
        HttpClient::new(&config, session).unwrap()
    }

    #[test]
    fn test_url_joining() {
        let http = client("http://localhost:8000/api/");
        assert_eq!(http.url("/catalog/hotels/"), "http://localhost:8000/api/catalog/hotels/");
        assert_eq!(http.url("catalog/cars/"), "http://localhost:8000/api/catalog/cars/");
    }

    #[test]
    fn test_listing_shapes() {
        let paged: Listing<u32> = serde_json::from_value(serde_json::json!({
            "count": 2, "next": null, "results": [1, 2]
        }))
        .unwrap();
        assert_eq!(paged.into_vec(), vec![1, 2]);

        let plain: Listing<u32> = serde_json::from_value(serde_json::json!([3])).unwrap();
        assert_eq!(plain.into_vec(), vec![3]);
    }

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let body = MultipartBody::new().file(FilePart {
            field: "image".to_string(),
            file_name: "a.png".to_string(),
            mime_type: "not a mime".to_string(),
            bytes: vec![1, 2, 3],
        });
        assert!(matches!(body.to_form(), Err(ApiError::Validation(_))));
    }
}
