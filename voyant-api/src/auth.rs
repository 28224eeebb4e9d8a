use reqwest::Method;
use serde::Serialize;
use tracing::{info, warn};
use voyant_core::{Credentials, RegistrationForm, TokenPair, User};

use crate::error::ApiError;
use crate::http::{HttpClient, RequestOptions};

pub const LOGIN_PATH: &str = "/users/auth/login/";
pub const PROFILE_PATH: &str = "/users/auth/profile/";
pub const REGISTER_PATH: &str = "/users/auth/register/";

pub const LOGIN_FAILED_FALLBACK: &str = "Login failed. Please check your credentials.";

/// Result of a login attempt, shaped for direct display on the login form.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginOutcome {
    pub success: bool,
    pub error: Option<String>,
}

impl LoginOutcome {
    fn ok() -> Self {
        Self { success: true, error: None }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Network half of the session: login, refresh, profile, start-up validation, registration.
#[derive(Clone)]
pub struct AuthApi {
    http: HttpClient,
}

impl AuthApi {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Obtains a token pair, stores it, then loads the profile.
    pub async fn login(&self, credentials: &Credentials) -> LoginOutcome {
        if credentials.username.trim().is_empty() || credentials.password.is_blank() {
            return LoginOutcome::failed("Username and password are required");
        }

        let options = match RequestOptions::json(Method::POST, credentials) {
            Ok(options) => options.anonymous(),
            Err(e) => return LoginOutcome::failed(e.to_string()),
        };

        let pair = match self.http.request(LOGIN_PATH, options).await {
            Ok(json) => match serde_json::from_value::<TokenPair>(json) {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("Login response missing tokens: {}", e);
                    return LoginOutcome::failed(LOGIN_FAILED_FALLBACK);
                }
            },
            Err(ApiError::Http { message, .. }) => return LoginOutcome::failed(message),
            Err(e) => {
                warn!("Login request failed: {}", e);
                return LoginOutcome::failed(LOGIN_FAILED_FALLBACK);
            }
        };

        let session = self.http.session();
        session.store_tokens(&pair);

        match self.profile().await {
            Ok(user) => {
                info!("Logged in as {}", user.username);
                session.set_user(user);
                LoginOutcome::ok()
            }
            Err(e) => {
                warn!("Profile fetch after login failed: {}", e);
                session.logout();
                LoginOutcome::failed(e.to_string())
            }
        }
    }

    /// Clears the session locally. The backend is not contacted.
    pub fn logout(&self) {
        self.http.session().logout();
    }

    pub async fn refresh(&self) -> bool {
        self.http.refresh_session().await
    }

    pub async fn profile(&self) -> Result<User, ApiError> {
        self.http.get(PROFILE_PATH).await
    }

    /// Start-up validation of a stored token: one profile fetch. A failure clears the
    /// session without surfacing an error.
    pub async fn bootstrap(&self) {
        let session = self.http.session();
        if !session.snapshot().is_authenticated() {
            session.finish_loading();
            return;
        }

        match self.profile().await {
            Ok(user) => session.set_user(user),
            Err(e) => {
                warn!("Stored session is no longer valid: {}", e);
                session.logout();
            }
        }
    }

    /// Creates an account. Local checks (required fields, matching passwords) run first.
    pub async fn register(&self, form: &RegistrationForm) -> Result<User, ApiError> {
        form.validate()?;
        let options = RequestOptions::json(Method::POST, form)?.anonymous();
        let json = self.http.request(REGISTER_PATH, options).await?;
        Ok(serde_json::from_value(json)?)
    }
}
