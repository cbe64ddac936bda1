//! Account registration, login and email verification.

use serde_json::json;

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::{LoginInput, RegisterInput, User, UserPayload, VerifyEmailResult};
use crate::request::{RequestBody, RequestOptions};

/// Auth routes under `/auth`.
#[derive(Debug, Clone, Copy)]
pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Create an account. On success the session's refresh circuit is
    /// cleared, since the backend has issued fresh cookies.
    pub async fn register(&self, input: &RegisterInput) -> Result<User> {
        let payload: UserPayload = self
            .client
            .post("/auth/register", Some(RequestBody::json(input)?), None)
            .await?;
        self.client.reset_session();
        tracing::info!(user_id = %payload.user.id, "registered");
        Ok(payload.user)
    }

    /// Confirm an email address with the token from the verification mail.
    pub async fn verify_email(&self, token: &str) -> Result<VerifyEmailResult> {
        self.client
            .get(
                "/auth/verify-email",
                Some(RequestOptions::new().query("token", token)),
            )
            .await
    }

    /// Ask the backend to send another verification mail.
    pub async fn resend_verification(&self, email: &str) -> Result<VerifyEmailResult> {
        let body = RequestBody::Json(json!({ "email": email }));
        self.client
            .post("/auth/resend-verification", Some(body), None)
            .await
    }

    /// Log in. On success the session's refresh circuit is cleared.
    pub async fn login(&self, input: &LoginInput) -> Result<User> {
        let payload: UserPayload = self
            .client
            .post("/auth/login", Some(RequestBody::json(input)?), None)
            .await?;
        self.client.reset_session();
        tracing::info!(user_id = %payload.user.id, role = %payload.user.role, "logged in");
        Ok(payload.user)
    }

    /// End the session. The backend clears the auth cookies.
    ///
    /// The refresh circuit is cleared even when the backend call fails, so
    /// the next login starts clean.
    pub async fn logout(&self) -> Result<()> {
        let result = self
            .client
            .post::<serde_json::Value>("/auth/logout", None, None)
            .await;
        self.client.reset_session();
        result?;
        tracing::info!("logged out");
        Ok(())
    }

    /// The account behind the current session.
    pub async fn current_user(&self) -> Result<User> {
        let payload: UserPayload = self.client.get("/auth/me", None).await?;
        Ok(payload.user)
    }
}
