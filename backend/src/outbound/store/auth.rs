//! GoTrue auth calls: signup, password grant, logout, current user.
//!
//! Session and token lifecycle belong to the provider; this adapter
//! passes bearer tokens through and never stores them.

use reqwest::Method;
use serde_json::{json, Value};

use super::rest::StoreClient;
use super::StoreError;
use crate::models::{AuthUser, Session};

impl StoreClient {
    /// Register a new account, recording the display name as user
    /// metadata.
    ///
    /// # Errors
    ///
    /// Provider rejections (already registered, weak password) surface
    /// as [`StoreError`] with the provider's message.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthUser, StoreError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "name": name },
        });
        let payload: Value = self
            .auth_json(
                self.request(Method::POST, self.endpoint(&["auth", "v1", "signup"]))
                    .json(&body),
            )
            .await?;
        // Depending on confirmation settings the provider returns either
        // the user object itself or a session wrapping it.
        let user = payload.get("user").cloned().unwrap_or(payload);
        serde_json::from_value(user).map_err(|e| StoreError::decode(&e))
    }

    /// Exchange email and password for a session.
    ///
    /// # Errors
    ///
    /// Bad credentials surface as [`StoreError`] with the provider's
    /// message.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, StoreError> {
        let mut url = self.endpoint(&["auth", "v1", "token"]);
        url.query_pairs_mut().append_pair("grant_type", "password");
        let body = json!({ "email": email, "password": password });
        self.auth_json(self.request(Method::POST, url).json(&body))
            .await
    }

    /// Revoke the session behind `access_token`.
    ///
    /// # Errors
    ///
    /// An invalid or already-revoked token surfaces as [`StoreError`].
    pub async fn sign_out(&self, access_token: &str) -> Result<(), StoreError> {
        let response = self
            .request(Method::POST, self.endpoint(&["auth", "v1", "logout"]))
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| StoreError::transport(&e))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::transport(&e))?;
        Err(StoreError::from_body(status, &body))
    }

    /// Look up the user behind `access_token`.
    ///
    /// # Errors
    ///
    /// A missing or expired token surfaces as [`StoreError`].
    pub async fn current_user(&self, access_token: &str) -> Result<AuthUser, StoreError> {
        self.auth_json(
            self.request(Method::GET, self.endpoint(&["auth", "v1", "user"]))
                .bearer_auth(access_token),
        )
        .await
    }

    async fn auth_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = request.send().await.map_err(|e| StoreError::transport(&e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::transport(&e))?;
        if !status.is_success() {
            return Err(StoreError::from_body(status, &body));
        }
        serde_json::from_slice(&body).map_err(|e| StoreError::decode(&e))
    }
}
