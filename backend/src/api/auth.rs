//! Account endpoints backed by the store's auth provider.
//!
//! Tokens pass through as bearer headers; this layer never mints or
//! stores them.

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use serde_json::{json, Value};
use tracing::warn;

use super::{envelope, ApiResult};
use crate::domain::validation::{is_valid_email, missing_fields};
use crate::domain::DomainError;
use crate::models::AuthUser;
use crate::outbound::store::{id_filter, StoreClient};

/// Extract the bearer token from the `Authorization` header, if any.
fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn require_credentials(body: &Value) -> Result<(String, String), DomainError> {
    if !missing_fields(body, &["email", "password"]).is_empty() {
        return Err(DomainError::validation("Email and password are required"));
    }
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok((email.to_owned(), password.to_owned()))
}

/// Register a new account and its profile row.
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    responses(
        (status = 201, description = "Created account", body = AuthUser),
        (status = 400, description = "Missing or invalid credentials")
    ),
    tags = ["auth"],
    operation_id = "signup"
)]
#[post("/api/auth/signup")]
pub async fn signup(
    store: web::Data<StoreClient>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let (email, password) = require_credentials(&body)?;
    if !is_valid_email(&email) {
        return Err(DomainError::validation("Invalid email format").into());
    }
    if password.chars().count() < 6 {
        return Err(DomainError::validation("Password must be at least 6 characters long").into());
    }

    // Display name defaults to the email local part.
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map_or_else(
            || email.split('@').next().unwrap_or_default().to_owned(),
            str::to_owned,
        );

    let user = store.sign_up(&email, &password, &name).await.map_err(|e| {
        let message = e.to_string();
        DomainError::validation(if message.is_empty() {
            "Failed to create account".to_owned()
        } else {
            message
        })
    })?;

    // The profile row is convenience data; a failed insert never fails
    // the signup.
    let profile = json!({
        "id": user.id,
        "email": user.email.clone(),
        "name": name,
    });
    if let Err(error) = store.insert::<Value>("user_profiles", &profile).await {
        warn!(user_id = %user.id, %error, "failed to create user profile");
    }

    Ok(envelope::created(json!({
        "user": user,
        "message": "Account created successfully. Please check your email to confirm.",
    })))
}

/// Exchange email and password for a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Authenticated session"),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Bad credentials")
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/api/auth/login")]
pub async fn login(
    store: web::Data<StoreClient>,
    body: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let (email, password) = require_credentials(&body)?;

    let session = store.sign_in(&email, &password).await.map_err(|e| {
        let message = e.to_string();
        DomainError::unauthorized(if message.is_empty() {
            "Invalid email or password".to_owned()
        } else {
            message
        })
    })?;

    let user = session.user.clone();
    Ok(envelope::success(json!({
        "user": user,
        "session": session,
    })))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked"),
        (status = 500, description = "Provider failure")
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/api/auth/logout")]
pub async fn logout(store: web::Data<StoreClient>, req: HttpRequest) -> ApiResult<HttpResponse> {
    if let Some(token) = bearer_token(&req) {
        store.sign_out(token).await.map_err(|e| {
            let message = e.to_string();
            DomainError::internal(if message.is_empty() {
                "Failed to logout".to_owned()
            } else {
                message
            })
        })?;
    }
    Ok(envelope::success(json!({
        "message": "Logged out successfully"
    })))
}

/// The authenticated user together with their profile row.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user and profile"),
        (status = 401, description = "No valid session")
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/api/auth/me")]
pub async fn me(store: web::Data<StoreClient>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let Some(token) = bearer_token(&req) else {
        return Ok(envelope::unauthorized("Not authenticated"));
    };
    let Ok(user) = store.current_user(token).await else {
        return Ok(envelope::unauthorized("Not authenticated"));
    };

    // Profile columns are merged over the auth identity; a missing or
    // failing profile row degrades to the identity alone.
    let mut merged = json!({
        "id": user.id,
        "email": user.email,
    });
    match store
        .select_single::<Value>("user_profiles", "*", &id_filter(&user.id.to_string()))
        .await
    {
        Ok(Value::Object(profile)) => {
            if let Some(fields) = merged.as_object_mut() {
                fields.extend(profile);
            }
        }
        Ok(_) => {}
        Err(error) => {
            warn!(user_id = %user.id, %error, "failed to fetch user profile");
        }
    }

    Ok(envelope::success(merged))
}
