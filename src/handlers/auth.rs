use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::create_token;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthPayload {
    pub user_id: Uuid,
    pub name: String,
    pub token: String,
}

/// Create an account. The user row and its profile row are provisioned in
/// one transaction, so a half-created account can never be observed.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let name = req.name.trim();
    if name.is_empty() || name.len() > 100 {
        return Err(AppError::ValidationError(
            "Name must be between 1 and 100 characters".to_string(),
        ));
    }
    if !req.email.contains('@') {
        return Err(AppError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }
    if req.password.len() < 8 {
        return Err(AppError::ValidationError(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))?
        .to_string();

    let user_id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = state.pool.begin().await?;

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $5)",
    )
    .bind(user_id)
    .bind(name)
    .bind(req.email.to_lowercase())
    .bind(&password_hash)
    .bind(now)
    .execute(&mut *tx)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::ValidationError("An account with this email already exists".to_string())
        }
        other => AppError::DatabaseError(other),
    })?;

    sqlx::query(
        "INSERT INTO profiles (id, user_id, created_at, updated_at) VALUES ($1, $2, $3, $3)",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user = %user_id, "Account created");

    let token = create_token(&state.jwt_secret, user_id, name)?;

    Ok(created(
        AuthPayload {
            user_id,
            name: name.to_string(),
            token,
        },
        "Account created successfully",
    )
    .into_response())
}

#[derive(Serialize)]
pub struct MePayload {
    pub user: crate::models::User,
    pub profile: crate::models::Profile,
}

pub async fn me(
    State(state): State<AppState>,
    auth: crate::auth::AuthUser,
) -> Result<Response, AppError> {
    let user = sqlx::query_as::<_, crate::models::User>("SELECT * FROM users WHERE id = $1")
        .bind(auth.id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Account not found".to_string()))?;

    // Provisioned together with the user row, so this lookup cannot miss
    let profile =
        sqlx::query_as::<_, crate::models::Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(auth.id)
            .fetch_one(&state.pool)
            .await?;

    Ok(success(MePayload { user, profile }, "Account retrieved").into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let user = sqlx::query_as::<_, crate::models::User>("SELECT * FROM users WHERE email = $1")
        .bind(req.email.to_lowercase())
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AppError::AuthError("Invalid email or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Corrupt password hash: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::AuthError("Invalid email or password".to_string()))?;

    let token = create_token(&state.jwt_secret, user.id, &user.name)?;

    Ok(success(
        AuthPayload {
            user_id: user.id,
            name: user.name,
            token,
        },
        "Logged in successfully",
    )
    .into_response())
}
