use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::auth::{generate_jwt, hash_password, verify_password, AuthError, Claims};
use crate::config::SecurityConfig;
use crate::database::models::User;
use crate::services::error::{ServiceError, ServiceResult};
use crate::services::require_text;

const MIN_PASSWORD_LEN: usize = 8;
const DEFAULT_ROLE: &str = "agent";

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub role: Option<String>,
    pub personnel_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

/// Accounts and token issuance
#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    jwt_secret: String,
    jwt_expiry_hours: u64,
    password_cost: u32,
}

impl UserService {
    pub fn new(pool: PgPool, security: &SecurityConfig) -> Self {
        Self {
            pool,
            jwt_secret: security.jwt_secret.clone(),
            jwt_expiry_hours: security.jwt_expiry_hours,
            password_cost: security.password_cost,
        }
    }

    pub async fn register(&self, input: Registration) -> ServiceResult<User> {
        let email = normalize_email(&input.email)?;
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(ServiceError::invalid_argument(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let cost = self.password_cost;
        let password = input.password.clone();
        let password_hash = blocking(move || hash_password(&password, cost)).await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, role, personnel_id) VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&email)
        .bind(password_hash)
        .bind(input.role.as_deref().unwrap_or(DEFAULT_ROLE))
        .bind(input.personnel_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match ServiceError::from(e) {
            ServiceError::Conflict(_) => ServiceError::conflict(format!("user {} already exists", email)),
            other => other,
        })?;

        info!(user_id = user.user_id, "user registered");
        Ok(user)
    }

    /// Unknown email, wrong password and inactive accounts all fail the same way
    pub async fn login(&self, credentials: Credentials) -> ServiceResult<LoginResult> {
        let email = normalize_email(&credentials.email)?;
        let rejected = || ServiceError::Unauthorized("invalid email or password".to_string());

        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(&email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(rejected)?;

        let password = credentials.password;
        let stored = user.password_hash.clone();
        let matches = match blocking(move || verify_password(&password, &stored)).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(user_id = user.user_id, "stored password hash is unusable: {}", e);
                false
            }
        };

        if !user.active || !matches {
            warn!(user_id = user.user_id, "rejected login");
            return Err(rejected());
        }

        let claims = Claims::new(user.user_id, user.role.clone(), self.jwt_expiry_hours)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        let token = generate_jwt(&claims, &self.jwt_secret).map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(LoginResult {
            token,
            expires_in: self.jwt_expiry_hours.saturating_mul(3600),
            user,
        })
    }
}

/// Run CPU-bound password work on the blocking pool
async fn blocking<T, F>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(e.to_string()))?
        .map_err(|e| ServiceError::Internal(e.to_string()))
}

fn normalize_email(raw: &str) -> ServiceResult<String> {
    require_text("email", raw)?;
    let email = raw.trim().to_lowercase();
    if !email.contains('@') {
        return Err(ServiceError::invalid_argument("email is not valid"));
    }
    Ok(email)
}
