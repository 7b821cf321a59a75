use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::Credentials,
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
    },
    error::AppError,
    store::UserStore,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Create a user from `creds`. No token is issued; the client logs in next.
#[instrument(skip_all)]
pub async fn register(users: &dyn UserStore, creds: &Credentials) -> Result<i64, AppError> {
    let Some((email, password)) = creds.present() else {
        warn!("register without email or password");
        return Err(AppError::InvalidInput("Email and password required".into()));
    };

    if users.find_by_email(email).await?.is_some() {
        warn!(email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password_blocking(password.to_owned()).await?;
    // A concurrent registration can still win the race; the store's unique
    // constraint turns that into the same Conflict.
    let user = users.create_user(email, &hash).await?;

    info!(user_id = user.id, email, "user registered");
    Ok(user.id)
}

/// Check `creds` and issue an access token for the matching user.
#[instrument(skip_all)]
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    creds: &Credentials,
) -> Result<String, AppError> {
    let Some((email, password)) = creds.present() else {
        warn!("login without email or password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    let Some(user) = users.find_by_email(email).await? else {
        warn!(email, "login unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    let ok = match user.password_hash.clone() {
        Some(hash) => verify_password_blocking(password.to_owned(), hash).await?,
        None => false,
    };
    if !ok {
        warn!(email, user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = keys.sign(user.id)?;
    info!(user_id = user.id, "user logged in");
    Ok(token)
}
