//! Authentication HTTP handlers
//!
//! Register, login, refresh, logout, and the current-user lookup. The refresh
//! token travels both in the response body's sibling cookie and on the user
//! row; the handlers own the cookie half of that contract.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::AuthenticatedUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, RegisterResponse,
    TokenResponse, UserEnvelope,
};
use crate::state::AppState;

/// Name of the httpOnly cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build the refresh cookie: httpOnly, strict same-site, secure in
/// production, valid exactly as long as the refresh token itself.
fn refresh_cookie(token: &str, config: &Config) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, token.to_string()))
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(config.environment.is_production())
        .path("/")
        .max_age(time::Duration::days(config.jwt_refresh_ttl_days))
        .build()
}

fn clear_refresh_cookie() -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE, ""))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::ZERO)
        .build()
}

/// POST /auth/register - Create an account and log it in
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<RegisterRequest>,
) -> Result<(CookieJar, (StatusCode, Json<RegisterResponse>)), ApiError> {
    let session = state.auth_service.register(request).await?;

    let jar = jar.add(refresh_cookie(&session.tokens.refresh_token, &state.config));

    Ok((
        jar,
        (
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "Registration successful!".to_string(),
                token: session.tokens.access_token,
                user: session.user,
            }),
        ),
    ))
}

/// POST /auth/login - Verify credentials and issue a token pair
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let session = state.auth_service.login(request).await?;

    let jar = jar.add(refresh_cookie(&session.tokens.refresh_token, &state.config));

    Ok((
        jar,
        Json(TokenResponse {
            token: session.tokens.access_token,
            user: session.user,
        }),
    ))
}

/// POST /auth/refresh - Rotate the refresh token and mint a new access token.
/// The token is taken from the refresh cookie, falling back to the body.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Option<Json<RefreshTokenRequest>>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or(body.map(|Json(request)| request.refresh_token))
        .ok_or(ApiError::TokenMissing)?;

    let session = state.auth_service.refresh(&refresh_token).await?;

    let jar = jar.add(refresh_cookie(&session.tokens.refresh_token, &state.config));

    Ok((
        jar,
        Json(TokenResponse {
            token: session.tokens.access_token,
            user: session.user,
        }),
    ))
}

/// POST /auth/logout - Clear the stored refresh token and the cookie.
/// Logout itself is a protected action; the access token stays valid until
/// its natural expiry.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<MessageResponse>), ApiError> {
    state.auth_service.logout(user.user.id).await?;

    let jar = jar.add(clear_refresh_cookie());

    Ok((
        jar,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// GET /auth/me - Current authenticated user
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = state.auth_service.current_user(user.user.id).await?;

    Ok(Json(UserEnvelope { user }))
}
