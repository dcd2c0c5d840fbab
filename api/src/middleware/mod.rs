use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::handlers::auth::Claims;
use crate::models::UserRole;
use crate::AppState;

pub fn decode_claims(jwt_secret: &str, token: &str) -> Result<Claims, StatusCode> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| StatusCode::UNAUTHORIZED)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned));

    let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
    let claims = decode_claims(&state.config.jwt_secret, &token)?;

    // Add claims to request extensions so handlers can access them
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Gate for the back-office route group. Runs after `auth_middleware`, so
/// claims are already in the request extensions.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, StatusCode> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(StatusCode::UNAUTHORIZED)?;

    match claims.role {
        UserRole::Admin | UserRole::Staff => Ok(next.run(req).await),
        UserRole::Tenant => Err(StatusCode::FORBIDDEN),
    }
}
