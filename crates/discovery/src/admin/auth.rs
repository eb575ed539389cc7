//! Admin authentication for management endpoints
//!
//! Management calls carry a bearer JWT whose `role` claim must be `admin`.
//! Token verification failures are 401; a valid token without the admin
//! role is 403.

use actix_web::HttpRequest;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
    role: Option<String>,
}

pub fn verify_admin(req: &HttpRequest, jwt_secret: &str) -> Result<(), actix_web::Error> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("Missing authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("Invalid authorization format"))?;

    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|_| actix_web::error::ErrorUnauthorized("Invalid token"))?;

    if token_data.claims.role.as_deref() != Some("admin") {
        return Err(actix_web::error::ErrorForbidden("Admin access required"));
    }

    Ok(())
}
