#![allow(dead_code)]

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde_json::{Value, json};

use jwt_strategy::AuthRequest;

pub const SECRET: &str = "secret";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn sign(claims: Value) -> String {
    sign_with(&Header::new(Algorithm::HS256), claims, SECRET)
}

pub fn sign_with(header: &Header, claims: Value, secret: &str) -> String {
    encode(header, &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
}

pub fn payload() -> Value {
    json!({
        "sub": "1234567890",
        "name": "John Doe",
        "iat": now(),
        "exp": now() + 600,
    })
}

pub fn bearer_request(token: &str) -> AuthRequest {
    authorization_request(&format!("bearer {token}"))
}

pub fn authorization_request(value: &str) -> AuthRequest {
    let mut req = AuthRequest::new();
    req.headers_mut().insert(
        axum::http::header::AUTHORIZATION,
        axum::http::HeaderValue::from_str(value).unwrap(),
    );
    req
}
