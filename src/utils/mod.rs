// tasktracker-service/src/utils/mod.rs
use crate::models::{Claims, ServiceError, TokenKind, TokenPair};
use actix_web::dev::ServiceRequest;
use actix_web::http::header;
use actix_web::{HttpMessage, HttpRequest};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use log::{debug, error};
use regex::Regex;

pub mod activity_storage;
pub mod invitation_storage;
pub mod project_storage;
pub mod storage;
pub mod task_storage;
pub mod user_storage;
pub mod workspace_storage;

pub use storage::Store;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex");
    static ref NON_SLUG_RE: Regex = Regex::new(r"[^a-z0-9]+").expect("valid slug regex");
}

// JWT utility functions
pub mod jwt {
    use super::*;

    // Signing material and token lifetimes, built once from config
    #[derive(Clone)]
    pub struct JwtKeys {
        secret: String,
        access_ttl: Duration,
        refresh_ttl: Duration,
    }

    impl JwtKeys {
        pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
            Self {
                secret: secret.to_string(),
                access_ttl,
                refresh_ttl,
            }
        }

        pub fn generate_token(&self, user_id: &str, email: &str, kind: TokenKind) -> Result<String, ServiceError> {
            let now = Utc::now();
            let ttl = match kind {
                TokenKind::Access => self.access_ttl,
                TokenKind::Refresh => self.refresh_ttl,
            };

            let claims = Claims {
                sub: user_id.to_string(),
                email: email.to_string(),
                typ: kind,
                exp: (now + ttl).timestamp() as usize,
                iat: now.timestamp() as usize,
            };

            encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(self.secret.as_ref()),
            )
            .map_err(|e| {
                error!("Failed to sign token: {:?}", e);
                ServiceError::InternalServerError
            })
        }

        // Short-lived access token plus long-lived refresh token
        pub fn generate_pair(&self, user_id: &str, email: &str) -> Result<TokenPair, ServiceError> {
            Ok(TokenPair {
                access_token: self.generate_token(user_id, email, TokenKind::Access)?,
                refresh_token: self.generate_token(user_id, email, TokenKind::Refresh)?,
            })
        }

        // Validate signature and expiry, and that the token is of the expected kind
        pub fn decode_token(&self, token: &str, expected: TokenKind) -> Result<Claims, ServiceError> {
            let claims = decode::<Claims>(
                token,
                &DecodingKey::from_secret(self.secret.as_ref()),
                &Validation::default(),
            )
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("Rejected token: {:?}", e);
                ServiceError::Unauthorized("Invalid or expired token".to_string())
            })?;

            if claims.typ != expected {
                return Err(ServiceError::Unauthorized("Wrong token type".to_string()));
            }
            Ok(claims)
        }
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<&str, ServiceError> {
        auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("Missing bearer token".to_string()))
    }
}

// Password utility functions
pub mod password {
    use super::*;

    pub fn hash_password(password: &str, cost: u32) -> Result<String, ServiceError> {
        hash(password, cost).map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            ServiceError::InternalServerError
        })
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
        verify(password, hash).map_err(|e| {
            error!("Failed to verify password: {:?}", e);
            ServiceError::InternalServerError
        })
    }
}

// Opaque invitation tokens
pub mod tokens {
    use rand::rngs::OsRng;
    use rand::RngCore;

    // 32 random bytes, hex encoded
    pub fn generate_invitation_token() -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

// Input normalisation helpers
pub mod validation {
    use super::*;

    pub fn normalize_email(email: &str) -> Result<String, ServiceError> {
        let email = email.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(ServiceError::BadRequest(format!("Invalid email address: {}", email)));
        }
        Ok(email)
    }

    // "Acme Corp!" -> "acme-corp"
    pub fn slugify(name: &str) -> String {
        let lowered = name.trim().to_lowercase();
        NON_SLUG_RE.replace_all(&lowered, "-").trim_matches('-').to_string()
    }

    pub fn require_non_empty(value: &str, field: &str) -> Result<String, ServiceError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::BadRequest(format!("{} must not be empty", field)));
        }
        Ok(trimmed.to_string())
    }
}

// Get the authenticated user's id from request extensions
pub fn get_user_id_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    req.extensions()
        .get::<Claims>()
        .map(|claims| claims.sub.clone())
        .ok_or_else(|| ServiceError::Unauthorized("Unauthorized".to_string()))
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::jwt::{extract_token_from_header, JwtKeys};
    use super::*;
    use actix_web::body::EitherBody;
    use actix_web::dev::{forward_ready, Service, ServiceResponse, Transform};
    use actix_web::{Error, ResponseError};
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;

    pub struct Authentication {
        keys: JwtKeys,
    }

    impl Authentication {
        pub fn new(keys: JwtKeys) -> Self {
            Self { keys }
        }
    }

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<EitherBody<B>>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware {
                service,
                keys: self.keys.clone(),
            })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
        keys: JwtKeys,
    }

    impl<S> AuthenticationMiddleware<S> {
        fn authenticate(&self, req: &ServiceRequest) -> Result<Claims, ServiceError> {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .ok_or_else(|| ServiceError::Unauthorized("Missing Authorization header".to_string()))?;
            let auth_str = auth_header
                .to_str()
                .map_err(|_| ServiceError::Unauthorized("Malformed Authorization header".to_string()))?;
            let token = extract_token_from_header(auth_str)?;
            self.keys.decode_token(token, TokenKind::Access)
        }
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = ServiceResponse<EitherBody<B>>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            match self.authenticate(&req) {
                Ok(claims) => {
                    // Add the claims to the request extensions
                    req.extensions_mut().insert(claims);
                    let fut = self.service.call(req);
                    Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
                }
                Err(err) => {
                    debug!("🔒 Rejected request to {}: {}", req.path(), err);
                    let response = req.into_response(err.error_response()).map_into_right_body();
                    Box::pin(async move { Ok(response) })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::jwt::{extract_token_from_header, JwtKeys};
    use super::validation::{normalize_email, slugify};
    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret", Duration::minutes(15), Duration::days(7))
    }

    #[test]
    fn access_and_refresh_tokens_are_not_interchangeable() {
        let pair = keys().generate_pair("user-1", "a@x.com").unwrap();

        let claims = keys().decode_token(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, 15 * 60);

        assert!(keys().decode_token(&pair.access_token, TokenKind::Refresh).is_err());
        assert!(keys().decode_token(&pair.refresh_token, TokenKind::Access).is_err());

        let refresh = keys().decode_token(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.exp - refresh.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let other = JwtKeys::new("other-secret", Duration::minutes(15), Duration::days(7));
        let token = other.generate_token("user-1", "a@x.com", TokenKind::Access).unwrap();
        assert!(matches!(
            keys().decode_token(&token, TokenKind::Access),
            Err(ServiceError::Unauthorized(_))
        ));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let expired = JwtKeys::new("test-secret", Duration::minutes(-5), Duration::days(7));
        let token = expired.generate_token("user-1", "a@x.com", TokenKind::Access).unwrap();
        assert!(keys().decode_token(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(extract_token_from_header("Bearer abc").unwrap(), "abc");
        assert!(extract_token_from_header("Basic abc").is_err());
        assert!(extract_token_from_header("Bearer ").is_err());
    }

    #[test]
    fn invitation_tokens_are_long_and_distinct() {
        let a = tokens::generate_invitation_token();
        let b = tokens::generate_invitation_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn emails_are_normalized_and_validated() {
        assert_eq!(normalize_email("  Bob@Acme.COM ").unwrap(), "bob@acme.com");
        assert!(normalize_email("not-an-email").is_err());
    }

    #[test]
    fn slugs_collapse_punctuation() {
        assert_eq!(slugify("Acme Corp!"), "acme-corp");
        assert_eq!(slugify("  --Hello,  World-- "), "hello-world");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn passwords_round_trip_through_bcrypt() {
        let hashed = password::hash_password("secret1", 4).unwrap();
        assert!(password::verify_password("secret1", &hashed).unwrap());
        assert!(!password::verify_password("wrong", &hashed).unwrap());
    }
}
