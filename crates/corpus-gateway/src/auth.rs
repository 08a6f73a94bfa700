//! JWT issuance and verification (spec §4.4 "Authentication").
//!
//! The signing secret and the sole privileged role name are hard-coded
//! constants — preserved verbatim from the source system (spec §9: "the
//! signing secret and the sole privileged role name are hard-coded
//! constants... production deployments should externalize both").

use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const SECRET_KEY: &str = "something secret here";
const ADMIN_ROLE: &str = "superuser";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: u64,
}

/// Single-entry credential map plus signing configuration, loaded once at
/// startup from the environment (spec §3 "Auth state").
pub struct AuthService {
    users: HashMap<String, String>,
    token_ttl: Duration,
}

impl AuthService {
    /// Reads `ADMIN_USER`/`ADMIN_PASSWORD` from the environment. Aborts
    /// startup (returns `Err`) if either is absent, per spec §6.
    pub fn from_env(token_ttl: Duration) -> anyhow::Result<Self> {
        let user = std::env::var("ADMIN_USER")
            .map_err(|_| anyhow::anyhow!("could not get admin user from environment"))?;
        let password = std::env::var("ADMIN_PASSWORD")
            .map_err(|_| anyhow::anyhow!("could not get admin password from environment"))?;

        let mut users = HashMap::new();
        users.insert(user, password);

        Ok(Self { users, token_ttl })
    }

    /// Construct directly from a single credential pair, bypassing the
    /// environment. Used by tests and by any embedder that manages
    /// credentials itself.
    pub fn with_credentials(user: &str, password: &str, token_ttl: Duration) -> Self {
        let mut users = HashMap::new();
        users.insert(user.to_string(), password.to_string());
        Self { users, token_ttl }
    }

    /// Verify `name`/`password` against the stored credential and, on
    /// success, issue a signed token with claims `{sub: "superuser", exp}`.
    pub fn login(&self, name: &str, password: &str) -> Result<String, &'static str> {
        if name.is_empty() {
            return Err("invalid credentials");
        }

        match self.users.get(name) {
            Some(stored) if stored == password => {}
            _ => return Err("invalid credentials"),
        }

        let exp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before epoch")
            .checked_add(self.token_ttl)
            .expect("token ttl overflow")
            .as_secs();

        let claims = Claims { sub: ADMIN_ROLE.to_string(), exp };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET_KEY.as_bytes()),
        )
        .map_err(|_| "token generation failed")
    }

    /// Verify a bearer token. All rejection modes (parse failure, wrong
    /// algorithm, expiry, missing/wrong subject) collapse to the same
    /// opaque message, per spec §4.4/§7.
    pub fn verify(&self, token: &str) -> Result<(), &'static str> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["sub", "exp"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(SECRET_KEY.as_bytes()),
            &validation,
        )
        .map_err(|_| "invalid token")?;

        if data.claims.sub != ADMIN_ROLE {
            return Err("invalid token");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_round_trips_through_verify() {
        let auth = AuthService::with_credentials("admin", "pw", Duration::from_secs(120));
        let token = auth.login("admin", "pw").unwrap();
        assert!(auth.verify(&token).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let auth = AuthService::with_credentials("admin", "pw", Duration::from_secs(120));
        assert!(auth.login("admin", "wrong").is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = AuthService::with_credentials("admin", "pw", Duration::from_secs(120));
        assert!(auth.verify("not-a-jwt").is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let auth = AuthService::with_credentials("admin", "pw", Duration::from_secs(0));
        let token = auth.login("admin", "pw").unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn wrong_algorithm_token_is_rejected() {
        let auth = AuthService::with_credentials("admin", "pw", Duration::from_secs(120));
        let claims = Claims { sub: ADMIN_ROLE.to_string(), exp: u64::MAX };
        let none_token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(SECRET_KEY.as_bytes()),
        )
        .unwrap();
        assert!(auth.verify(&none_token).is_err());
    }
}
