use sha2::{Digest, Sha256};

use super::helpers::{CookieSpec, build_cookie, constant_time_eq};
use crate::error::{Error, Result};

pub const ADMIN_COOKIE: &str = "spades_admin_auth";
pub const ADMIN_MAX_AGE_SECS: i64 = 12 * 60 * 60;

/// Shared-secret gate for the admin console.
///
/// The cookie carries the SHA-256 digest of the secret, so rotating the
/// secret invalidates every outstanding admin cookie.
pub struct AdminGate {
    digest: String,
}

impl AdminGate {
    pub fn new(secret: &str) -> Result<Self> {
        if secret.is_empty() {
            return Err(Error::Config("admin password cannot be empty".to_string()));
        }
        Ok(Self {
            digest: digest(secret),
        })
    }

    #[must_use]
    pub fn check_password(&self, submitted: &str) -> bool {
        constant_time_eq(digest(submitted).as_bytes(), self.digest.as_bytes())
    }

    #[must_use]
    pub fn check_cookie(&self, value: &str) -> bool {
        constant_time_eq(value.as_bytes(), self.digest.as_bytes())
    }

    #[must_use]
    pub fn cookie(&self, secure: bool) -> String {
        build_cookie(&CookieSpec {
            name: ADMIN_COOKIE,
            value: &self.digest,
            max_age_secs: ADMIN_MAX_AGE_SECS,
            http_only: true,
            same_site: "Strict",
            secure,
        })
    }
}

#[must_use]
pub fn clear_admin_cookie(secure: bool) -> String {
    build_cookie(&CookieSpec {
        name: ADMIN_COOKIE,
        value: "",
        max_age_secs: 0,
        http_only: true,
        same_site: "Strict",
        secure,
    })
}

fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}
