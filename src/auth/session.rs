use serde::{Deserialize, Serialize};

use super::helpers::{CookieSpec, build_cookie};
use crate::error::Result;
use crate::types::{JoinRequest, Rank};

pub const SESSION_COOKIE: &str = "spades_member_session";
pub const SESSION_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

/// Identity asserted by the member session cookie.
///
/// The cookie is plain URL-encoded JSON that the browser can read; it is not
/// signed. Only `id` is used to look the member up again; `name`, `username`
/// and `rank` are for display and never used for authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSession {
    pub id: String,
    pub username: String,
    pub name: String,
    pub rank: Rank,
}

impl MemberSession {
    #[must_use]
    pub fn for_member(member: &JoinRequest) -> Self {
        Self {
            id: member.id.clone(),
            username: member.username.clone(),
            name: member.name.clone(),
            rank: member.rank,
        }
    }

    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        Ok(urlencoding::encode(&json).into_owned())
    }

    /// Parses a cookie value. Anything malformed is treated as no session.
    pub fn decode(raw: &str) -> Option<Self> {
        let json = urlencoding::decode(raw).ok()?;
        serde_json::from_str(&json).ok()
    }

    pub fn cookie(&self, secure: bool) -> Result<String> {
        let value = self.encode()?;
        Ok(build_cookie(&CookieSpec {
            name: SESSION_COOKIE,
            value: &value,
            max_age_secs: SESSION_MAX_AGE_SECS,
            http_only: false,
            same_site: "Lax",
            secure,
        }))
    }
}

/// Tells the browser to drop the session cookie. A copied cookie stays usable
/// until it expires; there is no server-side revocation.
#[must_use]
pub fn clear_session_cookie(secure: bool) -> String {
    build_cookie(&CookieSpec {
        name: SESSION_COOKIE,
        value: "",
        max_age_secs: 0,
        http_only: false,
        same_site: "Lax",
        secure,
    })
}
