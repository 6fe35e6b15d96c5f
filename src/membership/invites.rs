use chrono::Utc;
use rand::Rng;
use rand::rngs::OsRng;

use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{InviteCode, InviteSnapshot};

pub const CODE_PREFIX: &str = "SPADES-";
const CODE_ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_SUFFIX_LEN: usize = 6;
pub const MAX_GENERATE_ATTEMPTS: u32 = 5;

/// Returns true if `code` has the exact `SPADES-XXXXXX` shape.
#[must_use]
pub fn is_valid_code(code: &str) -> bool {
    code.strip_prefix(CODE_PREFIX).is_some_and(|suffix| {
        suffix.len() == CODE_SUFFIX_LEN
            && suffix
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
    })
}

/// Draws a fresh code from the operating system's CSPRNG.
#[must_use]
pub fn random_code() -> String {
    let mut rng = OsRng;
    let suffix: String = (0..CODE_SUFFIX_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    format!("{CODE_PREFIX}{suffix}")
}

#[must_use]
pub fn invite_link(public_base_url: &str, code: &str) -> String {
    format!("{}/join?code={code}", public_base_url.trim_end_matches('/'))
}

pub fn generate(store: &dyn Store) -> Result<InviteCode> {
    generate_with(store, random_code)
}

/// Inserts codes from `next_code` until one does not collide with an
/// existing code. The primary key is the only uniqueness guarantee.
pub fn generate_with(store: &dyn Store, mut next_code: impl FnMut() -> String) -> Result<InviteCode> {
    for attempt in 1..=MAX_GENERATE_ATTEMPTS {
        let invite = InviteCode {
            code: next_code(),
            created_at: Utc::now(),
            used_at: None,
            used_name: None,
            used_instagram: None,
            used_email: None,
        };

        match store.create_invite_code(&invite) {
            Ok(()) => {
                tracing::info!("Generated invite code {}", invite.code);
                return Ok(invite);
            }
            Err(Error::InviteCodeCollision) => {
                tracing::warn!("Invite code collision on attempt {attempt}");
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    Err(Error::GenerationExhausted)
}

/// Reports whether `code` can be used to join. Fails closed: malformed,
/// unknown, used, and unreadable codes all report false.
pub fn validate(store: &dyn Store, code: &str) -> bool {
    if !is_valid_code(code) {
        return false;
    }

    match store.get_invite_code(code) {
        Ok(Some(invite)) => invite.is_available(),
        Ok(None) => false,
        Err(e) => {
            tracing::error!("Failed to look up invite code: {e}");
            false
        }
    }
}

pub fn consume(store: &dyn Store, code: &str, snapshot: &InviteSnapshot) -> Result<()> {
    if store.mark_invite_code_used(code, snapshot)? {
        return Ok(());
    }

    match store.get_invite_code(code)? {
        Some(_) => Err(Error::AlreadyUsed),
        None => Err(Error::NotFound),
    }
}

/// Makes a consumed code available again. This is a compensating step run
/// after the owning join request is deleted, not a rollback.
pub fn release(store: &dyn Store, code: &str) -> Result<()> {
    if store.release_invite_code(code)? {
        Ok(())
    } else {
        Err(Error::NotFound)
    }
}

pub fn list(store: &dyn Store) -> Result<Vec<InviteCode>> {
    store.list_invite_codes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn store() -> SqliteStore {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn snapshot() -> InviteSnapshot {
        InviteSnapshot {
            name: "Test Driver".to_string(),
            instagram: None,
            email: "driver@example.com".to_string(),
        }
    }

    #[test]
    fn test_random_codes_match_format() {
        for _ in 0..200 {
            let code = random_code();
            assert!(is_valid_code(&code), "bad code {code}");
        }
    }

    #[test]
    fn test_code_format() {
        assert!(is_valid_code("SPADES-AB12CD"));
        assert!(!is_valid_code("SPADES-ab12cd"));
        assert!(!is_valid_code("SPADES-AB12C"));
        assert!(!is_valid_code("SPADES-AB12CDE"));
        assert!(!is_valid_code("spades-AB12CD"));
        assert!(!is_valid_code("SPADES_AB12CD"));
        assert!(!is_valid_code("SPADES-AB12-D"));
        assert!(!is_valid_code(""));
    }

    #[test]
    fn test_generate_retries_past_collisions() {
        let store = store();
        store
            .create_invite_code(&InviteCode {
                code: "SPADES-AAAAAA".to_string(),
                created_at: Utc::now(),
                used_at: None,
                used_name: None,
                used_instagram: None,
                used_email: None,
            })
            .unwrap();

        let mut candidates = vec!["SPADES-BBBBBB", "SPADES-AAAAAA", "SPADES-AAAAAA"];
        let invite = generate_with(&store, || candidates.pop().unwrap().to_string()).unwrap();

        assert_eq!(invite.code, "SPADES-BBBBBB");
    }

    #[test]
    fn test_generate_gives_up_after_bounded_attempts() {
        let store = store();
        generate_with(&store, || "SPADES-AAAAAA".to_string()).unwrap();

        let mut attempts = 0;
        let result = generate_with(&store, || {
            attempts += 1;
            "SPADES-AAAAAA".to_string()
        });

        assert!(matches!(result, Err(Error::GenerationExhausted)));
        assert_eq!(attempts, MAX_GENERATE_ATTEMPTS);
    }

    #[test]
    fn test_validate_fails_closed_on_store_errors() {
        // No schema, so every lookup errors.
        let store = SqliteStore::in_memory().unwrap();
        assert!(store.get_invite_code("SPADES-AAAAAA").is_err());

        assert!(!validate(&store, "SPADES-AAAAAA"));
        assert!(!validate(&store, "SPADES-aaaaaa"));
        assert!(!validate(&store, "not a code"));
    }

    #[test]
    fn test_validate_lifecycle() {
        let store = store();
        let invite = generate(&store).unwrap();
        assert!(validate(&store, &invite.code));
        assert!(!validate(&store, &format!(" {} ", invite.code)));
        assert!(!validate(&store, "SPADES-ZZZZZZ"));

        consume(&store, &invite.code, &snapshot()).unwrap();
        assert!(!validate(&store, &invite.code));

        release(&store, &invite.code).unwrap();
        assert!(validate(&store, &invite.code));
    }

    #[test]
    fn test_consume_errors() {
        let store = store();
        let invite = generate(&store).unwrap();

        consume(&store, &invite.code, &snapshot()).unwrap();
        assert!(matches!(
            consume(&store, &invite.code, &snapshot()),
            Err(Error::AlreadyUsed)
        ));
        assert!(matches!(
            consume(&store, "SPADES-ZZZZZZ", &snapshot()),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_invite_link() {
        assert_eq!(
            invite_link("https://spades.club/", "SPADES-AB12CD"),
            "https://spades.club/join?code=SPADES-AB12CD"
        );
    }
}
