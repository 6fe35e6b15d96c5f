use serde::Deserialize;

use crate::auth::{CredentialHasher, MemberSession};
use crate::error::{Error, Result};
use crate::server::validation::{non_blank, normalize_username};
use crate::store::Store;
use crate::types::{JoinRequest, MemberProfile, RequestStatus};

/// Checks credentials and issues the session payload.
///
/// Unknown usernames, rejected accounts and wrong passwords all fail with the
/// same [`Error::InvalidCredentials`]. The account status is checked before
/// the password, so a pending account always gets [`Error::PendingApproval`].
pub fn login(
    store: &dyn Store,
    hasher: &CredentialHasher,
    username: &str,
    password: &str,
) -> Result<(MemberSession, JoinRequest)> {
    let username = normalize_username(username);
    let account = store
        .get_join_request_by_username(&username)?
        .ok_or(Error::InvalidCredentials)?;

    match account.status {
        RequestStatus::Approved => {}
        RequestStatus::Pending => return Err(Error::PendingApproval),
        RequestStatus::Rejected => return Err(Error::InvalidCredentials),
    }

    if !hasher.verify(password, &account.password_hash)? {
        tracing::info!("Failed login for {username}");
        return Err(Error::InvalidCredentials);
    }

    tracing::info!("Member {} signed in", account.username);
    Ok((MemberSession::for_member(&account), account))
}

/// Re-reads the member behind a session. Stale or forged ids, and accounts
/// that are no longer approved, are treated as signed out.
pub fn current_user(store: &dyn Store, session: &MemberSession) -> Result<MemberProfile> {
    let account = store
        .get_join_request(&session.id)?
        .ok_or(Error::Unauthorized)?;

    if account.status != RequestStatus::Approved {
        return Err(Error::Unauthorized);
    }

    Ok(MemberProfile::from(account))
}

/// Partial profile edit; absent fields are left unchanged, blank ones are cleared.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub tiktok: Option<String>,
    #[serde(default)]
    pub car: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

pub fn update_profile(
    store: &dyn Store,
    account: &JoinRequest,
    patch: ProfilePatch,
) -> Result<MemberProfile> {
    let mut updated = account.clone();

    if let Some(name) = patch.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::BadRequest("Name cannot be empty".to_string()));
        }
        updated.name = name.to_string();
    }
    if patch.instagram.is_some() {
        updated.instagram = non_blank(patch.instagram);
    }
    if patch.tiktok.is_some() {
        updated.tiktok = non_blank(patch.tiktok);
    }
    if patch.car.is_some() {
        updated.car = non_blank(patch.car);
    }
    if patch.bio.is_some() {
        updated.bio = non_blank(patch.bio);
    }
    if patch.profile_pic.is_some() {
        updated.profile_pic = non_blank(patch.profile_pic);
    }

    store.update_join_request(&updated)?;
    Ok(MemberProfile::from(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::requests::tests::{application, store};
    use crate::membership::{invites, requests};
    use crate::types::Rank;

    fn submitted(store: &dyn Store, hasher: &CredentialHasher, username: &str) -> JoinRequest {
        let invite = invites::generate(store).unwrap();
        requests::submit(store, hasher, application(&invite.code, username)).unwrap()
    }

    #[test]
    fn test_login_messages() {
        let store = store();
        let hasher = CredentialHasher::new();
        let pending = submitted(&store, &hasher, "pending_one");
        let rejected = submitted(&store, &hasher, "rejected_one");
        requests::review(&store, &rejected.id, "rejected").unwrap();

        assert!(matches!(
            login(&store, &hasher, &pending.username, "hunter22"),
            Err(Error::PendingApproval)
        ));
        assert!(matches!(
            login(&store, &hasher, &rejected.username, "hunter22"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            login(&store, &hasher, "nobody", "hunter22"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            login(&store, &hasher, &pending.username, "wrong-pass"),
            Err(Error::PendingApproval)
        ));
        assert!(matches!(
            login(&store, &hasher, &rejected.username, "wrong-pass"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_wrong_password_after_approval() {
        let store = store();
        let hasher = CredentialHasher::new();
        let request = submitted(&store, &hasher, "driver");
        requests::review(&store, &request.id, "approved").unwrap();

        assert!(matches!(
            login(&store, &hasher, "driver", "wrong-pass"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_login_after_approval_uses_stored_rank() {
        let store = store();
        let hasher = CredentialHasher::new();
        let request = submitted(&store, &hasher, "driver");
        requests::review(&store, &request.id, "approved").unwrap();
        requests::set_rank(&store, &request.id, "og").unwrap();

        let (session, account) = login(&store, &hasher, "  Driver ", "hunter22").unwrap();
        assert_eq!(session.id, request.id);
        assert_eq!(session.rank, Rank::Og);
        assert_eq!(account.username, "driver");
    }

    #[test]
    fn test_current_user_refetches_record() {
        let store = store();
        let hasher = CredentialHasher::new();
        let request = submitted(&store, &hasher, "driver");
        requests::review(&store, &request.id, "approved").unwrap();

        let mut session = MemberSession::for_member(&request);
        session.rank = Rank::Admin;
        session.name = "Someone Else".to_string();

        let profile = current_user(&store, &session).unwrap();
        assert_eq!(profile.rank, Rank::Member);
        assert_eq!(profile.name, "Test Driver");

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("password_hash").is_none());

        requests::withdraw(&store, &request.id).unwrap();
        assert!(matches!(
            current_user(&store, &session),
            Err(Error::Unauthorized)
        ));
    }

    #[test]
    fn test_update_profile_merges_fields() {
        let store = store();
        let hasher = CredentialHasher::new();
        let request = submitted(&store, &hasher, "driver");

        let profile = update_profile(
            &store,
            &request,
            ProfilePatch {
                car: Some("GR86".to_string()),
                instagram: Some(" ".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(profile.car.as_deref(), Some("GR86"));
        assert_eq!(profile.instagram, None);
        assert_eq!(profile.name, "Test Driver");

        let result = update_profile(
            &store,
            &request,
            ProfilePatch {
                name: Some("".to_string()),
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }
}
