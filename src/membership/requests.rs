use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use super::invites;
use crate::auth::CredentialHasher;
use crate::error::{Error, Result};
use crate::server::validation::{non_blank, normalize_username, validate_password, validate_username};
use crate::store::Store;
use crate::types::{InviteSnapshot, JoinRequest, Rank, RequestStatus};

/// A membership application as submitted from the join form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinApplication {
    #[serde(default)]
    pub invite_code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
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

/// Validates and stores a join request, then consumes its invite code.
///
/// The insert and the consume are separate statements. If the consume fails
/// the request row stays behind with its code still available; the failure is
/// logged and returned rather than hidden.
pub fn submit(
    store: &dyn Store,
    hasher: &CredentialHasher,
    application: JoinApplication,
) -> Result<JoinRequest> {
    let code = application.invite_code.trim();
    if !invites::is_valid_code(code) {
        return Err(Error::BadRequest("Invalid invite code".to_string()));
    }
    if !invites::validate(store, code) {
        return Err(Error::BadRequest(
            "Invite code is invalid or has already been used".to_string(),
        ));
    }

    let name = application.name.trim();
    let email = application.email.trim();
    if name.is_empty()
        || application.username.trim().is_empty()
        || email.is_empty()
        || application.password.is_empty()
    {
        return Err(Error::BadRequest(
            "Name, username, email, and password are required".to_string(),
        ));
    }

    let username = normalize_username(&application.username);
    validate_username(&username).map_err(Error::BadRequest)?;
    validate_password(&application.password).map_err(Error::BadRequest)?;

    if store.get_join_request_by_username(&username)?.is_some() {
        return Err(Error::Conflict("Username already taken".to_string()));
    }

    let password_hash = hasher.hash(&application.password)?;

    let now = Utc::now();
    let request = JoinRequest {
        id: Uuid::new_v4().to_string(),
        invite_code: code.to_string(),
        name: name.to_string(),
        username,
        email: email.to_string(),
        password_hash,
        instagram: non_blank(application.instagram),
        tiktok: non_blank(application.tiktok),
        car: non_blank(application.car),
        bio: non_blank(application.bio),
        profile_pic: non_blank(application.profile_pic),
        rank: Rank::Member,
        status: RequestStatus::Pending,
        created_at: now,
        updated_at: now,
    };

    store.create_join_request(&request)?;

    let snapshot = InviteSnapshot {
        name: request.name.clone(),
        instagram: request.instagram.clone(),
        email: request.email.clone(),
    };
    if let Err(e) = invites::consume(store, code, &snapshot) {
        tracing::error!(
            "Join request {} stored but invite code {} was not consumed: {e}",
            request.id,
            code
        );
        return Err(e);
    }

    tracing::info!("Join request {} submitted by {}", request.id, request.username);
    Ok(request)
}

pub fn review(store: &dyn Store, id: &str, status: &str) -> Result<RequestStatus> {
    let status =
        RequestStatus::parse_review(status).ok_or_else(|| Error::InvalidStatus(status.to_string()))?;

    if !store.review_join_request(id, status)? {
        return match store.get_join_request(id)? {
            Some(_) => Err(Error::Conflict(
                "Request has already been reviewed".to_string(),
            )),
            None => Err(Error::NotFound),
        };
    }

    tracing::info!("Join request {id} {status}");
    Ok(status)
}

/// Deletes a join request and releases its invite code.
///
/// If the release fails after the delete succeeded, the code is left
/// consumed with no request pointing at it. That orphan is reported as
/// [`Error::OrphanedInvite`] so an admin can see which code is stuck.
pub fn withdraw(store: &dyn Store, id: &str) -> Result<JoinRequest> {
    let request = store.get_join_request(id)?.ok_or(Error::NotFound)?;

    if !store.delete_join_request(&request.id)? {
        return Err(Error::NotFound);
    }

    if let Err(e) = invites::release(store, &request.invite_code) {
        tracing::error!(
            "Join request {} deleted but invite code {} was not released: {e}",
            request.id,
            request.invite_code
        );
        return Err(Error::OrphanedInvite(request.invite_code));
    }

    tracing::info!(
        "Join request {} withdrawn, invite code {} released",
        request.id,
        request.invite_code
    );
    Ok(request)
}

pub fn list(store: &dyn Store, status: Option<&str>) -> Result<Vec<JoinRequest>> {
    let status = status
        .map(|s| RequestStatus::parse(s).ok_or_else(|| Error::InvalidStatus(s.to_string())))
        .transpose()?;
    store.list_join_requests(status)
}

pub fn set_rank(store: &dyn Store, id: &str, rank: &str) -> Result<JoinRequest> {
    let rank = Rank::parse(rank).ok_or_else(|| Error::BadRequest(format!("Invalid rank: {rank}")))?;

    let mut request = store.get_join_request(id)?.ok_or(Error::NotFound)?;
    request.rank = rank;
    store.update_join_request(&request)?;

    tracing::info!("Member {} rank set to {rank}", request.username);
    Ok(request)
}
