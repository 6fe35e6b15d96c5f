use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::visible_garage;
use crate::error::{Error, Result};
use crate::server::validation::validate_comment;
use crate::store::Store;
use crate::types::{GarageComment, JoinRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeSummary {
    pub likes: i64,
    pub liked: bool,
}

pub fn like_summary(
    store: &dyn Store,
    username: &str,
    viewer: Option<&JoinRequest>,
) -> Result<LikeSummary> {
    let garage = visible_garage(store, username, viewer)?;
    let likes = store.count_garage_likes(&garage.id)?;
    let liked = match viewer {
        Some(v) => store.has_garage_like(&garage.id, &v.id)?,
        None => false,
    };
    Ok(LikeSummary { likes, liked })
}

/// Likes the garage, or removes the like if the member already left one.
pub fn toggle_like(store: &dyn Store, username: &str, account: &JoinRequest) -> Result<LikeSummary> {
    let garage = visible_garage(store, username, Some(account))?;
    let liked = store.toggle_garage_like(&garage.id, &account.id)?;
    let likes = store.count_garage_likes(&garage.id)?;
    Ok(LikeSummary { likes, liked })
}

pub fn comments(
    store: &dyn Store,
    username: &str,
    viewer: Option<&JoinRequest>,
) -> Result<Vec<GarageComment>> {
    let garage = visible_garage(store, username, viewer)?;
    store.list_garage_comments(&garage.id)
}

pub fn add_comment(
    store: &dyn Store,
    username: &str,
    account: &JoinRequest,
    body: &str,
) -> Result<GarageComment> {
    let garage = visible_garage(store, username, Some(account))?;

    let body = body.trim();
    validate_comment(body).map_err(Error::BadRequest)?;

    let comment = GarageComment {
        id: Uuid::new_v4().to_string(),
        garage_id: garage.id,
        user_id: account.id.clone(),
        username: account.username.clone(),
        body: body.to_string(),
        created_at: Utc::now(),
    };
    store.create_garage_comment(&comment)?;

    Ok(comment)
}

/// Removes a comment. Allowed for its author, the garage owner, and admins.
pub fn delete_comment(
    store: &dyn Store,
    username: &str,
    comment_id: &str,
    account: &JoinRequest,
) -> Result<()> {
    let garage = visible_garage(store, username, Some(account))?;
    let comment = store
        .get_garage_comment(comment_id)?
        .filter(|c| c.garage_id == garage.id)
        .ok_or(Error::NotFound)?;

    let allowed = comment.user_id == account.id
        || garage.user_id == account.id
        || account.rank.is_admin();
    if !allowed {
        return Err(Error::Forbidden(
            "You do not have permission to delete this comment".to_string(),
        ));
    }

    store.delete_garage_comment(&comment.id)?;
    Ok(())
}
