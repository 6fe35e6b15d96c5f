//! Club social media posts, curated by admins and shown on the public site.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::validation::{non_blank, validate_https_url};
use crate::store::Store;
use crate::types::{SocialPlatform, SocialPost};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub display_order: Option<i32>,
}

fn parse_platform(platform: &str) -> Result<SocialPlatform> {
    SocialPlatform::parse(platform.trim())
        .ok_or_else(|| Error::BadRequest("Platform must be instagram or tiktok".to_string()))
}

fn checked_url(url: &str) -> Result<String> {
    let url = url.trim();
    validate_https_url(url).map_err(Error::BadRequest)?;
    Ok(url.to_string())
}

pub fn list(store: &dyn Store) -> Result<Vec<SocialPost>> {
    store.list_social_posts()
}

pub fn create(store: &dyn Store, draft: PostDraft) -> Result<SocialPost> {
    let post = SocialPost {
        id: Uuid::new_v4().to_string(),
        platform: parse_platform(&draft.platform)?,
        url: checked_url(&draft.url)?,
        caption: non_blank(draft.caption),
        display_order: draft.display_order.unwrap_or(0),
        created_at: Utc::now(),
    };
    store.create_social_post(&post)?;

    tracing::info!("Social post {} added", post.id);
    Ok(post)
}

pub fn update(store: &dyn Store, id: &str, patch: PostPatch) -> Result<SocialPost> {
    let mut post = store.get_social_post(id)?.ok_or(Error::NotFound)?;

    if let Some(platform) = patch.platform {
        post.platform = parse_platform(&platform)?;
    }
    if let Some(url) = patch.url {
        post.url = checked_url(&url)?;
    }
    if patch.caption.is_some() {
        post.caption = non_blank(patch.caption);
    }
    if let Some(order) = patch.display_order {
        post.display_order = order;
    }

    store.update_social_post(&post)?;
    Ok(post)
}

pub fn delete(store: &dyn Store, id: &str) -> Result<()> {
    if !store.delete_social_post(id)? {
        return Err(Error::NotFound);
    }
    tracing::info!("Social post {id} removed");
    Ok(())
}
