//! Member garages: one build page per member, with likes and comments.
//!
//! Callers pass the live member record (`account`) or `None` for anonymous
//! viewers. Unpublished garages are indistinguishable from missing ones for
//! everyone but their owner.

mod social;

pub use social::{LikeSummary, add_comment, comments, delete_comment, like_summary, toggle_like};

use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::validation::non_blank;
use crate::store::Store;
use crate::types::{Garage, JoinRequest};

const MIN_YEAR: i32 = 1900;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GarageDraft {
    pub year: i32,
    pub make: String,
    pub model: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub widgets: Option<Value>,
    #[serde(default)]
    pub appearance: Option<Value>,
    #[serde(default)]
    pub published: bool,
}

/// Partial garage edit; only fields present in the request are written.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaragePatch {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub widgets: Option<Value>,
    #[serde(default)]
    pub appearance: Option<Value>,
    #[serde(default)]
    pub published: Option<bool>,
}

fn validate_year(year: i32) -> Result<()> {
    let max_year = Utc::now().year() + 2;
    if !(MIN_YEAR..=max_year).contains(&year) {
        return Err(Error::BadRequest(format!(
            "Year must be between {MIN_YEAR} and {max_year}"
        )));
    }
    Ok(())
}

fn required_text(value: &str, field: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn widgets_value(value: Value) -> Result<Value> {
    match value {
        Value::Array(_) => Ok(value),
        _ => Err(Error::BadRequest("widgets must be an array".to_string())),
    }
}

fn appearance_value(value: Value) -> Result<Value> {
    match value {
        Value::Object(_) => Ok(value),
        _ => Err(Error::BadRequest("appearance must be an object".to_string())),
    }
}

/// Returns the garage if `viewer` may see it.
fn visible_garage(
    store: &dyn Store,
    username: &str,
    viewer: Option<&JoinRequest>,
) -> Result<Garage> {
    let garage = store
        .get_garage_by_username(username)?
        .ok_or(Error::NotFound)?;

    let is_owner = viewer.is_some_and(|v| v.id == garage.user_id);
    if !garage.published && !is_owner {
        return Err(Error::NotFound);
    }

    Ok(garage)
}

pub fn create(store: &dyn Store, account: &JoinRequest, draft: GarageDraft) -> Result<Garage> {
    if !account.rank.can_create_garage() {
        return Err(Error::InsufficientRank);
    }

    validate_year(draft.year)?;
    let make = required_text(&draft.make, "Make")?;
    let model = required_text(&draft.model, "Model")?;
    let widgets = widgets_value(draft.widgets.unwrap_or_else(|| Value::Array(Vec::new())))?;
    let appearance =
        appearance_value(draft.appearance.unwrap_or_else(|| Value::Object(Default::default())))?;

    // Friendlier message; the unique constraint on user_id is what actually holds.
    if store.get_garage_by_user_id(&account.id)?.is_some() {
        return Err(Error::Conflict("You already have a garage".to_string()));
    }

    let now = Utc::now();
    let garage = Garage {
        id: Uuid::new_v4().to_string(),
        user_id: account.id.clone(),
        username: account.username.clone(),
        owner_name: account.name.clone(),
        year: draft.year,
        make,
        model,
        platform: non_blank(draft.platform),
        power: non_blank(draft.power),
        location: non_blank(draft.location),
        description: non_blank(draft.description),
        cover_image: non_blank(draft.cover_image),
        widgets,
        appearance,
        published: draft.published,
        created_at: now,
        updated_at: now,
    };

    store.create_garage(&garage)?;

    tracing::info!("Garage created for {}", garage.username);
    Ok(garage)
}

pub fn update(
    store: &dyn Store,
    username: &str,
    account: &JoinRequest,
    patch: GaragePatch,
) -> Result<Garage> {
    let mut garage = store
        .get_garage_by_username(username)?
        .ok_or(Error::NotFound)?;

    if garage.user_id != account.id && !account.rank.is_admin() {
        if !garage.published {
            return Err(Error::NotFound);
        }
        return Err(Error::Forbidden(
            "You do not have permission to edit this garage".to_string(),
        ));
    }

    if let Some(year) = patch.year {
        validate_year(year)?;
        garage.year = year;
    }
    if let Some(make) = patch.make {
        garage.make = required_text(&make, "Make")?;
    }
    if let Some(model) = patch.model {
        garage.model = required_text(&model, "Model")?;
    }
    if patch.platform.is_some() {
        garage.platform = non_blank(patch.platform);
    }
    if patch.power.is_some() {
        garage.power = non_blank(patch.power);
    }
    if patch.location.is_some() {
        garage.location = non_blank(patch.location);
    }
    if patch.description.is_some() {
        garage.description = non_blank(patch.description);
    }
    if patch.cover_image.is_some() {
        garage.cover_image = non_blank(patch.cover_image);
    }
    if let Some(widgets) = patch.widgets {
        garage.widgets = widgets_value(widgets)?;
    }
    if let Some(appearance) = patch.appearance {
        garage.appearance = appearance_value(appearance)?;
    }
    if let Some(published) = patch.published {
        garage.published = published;
    }
    garage.updated_at = Utc::now();

    store.update_garage(&garage)?;
    Ok(garage)
}

pub fn read(store: &dyn Store, username: &str, viewer: Option<&JoinRequest>) -> Result<Garage> {
    visible_garage(store, username, viewer)
}

pub fn list(store: &dyn Store) -> Result<Vec<Garage>> {
    store.list_published_garages()
}
