use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::Value;

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const INVITE_COLUMNS: &str =
    "code, created_at, used_at, used_name, used_instagram, used_email";

const JOIN_REQUEST_COLUMNS: &str = "id, invite_code, name, username, email, password_hash, \
     instagram, tiktok, car, bio, profile_pic, rank, status, created_at, updated_at";

const GARAGE_COLUMNS: &str = "id, user_id, username, owner_name, year, make, model, platform, \
     power, location, description, cover_image, widgets, appearance, published, created_at, updated_at";

const COMMENT_COLUMNS: &str = "id, garage_id, user_id, username, body, created_at";

const POST_COLUMNS: &str = "id, platform, url, caption, display_order, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn text_enum<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let value: String = row.get(idx)?;
    parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected value '{value}'").into(),
        )
    })
}

fn json_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Value> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn invite_from_row(row: &Row<'_>) -> rusqlite::Result<InviteCode> {
    Ok(InviteCode {
        code: row.get(0)?,
        created_at: parse_datetime(&row.get::<_, String>(1)?),
        used_at: row.get::<_, Option<String>>(2)?.map(|s| parse_datetime(&s)),
        used_name: row.get(3)?,
        used_instagram: row.get(4)?,
        used_email: row.get(5)?,
    })
}

fn join_request_from_row(row: &Row<'_>) -> rusqlite::Result<JoinRequest> {
    Ok(JoinRequest {
        id: row.get(0)?,
        invite_code: row.get(1)?,
        name: row.get(2)?,
        username: row.get(3)?,
        email: row.get(4)?,
        password_hash: row.get(5)?,
        instagram: row.get(6)?,
        tiktok: row.get(7)?,
        car: row.get(8)?,
        bio: row.get(9)?,
        profile_pic: row.get(10)?,
        rank: text_enum(row, 11, Rank::parse)?,
        status: text_enum(row, 12, RequestStatus::parse)?,
        created_at: parse_datetime(&row.get::<_, String>(13)?),
        updated_at: parse_datetime(&row.get::<_, String>(14)?),
    })
}

fn garage_from_row(row: &Row<'_>) -> rusqlite::Result<Garage> {
    Ok(Garage {
        id: row.get(0)?,
        user_id: row.get(1)?,
        username: row.get(2)?,
        owner_name: row.get(3)?,
        year: row.get(4)?,
        make: row.get(5)?,
        model: row.get(6)?,
        platform: row.get(7)?,
        power: row.get(8)?,
        location: row.get(9)?,
        description: row.get(10)?,
        cover_image: row.get(11)?,
        widgets: json_column(row, 12)?,
        appearance: json_column(row, 13)?,
        published: row.get(14)?,
        created_at: parse_datetime(&row.get::<_, String>(15)?),
        updated_at: parse_datetime(&row.get::<_, String>(16)?),
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<GarageComment> {
    Ok(GarageComment {
        id: row.get(0)?,
        garage_id: row.get(1)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        body: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn post_from_row(row: &Row<'_>) -> rusqlite::Result<SocialPost> {
    Ok(SocialPost {
        id: row.get(0)?,
        platform: text_enum(row, 1, SocialPlatform::parse)?,
        url: row.get(2)?,
        caption: row.get(3)?,
        display_order: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Invite code operations

    fn create_invite_code(&self, invite: &InviteCode) -> Result<()> {
        let result = self.conn().execute(
            "INSERT INTO invite_codes (code, created_at) VALUES (?1, ?2)",
            params![invite.code, format_datetime(&invite.created_at)],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(Error::InviteCodeCollision),
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_invite_code(&self, code: &str) -> Result<Option<InviteCode>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {INVITE_COLUMNS} FROM invite_codes WHERE code = ?1"),
            params![code],
            invite_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_invite_codes(&self) -> Result<Vec<InviteCode>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {INVITE_COLUMNS} FROM invite_codes ORDER BY created_at DESC, code"
        ))?;

        let rows = stmt.query_map([], invite_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn mark_invite_code_used(&self, code: &str, snapshot: &InviteSnapshot) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE invite_codes SET used_at = ?1, used_name = ?2, used_instagram = ?3, used_email = ?4
             WHERE code = ?5 AND used_at IS NULL",
            params![
                format_datetime(&Utc::now()),
                snapshot.name,
                snapshot.instagram,
                snapshot.email,
                code,
            ],
        )?;
        Ok(rows > 0)
    }

    fn release_invite_code(&self, code: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE invite_codes SET used_at = NULL, used_name = NULL, used_instagram = NULL, used_email = NULL
             WHERE code = ?1",
            params![code],
        )?;
        Ok(rows > 0)
    }

    // Join request operations

    fn create_join_request(&self, req: &JoinRequest) -> Result<()> {
        let result = self.conn().execute(
            &format!(
                "INSERT INTO join_requests ({JOIN_REQUEST_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
            ),
            params![
                req.id,
                req.invite_code,
                req.name,
                req.username,
                req.email,
                req.password_hash,
                req.instagram,
                req.tiktok,
                req.car,
                req.bio,
                req.profile_pic,
                req.rank.as_str(),
                req.status.as_str(),
                format_datetime(&req.created_at),
                format_datetime(&req.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Err(Error::Conflict("Username already taken".to_string()))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_join_request(&self, id: &str) -> Result<Option<JoinRequest>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {JOIN_REQUEST_COLUMNS} FROM join_requests WHERE id = ?1"),
            params![id],
            join_request_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_join_request_by_username(&self, username: &str) -> Result<Option<JoinRequest>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {JOIN_REQUEST_COLUMNS} FROM join_requests WHERE username = ?1"),
            params![username],
            join_request_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_join_requests(&self, status: Option<RequestStatus>) -> Result<Vec<JoinRequest>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {JOIN_REQUEST_COLUMNS} FROM join_requests
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY created_at DESC, id"
        ))?;

        let rows = stmt.query_map(params![status.map(RequestStatus::as_str)], join_request_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn review_join_request(&self, id: &str, status: RequestStatus) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE join_requests SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = 'pending'",
            params![status.as_str(), format_datetime(&Utc::now()), id],
        )?;
        Ok(rows > 0)
    }

    fn update_join_request(&self, req: &JoinRequest) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE join_requests SET name = ?1, instagram = ?2, tiktok = ?3, car = ?4, bio = ?5,
                 profile_pic = ?6, rank = ?7, updated_at = ?8
             WHERE id = ?9",
            params![
                req.name,
                req.instagram,
                req.tiktok,
                req.car,
                req.bio,
                req.profile_pic,
                req.rank.as_str(),
                format_datetime(&Utc::now()),
                req.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_join_request(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM join_requests WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Garage operations

    fn create_garage(&self, garage: &Garage) -> Result<()> {
        let result = self.conn().execute(
            &format!(
                "INSERT INTO garages ({GARAGE_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)"
            ),
            params![
                garage.id,
                garage.user_id,
                garage.username,
                garage.owner_name,
                garage.year,
                garage.make,
                garage.model,
                garage.platform,
                garage.power,
                garage.location,
                garage.description,
                garage.cover_image,
                garage.widgets.to_string(),
                garage.appearance.to_string(),
                garage.published,
                format_datetime(&garage.created_at),
                format_datetime(&garage.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => {
                Err(Error::Conflict("You already have a garage".to_string()))
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_garage_by_username(&self, username: &str) -> Result<Option<Garage>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {GARAGE_COLUMNS} FROM garages WHERE username = ?1"),
            params![username],
            garage_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_garage_by_user_id(&self, user_id: &str) -> Result<Option<Garage>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {GARAGE_COLUMNS} FROM garages WHERE user_id = ?1"),
            params![user_id],
            garage_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_published_garages(&self) -> Result<Vec<Garage>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {GARAGE_COLUMNS} FROM garages WHERE published = 1 ORDER BY created_at DESC, id"
        ))?;

        let rows = stmt.query_map([], garage_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_garage(&self, garage: &Garage) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE garages SET year = ?1, make = ?2, model = ?3, platform = ?4, power = ?5,
                 location = ?6, description = ?7, cover_image = ?8, widgets = ?9, appearance = ?10,
                 published = ?11, updated_at = ?12
             WHERE id = ?13",
            params![
                garage.year,
                garage.make,
                garage.model,
                garage.platform,
                garage.power,
                garage.location,
                garage.description,
                garage.cover_image,
                garage.widgets.to_string(),
                garage.appearance.to_string(),
                garage.published,
                format_datetime(&garage.updated_at),
                garage.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Garage like operations

    fn toggle_garage_like(&self, garage_id: &str, user_id: &str) -> Result<bool> {
        let conn = self.conn();
        let removed = conn.execute(
            "DELETE FROM garage_likes WHERE garage_id = ?1 AND user_id = ?2",
            params![garage_id, user_id],
        )?;

        if removed > 0 {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO garage_likes (garage_id, user_id, created_at) VALUES (?1, ?2, ?3)",
            params![garage_id, user_id, format_datetime(&Utc::now())],
        )?;
        Ok(true)
    }

    fn count_garage_likes(&self, garage_id: &str) -> Result<i64> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM garage_likes WHERE garage_id = ?1",
            params![garage_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn has_garage_like(&self, garage_id: &str, user_id: &str) -> Result<bool> {
        let conn = self.conn();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM garage_likes WHERE garage_id = ?1 AND user_id = ?2",
            params![garage_id, user_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // Garage comment operations

    fn create_garage_comment(&self, comment: &GarageComment) -> Result<()> {
        self.conn().execute(
            &format!("INSERT INTO garage_comments ({COMMENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                comment.id,
                comment.garage_id,
                comment.user_id,
                comment.username,
                comment.body,
                format_datetime(&comment.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_garage_comment(&self, id: &str) -> Result<Option<GarageComment>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {COMMENT_COLUMNS} FROM garage_comments WHERE id = ?1"),
            params![id],
            comment_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_garage_comments(&self, garage_id: &str) -> Result<Vec<GarageComment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COMMENT_COLUMNS} FROM garage_comments WHERE garage_id = ?1 ORDER BY created_at, id"
        ))?;

        let rows = stmt.query_map(params![garage_id], comment_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn delete_garage_comment(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM garage_comments WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    // Social post operations

    fn create_social_post(&self, post: &SocialPost) -> Result<()> {
        self.conn().execute(
            &format!("INSERT INTO social_posts ({POST_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                post.id,
                post.platform.as_str(),
                post.url,
                post.caption,
                post.display_order,
                format_datetime(&post.created_at),
            ],
        )?;
        Ok(())
    }

    fn get_social_post(&self, id: &str) -> Result<Option<SocialPost>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {POST_COLUMNS} FROM social_posts WHERE id = ?1"),
            params![id],
            post_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_social_posts(&self) -> Result<Vec<SocialPost>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {POST_COLUMNS} FROM social_posts ORDER BY display_order, created_at DESC"
        ))?;

        let rows = stmt.query_map([], post_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_social_post(&self, post: &SocialPost) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE social_posts SET platform = ?1, url = ?2, caption = ?3, display_order = ?4 WHERE id = ?5",
            params![
                post.platform.as_str(),
                post.url,
                post.caption,
                post.display_order,
                post.id,
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_social_post(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM social_posts WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }
}
