pub const SCHEMA: &str = r#"
-- Single-use invite codes gating signup
CREATE TABLE IF NOT EXISTS invite_codes (
    code TEXT PRIMARY KEY,             -- SPADES-XXXXXX
    created_at TEXT DEFAULT (datetime('now')),

    -- NULL = available
    used_at TEXT,

    -- Snapshot of whoever consumed the code
    used_name TEXT,
    used_instagram TEXT,
    used_email TEXT
);

-- Membership applications; approved rows double as member accounts
CREATE TABLE IF NOT EXISTS join_requests (
    id TEXT PRIMARY KEY,
    invite_code TEXT NOT NULL REFERENCES invite_codes(code),
    name TEXT NOT NULL,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL,
    password_hash TEXT NOT NULL,       -- argon2id hash with embedded salt

    -- Optional profile
    instagram TEXT,
    tiktok TEXT,
    car TEXT,
    bio TEXT,
    profile_pic TEXT,

    rank TEXT NOT NULL DEFAULT 'member',     -- member | verified | og | admin
    status TEXT NOT NULL DEFAULT 'pending',  -- pending | approved | rejected
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- One garage per member
CREATE TABLE IF NOT EXISTS garages (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL UNIQUE REFERENCES join_requests(id) ON DELETE CASCADE,
    username TEXT NOT NULL UNIQUE,
    owner_name TEXT NOT NULL,
    year INTEGER NOT NULL,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    platform TEXT,
    power TEXT,
    location TEXT,
    description TEXT,
    cover_image TEXT,
    widgets TEXT NOT NULL DEFAULT '[]',      -- JSON array
    appearance TEXT NOT NULL DEFAULT '{}',   -- JSON object
    published INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

-- Likes toggle, so at most one per (garage, member)
CREATE TABLE IF NOT EXISTS garage_likes (
    garage_id TEXT NOT NULL REFERENCES garages(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES join_requests(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (garage_id, user_id)
);

CREATE TABLE IF NOT EXISTS garage_comments (
    id TEXT PRIMARY KEY,
    garage_id TEXT NOT NULL REFERENCES garages(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL REFERENCES join_requests(id) ON DELETE CASCADE,
    username TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Featured club posts curated by admins
CREATE TABLE IF NOT EXISTS social_posts (
    id TEXT PRIMARY KEY,
    platform TEXT NOT NULL,            -- instagram | tiktok
    url TEXT NOT NULL,
    caption TEXT,
    display_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_join_requests_status ON join_requests(status);
CREATE INDEX IF NOT EXISTS idx_join_requests_invite ON join_requests(invite_code);
CREATE INDEX IF NOT EXISTS idx_garages_published ON garages(published);
CREATE INDEX IF NOT EXISTS idx_garage_likes_garage ON garage_likes(garage_id);
CREATE INDEX IF NOT EXISTS idx_garage_comments_garage ON garage_comments(garage_id);
"#;
