use std::fmt;

use serde::{Deserialize, Serialize};

/// Rank is a member's authorization tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    #[default]
    Member,
    Verified,
    Og,
    Admin,
}

impl Rank {
    pub const ALL: [Rank; 4] = [Rank::Member, Rank::Verified, Rank::Og, Rank::Admin];

    pub fn parse(s: &str) -> Option<Rank> {
        match s {
            "member" => Some(Self::Member),
            "verified" => Some(Self::Verified),
            "og" => Some(Self::Og),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Verified => "verified",
            Self::Og => "og",
            Self::Admin => "admin",
        }
    }

    /// Ranks allowed to publish a garage.
    #[must_use]
    pub const fn can_create_garage(self) -> bool {
        matches!(self, Self::Verified | Self::Og | Self::Admin)
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review state of a join request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn parse(s: &str) -> Option<RequestStatus> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Parses a status an admin may assign. `pending` is not a review outcome.
    pub fn parse_review(s: &str) -> Option<RequestStatus> {
        match Self::parse(s)? {
            Self::Pending => None,
            status => Some(status),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platforms a featured social post can link to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Tiktok,
}

impl SocialPlatform {
    pub fn parse(s: &str) -> Option<SocialPlatform> {
        match s {
            "instagram" => Some(Self::Instagram),
            "tiktok" => Some(Self::Tiktok),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
        }
    }
}
