mod models;
mod rank;

pub use models::*;
pub use rank::{Rank, RequestStatus, SocialPlatform};
