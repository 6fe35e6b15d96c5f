mod admin;
pub mod dto;
pub mod extract;
mod member;
pub mod response;
mod router;
pub mod validation;

pub use admin::admin_router;
pub use member::member_router;
pub use router::{AppState, create_router};
