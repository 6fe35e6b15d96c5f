mod admin;
mod helpers;
mod middleware;
mod password;
mod session;

pub use admin::{ADMIN_COOKIE, ADMIN_MAX_AGE_SECS, AdminGate, clear_admin_cookie};
pub use helpers::read_cookie;
pub use middleware::{AuthError, Member, OptionalMember, RequireAdmin, RequireMember};
pub use password::CredentialHasher;
pub use session::{MemberSession, SESSION_COOKIE, SESSION_MAX_AGE_SECS, clear_session_cookie};
