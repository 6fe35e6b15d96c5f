//! Invite codes, the join-request queue and member sign-in.
//!
//! Every operation takes the store (and hasher where needed) explicitly and
//! is synchronous; HTTP handlers run the password-hashing ones on the
//! blocking pool.

pub mod invites;
pub mod login;
pub mod requests;

pub use login::{ProfilePatch, current_user, login, update_profile};
pub use requests::JoinApplication;
