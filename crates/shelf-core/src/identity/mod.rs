//! Identity domain module.
//!
//! The signed-in identity is an explicit [`SessionContext`] value. It is read
//! once at start-up from an [`IdentityStore`], replaced on login, and cleared
//! on logout; components receive it instead of reading storage themselves.

mod context;
mod store;

pub use context::{GUEST_USER_ID, SessionContext};
pub use store::IdentityStore;
