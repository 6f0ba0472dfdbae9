//! Routes for the authenticated identity.

mod handlers;

pub use handlers::me;
