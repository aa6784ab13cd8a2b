//! Token helpers: CSRF protection for mutating requests and workspace invitation tokens.
//!
//! User authentication itself is delegated to the external identity provider; the
//! acting user id travels in request bodies where an operation needs one.

pub mod csrf;
pub mod tokens;

pub use csrf::{CsrfError, CsrfProtection, CSRF_HEADER};
