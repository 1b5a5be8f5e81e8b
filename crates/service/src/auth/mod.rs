//! Auth module: session claims, token issuing/verification and auth errors.
//!
//! Independent of the web framework; the server crate maps these onto
//! cookies and HTTP statuses.

pub mod claims;
pub mod errors;
pub mod service;

pub use claims::SessionClaims;
pub use errors::AuthError;
pub use service::TokenService;
