//! Service layer for the car-doctor backend.
//! - `store`: document collections and the filter language used to query them.
//! - `auth`: session token issuing and verification.
//! - `catalog` / `bookings`: query construction for the routes that need it.

pub mod errors;
pub mod store;
pub mod auth;
pub mod catalog;
pub mod bookings;
