//! Catalog entities as the caller sees them
//!
//! These are the service-layer shapes: a `LunchSpot` carries its resolved
//! `Cuisine`, never a bare foreign key. The persisted row shapes live in
//! [`crate::store`].

mod cuisine;
mod lunch_spot;

pub use cuisine::Cuisine;
pub use lunch_spot::LunchSpot;
