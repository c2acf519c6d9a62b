//! Catalog services - entity lifecycles over the storage port
//!
//! Both services are generic over the store and share the single-result
//! rule from [`crate::sequence`]. `LunchSpotService` leans on
//! `CuisineService` for name-to-id resolution; it never touches cuisine
//! rows directly.

mod cuisine_service;
mod lunch_spot_service;

pub use cuisine_service::CuisineService;
pub use lunch_spot_service::LunchSpotService;
