//! API request handlers.
//!
//! - health - Service status
//! - shows - Tenant-scoped shows and episodes
//! - pages - Tenant home and show page models
//! - fallback - Unmatched paths and unknown tenants

pub mod fallback;
pub mod health;
pub mod pages;
pub mod shows;
