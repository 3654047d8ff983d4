//! Core trait definitions.
//!
//! - content - Tenant-scoped read contract for shows and episodes

mod content;

pub use content::ContentStore;
