//! Content records and the in-memory content store.
//!
//! - [`TenantProfile`] - Tenant name, slug and branding
//! - [`Show`] - A podcast show owned by a tenant
//! - [`Episode`] - An audio episode of a show
//! - [`InMemoryContentStore`] - `DashMap`-backed [`ContentStore`](crate::traits::ContentStore)

mod records;
mod store;

pub use records::{Branding, Episode, Show, TenantProfile};
pub use store::InMemoryContentStore;
