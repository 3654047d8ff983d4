//! API middleware components.
//!
//! This module provides middleware for:
//! - Request ID generation
//! - Tenant resolution and tenant-scoped path rewriting
//! - Reading the trusted tenant in handlers

mod request_id;
mod tenant;
mod trusted;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdService};
pub use tenant::{TenantRoutingLayer, TenantRoutingService};
pub use trusted::TrustedTenant;
