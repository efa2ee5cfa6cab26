//! ABOUTME: Tenant isolation boundary (C12): denies cross-tenant state access at the edge
//! ABOUTME: and records an audit trail independent of the per-request structured logs

pub mod access_control;
pub mod audit;

pub use access_control::{AccessDecision, SecurityContext, TenantIsolationPolicy};
pub use audit::{AuditEntry, AuditEvent, AuditLogger};
