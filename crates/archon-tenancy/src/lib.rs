//! ABOUTME: Usage Accountant (C9): tenant tier quotas, a durable usage ledger, and the
//! ABOUTME: advisory pre-check the coordinator consults before dispatching a request

pub mod accountant;
pub mod ledger;
pub mod tier;

pub use accountant::UsageAccountant;
pub use ledger::UsageLedger;
pub use tier::{limits_for_tier, TierLimits, UsageCategory};
