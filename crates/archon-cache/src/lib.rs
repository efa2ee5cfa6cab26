//! ABOUTME: Result Cache (C8): two-tier cache so identical AI requests are answered
//! ABOUTME: without re-dispatching to a provider, tenant-scoped via cache-key tags

pub mod cache;
pub mod key;
pub mod l1;
pub mod l2;

pub use cache::{ResultCache, DEFAULT_TTL};
pub use key::CacheKey;
pub use l1::L1Cache;
pub use l2::{InMemoryL2, L2Backend, L2Error, NullL2};
