//! ABOUTME: Dependency container assembled once at process startup
//! ABOUTME: Replaces global singletons; handed to request handlers as `Arc<Coordinator>`

use archon_cache::ResultCache;
use archon_core::traits::clock::Clock;
use archon_prompt::PromptAssembler;
use archon_providers::ProviderDispatcher;
use archon_rag::RagRetriever;
use archon_tenancy::UsageAccountant;
use archon_util::ProviderRateLimiter;
use std::sync::Arc;

/// Every long-lived collaborator the coordinator needs, built once and
/// shared across every `process_command` call. Nothing here is a global
/// static: a process that wants two independently-configured coordinators
/// (e.g. in tests) builds two containers.
pub struct DependencyContainer {
    pub rag: Arc<RagRetriever>,
    pub assembler: Arc<PromptAssembler>,
    pub dispatcher: Arc<ProviderDispatcher>,
    pub cache: Arc<ResultCache>,
    pub usage: Arc<UsageAccountant>,
    pub tenant_rate_limiter: Arc<ProviderRateLimiter>,
    pub clock: Arc<dyn Clock>,
}

impl DependencyContainer {
    #[must_use]
    pub fn new(
        rag: Arc<RagRetriever>,
        assembler: Arc<PromptAssembler>,
        dispatcher: Arc<ProviderDispatcher>,
        cache: Arc<ResultCache>,
        usage: Arc<UsageAccountant>,
        tenant_rate_limiter: Arc<ProviderRateLimiter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { rag, assembler, dispatcher, cache, usage, tenant_rate_limiter, clock }
    }
}
