//! ABOUTME: Provider Dispatcher (C5): model catalog, deterministic selection,
//! ABOUTME: the `Provider` trait seam, concrete HTTP clients, and resilient dispatch

pub mod abstraction;
pub mod catalog;
pub mod clients;
pub mod dispatcher;
pub mod selection;

pub use abstraction::{Provider, ProviderCallError, ProviderConfig, RawResponse};
pub use catalog::{catalog, profile_for, CostTier, ModelId, ModelProfile};
pub use clients::{GitHubModelsProvider, VertexAiProvider};
pub use dispatcher::{timeout_for, DispatchOutcome, ProviderDispatcher, MAX_ATTEMPTS};
pub use selection::{select_model, ModelSelection, SelectionContext};
