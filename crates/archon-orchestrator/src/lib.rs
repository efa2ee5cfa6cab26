//! ABOUTME: Orchestration Coordinator (C10): the single `ProcessCommand` entry point
//! ABOUTME: Composes RAG, prompt assembly, provider dispatch, validation, cache, and usage accounting

pub mod container;
pub mod coordinator;
pub mod request;
pub mod shape;

pub use container::DependencyContainer;
pub use coordinator::Coordinator;
pub use request::fallback_request_for;
pub use shape::shape_success;
