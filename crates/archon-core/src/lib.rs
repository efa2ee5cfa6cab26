//! ABOUTME: Core types, traits, and error taxonomy for the orchestration service
//! ABOUTME: Foundation layer shared by every other `archon-*` crate

pub mod correlation;
pub mod error;
pub mod logging;
pub mod regional;
pub mod state;

pub mod types {
    pub mod artifact;
    pub mod command;
    pub mod result;
    pub mod tenant;
}

pub mod traits {
    pub mod clock;
    pub mod tenant_scoped;
}

pub use correlation::CorrelationId;
pub use error::{OrchestratorError, Result};
pub use regional::{codes_for_region, RegionalCodes};
pub use state::StateScope;
pub use traits::clock::{Clock, SystemClock};
pub use traits::tenant_scoped::TenantScoped;
pub use types::artifact::{Artifact, LayoutArtifact, RoomArtifact, ValidationArtifact};
pub use types::command::{AICommand, Complexity, Locale, TaskType};
pub use types::result::{AICommandResult, AICommandStatus, ValidationReport};
pub use types::tenant::{SubscriptionTier, TenantId};
