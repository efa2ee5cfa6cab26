//! ABOUTME: Prompt template selection and assembly (C4)
//! ABOUTME: Templates are data loaded from an external directory, never compiled in

pub mod assembler;
pub mod language_detect;
pub mod locale;
pub mod templates;

pub use assembler::{AssembledPrompt, InvocationParams, PromptAssembler};
pub use locale::{resolve as resolve_locale, MeasurementSystem, ResolvedLocale};
pub use templates::TemplateStore;
