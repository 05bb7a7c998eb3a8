//! Conversational flow controller and intent resolution engine
//!
//! The engine is synchronous and effect-free: each visitor message is
//! fully processed in one call, producing a reply plus the flags the
//! host layer needs (menu visibility, one-shot onboarding completion).
//! Presentation concerns — typing delays, menu rendering, the outbound
//! lead notification — belong to the caller.

pub mod flow;
pub mod resolver;

pub use flow::{FlowController, Reply};
pub use resolver::IntentResolver;
