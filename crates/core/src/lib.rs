//! Core types for the enquiry chat widget
//!
//! This crate provides the foundational types shared by the engine and
//! server crates:
//! - Conversation state machine and transcript types
//! - Visitor profile collected during onboarding
//! - Contact number validation

pub mod conversation;
pub mod phone;
pub mod visitor;

pub use conversation::{ConversationState, Turn, TurnMetadata, TurnRole};
pub use phone::is_valid_phone;
pub use visitor::VisitorProfile;
