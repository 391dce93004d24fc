//! Trialogue Models - shared data types for the dialogue orchestrator.
//!
//! This crate defines the conversation data model used by every other
//! Trialogue crate:
//!
//! - **speaker**: the fixed speaker identities and their rotation order
//! - **message**: a single utterance with optional synthesized audio
//! - **conversation**: ordered history plus whose-turn-is-next state
//! - **session**: the serializable snapshot persisted across runs
//!
//! These are plain serde types with no I/O. Single-writer discipline on
//! `ConversationState` is the host's responsibility, not enforced here.

pub mod conversation;
pub mod message;
pub mod session;
pub mod speaker;

pub use conversation::{ConversationState, SEED_GREETING};
pub use message::Message;
pub use session::{AutoRunFlags, SessionSnapshot, DEFAULT_AUTO_DELAY_SECONDS};
pub use speaker::{Speaker, SpeakerProfile};
