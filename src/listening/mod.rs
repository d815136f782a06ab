//! Listening loop and recognition lifecycle
//!
//! `state` models the start/result/error/end lifecycle as an explicit
//! machine; `session` runs the loop that keeps a transcript source alive
//! and dispatches interpreted commands.

pub mod session;
pub mod state;

pub use session::{
    ChannelSource, RecognitionEvent, SessionError, TranscriptSource, VoiceSession,
};
pub use state::{ListenState, ListenStateMachine};
