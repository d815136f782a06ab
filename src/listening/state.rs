//! Recognition lifecycle state machine
//!
//! The external recognition engine delivers one utterance per start and then
//! stops, so continuous listening is modelled as an explicit machine: every
//! natural end of recognition triggers a restart instead of leaving the loop
//! idle.

use serde::{Deserialize, Serialize};

/// Listening loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListenState {
    /// Not yet started.
    #[default]
    Idle,
    /// Recognition engine is active, waiting for an utterance.
    Listening,
    /// Recognition ended naturally; about to start again.
    Restarting,
}

impl ListenState {
    /// Returns a human-readable description of the state.
    pub fn description(&self) -> &'static str {
        match self {
            ListenState::Idle => "Not listening",
            ListenState::Listening => "Listening for voice commands",
            ListenState::Restarting => "Restarting recognition",
        }
    }

    /// Whether the loop is running (listening or between utterances).
    pub fn is_active(&self) -> bool {
        matches!(self, ListenState::Listening | ListenState::Restarting)
    }
}

/// Events that can trigger state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenEvent {
    /// Recognition was started (initially or after an utterance).
    Start,
    /// An utterance was recognized and handed off.
    TranscriptReceived,
    /// A recoverable recognition error occurred (logged, ignored).
    RecognitionError,
    /// Recognition stopped naturally after one utterance.
    Ended,
}

/// Reason recorded with each transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionReason {
    /// First start of the session.
    SessionStart,
    /// An utterance was handled; the engine keeps listening until it ends.
    UtteranceHandled,
    /// A per-utterance error was ignored.
    ErrorIgnored,
    /// The engine signalled the end of a recognition pass.
    SourceEnded,
    /// Listening resumed after a natural end.
    Restarted,
}

/// Result of a state transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub new_state: ListenState,
    pub reason: TransitionReason,
}

/// Listening lifecycle state machine.
///
/// The steady state of a healthy session alternates Listening -> Restarting
/// -> Listening for as long as the source lives.
pub struct ListenStateMachine {
    state: ListenState,
}

impl ListenStateMachine {
    /// Creates a new machine in the Idle state.
    pub fn new() -> Self {
        Self {
            state: ListenState::Idle,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> ListenState {
        self.state
    }

    /// Process an event and return the transition if one occurred.
    ///
    /// Returns `None` if the event is not valid for the current state; the
    /// machine is left unchanged.
    pub fn process_event(&mut self, event: ListenEvent) -> Option<Transition> {
        let transition = match (self.state, event) {
            (ListenState::Idle, ListenEvent::Start) => Some(Transition {
                new_state: ListenState::Listening,
                reason: TransitionReason::SessionStart,
            }),
            (ListenState::Listening, ListenEvent::TranscriptReceived) => Some(Transition {
                new_state: ListenState::Listening,
                reason: TransitionReason::UtteranceHandled,
            }),
            (ListenState::Listening, ListenEvent::RecognitionError) => Some(Transition {
                new_state: ListenState::Listening,
                reason: TransitionReason::ErrorIgnored,
            }),
            (ListenState::Listening, ListenEvent::Ended) => Some(Transition {
                new_state: ListenState::Restarting,
                reason: TransitionReason::SourceEnded,
            }),
            (ListenState::Restarting, ListenEvent::Start) => Some(Transition {
                new_state: ListenState::Listening,
                reason: TransitionReason::Restarted,
            }),
            _ => None,
        };

        if let Some(t) = transition {
            let previous = self.state;
            self.state = t.new_state;
            tracing::debug!(
                "Listen state transition: {:?} -> {:?} (reason: {:?})",
                previous,
                t.new_state,
                t.reason
            );
        }

        transition
    }

    /// Reset the machine to Idle (session teardown).
    pub fn reset(&mut self) {
        self.state = ListenState::Idle;
        tracing::debug!("Listen state machine reset to Idle");
    }
}

impl Default for ListenStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
