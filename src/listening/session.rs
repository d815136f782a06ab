//! Listening loop
//!
//! Keeps the transcript source running for the life of the session and
//! routes each utterance through the interpreter to the map controller.
//! Recognition naturally stops after one utterance, so the loop restarts
//! the source every time it ends. A parallel text-entry path navigates
//! directly, bypassing the grammar.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::command::{interpret, Intent};
use crate::feedback::{Feedback, StatusFlag};
use crate::map::controller::{CommandError, MapController};

use super::state::{ListenEvent, ListenState, ListenStateMachine};

/// One occurrence in the recognition stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// A recognized utterance, already lowercased by the engine.
    Transcript(String),
    /// A recoverable per-utterance error (e.g. no audio detected).
    Error(String),
    /// Recognition stopped naturally after one utterance.
    Ended,
}

/// Session-level failures.
///
/// `RecognitionUnavailable` disables voice control only; the caller keeps
/// the text-entry path alive.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("speech recognition is not available in this environment")]
    RecognitionUnavailable,

    #[error("transcript source failed to start: {0}")]
    SourceFailed(String),
}

/// External producer of recognition events.
///
/// One recognition pass per `start`; the engine emits events until it
/// signals `Ended`, after which the session starts it again.
pub trait TranscriptSource: Send {
    /// Whether the host environment has the recognition capability at all.
    fn is_available(&self) -> bool {
        true
    }

    /// Begin one recognition pass.
    fn start(&mut self) -> Result<(), SessionError>;

    /// Wait for the next event; `None` when the source is torn down.
    fn next_event(&mut self) -> impl Future<Output = Option<RecognitionEvent>> + Send;
}

/// Transcript source fed by an in-process channel.
///
/// Bridges event-driven recognition engines (or the console demo's stdin
/// reader) into the session loop. `start` is a no-op beyond logging because
/// the producer side owns the engine lifecycle.
pub struct ChannelSource {
    rx: mpsc::Receiver<RecognitionEvent>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<RecognitionEvent>) -> Self {
        Self { rx }
    }
}

impl TranscriptSource for ChannelSource {
    fn start(&mut self) -> Result<(), SessionError> {
        tracing::debug!("Channel source started");
        Ok(())
    }

    fn next_event(&mut self) -> impl Future<Output = Option<RecognitionEvent>> + Send {
        self.rx.recv()
    }
}

/// Drives the voice-control session: transcript source in, surface
/// primitives out.
pub struct VoiceSession {
    controller: MapController,
    feedback: Arc<dyn Feedback>,
    machine: Mutex<ListenStateMachine>,
}

impl VoiceSession {
    pub fn new(controller: MapController, feedback: Arc<dyn Feedback>) -> Self {
        Self {
            controller,
            feedback,
            machine: Mutex::new(ListenStateMachine::new()),
        }
    }

    /// Current listening state.
    pub fn state(&self) -> ListenState {
        self.machine.lock().state()
    }

    /// The controller this session drives.
    pub fn controller(&self) -> &MapController {
        &self.controller
    }

    /// Run the listening loop until the source is torn down.
    ///
    /// Command-level failures never end the loop; only source teardown
    /// (`next_event` returning `None`) or a failed start does.
    pub async fn run<S: TranscriptSource>(&self, mut source: S) -> Result<(), SessionError> {
        if !source.is_available() {
            tracing::error!("Speech recognition not supported in this environment");
            return Err(SessionError::RecognitionUnavailable);
        }

        source.start()?;
        self.machine.lock().process_event(ListenEvent::Start);
        tracing::info!("{}", self.state().description());

        while let Some(event) = source.next_event().await {
            match event {
                RecognitionEvent::Transcript(text) => {
                    self.machine
                        .lock()
                        .process_event(ListenEvent::TranscriptReceived);
                    self.handle_transcript(&text);
                }
                RecognitionEvent::Error(message) => {
                    self.machine
                        .lock()
                        .process_event(ListenEvent::RecognitionError);
                    tracing::warn!("Speech recognition error (ignored): {}", message);
                }
                RecognitionEvent::Ended => {
                    self.machine.lock().process_event(ListenEvent::Ended);
                    tracing::debug!("{}", self.state().description());
                    if let Err(e) = source.start() {
                        // The loop is over; the machine must not keep
                        // reporting an active session
                        self.machine.lock().reset();
                        return Err(e);
                    }
                    self.machine.lock().process_event(ListenEvent::Start);
                    tracing::debug!("Recognition restarted after utterance");
                }
            }
        }

        self.machine.lock().reset();
        tracing::info!("Transcript source torn down, session ended");
        Ok(())
    }

    /// Text-entry path: a typed destination always drops a marker,
    /// distinguishing it from spoken navigation. Empty input is ignored.
    pub fn submit_destination(&self, input: &str) -> Option<JoinHandle<()>> {
        let destination = input.trim();
        if destination.is_empty() {
            return None;
        }
        Some(self.spawn_navigation(destination.to_string(), true))
    }

    fn handle_transcript(&self, text: &str) {
        self.feedback.transcript(text);

        match interpret(text) {
            Intent::Navigate { destination, mark } => {
                self.feedback.flag(StatusFlag::Understood);
                let _ = self.spawn_navigation(destination, mark);
            }
            Intent::ZoomIn => {
                self.controller.zoom_in();
                self.feedback.flag(StatusFlag::Understood);
            }
            Intent::ZoomOut => {
                self.controller.zoom_out();
                self.feedback.flag(StatusFlag::Understood);
            }
            Intent::ChangeLayer(layer) => {
                self.controller.change_layer(layer);
                self.feedback.flag(StatusFlag::Understood);
            }
            Intent::AddMarkerHere => {
                self.controller.add_marker_here();
                self.feedback.flag(StatusFlag::Understood);
            }
            Intent::Unrecognized => {
                // Not an error; the status surface turns red and we move on
                tracing::debug!("Unrecognized command: '{}'", text);
                self.feedback.flag(StatusFlag::Unrecognized);
            }
        }
    }

    /// Fire-and-forget navigation. Overlapping requests are not cancelled;
    /// the later-completing response wins on the map center.
    fn spawn_navigation(&self, destination: String, mark: bool) -> JoinHandle<()> {
        let controller = self.controller.clone();
        let feedback = Arc::clone(&self.feedback);

        tokio::spawn(async move {
            match controller.navigate(&destination, mark).await {
                Ok(_) => {}
                Err(CommandError::LocationNotFound(_)) => {
                    feedback.notice("Location not found");
                }
                Err(e @ CommandError::GeocodeFailed(_)) => {
                    tracing::error!("Navigation to '{}' failed: {}", destination, e);
                    feedback.notice("Geocode was not successful");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::{GeocodeError, GeocodeFix, Geocoder};
    use crate::map::layers::BaseLayer;
    use crate::map::surface::LogSurface;
    use futures_util::future::BoxFuture;
    use std::collections::VecDeque;

    /// Source that replays a fixed script of events, counting starts
    /// through a shared counter (run() consumes the source).
    struct ScriptedSource {
        available: bool,
        fail_restart: bool,
        events: VecDeque<RecognitionEvent>,
        starts: Arc<Mutex<usize>>,
    }

    impl ScriptedSource {
        fn new(events: Vec<RecognitionEvent>) -> Self {
            Self {
                available: true,
                fail_restart: false,
                events: events.into(),
                starts: Arc::new(Mutex::new(0)),
            }
        }

        fn unavailable() -> Self {
            Self {
                available: false,
                ..Self::new(Vec::new())
            }
        }

        fn failing_restart(events: Vec<RecognitionEvent>) -> Self {
            Self {
                fail_restart: true,
                ..Self::new(events)
            }
        }

        fn start_counter(&self) -> Arc<Mutex<usize>> {
            Arc::clone(&self.starts)
        }
    }

    impl TranscriptSource for ScriptedSource {
        fn is_available(&self) -> bool {
            self.available
        }

        fn start(&mut self) -> Result<(), SessionError> {
            let mut starts = self.starts.lock();
            if self.fail_restart && *starts > 0 {
                return Err(SessionError::SourceFailed("engine gone".to_string()));
            }
            *starts += 1;
            Ok(())
        }

        fn next_event(&mut self) -> impl Future<Output = Option<RecognitionEvent>> + Send {
            let event = self.events.pop_front();
            async move { event }
        }
    }

    /// Feedback fake recording everything it is told.
    #[derive(Default)]
    struct MemoryFeedback {
        transcripts: Mutex<Vec<String>>,
        flags: Mutex<Vec<StatusFlag>>,
        notices: Mutex<Vec<String>>,
    }

    impl Feedback for MemoryFeedback {
        fn transcript(&self, text: &str) {
            self.transcripts.lock().push(text.to_string());
        }

        fn flag(&self, flag: StatusFlag) {
            self.flags.lock().push(flag);
        }

        fn notice(&self, message: &str) {
            self.notices.lock().push(message.to_string());
        }
    }

    struct EmptyGeocoder;

    impl Geocoder for EmptyGeocoder {
        fn resolve<'a>(
            &'a self,
            _destination: &'a str,
        ) -> BoxFuture<'a, Result<Option<GeocodeFix>, GeocodeError>> {
            Box::pin(async move { Ok(None) })
        }
    }

    fn session_with_feedback() -> (VoiceSession, Arc<MemoryFeedback>) {
        let feedback = Arc::new(MemoryFeedback::default());
        let controller = MapController::new(
            Arc::new(LogSurface::new()),
            Arc::new(EmptyGeocoder),
            (51.505, -0.09),
            13,
        );
        let session = VoiceSession::new(
            controller,
            Arc::clone(&feedback) as Arc<dyn Feedback>,
        );
        (session, feedback)
    }

    #[tokio::test]
    async fn test_unavailable_source_is_a_feature_level_failure() {
        let (session, _feedback) = session_with_feedback();
        let result = session.run(ScriptedSource::unavailable()).await;

        assert!(matches!(result, Err(SessionError::RecognitionUnavailable)));
        assert_eq!(session.state(), ListenState::Idle);
    }

    #[tokio::test]
    async fn test_source_is_restarted_after_each_ended() {
        let (session, _feedback) = session_with_feedback();
        let source = ScriptedSource::new(vec![
            RecognitionEvent::Transcript("zoom in".to_string()),
            RecognitionEvent::Ended,
            RecognitionEvent::Transcript("zoom out".to_string()),
            RecognitionEvent::Ended,
        ]);
        let starts = source.start_counter();

        session.run(source).await.unwrap();

        // Initial start plus one restart per Ended
        assert_eq!(*starts.lock(), 3);
        assert_eq!(session.state(), ListenState::Idle);
        // Both zoom commands reached the controller
        assert_eq!(session.controller().view().zoom, 13);
    }

    #[tokio::test]
    async fn test_failed_restart_resets_the_machine() {
        let (session, _feedback) = session_with_feedback();
        let source = ScriptedSource::failing_restart(vec![
            RecognitionEvent::Transcript("zoom in".to_string()),
            RecognitionEvent::Ended,
        ]);

        let result = session.run(source).await;

        assert!(matches!(result, Err(SessionError::SourceFailed(_))));
        // The session is over, so the machine must not stay in Restarting
        assert_eq!(session.state(), ListenState::Idle);
    }

    #[tokio::test]
    async fn test_recognition_error_does_not_end_the_loop() {
        let (session, feedback) = session_with_feedback();
        let source = ScriptedSource::new(vec![
            RecognitionEvent::Error("no-speech".to_string()),
            RecognitionEvent::Transcript("satellite view".to_string()),
        ]);

        session.run(source).await.unwrap();

        assert_eq!(
            session.controller().view().active_layer,
            BaseLayer::Satellite
        );
        assert_eq!(feedback.flags.lock().as_slice(), &[StatusFlag::Understood]);
    }

    #[tokio::test]
    async fn test_unrecognized_transcript_flags_but_mutates_nothing() {
        let (session, feedback) = session_with_feedback();
        let before = session.controller().view();
        let source = ScriptedSource::new(vec![RecognitionEvent::Transcript(
            "make me a sandwich".to_string(),
        )]);

        session.run(source).await.unwrap();

        assert_eq!(session.controller().view(), before);
        assert_eq!(
            feedback.flags.lock().as_slice(),
            &[StatusFlag::Unrecognized]
        );
        assert_eq!(
            feedback.transcripts.lock().as_slice(),
            &["make me a sandwich".to_string()]
        );
    }

    #[tokio::test]
    async fn test_submit_destination_ignores_empty_input() {
        let (session, _feedback) = session_with_feedback();
        assert!(session.submit_destination("").is_none());
        assert!(session.submit_destination("   ").is_none());
    }

    #[tokio::test]
    async fn test_submit_destination_not_found_posts_notice() {
        let (session, feedback) = session_with_feedback();

        let handle = session.submit_destination("nowhereplace123").unwrap();
        handle.await.unwrap();

        assert_eq!(
            feedback.notices.lock().as_slice(),
            &["Location not found".to_string()]
        );
        assert!(session.controller().view().markers.is_empty());
    }
}
