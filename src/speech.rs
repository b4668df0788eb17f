//! Speech engine
//!
//! The recognizer itself is external: the trainer only consumes its event
//! stream, and only final results reach the command dispatcher.
//! [`ChannelSpeech`] is a stand-in recognizer fed through a [`SpeechFeed`],
//! used by the terminal host and tests.

use crate::error::{TrainerError, TrainerResult};
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Events delivered by a speech recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Partial(String),
    Final(String),
    EndOfSpeech,
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Authorized,
    Denied,
}

/// Trait for speech recognition engines
#[async_trait]
pub trait SpeechEngine: Send {
    /// Whether the device supports recognition at all
    fn is_available(&self) -> bool;

    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask the user to authorize recognition
    fn request_access(&mut self);

    fn start_recording(&mut self) -> TrainerResult<()>;

    fn stop_recording(&mut self);

    fn is_recording(&self) -> bool;

    /// Next event from the recognizer; `None` once the engine is gone
    async fn next_event(&mut self) -> Option<SpeechEvent>;
}

/// Sending half of a [`ChannelSpeech`]
#[derive(Debug, Clone)]
pub struct SpeechFeed {
    tx: mpsc::UnboundedSender<SpeechEvent>,
}

impl SpeechFeed {
    /// Deliver a final result. Returns false if the engine was dropped.
    pub fn say(&self, text: &str) -> bool {
        self.send(SpeechEvent::Final(text.to_string()))
    }

    pub fn partial(&self, text: &str) -> bool {
        self.send(SpeechEvent::Partial(text.to_string()))
    }

    pub fn send(&self, event: SpeechEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Recognizer stand-in driven by a [`SpeechFeed`]. Events arriving while not
/// recording are discarded, as a real recognizer would not hear them.
#[derive(Debug)]
pub struct ChannelSpeech {
    rx: mpsc::UnboundedReceiver<SpeechEvent>,
    available: bool,
    authorization: AuthorizationStatus,
    grant_access: bool,
    recording: bool,
}

impl ChannelSpeech {
    pub fn pair() -> (Self, SpeechFeed) {
        Self::with_access(true)
    }

    /// Engine whose authorization prompt is answered with `grant`
    pub fn with_access(grant: bool) -> (Self, SpeechFeed) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            rx,
            available: true,
            authorization: AuthorizationStatus::NotDetermined,
            grant_access: grant,
            recording: false,
        };
        (engine, SpeechFeed { tx })
    }
}

#[async_trait]
impl SpeechEngine for ChannelSpeech {
    fn is_available(&self) -> bool {
        self.available
    }

    fn authorization_status(&self) -> AuthorizationStatus {
        self.authorization
    }

    fn request_access(&mut self) {
        self.authorization = if self.grant_access {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        info!("🔐 Speech recognition authorization: {:?}", self.authorization);
    }

    fn start_recording(&mut self) -> TrainerResult<()> {
        if self.authorization != AuthorizationStatus::Authorized {
            return Err(TrainerError::Speech(format!(
                "cannot record, authorization status is {:?}",
                self.authorization
            )));
        }
        self.recording = true;
        info!("🎤 Listening");
        Ok(())
    }

    fn stop_recording(&mut self) {
        if self.recording {
            self.recording = false;
            info!("🎤 Stopped listening");
        }
    }

    fn is_recording(&self) -> bool {
        self.recording
    }

    async fn next_event(&mut self) -> Option<SpeechEvent> {
        loop {
            let event = self.rx.recv().await?;
            if self.recording {
                return Some(event);
            }
            debug!("Discarding speech event while not recording: {:?}", event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_requires_authorization() {
        let (mut engine, _feed) = ChannelSpeech::with_access(false);
        assert!(engine.is_available());
        assert_eq!(engine.authorization_status(), AuthorizationStatus::NotDetermined);
        assert!(engine.start_recording().is_err());

        engine.request_access();
        assert_eq!(engine.authorization_status(), AuthorizationStatus::Denied);
        assert!(matches!(engine.start_recording(), Err(TrainerError::Speech(_))));
    }

    #[test]
    fn test_events_flow_while_recording() {
        tokio_test::block_on(async {
            let (mut engine, feed) = ChannelSpeech::pair();
            engine.request_access();

            engine.start_recording().unwrap();
            assert!(feed.partial("sen"));
            assert!(feed.say("sentado"));
            drop(feed);

            assert_eq!(
                engine.next_event().await,
                Some(SpeechEvent::Partial("sen".into()))
            );
            assert_eq!(
                engine.next_event().await,
                Some(SpeechEvent::Final("sentado".into()))
            );
            assert_eq!(engine.next_event().await, None);
        });
    }

    #[test]
    fn test_events_discarded_while_not_recording() {
        tokio_test::block_on(async {
            let (mut engine, feed) = ChannelSpeech::pair();
            engine.request_access();
            assert!(feed.say("no me oyes"));
            drop(feed);

            assert_eq!(engine.next_event().await, None);
            assert!(!engine.is_recording());
        });
    }

    #[test]
    fn test_feed_reports_dropped_engine() {
        let (engine, feed) = ChannelSpeech::pair();
        assert!(feed.say("sentado"));
        drop(engine);
        assert!(!feed.say("sentado"));
        assert!(!feed.partial("sen"));
    }
}
