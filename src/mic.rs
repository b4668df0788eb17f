//! Microphone and permission control
//!
//! Voice input is only meaningful once the microphone permission is granted
//! and the microphone is on. The training core never tracks this itself; the
//! host waits on [`wait_for_permission`] before listening.

use crate::error::{TrainerError, TrainerResult};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Unset,
    Granted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MicStatus {
    Off,
    On,
}

/// Trait for microphone backends
pub trait MicrophoneController: Send {
    /// Ask the user for microphone access
    fn request_permission(&mut self);

    fn permission_status(&self) -> PermissionStatus;

    fn mic_status(&self) -> MicStatus;

    /// Turn the microphone on. Requests permission instead if it is missing.
    fn activate(&mut self);

    fn deactivate(&mut self);
}

/// Microphone stand-in whose user answers the permission prompt after a few requests
#[derive(Debug)]
pub struct SimulatedMicrophone {
    grant_after: Option<u32>,
    requests: u32,
    permission: PermissionStatus,
    mic: MicStatus,
}

impl SimulatedMicrophone {
    /// Grants permission on the first request
    pub fn granting() -> Self {
        Self::grant_after(1)
    }

    /// Grants permission on the `requests`-th request
    pub fn grant_after(requests: u32) -> Self {
        Self {
            grant_after: Some(requests),
            requests: 0,
            permission: PermissionStatus::Unset,
            mic: MicStatus::Off,
        }
    }

    /// Never grants permission
    pub fn denying() -> Self {
        Self {
            grant_after: None,
            requests: 0,
            permission: PermissionStatus::Unset,
            mic: MicStatus::Off,
        }
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl MicrophoneController for SimulatedMicrophone {
    fn request_permission(&mut self) {
        self.requests += 1;
        if let Some(after) = self.grant_after {
            if self.requests >= after {
                self.permission = PermissionStatus::Granted;
            }
        }
    }

    fn permission_status(&self) -> PermissionStatus {
        self.permission
    }

    fn mic_status(&self) -> MicStatus {
        self.mic
    }

    fn activate(&mut self) {
        if self.permission != PermissionStatus::Granted {
            self.request_permission();
            return;
        }
        if self.mic == MicStatus::Off {
            self.mic = MicStatus::On;
            info!("🎙️ Microphone on");
        }
    }

    fn deactivate(&mut self) {
        if self.mic == MicStatus::On {
            self.mic = MicStatus::Off;
            info!("🎙️ Microphone off");
        }
    }
}

/// Request permission until granted, polling every `poll`, then turn the microphone on
pub async fn wait_for_permission(
    mic: &mut dyn MicrophoneController,
    poll: Duration,
    max_attempts: u32,
) -> TrainerResult<()> {
    let mut attempts = 0;
    while mic.permission_status() != PermissionStatus::Granted {
        if attempts >= max_attempts {
            return Err(TrainerError::Permission(format!(
                "microphone permission not granted after {} requests",
                attempts
            )));
        }
        if attempts > 0 {
            info!("⏳ Waiting for microphone permission...");
            tokio::time::sleep(poll).await;
        }
        mic.request_permission();
        attempts += 1;
    }

    info!("✅ Microphone permission granted");
    if mic.mic_status() == MicStatus::Off {
        mic.activate();
    }
    if mic.mic_status() == MicStatus::Off {
        warn!("⚠️ Microphone did not turn on");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_requires_permission() {
        let mut mic = SimulatedMicrophone::grant_after(2);
        mic.activate();
        assert_eq!(mic.mic_status(), MicStatus::Off);
        assert_eq!(mic.requests(), 1);

        mic.activate();
        assert_eq!(mic.permission_status(), PermissionStatus::Granted);
        assert_eq!(mic.mic_status(), MicStatus::Off);

        mic.activate();
        assert_eq!(mic.mic_status(), MicStatus::On);
        mic.deactivate();
        assert_eq!(mic.mic_status(), MicStatus::Off);
    }

    #[test]
    fn test_wait_for_permission_granted() {
        let mut mic = SimulatedMicrophone::granting();
        tokio_test::block_on(wait_for_permission(&mut mic, Duration::ZERO, 5))
            .expect("permission should be granted");
        assert_eq!(mic.mic_status(), MicStatus::On);
        assert_eq!(mic.requests(), 1);
    }

    #[test]
    fn test_wait_for_permission_polls() {
        let mut mic = SimulatedMicrophone::grant_after(3);
        tokio_test::block_on(wait_for_permission(&mut mic, Duration::ZERO, 5))
            .expect("permission should be granted on the third request");
        assert_eq!(mic.requests(), 3);
    }

    #[test]
    fn test_wait_for_permission_gives_up() {
        let mut mic = SimulatedMicrophone::denying();
        let result = tokio_test::block_on(wait_for_permission(&mut mic, Duration::ZERO, 3));
        assert!(matches!(result, Err(TrainerError::Permission(_))));
        assert_eq!(mic.requests(), 3);
    }
}
