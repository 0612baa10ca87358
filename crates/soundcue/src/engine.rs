use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use soundcue_core::{AudioEngine, RemainingTime, SequencerCommand, SoundHandle};
use tokio::sync::mpsc;

/// How long a released sound takes to fade out before it completes.
const RELEASE_TAIL: Duration = Duration::from_millis(500);

struct Voice {
    started: Option<Instant>,
    duration: Duration,
    releasing: bool,
}

/// Stand-in for the audio engine: every sound "plays" for a nominal duration
/// and then completes. Completion and release notifications go through the
/// sequencer's command channel, the same path a real engine would use, so
/// the sequencer is re-entered between triggers rather than interrupted.
pub struct SimulatedEngine {
    commands: mpsc::UnboundedSender<SequencerCommand>,
    voices: Arc<Mutex<HashMap<u64, Voice>>>,
    next_handle: u64,
    nominal_duration: Duration,
}

impl SimulatedEngine {
    pub fn new(
        commands: mpsc::UnboundedSender<SequencerCommand>,
        nominal_duration: Duration,
    ) -> Self {
        Self {
            commands,
            voices: Arc::new(Mutex::new(HashMap::new())),
            next_handle: 0,
            nominal_duration,
        }
    }
}

impl AudioEngine for SimulatedEngine {
    fn bind(&mut self, sound_name: &str, cluster: u32) -> Option<SoundHandle> {
        self.next_handle += 1;
        let handle = self.next_handle;
        log::debug!(
            "Binding sound {} to cluster {} as voice {}",
            sound_name,
            cluster,
            handle
        );
        self.voices.lock().unwrap().insert(
            handle,
            Voice {
                started: None,
                duration: self.nominal_duration,
                releasing: false,
            },
        );
        Some(SoundHandle(handle))
    }

    fn unbind(&mut self, handle: SoundHandle) {
        // The voice keeps sounding until it completes; unbinding only takes
        // it off its cluster, which the sequencer tracks itself.
        log::debug!("Voice {} unbound from its cluster", handle.0);
    }

    fn start(&mut self, handle: SoundHandle) {
        let duration = {
            let mut voices = self.voices.lock().unwrap();
            let Some(voice) = voices.get_mut(&handle.0) else {
                return;
            };
            voice.started = Some(Instant::now());
            voice.duration
        };

        let voices = Arc::clone(&self.voices);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let finished = {
                let mut voices = voices.lock().unwrap();
                // A releasing voice completes from its release task instead.
                let playing = voices
                    .get(&handle.0)
                    .map(|voice| !voice.releasing)
                    .unwrap_or(false);
                playing && voices.remove(&handle.0).is_some()
            };
            if finished {
                let _ = commands.send(SequencerCommand::SoundCompleted {
                    handle,
                    terminated: false,
                });
            }
        });
    }

    fn request_release(&mut self, handle: SoundHandle) {
        {
            let mut voices = self.voices.lock().unwrap();
            let Some(voice) = voices.get_mut(&handle.0) else {
                return;
            };
            if voice.releasing {
                return;
            }
            voice.releasing = true;
        }

        let _ = self
            .commands
            .send(SequencerCommand::SoundReleaseStarted { handle });

        let voices = Arc::clone(&self.voices);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(RELEASE_TAIL).await;
            if voices.lock().unwrap().remove(&handle.0).is_some() {
                let _ = commands.send(SequencerCommand::SoundCompleted {
                    handle,
                    terminated: true,
                });
            }
        });
    }

    fn elapsed_time(&self, handle: SoundHandle) -> Duration {
        self.voices
            .lock()
            .unwrap()
            .get(&handle.0)
            .and_then(|voice| voice.started)
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    fn remaining_time(&self, handle: SoundHandle) -> RemainingTime {
        let voices = self.voices.lock().unwrap();
        match voices.get(&handle.0) {
            Some(voice) => {
                let elapsed = voice
                    .started
                    .map(|started| started.elapsed())
                    .unwrap_or_default();
                RemainingTime::Finite(voice.duration.saturating_sub(elapsed))
            }
            None => RemainingTime::Finite(Duration::ZERO),
        }
    }
}
