use std::time::Duration;

/// Opaque identifier for a sound the engine has bound to a cluster. Issued by
/// the audio engine; the sequencer only compares and passes it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u64);

/// How much of a sound is left to play. A looping sound has no bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingTime {
    Finite(Duration),
    Unbounded,
}

/// The audio engine collaborator, at the boundary the sequencer needs:
/// binding sounds to clusters and driving their playback lifecycle. The
/// engine reports back through `SequencerCommand::SoundCompleted` and
/// `SequencerCommand::SoundReleaseStarted` on the host's command channel,
/// so the sequencer is re-entered rather than interrupted.
pub trait AudioEngine {
    /// Bind the named sound to a cluster. Returns None if no such sound is
    /// defined in the project.
    fn bind(&mut self, sound_name: &str, cluster: u32) -> Option<SoundHandle>;

    fn unbind(&mut self, handle: SoundHandle);

    fn start(&mut self, handle: SoundHandle);

    /// Begin the release stage of the sound's amplitude envelope. Completion
    /// arrives later as a notification.
    fn request_release(&mut self, handle: SoundHandle);

    fn elapsed_time(&self, handle: SoundHandle) -> Duration;

    fn remaining_time(&self, handle: SoundHandle) -> RemainingTime;
}
