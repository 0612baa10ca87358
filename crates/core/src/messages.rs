use crate::{EntryId, SoundHandle};

/// Triggers delivered to the sequencer. Every external event (operator
/// buttons, show-control commands, audio-engine notifications, timer
/// expirations) arrives as one of these on the host's command channel and is
/// handled to completion before the next, which is what serializes the
/// execution order.
#[derive(Debug, Clone)]
pub enum SequencerCommand {
    // Operator buttons
    Start,
    ClusterStart { cluster: u32 },
    ClusterStop { cluster: u32 },
    Play,

    // Show control
    Go { q_number: String },
    GoOff { q_number: String },
    OscCueNumber { number: u32 },
    OscCueString { cue: String },
    Quit,

    // Audio engine notifications
    SoundCompleted { handle: SoundHandle, terminated: bool },
    SoundReleaseStarted { handle: SoundHandle },

    // Timers
    WaitElapsed { entry: EntryId },
    DisplayTick,
}

/// Events sent from the sequencer to its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerEvent {
    /// Every chain has run dry and nothing is waiting: the show is over and
    /// the host may exit normally.
    Finished,
    /// An explicit quit was requested (the quit command, or the reserved
    /// "quit" Q number with no matching offer).
    QuitRequested,
}
