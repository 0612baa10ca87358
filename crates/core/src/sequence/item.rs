use std::time::Duration;

use serde::{Deserialize, Serialize};

/// The kinds of sequence item an operator can program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    StartSound,
    StopSound,
    Wait,
    OfferSound,
    CeaseOfferingSound,
    OperatorWait,
    CancelWait,
    StartSequence,
    Unknown,
}

/// One entry in the sequence catalog. Items are created by the show loader
/// before the sequencer starts and are never mutated afterwards.
///
/// Which fields matter depends on `kind`; the rest stay at their defaults.
/// The `next_*` labels name the item to run under each outcome. An empty
/// label ends the chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceItem {
    pub name: String,
    pub kind: ItemKind,

    pub sound_name: String,
    pub tag: String,
    /// Display slot to use. None means pick a free cluster when the item runs.
    pub cluster: Option<u32>,
    pub volume: f32,
    pub pan: f32,
    pub time_to_wait: Duration,
    /// 0 means never shown on the activity line.
    pub importance: u32,
    pub text_to_display: String,
    pub q_number: String,
    pub osc_cue_number: Option<u32>,
    pub osc_cue_string: Option<String>,

    // Continuation labels.
    pub next: Option<String>,
    pub next_completion: Option<String>,
    pub next_termination: Option<String>,
    pub next_starts: Option<String>,
    pub next_release_started: Option<String>,
    pub next_sound_stopped: Option<String>,
    pub next_to_start: Option<String>,
    pub next_play: Option<String>,
}

impl Default for SequenceItem {
    fn default() -> Self {
        Self {
            name: "".to_string(),
            kind: ItemKind::Unknown,
            sound_name: "".to_string(),
            tag: "".to_string(),
            cluster: None,
            volume: 1.0,
            pan: 0.0,
            time_to_wait: Duration::ZERO,
            importance: 1,
            text_to_display: "".to_string(),
            q_number: "".to_string(),
            osc_cue_number: None,
            osc_cue_string: None,
            next: None,
            next_completion: None,
            next_termination: None,
            next_starts: None,
            next_release_started: None,
            next_sound_stopped: None,
            next_to_start: None,
            next_play: None,
        }
    }
}

impl SequenceItem {
    /// All populated continuation labels, paired with the field name for
    /// validation messages.
    pub fn labels(&self) -> Vec<(&'static str, &str)> {
        let mut labels = Vec::new();
        for (field, value) in [
            ("next", &self.next),
            ("next_completion", &self.next_completion),
            ("next_termination", &self.next_termination),
            ("next_starts", &self.next_starts),
            ("next_release_started", &self.next_release_started),
            ("next_sound_stopped", &self.next_sound_stopped),
            ("next_to_start", &self.next_to_start),
            ("next_play", &self.next_play),
        ] {
            if let Some(label) = value.as_deref() {
                if !label.is_empty() {
                    labels.push((field, label));
                }
            }
        }
        labels
    }
}
