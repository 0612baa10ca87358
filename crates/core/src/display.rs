/// Identifier of a transient message, so a console can retire it later.
pub type MessageId = u64;

/// Caption on a cluster's start button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterCaption {
    Start,
    Playing,
    Releasing,
}

impl ClusterCaption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterCaption::Start => "Start",
            ClusterCaption::Playing => "Playing...",
            ClusterCaption::Releasing => "Releasing...",
        }
    }
}

/// The operator console collaborator. The sequencer drives the handful of
/// widgets it cares about: per-cluster labels and captions, the operator
/// prompt line, the current-activity readout, and transient messages.
pub trait OperatorConsole {
    fn set_cluster_label(&mut self, cluster: u32, text: &str);

    fn set_cluster_start_caption(&mut self, cluster: u32, caption: ClusterCaption);

    /// Show text on the operator prompt line, replacing what was there.
    fn show_operator_text(&mut self, text: &str);

    fn clear_operator_text(&mut self);

    /// Update the current-activity readout.
    fn show_activity(&mut self, text: &str);

    /// Post a message the operator should notice. Returns an id the caller
    /// may use to retire the message.
    fn show_transient_message(&mut self, text: &str) -> MessageId;
}
