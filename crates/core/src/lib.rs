pub use audio::{AudioEngine, RemainingTime, SoundHandle};
pub use display::{ClusterCaption, MessageId, OperatorConsole};
pub use messages::{SequencerCommand, SequencerEvent};
pub use sequence::catalog::SequenceCatalog;
pub use sequence::item::{ItemKind, SequenceItem};
pub use sequence::registry::{EntryId, RuntimeEntry, RuntimeRegistry};
pub use sequence::sequencer::{Sequencer, CLUSTER_COUNT};
pub use show::show::Show;
pub use show::show_manager::ShowManager;
pub use timer::{TimerService, TokioTimers};

mod audio;
mod display;
pub mod messages;
mod sequence;
mod show;
mod timer;
