use std::time::Duration;

use tokio::sync::mpsc;

use crate::SequencerCommand;

/// One-shot timer scheduling. Timers are never cancelled; a timer whose
/// subject is gone by the time it fires is ignored by the receiver.
pub trait TimerService {
    fn schedule(&mut self, delay: Duration, command: SequencerCommand);
}

/// Timer service for the tokio host: each timer is a task that sleeps and
/// then feeds the command back into the sequencer's command channel.
pub struct TokioTimers {
    commands: mpsc::UnboundedSender<SequencerCommand>,
}

impl TokioTimers {
    pub fn new(commands: mpsc::UnboundedSender<SequencerCommand>) -> Self {
        Self { commands }
    }
}

impl TimerService for TokioTimers {
    fn schedule(&mut self, delay: Duration, command: SequencerCommand) {
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if commands.send(command).is_err() {
                log::debug!("Timer fired after the command channel closed");
            }
        });
    }
}
