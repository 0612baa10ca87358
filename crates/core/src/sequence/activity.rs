//! The operator's current-activity readout: which running sound to show,
//! and the 100 ms refresh that keeps its progress ticking.

use std::time::Duration;

use crate::{RemainingTime, SequencerCommand};

use super::sequencer::Sequencer;

/// Refresh cadence for the activity line while anything is running.
const DISPLAY_REFRESH: Duration = Duration::from_millis(100);

impl Sequencer {
    /// Show the most important running sound, preferring the one already on
    /// display in case of a tie. While something is showing, keep one
    /// refresh tick outstanding; with nothing to show, clear the line and
    /// let the tick chain lapse.
    pub(crate) fn update_operator_display(&mut self) {
        let mut current_display: Option<usize> = None;
        let mut most_important: Option<usize> = None;
        let mut most_importance = 0u32;

        for (position, entry) in self.registry.running.iter().enumerate() {
            if entry.being_displayed {
                current_display = Some(position);
            }

            let importance = self.catalog.get(entry.item).importance;
            if !entry.active || importance == 0 {
                continue;
            }

            if most_important.is_none() || importance > most_importance {
                most_important = Some(position);
                most_importance = importance;
            } else if importance == most_importance && entry.being_displayed {
                most_important = Some(position);
            }
        }

        let Some(position) = most_important else {
            // Nothing is happening.
            self.console.show_activity("");
            return;
        };

        let entry = &self.registry.running[position];
        let text = self.catalog.get(entry.item).text_to_display.clone();

        // Elapsed time leads the text; remaining time trails it when the
        // engine knows how much is left.
        let line = match entry.handle {
            Some(handle) => {
                let elapsed = self.audio.elapsed_time(handle).as_secs_f64();
                match self.audio.remaining_time(handle) {
                    RemainingTime::Finite(remaining) => {
                        format!("{:4.1} {} ({:4.1})", elapsed, text, remaining.as_secs_f64())
                    }
                    RemainingTime::Unbounded => format!("{:4.1} {}", elapsed, text),
                }
            }
            None => text,
        };
        self.console.show_activity(&line);

        if let Some(previous) = current_display {
            self.registry.running[previous].being_displayed = false;
        }
        self.registry.running[position].being_displayed = true;

        if !self.tick_scheduled {
            self.tick_scheduled = true;
            self.timers
                .schedule(DISPLAY_REFRESH, SequencerCommand::DisplayTick);
        }
    }

    /// The 100 ms refresh timer fired.
    pub fn display_tick(&mut self) {
        self.tick_scheduled = false;
        self.update_operator_display();
    }
}
