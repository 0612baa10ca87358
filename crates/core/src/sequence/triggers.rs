//! External entry points: operator buttons, show-control commands, timer
//! expirations, and the audio engine's completion and release notifications.
//! Each one resolves its trigger to a continuation label and re-enters the
//! drive loop.

use crate::{ClusterCaption, EntryId, SequencerEvent, SoundHandle};

use super::sequencer::{next_label, Sequencer};

impl Sequencer {
    /// Begin the show: find the unique Start Sequence item and run from its
    /// `next` label. Problems are reported and abort the start; none crash.
    pub fn start(&mut self) {
        for problem in self.catalog.validate() {
            self.report(&problem);
        }

        let starts = self.catalog.start_items();
        let index = match starts.as_slice() {
            [] => {
                self.report("No Start Sequence item.");
                return;
            }
            [index] => *index,
            _ => {
                self.report("More than one Start Sequence item.");
                return;
            }
        };

        let Some(next) = next_label(&self.catalog.get(index).next) else {
            self.report("Sequence Start has no next item.");
            return;
        };

        log::debug!("Sequencer started.");
        self.next_item_name = Some(next);
        self.execute_items();
    }

    /// The operator pressed Start on a cluster holding an offered sound.
    pub fn cluster_start(&mut self, cluster: u32) {
        log::debug!("Start button pressed on cluster {}.", cluster);

        let offer_item = self
            .registry
            .offering
            .iter()
            .find(|entry| entry.cluster == cluster && !entry.off_cluster)
            .map(|entry| entry.item);

        let Some(item_index) = offer_item else {
            self.report(&format!("No Offer Sound outstanding on cluster {}", cluster));
            return;
        };

        self.next_item_name = next_label(&self.catalog.get(item_index).next_to_start);
        self.execute_items();
    }

    /// The operator pressed Stop on a cluster with a running sound.
    pub fn cluster_stop(&mut self, cluster: u32) {
        log::debug!("Stop button pressed on cluster {}.", cluster);

        let position = self
            .registry
            .running
            .iter()
            .position(|entry| entry.cluster == cluster && entry.active && !entry.release_sent);

        let Some(position) = position else {
            self.report(&format!("No sound to stop on cluster {}.", cluster));
            return;
        };

        let (handle, item_index) = {
            let entry = &mut self.registry.running[position];
            entry.release_sent = true;
            entry.stopped_by_operator = true;
            (entry.handle, entry.item)
        };
        if let Some(handle) = handle {
            self.audio.request_release(handle);
        }

        self.next_item_name = next_label(&self.catalog.get(item_index).next_sound_stopped);
        self.execute_items();
    }

    /// The operator pressed Play, releasing the Operator Wait on display.
    pub fn play(&mut self) {
        log::debug!("Play button pressed.");

        // Nothing is waiting for the operator; ignore the press.
        let Some(current) = self.registry.current_operator_wait.take() else {
            return;
        };

        let next = next_label(&self.catalog.get(current.item).next_play);
        self.promote_operator_wait();

        self.next_item_name = next;
        self.execute_items();
    }

    /// MIDI Show Control Go: resume from the offer matching the Q number.
    /// "quit" is reserved, checked only after the scan fails so a show can
    /// capture it and shut down in its own way.
    pub fn go(&mut self, q_number: &str) {
        log::debug!("MIDI show control go, Q number = {}.", q_number);

        let offer_item = self
            .registry
            .offering
            .iter()
            .find(|entry| entry.active && self.catalog.get(entry.item).q_number == q_number)
            .map(|entry| entry.item);

        match offer_item {
            Some(item_index) => {
                self.next_item_name = next_label(&self.catalog.get(item_index).next_to_start);
                self.execute_items();
            }
            None if q_number == "quit" => {
                let _ = self.events.send(SequencerEvent::QuitRequested);
            }
            None => {
                self.report(&format!(
                    "There is no cluster holding an Offer Sound with Q number {}.",
                    q_number
                ));
            }
        }
    }

    /// MIDI Show Control Go_off: release every running sound matching the Q
    /// number, all of them when the Q number is empty, then continue once
    /// from the last match.
    pub fn go_off(&mut self, q_number: &str) {
        log::debug!("MIDI show control go_off, Q number = {}.", q_number);

        let mut last_item = None;
        let mut to_release = Vec::new();
        for entry in self.registry.running.iter_mut() {
            if entry.active
                && !entry.release_sent
                && (q_number.is_empty() || self.catalog.get(entry.item).q_number == q_number)
            {
                entry.release_sent = true;
                entry.stopped_by_operator = true;
                if let Some(handle) = entry.handle {
                    to_release.push(handle);
                }
                last_item = Some(entry.item);
            }
        }
        for handle in to_release {
            self.audio.request_release(handle);
        }

        match last_item {
            Some(item_index) => {
                self.next_item_name = next_label(&self.catalog.get(item_index).next_sound_stopped);
                self.execute_items();
            }
            None if q_number.is_empty() => self.report("No sounds are running."),
            None => {
                self.report(&format!("No running sound with Q number {}.", q_number));
            }
        }
    }

    /// Open Sound Control cue with a numeric operand.
    pub fn osc_cue_number(&mut self, number: u32) {
        log::debug!("OSC cue number, operand = {}.", number);

        let offer_item = self
            .registry
            .offering
            .iter()
            .find(|entry| {
                entry.active && self.catalog.get(entry.item).osc_cue_number == Some(number)
            })
            .map(|entry| entry.item);

        let Some(item_index) = offer_item else {
            self.report(&format!("There is no cluster with OSC cue number {}.", number));
            return;
        };

        self.next_item_name = next_label(&self.catalog.get(item_index).next_to_start);
        self.execute_items();
    }

    /// Open Sound Control cue with a string operand.
    pub fn osc_cue_string(&mut self, cue: &str) {
        log::debug!("OSC cue string, operand = {}.", cue);

        let offer_item = self
            .registry
            .offering
            .iter()
            .find(|entry| {
                entry.active && self.catalog.get(entry.item).osc_cue_string.as_deref() == Some(cue)
            })
            .map(|entry| entry.item);

        let Some(item_index) = offer_item else {
            self.report(&format!("There is no cluster with OSC cue string {}.", cue));
            return;
        };

        self.next_item_name = next_label(&self.catalog.get(item_index).next_to_start);
        self.execute_items();
    }

    /// Explicit shutdown request from the host or a remote controller.
    pub fn quit(&mut self) {
        log::info!("Quit requested.");
        let _ = self.events.send(SequencerEvent::QuitRequested);
    }

    /// A Wait's one-shot timer fired. If the entry was cancelled in the
    /// meantime the timer is stale and nothing happens.
    pub fn wait_elapsed(&mut self, entry: EntryId) {
        let Some(position) = self
            .registry
            .waiting
            .iter()
            .position(|waiting| waiting.id == entry)
        else {
            return;
        };

        let removed = self.registry.waiting.remove(position);
        let item = self.catalog.get(removed.item);
        log::debug!(
            "Wait completed, name = {}, next = {:?}.",
            item.name,
            item.next_completion
        );

        self.next_item_name = next_label(&item.next_completion);
        self.execute_items();
    }

    /// The audio engine finished a sound, either by playing it through
    /// (completion) or by being stopped (termination).
    pub fn sound_completed(&mut self, handle: SoundHandle, terminated: bool) {
        let position = self
            .registry
            .running
            .iter()
            .position(|entry| entry.handle == Some(handle) && entry.active);

        let Some(position) = position else {
            self.report("Sound is not running.");
            return;
        };

        let cluster = self.registry.running[position].cluster;
        let item_index = self.registry.running[position].item;
        if terminated {
            log::debug!(
                "Termination of sound {} on cluster {}.",
                self.catalog.get(item_index).sound_name,
                cluster
            );
        } else {
            log::debug!(
                "Completion of sound {} on cluster {}.",
                self.catalog.get(item_index).sound_name,
                cluster
            );
        }

        // If the sound still owns its cluster, give the slot back. A sound
        // detached earlier (off_cluster) lost its slot to a newer sound,
        // whose label must be left alone.
        if !self.registry.running[position].off_cluster {
            self.console
                .set_cluster_start_caption(cluster, ClusterCaption::Start);
            self.registry.running[position].off_cluster = true;
            self.audio.unbind(handle);

            // An outstanding offer on this cluster gets its text back;
            // otherwise the label is cleared.
            let offer_text = self
                .registry
                .offering
                .iter()
                .find(|entry| entry.active && entry.cluster == cluster)
                .map(|entry| self.catalog.get(entry.item).text_to_display.clone());
            match offer_text {
                Some(text) => {
                    log::debug!("Offer Sound reinstated on cluster {}.", cluster);
                    self.console.set_cluster_label(cluster, &text);
                }
                None => self.console.set_cluster_label(cluster, ""),
            }
        }

        self.registry.running.remove(position);
        self.update_operator_display();

        let item = self.catalog.get(item_index);
        self.next_item_name = next_label(if terminated {
            &item.next_termination
        } else {
            &item.next_completion
        });
        self.execute_items();
    }

    /// The audio engine entered the release stage of a sound's envelope.
    /// The chain only advances from here when the release happened on its
    /// own; a release the sequencer or the operator asked for continues
    /// from the completion callback instead.
    pub fn release_started(&mut self, handle: SoundHandle) {
        let position = self
            .registry
            .running
            .iter()
            .position(|entry| entry.handle == Some(handle) && entry.active);

        let Some(position) = position else {
            self.report("Release started but sound not running.");
            return;
        };

        let (cluster, item_index, release_sent, stopped_by_operator, off_cluster) = {
            let entry = &mut self.registry.running[position];
            entry.release_seen = true;
            (
                entry.cluster,
                entry.item,
                entry.release_sent,
                entry.stopped_by_operator,
                entry.off_cluster,
            )
        };

        log::debug!(
            "Release started for sound {} on cluster {}.",
            self.catalog.get(item_index).sound_name,
            cluster
        );

        if !off_cluster {
            self.console
                .set_cluster_start_caption(cluster, ClusterCaption::Releasing);
        }

        self.update_operator_display();

        if !release_sent && !stopped_by_operator {
            self.next_item_name = next_label(&self.catalog.get(item_index).next_release_started);
            self.execute_items();
        }
    }
}
