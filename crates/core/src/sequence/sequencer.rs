use tokio::sync::mpsc;

use crate::{
    AudioEngine, ClusterCaption, ItemKind, MessageId, OperatorConsole, RuntimeRegistry,
    SequenceCatalog, SequenceItem, SequencerCommand, SequencerEvent, TimerService,
};

/// Number of operator display slots available to Start Sound and Offer Sound
/// items that do not name a cluster themselves.
pub const CLUSTER_COUNT: u32 = 16;

/// The sequencer: the catalog of programmed items, the runtime bookkeeping,
/// and the drive loop that follows continuation labels from item to item.
///
/// All mutation happens on the host's thread, one trigger at a time; a
/// trigger that arrives while a chain is executing waits its turn on the
/// host's command channel.
pub struct Sequencer {
    pub(crate) catalog: SequenceCatalog,
    pub(crate) registry: RuntimeRegistry,
    /// The pending continuation label; empty when no chain is in flight.
    pub(crate) next_item_name: Option<String>,
    pub(crate) audio: Box<dyn AudioEngine>,
    pub(crate) console: Box<dyn OperatorConsole>,
    pub(crate) timers: Box<dyn TimerService>,
    pub(crate) events: mpsc::UnboundedSender<SequencerEvent>,
    /// True while a display refresh tick is outstanding.
    pub(crate) tick_scheduled: bool,
    pub(crate) last_message: Option<MessageId>,
}

/// A continuation label worth following. Loaders may leave labels as empty
/// strings; those end the chain the same way an absent label does.
pub(crate) fn next_label(label: &Option<String>) -> Option<String> {
    label.clone().filter(|name| !name.is_empty())
}

impl Sequencer {
    pub fn new(
        catalog: SequenceCatalog,
        audio: Box<dyn AudioEngine>,
        console: Box<dyn OperatorConsole>,
        timers: Box<dyn TimerService>,
        events: mpsc::UnboundedSender<SequencerEvent>,
    ) -> Self {
        Self {
            catalog,
            registry: RuntimeRegistry::new(),
            next_item_name: None,
            audio,
            console,
            timers,
            events,
            tick_scheduled: false,
            last_message: None,
        }
    }

    /// Called by the show loader, once per parsed item, before `start()`.
    pub fn append_item(&mut self, item: SequenceItem) {
        self.catalog.append(item);
    }

    pub fn catalog(&self) -> &SequenceCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &RuntimeRegistry {
        &self.registry
    }

    /// Id of the most recent transient message, so a console can retire it.
    pub fn last_message(&self) -> Option<MessageId> {
        self.last_message
    }

    /// Route one trigger to its handler.
    pub fn handle_command(&mut self, command: SequencerCommand) {
        match command {
            SequencerCommand::Start => self.start(),
            SequencerCommand::ClusterStart { cluster } => self.cluster_start(cluster),
            SequencerCommand::ClusterStop { cluster } => self.cluster_stop(cluster),
            SequencerCommand::Play => self.play(),
            SequencerCommand::Go { q_number } => self.go(&q_number),
            SequencerCommand::GoOff { q_number } => self.go_off(&q_number),
            SequencerCommand::OscCueNumber { number } => self.osc_cue_number(number),
            SequencerCommand::OscCueString { cue } => self.osc_cue_string(&cue),
            SequencerCommand::Quit => self.quit(),
            SequencerCommand::SoundCompleted { handle, terminated } => {
                self.sound_completed(handle, terminated)
            }
            SequencerCommand::SoundReleaseStarted { handle } => self.release_started(handle),
            SequencerCommand::WaitElapsed { entry } => self.wait_elapsed(entry),
            SequencerCommand::DisplayTick => self.display_tick(),
        }
    }

    /// Follow continuation labels until the chain runs dry or a label fails
    /// to resolve. When nothing at all remains pending afterwards, tell the
    /// host the show is over.
    pub(crate) fn execute_items(&mut self) {
        while let Some(name) = self.next_item_name.take() {
            match self.catalog.find_by_name(&name) {
                Some(index) => self.execute_item(index),
                None => {
                    self.report(&format!("Next item, {}, not found.", name));
                    break;
                }
            }
        }

        if self.registry.is_idle() {
            log::info!("Nothing left to do; exiting.");
            let _ = self.events.send(SequencerEvent::Finished);
        }
    }

    fn execute_item(&mut self, index: usize) {
        let item = self.catalog.get(index).clone();
        log::debug!("Executing item {}.", item.name);

        match item.kind {
            ItemKind::StartSound => self.execute_start_sound(index, &item),
            ItemKind::StopSound => self.execute_stop_sound(&item),
            ItemKind::Wait => self.execute_wait(index, &item),
            ItemKind::OfferSound => self.execute_offer_sound(index, &item),
            ItemKind::CeaseOfferingSound => self.execute_cease_offering_sound(&item),
            ItemKind::OperatorWait => self.execute_operator_wait(index, &item),
            ItemKind::CancelWait => self.execute_cancel_wait(&item),
            ItemKind::StartSequence => {
                // Only sequence_start should see this kind; reaching it
                // mid-chain is worth telling the operator about.
                log::info!("Start Sequence item {} reached during execution.", item.name);
                self.last_message = Some(self.console.show_transient_message("Start sequence"));
            }
            ItemKind::Unknown => {
                self.report(&format!("Unknown type of sequence item: {}.", item.name));
            }
        }

        log::debug!(
            "Finished executing item {}, next is {:?}.",
            item.name,
            self.next_item_name
        );
    }

    fn execute_start_sound(&mut self, index: usize, item: &SequenceItem) {
        let cluster = self.resolve_cluster(item);

        if let Some(occupant) = self.registry.cluster_occupant(cluster) {
            let releasing = occupant.release_sent || occupant.release_seen;
            let occupant_sound = self.catalog.get(occupant.item).sound_name.clone();
            let occupant_handle = occupant.handle;

            if !releasing {
                self.report(&format!(
                    "Cannot start sound {} on busy cluster {}, occupied by {}.",
                    item.sound_name, cluster, occupant_sound
                ));
                return;
            }

            // The occupying sound is releasing. Detach it from the cluster
            // in favor of the new sound; it finishes off-cluster.
            self.console
                .set_cluster_start_caption(cluster, ClusterCaption::Start);
            if let Some(entry) = self.registry.cluster_occupant_mut(cluster) {
                entry.off_cluster = true;
            }
            if let Some(handle) = occupant_handle {
                self.audio.unbind(handle);
            }
        }

        self.console.set_cluster_label(cluster, &item.text_to_display);

        match self.audio.bind(&item.sound_name, cluster) {
            Some(handle) => {
                self.audio.start(handle);
                self.console
                    .set_cluster_start_caption(cluster, ClusterCaption::Playing);

                let mut entry = self.registry.new_entry(index, cluster);
                entry.active = true;
                entry.handle = Some(handle);
                self.registry.running.push(entry);
            }
            None => {
                self.report(&format!("Sound {} not defined.", item.sound_name));
            }
        }

        // This may be the most important thing happening; refresh the
        // operator's activity line.
        self.update_operator_display();

        self.next_item_name = next_label(&item.next_starts);
    }

    fn execute_stop_sound(&mut self, item: &SequenceItem) {
        // Release every running sound whose Start Sound item carries this
        // tag. Cleanup happens when each sound reports completion.
        let mut to_release = Vec::new();
        for entry in self.registry.running.iter_mut() {
            if entry.active
                && !entry.release_sent
                && self.catalog.get(entry.item).tag == item.tag
            {
                log::debug!(
                    "Stopping sound {}.",
                    self.catalog.get(entry.item).sound_name
                );
                entry.release_sent = true;
                if let Some(handle) = entry.handle {
                    to_release.push(handle);
                }
            }
        }
        for handle in to_release {
            self.audio.request_release(handle);
        }

        self.next_item_name = next_label(&item.next);
    }

    fn execute_wait(&mut self, index: usize, item: &SequenceItem) {
        let mut entry = self.registry.new_entry(index, 0);

        // Only one Wait owns the operator line at a time.
        if self.registry.waiting.is_empty() && self.registry.current_operator_wait.is_none() {
            entry.active = true;
            self.console.show_operator_text(&item.text_to_display);
        }

        let id = entry.id;
        self.registry.waiting.push(entry);
        self.timers
            .schedule(item.time_to_wait, SequencerCommand::WaitElapsed { entry: id });

        self.next_item_name = next_label(&item.next);
    }

    fn execute_offer_sound(&mut self, index: usize, item: &SequenceItem) {
        let cluster = self.resolve_cluster(item);
        self.console.set_cluster_label(cluster, &item.text_to_display);

        let mut entry = self.registry.new_entry(index, cluster);
        entry.active = true;
        self.registry.offering.push(entry);

        self.next_item_name = next_label(&item.next);
    }

    fn execute_cease_offering_sound(&mut self, item: &SequenceItem) {
        let mut position = 0;
        while position < self.registry.offering.len() {
            let entry = &self.registry.offering[position];
            if entry.active && self.catalog.get(entry.item).tag == item.tag {
                let removed = self.registry.offering.remove(position);
                log::debug!("Canceling Offer Sound on cluster {}.", removed.cluster);
                self.console.set_cluster_label(removed.cluster, "");
            } else {
                position += 1;
            }
        }

        self.next_item_name = next_label(&item.next);
    }

    fn execute_operator_wait(&mut self, index: usize, item: &SequenceItem) {
        let mut entry = self.registry.new_entry(index, 0);

        if self.registry.current_operator_wait.is_none() {
            entry.active = true;
            self.console.show_operator_text(&item.text_to_display);
            self.registry.current_operator_wait = Some(entry);
        } else {
            // An Operator Wait is already showing; queue behind it.
            self.registry.operator_waiting.push(entry);
        }

        self.next_item_name = next_label(&item.next);
    }

    fn execute_cancel_wait(&mut self, item: &SequenceItem) {
        let tag = item.tag.clone();

        self.registry
            .waiting
            .retain(|entry| self.catalog.get(entry.item).tag != tag);
        self.registry
            .operator_waiting
            .retain(|entry| self.catalog.get(entry.item).tag != tag);

        // Retire the operator wait on display only when its tag matches,
        // then let the next queued one (if any) take the operator line.
        let retire_current = self
            .registry
            .current_operator_wait
            .as_ref()
            .map(|entry| self.catalog.get(entry.item).tag == tag)
            .unwrap_or(false);
        if retire_current {
            self.registry.current_operator_wait = None;
            self.promote_operator_wait();
        }

        self.next_item_name = next_label(&item.next);
    }

    /// Give the head of the operator-wait queue the operator line, or clear
    /// the line when the queue is empty.
    pub(crate) fn promote_operator_wait(&mut self) {
        if self.registry.operator_waiting.is_empty() {
            self.console.clear_operator_text();
            return;
        }

        let mut entry = self.registry.operator_waiting.remove(0);
        entry.active = true;
        let text = self.catalog.get(entry.item).text_to_display.clone();
        self.console.show_operator_text(&text);
        self.registry.current_operator_wait = Some(entry);
    }

    /// Pick the display slot for an item that did not name one: the lowest
    /// cluster not held by a running sound or an outstanding offer.
    fn resolve_cluster(&self, item: &SequenceItem) -> u32 {
        if let Some(cluster) = item.cluster {
            return cluster;
        }

        for cluster in 0..CLUSTER_COUNT {
            let held = self.registry.cluster_occupant(cluster).is_some()
                || self
                    .registry
                    .offering
                    .iter()
                    .any(|entry| entry.active && entry.cluster == cluster);
            if !held {
                return cluster;
            }
        }

        log::warn!(
            "Item {} needs a cluster but every cluster is held; reusing cluster 0.",
            item.name
        );
        0
    }

    /// Surface a problem to the operator and the log. Nothing here is fatal;
    /// the show keeps running.
    pub(crate) fn report(&mut self, text: &str) {
        log::warn!("{}", text);
        self.last_message = Some(self.console.show_transient_message(text));
    }
}
