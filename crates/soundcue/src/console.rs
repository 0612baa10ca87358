use soundcue_core::{ClusterCaption, MessageId, OperatorConsole};

/// Operator console rendered as terminal lines. The real console is a
/// windowed surface with one widget cluster per slot; this one prints the
/// same state changes so an operator (or a test run) can follow the show.
pub struct TerminalConsole {
    next_message_id: MessageId,
    last_activity: String,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            next_message_id: 0,
            last_activity: String::new(),
        }
    }
}

impl OperatorConsole for TerminalConsole {
    fn set_cluster_label(&mut self, cluster: u32, text: &str) {
        if text.is_empty() {
            println!("[cluster {}] (cleared)", cluster);
        } else {
            println!("[cluster {}] {}", cluster, text);
        }
    }

    fn set_cluster_start_caption(&mut self, cluster: u32, caption: ClusterCaption) {
        println!("[cluster {}] button: {}", cluster, caption.as_str());
    }

    fn show_operator_text(&mut self, text: &str) {
        println!("[operator] {}", text);
    }

    fn clear_operator_text(&mut self) {
        println!("[operator] (cleared)");
    }

    fn show_activity(&mut self, text: &str) {
        // The activity line refreshes every 100 ms; only print changes.
        if text == self.last_activity {
            return;
        }
        self.last_activity = text.to_string();
        if !text.is_empty() {
            println!("[activity] {}", text);
        }
    }

    fn show_transient_message(&mut self, text: &str) -> MessageId {
        self.next_message_id += 1;
        println!("[message] {}", text);
        self.next_message_id
    }
}
