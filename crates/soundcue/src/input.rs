use soundcue_core::SequencerCommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// Read operator commands from stdin and feed them to the sequencer. The
/// task ends when stdin closes or the sequencer goes away.
pub fn spawn_stdin_reader(commands: mpsc::UnboundedSender<SequencerCommand>) {
    tokio::spawn(async move {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_command(line) {
                Some(command) => {
                    if commands.send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!(
                    "Unrecognized command: {} (try start, go N, stop N, play, msc Q, msc-off [Q], osc CUE, quit)",
                    line
                ),
            }
        }
    });
}

/// Parse one operator command line.
pub fn parse_command(line: &str) -> Option<SequencerCommand> {
    let mut parts = line.split_whitespace();
    match parts.next()? {
        "start" => Some(SequencerCommand::Start),
        "go" => parts
            .next()?
            .parse::<u32>()
            .ok()
            .map(|cluster| SequencerCommand::ClusterStart { cluster }),
        "stop" => parts
            .next()?
            .parse::<u32>()
            .ok()
            .map(|cluster| SequencerCommand::ClusterStop { cluster }),
        "play" => Some(SequencerCommand::Play),
        "msc" => Some(SequencerCommand::Go {
            q_number: parts.next().unwrap_or("").to_string(),
        }),
        "msc-off" => Some(SequencerCommand::GoOff {
            q_number: parts.next().unwrap_or("").to_string(),
        }),
        "osc" => {
            let operand = parts.next()?;
            match operand.parse::<u32>() {
                Ok(number) => Some(SequencerCommand::OscCueNumber { number }),
                Err(_) => Some(SequencerCommand::OscCueString {
                    cue: operand.to_string(),
                }),
            }
        }
        "quit" => Some(SequencerCommand::Quit),
        _ => None,
    }
}
