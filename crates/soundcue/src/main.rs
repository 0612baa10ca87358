use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use soundcue_core::{
    ItemKind, SequenceCatalog, SequenceItem, Sequencer, SequencerCommand, SequencerEvent,
    ShowManager, TokioTimers,
};
use tokio::sync::mpsc;

mod console;
mod engine;
mod input;

/// Theatrical sound-cue sequencer: runs an operator-programmed list of
/// sequence items in response to buttons, timers and show-control commands.
#[derive(Parser, Debug)]
#[command(name = "soundcue")]
#[command(about = "Soundcue show sequencer")]
struct Args {
    /// Show file to load (.cue). Without one a built-in demo show runs.
    #[arg(long)]
    show: Option<PathBuf>,

    /// Nominal seconds each simulated sound plays before completing.
    #[arg(long, default_value = "4.0")]
    sound_seconds: f64,

    /// Wait for the "start" command instead of starting immediately.
    #[arg(long)]
    manual: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let (command_tx, mut command_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut catalog = SequenceCatalog::new();
    match &args.show {
        Some(path) => {
            let mut show_manager = ShowManager::new()?;
            let show = show_manager.load_show(path)?;
            println!("Loaded show {} ({} items)", show.name, show.items.len());
            for item in show.items {
                catalog.append(item);
            }
        }
        None => {
            println!("No show file given; running the built-in demo show.");
            println!("Commands: start, go N, stop N, play, msc Q, msc-off [Q], osc CUE, quit");
            for item in demo_show() {
                catalog.append(item);
            }
        }
    }

    let engine = engine::SimulatedEngine::new(
        command_tx.clone(),
        Duration::from_secs_f64(args.sound_seconds),
    );
    let mut sequencer = Sequencer::new(
        catalog,
        Box::new(engine),
        Box::new(console::TerminalConsole::new()),
        Box::new(TokioTimers::new(command_tx.clone())),
        event_tx,
    );

    input::spawn_stdin_reader(command_tx.clone());

    if !args.manual {
        sequencer.handle_command(SequencerCommand::Start);
    }

    // One command at a time: triggers that arrive while a chain is running
    // queue on the channel and execute in arrival order.
    loop {
        tokio::select! {
            Some(event) = event_rx.recv() => match event {
                SequencerEvent::Finished => {
                    log::info!("Sequence finished; shutting down.");
                    break;
                }
                SequencerEvent::QuitRequested => {
                    log::info!("Quit requested; shutting down.");
                    break;
                }
            },
            Some(command) = command_rx.recv() => sequencer.handle_command(command),
            else => break,
        }
    }

    Ok(())
}

/// A small show exercising each item kind: an opening chime, a timed hold
/// that arms a storm effect the operator (or show control) can fire, and an
/// operator-gated curtain speech that tears everything down when it ends.
fn demo_show() -> Vec<SequenceItem> {
    vec![
        SequenceItem {
            name: "start".to_string(),
            kind: ItemKind::StartSequence,
            next: Some("chime".to_string()),
            ..Default::default()
        },
        SequenceItem {
            name: "chime".to_string(),
            kind: ItemKind::StartSound,
            sound_name: "chime".to_string(),
            tag: "chime".to_string(),
            cluster: Some(0),
            importance: 2,
            text_to_display: "Opening chime".to_string(),
            next_starts: Some("house-hold".to_string()),
            ..Default::default()
        },
        SequenceItem {
            name: "house-hold".to_string(),
            kind: ItemKind::Wait,
            tag: "house".to_string(),
            time_to_wait: Duration::from_secs(3),
            text_to_display: "Hold for house lights".to_string(),
            next: Some("offer-storm".to_string()),
            next_completion: Some("storm-warning".to_string()),
            ..Default::default()
        },
        SequenceItem {
            name: "offer-storm".to_string(),
            kind: ItemKind::OfferSound,
            tag: "storm-offer".to_string(),
            cluster: Some(1),
            q_number: "10".to_string(),
            osc_cue_number: Some(10),
            text_to_display: "Storm standby (go 1, msc 10, osc 10)".to_string(),
            next_to_start: Some("storm".to_string()),
            ..Default::default()
        },
        SequenceItem {
            name: "storm".to_string(),
            kind: ItemKind::StartSound,
            sound_name: "thunder".to_string(),
            tag: "storm".to_string(),
            cluster: Some(1),
            importance: 5,
            text_to_display: "Thunder".to_string(),
            ..Default::default()
        },
        SequenceItem {
            name: "storm-warning".to_string(),
            kind: ItemKind::OperatorWait,
            tag: "speech".to_string(),
            text_to_display: "Press play for the curtain speech".to_string(),
            next_play: Some("speech".to_string()),
            ..Default::default()
        },
        SequenceItem {
            name: "speech".to_string(),
            kind: ItemKind::StartSound,
            sound_name: "curtain-speech".to_string(),
            tag: "speech".to_string(),
            cluster: Some(2),
            importance: 4,
            text_to_display: "Curtain speech".to_string(),
            next_completion: Some("cease-storm-offer".to_string()),
            ..Default::default()
        },
        SequenceItem {
            name: "cease-storm-offer".to_string(),
            kind: ItemKind::CeaseOfferingSound,
            tag: "storm-offer".to_string(),
            next: Some("all-off".to_string()),
            ..Default::default()
        },
        SequenceItem {
            name: "all-off".to_string(),
            kind: ItemKind::StopSound,
            tag: "storm".to_string(),
            ..Default::default()
        },
    ]
}
