//! Trufoso - Voice-command training coach for a virtual dog
//!
//! Terminal host: typed lines stand in for speech and button taps.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use trufoso::animation::LoggingAnimator;
use trufoso::config::Config;
use trufoso::host::{HostCommand, HELP};
use trufoso::mic::{wait_for_permission, MicrophoneController, SimulatedMicrophone};
use trufoso::script::TrainingScript;
use trufoso::sequencer::{Sequencer, SequencerBuilder, VoiceOutcome};
use trufoso::speech::{ChannelSpeech, SpeechEngine, SpeechEvent};
use trufoso::ui::ConsoleUi;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trick to train (sit or paw)
    #[arg(short, long)]
    trick: Option<String>,

    /// Load a training script from a JSON file instead
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Let commands run outside voice steps
    #[arg(long)]
    free_play: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;
    if let Some(trick) = &args.trick {
        config.trick = trick.clone();
    }
    if args.free_play {
        config.free_play = true;
    }

    // Setup logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config.log_level.parse().unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("🐶 Trufoso v{} starting...", env!("CARGO_PKG_VERSION"));

    let script_path = args
        .script
        .clone()
        .or_else(|| config.script_path.as_ref().map(PathBuf::from));
    let script = match script_path {
        Some(path) => TrainingScript::load(&path)
            .with_context(|| format!("Failed to load script {}", path.display()))?,
        None => TrainingScript::builtin(&config.trick)?,
    };

    let mut sequencer = SequencerBuilder::from_config(&config)
        .script(script)
        .ui(ConsoleUi::new())
        .animator(LoggingAnimator)
        .build()?;

    let mut mic = SimulatedMicrophone::granting();
    wait_for_permission(
        &mut mic,
        config.permission_poll(),
        config.permission_max_attempts,
    )
    .await?;

    let (mut speech, feed) = ChannelSpeech::pair();
    if !speech.is_available() {
        anyhow::bail!("Speech recognition is not available");
    }
    speech.request_access();
    speech.start_recording()?;

    print_help(&sequencer);
    sequencer.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(config.tick());
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                sequencer.advance_time(now - last_tick);
                last_tick = now;
            }
            event = speech.next_event() => {
                match event {
                    Some(SpeechEvent::Final(text)) => handle_speech(&mut sequencer, &text),
                    Some(SpeechEvent::Partial(text)) => debug!("… {}", text),
                    Some(SpeechEvent::EndOfSpeech) => debug!("End of speech"),
                    Some(SpeechEvent::Error(e)) => warn!("⚠️ Speech recognizer error: {}", e),
                    None => {
                        error!("❌ Speech recognizer went away");
                        break;
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                match HostCommand::parse(&line) {
                    Some(HostCommand::Say(text)) => {
                        if !feed.say(&text) {
                            warn!("⚠️ Speech recognizer gone, dropped '{}'", text);
                        }
                    }
                    Some(HostCommand::Partial(text)) => {
                        if !feed.partial(&text) {
                            warn!("⚠️ Speech recognizer gone, dropped partial '{}'", text);
                        }
                    }
                    Some(HostCommand::Click(button)) => {
                        if !sequencer.on_button_clicked(button) {
                            info!("Nothing happens");
                        }
                    }
                    Some(HostCommand::Start) => sequencer.start(),
                    Some(HostCommand::Menu) => sequencer.reset(),
                    Some(HostCommand::Status) => {
                        let snap = sequencer.snapshot();
                        info!(
                            "📊 '{}' level {} step {}: {} (pose {:?}, animating: {})",
                            snap.script, snap.level, snap.step, snap.phase, snap.pose,
                            snap.animation_in_flight
                        );
                    }
                    Some(HostCommand::Help) => print_help(&sequencer),
                    Some(HostCommand::Quit) => break,
                    None => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    speech.stop_recording();
    mic.deactivate();
    info!("👋 Bye");
    Ok(())
}

fn handle_speech(sequencer: &mut Sequencer, text: &str) {
    info!("📝 Heard: '{}'", text);
    match sequencer.on_voice_text(text) {
        VoiceOutcome::Unrecognized => info!("🤷 No command in '{}'", text),
        VoiceOutcome::StepSatisfied(cmd) => debug!("Step satisfied by '{}'", cmd),
        VoiceOutcome::FreePlay(cmd) => debug!("Free play '{}'", cmd),
        VoiceOutcome::Ignored(cmd) => info!("'{}' is not what the dog needs now", cmd),
    }
}

fn print_help(sequencer: &Sequencer) {
    info!("{}", HELP);
    let mut table: Vec<_> = sequencer.dispatcher().phrase_table().into_iter().collect();
    table.sort_by_key(|(command, _)| command.name());
    for (command, phrases) in table {
        info!("   {}: {}", command, phrases.join(", "));
    }
}
