use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use callwire::model::IceServerConfig;
use callwire::session::{
    CallObserver, CallSession, CallSnapshot, CallState, MediaConfig, RemoteStream,
    SessionConfig, TransportConfig, WebRtcMediaEngine,
};
use callwire::{CallMode, PeerAddress};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Input;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "callwire")]
#[command(about = "Peer-to-peer calls over a direct TCP signaling link")]
struct Cli {
    /// Log filter, used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call a peer. Whoever starts first waits for the other on the same port.
    Call {
        /// Peer address as host:port. Prompted for when omitted.
        address: Option<String>,

        #[arg(long)]
        audio_only: bool,

        #[arg(long)]
        muted: bool,

        #[arg(long, default_value_t = 3000)]
        connect_timeout_ms: u64,

        /// STUN server URL; repeat for several. Defaults to a public server.
        #[arg(long = "stun")]
        stun: Vec<String>,
    },
}

struct ConsoleObserver;

#[async_trait]
impl CallObserver for ConsoleObserver {
    async fn on_remote_stream_added(&self, stream: RemoteStream) {
        println!(
            "{} {:?} stream {}",
            "📡 Remote".cyan(),
            stream.kind,
            stream.stream_id
        );
    }

    async fn on_call_ended(&self) {
        println!("{}", "👋 Call ended".green().bold());
    }

    async fn on_connection_error(&self, reason: String) {
        println!("{} {}", "❌ Call failed:".red().bold(), reason);
    }

    async fn on_waiting_for_peer(&self, local_addr: SocketAddr) {
        println!(
            "{} {}",
            "⏳ Peer not reachable yet, waiting on".yellow(),
            local_addr
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Call {
            address,
            audio_only,
            muted,
            connect_timeout_ms,
            stun,
        } => {
            let address = match address {
                Some(address) => address,
                None => prompt_address()?,
            };
            let mode = if audio_only {
                CallMode::AudioOnly
            } else {
                CallMode::AudioVideo
            };

            let config = SessionConfig {
                transport: TransportConfig {
                    connect_timeout: Duration::from_millis(connect_timeout_ms),
                    ..TransportConfig::default()
                },
            };
            let media_config = if stun.is_empty() {
                MediaConfig::default()
            } else {
                MediaConfig {
                    ice_servers: stun.into_iter().map(IceServerConfig::stun).collect(),
                }
            };

            run_call(&address, mode, muted, config, media_config).await?;
        }
    }

    Ok(())
}

fn prompt_address() -> Result<String> {
    Input::<String>::new()
        .with_prompt("Peer address (host:port)")
        .validate_with(|input: &String| -> Result<(), String> {
            input
                .parse::<PeerAddress>()
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .context("Failed to read peer address")
}

async fn run_call(
    address: &str,
    mode: CallMode,
    muted: bool,
    config: SessionConfig,
    media_config: MediaConfig,
) -> Result<()> {
    println!("{} {} ({})", "📞 Calling".green().bold(), address, mode);

    let session = CallSession::start(
        address,
        mode,
        config,
        WebRtcMediaEngine::new(media_config),
        Arc::new(ConsoleObserver),
    )
    .context("Failed to start call")?;
    debug!("Session {} started", session.id());

    if muted {
        session.mute();
    }

    let mut snapshots = session.subscribe();
    let mut last = *snapshots.borrow_and_update();
    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *snapshots.borrow_and_update();
                print_transition(&last, &snapshot);
                last = snapshot;
                if snapshot.state.is_terminal() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Hanging up...".yellow());
                session.end_call();
            }
        }
    }

    if session.finished().await == CallState::Failed {
        bail!("Call failed");
    }
    Ok(())
}

fn print_transition(before: &CallSnapshot, after: &CallSnapshot) {
    if before.state != after.state {
        println!("   {} {}", "state:".dimmed(), after.state.to_string().bold());
    }
    if before.role != after.role {
        if let Some(role) = after.role {
            println!("   {} {}", "role: ".dimmed(), role.to_string().bold());
        }
    }
    if before.muted != after.muted {
        let label = if after.muted { "muted" } else { "unmuted" };
        println!("   {} {}", "mic:  ".dimmed(), label);
    }
}
