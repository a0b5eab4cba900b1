//! Minimal command-line host for the ballot client.
//!
//! Presentation collaborator only: wires the production handlers to the
//! engine and prints what the view state exposes.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use ballot_core::effects::StorageEffects;
use ballot_core::identifiers::{OptionId, PollId};
use ballot_core::identity::Signer;
use ballot_core::{BallotError, ClientConfig, LocalSigner, Result};
use ballot_effects::{FilesystemStorage, WsLedger};
use ballot_engine::BallotClient;

/// Storage key holding the user's signer identity.
const SIGNER_KEY: &str = "user/identity";

#[derive(Parser)]
#[command(name = "ballot", about = "Poll client for the shared ledger record")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the ledger RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all polls
    Polls,
    /// Create a poll
    Create {
        /// Poll question
        title: String,
        /// Answer options
        #[arg(num_args = 2..=6, required = true)]
        options: Vec<String>,
    },
    /// Cast a vote
    Vote {
        /// Target poll id
        poll_id: u32,
        /// Chosen option id
        option: u8,
    },
    /// Show results for a poll
    Results {
        /// Target poll id
        poll_id: u32,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match cli.config {
        Some(path) => ClientConfig::load(&path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = cli.rpc_url {
        config.rpc_url = url;
    }

    let storage = Arc::new(FilesystemStorage::new(config.storage_dir.clone()));
    let signer: Arc<dyn Signer> = Arc::new(load_or_create_signer(storage.as_ref()).await?);
    let ledger = Arc::new(WsLedger::new(config.rpc_url.clone(), signer));
    let client = BallotClient::new(storage, ledger, config);

    let handle = client.connect().await?;
    println!("{}", client.status().await.message);

    match cli.command {
        Command::Polls => {
            let polls = client.refresh_polls(&handle).await?;
            if polls.is_empty() {
                println!("no polls yet");
            }
            for poll in polls {
                let status = if poll.closed { " (closed)" } else { "" };
                println!("{}: {}{}", poll.id, poll.title, status);
                for option in &poll.options {
                    println!("  {}: {}", option.id, option.text);
                }
            }
        }
        Command::Create { title, options } => {
            let id = client.create_poll(&handle, &title, &options).await?;
            println!("created {id}");
        }
        Command::Vote { poll_id, option } => {
            client
                .cast_vote(&handle, PollId(poll_id), OptionId(option))
                .await?;
            println!("vote confirmed");
        }
        Command::Results { poll_id } => {
            client.refresh_votes(&handle, PollId(poll_id)).await?;
            let tally = client
                .tally(PollId(poll_id))
                .await
                .ok_or_else(|| BallotError::invalid(format!("unknown poll {poll_id}")))?;
            println!("{} votes", tally.total);
            for row in tally.options {
                println!("  {}: {}", row.text, row.count);
            }
        }
    }
    Ok(())
}

/// Load the persisted user signer, generating one on first run.
async fn load_or_create_signer(storage: &FilesystemStorage) -> Result<LocalSigner> {
    let stored = storage
        .retrieve(SIGNER_KEY)
        .await
        .map_err(|e| BallotError::storage_failed(format!("load signer: {e}")))?;

    if let Some(blob) = stored {
        let bytes: Vec<u8> = serde_json::from_slice(&blob)
            .map_err(|e| BallotError::storage_failed(format!("corrupt signer blob: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| BallotError::storage_failed("corrupt signer blob: wrong length"))?;
        return Ok(LocalSigner::from_secret_bytes(&bytes));
    }

    let signer = LocalSigner::generate();
    let blob = serde_json::to_vec(&signer.secret_bytes().to_vec())
        .map_err(|e| BallotError::storage_failed(e.to_string()))?;
    storage
        .store(SIGNER_KEY, blob)
        .await
        .map_err(|e| BallotError::storage_failed(format!("persist signer: {e}")))?;
    Ok(signer)
}
