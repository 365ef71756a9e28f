//! sendlink binary.
//!
//! # Usage
//!
//! ```bash
//! # Open a shared link, printing text or saving the file to the current dir
//! sendlink 'https://vault.example/#/send/7Gq2/AAECAwQF...'
//!
//! # Password-protected send, explicit service URL
//! sendlink --api-url https://api.vault.example --password hunter2 '<link>'
//!
//! # Identifier and key given separately
//! sendlink --id 7Gq2 --key AAECAwQF... --output ~/Downloads
//! ```

use std::{io, path::PathBuf, time::Duration};

use clap::Parser;
use sendlink_app::{DEFAULT_API_URL, GatewayConfig, HttpGateway, Runtime, SendLink};
use sendlink_cli::{CliError, CliHost};
use sendlink_client::{ERROR_MESSAGE, SendContent, SessionState};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Attempts allowed at the interactive password prompt.
const PROMPT_ATTEMPTS: usize = 3;

/// Open a secure send link
#[derive(Parser, Debug)]
#[command(name = "sendlink")]
#[command(about = "Open and decrypt a shared secure send")]
#[command(version)]
struct Args {
    /// Shared link (`https://host/#/send/{id}/{key}` and variants)
    link: Option<String>,

    /// Send identifier, when not using a link
    #[arg(long, conflicts_with = "link")]
    id: Option<String>,

    /// URL-safe base64 key, when not using a link
    #[arg(long, conflicts_with = "link")]
    key: Option<String>,

    /// Base URL of the send service API
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Password for protected sends (prompted for when omitted)
    #[arg(short, long)]
    password: Option<String>,

    /// Directory for downloaded files
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Print hidden text in clear
    #[arg(long)]
    reveal: bool,

    /// Copy text instead of printing it
    #[arg(long)]
    copy: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

type CliRuntime = Runtime<HttpGateway, CliHost>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    run(args).await?;
    Ok(())
}

async fn run(args: Args) -> Result<(), CliError> {
    let link = match &args.link {
        Some(link) => SendLink::parse(link),
        None => SendLink::new(args.id.clone(), args.key.clone()),
    };
    if !link.is_complete() {
        return Err(CliError::IncompleteLink);
    }

    let config = GatewayConfig::default()
        .with_api_url(args.api_url.clone())
        .with_request_timeout(Duration::from_secs(args.timeout_secs));
    tracing::debug!(api_url = %config.api_url, "using send service");

    let gateway = HttpGateway::new(config)?;
    let mut runtime = Runtime::new(gateway, CliHost::new(&args.output));

    runtime.initiate(&link).await?;
    answer_challenge(&mut runtime, args.password.as_deref()).await?;

    match runtime.session().state() {
        SessionState::Ready => present(&mut runtime, &args).await,
        SessionState::PasswordRequired => Err(CliError::PasswordRequired),
        SessionState::Uninitialized | SessionState::Loading | SessionState::Error => {
            Err(CliError::AccessFailed(ERROR_MESSAGE))
        },
    }
}

/// Submit the given password, or prompt until accepted or out of attempts.
///
/// Without a terminal to prompt on, the challenge is left unanswered.
async fn answer_challenge(
    runtime: &mut CliRuntime,
    password: Option<&str>,
) -> Result<(), CliError> {
    if runtime.session().state() != SessionState::PasswordRequired {
        return Ok(());
    }

    if let Some(password) = password {
        runtime.submit_password(password).await?;
        return Ok(());
    }

    for _ in 0..PROMPT_ATTEMPTS {
        // Reads from the controlling terminal with echo off.
        let prompted = tokio::task::spawn_blocking(|| rpassword::prompt_password("Password: "))
            .await
            .map_err(io::Error::other)?;
        let password = match prompted {
            Ok(password) => password,
            Err(e) => {
                tracing::debug!(error = %e, "no password entered");
                break;
            },
        };
        runtime.submit_password(&password).await?;

        if runtime.session().state() != SessionState::PasswordRequired {
            break;
        }
        tracing::warn!("password rejected");
    }

    Ok(())
}

/// Show text or download the file of a ready session.
async fn present(runtime: &mut CliRuntime, args: &Args) -> Result<(), CliError> {
    let Some(view) = runtime.session().view() else {
        return Err(CliError::AccessFailed(ERROR_MESSAGE));
    };
    if let Some(name) = &view.name {
        tracing::info!(%name, "opened send");
    }

    if let SendContent::File(file) = &view.content {
        tracing::info!(
            file_name = %file.file_name,
            size = file.size_name.as_deref().unwrap_or("unknown"),
            "downloading"
        );
        runtime.download_file().await?;

        if runtime.host().errors() > 0 || runtime.host().saved().is_empty() {
            return Err(CliError::DownloadFailed);
        }
        return Ok(());
    }

    if args.copy {
        runtime.copy_text().await?;
        return Ok(());
    }
    if args.reveal && !runtime.session().is_revealed() {
        runtime.toggle_reveal().await?;
    }

    let text = runtime.session().send_text().unwrap_or_default().to_string();
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
