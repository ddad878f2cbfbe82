use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use authapp::config::{DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use authapp::http::ReqwestTransport;
use authapp::{
    AuthClient, AuthConfig, AuthError, FileStorage, Navigator, ProfilePatch, Route, SessionController, TransportError,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

type Controller = SessionController<ReqwestTransport, FileStorage, TerminalNavigator>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("could not set up http client: {0}")]
    Transport(#[from] TransportError),
    #[error("not signed in; run `authapp-cli signin` first")]
    NotSignedIn,
    #[error("nothing to update; pass --name and/or --email")]
    EmptyPatch,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "authapp-cli", about = "Sign up, sign in, and manage your account from a terminal")]
struct Cli {
    #[arg(long, env = "AUTH_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory holding the persisted session slot.
    #[arg(long, env = "AUTH_SESSION_DIR", default_value = ".authapp")]
    session_dir: PathBuf,

    #[arg(long, env = "AUTH_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in and persist the session.
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the local session.
    Signout,
    /// Print the locally stored session.
    Whoami,
    /// Fetch the profile from the server.
    Profile,
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    ChangePassword {
        #[arg(long, hide_env_values = true, env = "AUTH_CURRENT_PASSWORD")]
        current: String,
        #[arg(long = "new", hide_env_values = true, env = "AUTH_NEW_PASSWORD")]
        new_password: String,
    },
}

/// Turns controller navigation into next-step hints on stderr.
#[derive(Debug, Clone, Copy)]
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        eprintln!("{}", route_hint(route));
    }
}

fn route_hint(route: Route) -> &'static str {
    match route {
        Route::Dashboard => "signed in; try `authapp-cli profile`",
        Route::SignIn => "next: `authapp-cli signin --email <email>`",
        Route::SignUp => "next: `authapp-cli signup --name <name> --email <email>`",
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = AuthConfig::default().with_base_url(&cli.base_url);
    config.request_timeout = Duration::from_secs(cli.timeout_secs.max(1));
    tracing::debug!(base_url = %config.base_url, session_dir = %cli.session_dir.display(), "cli starting");

    let transport = ReqwestTransport::new(config)?;
    let client = AuthClient::new(transport, FileStorage::new(cli.session_dir));
    let controller: Controller = SessionController::new(client, TerminalNavigator);
    controller.initialize();

    match cli.command {
        Command::Signup { name, email, password } => {
            let user = controller.register(&name, &email, &password).await?;
            print_json(&user)
        }
        Command::Signin { email, password } => {
            let user = controller.login(&email, &password).await?;
            println!("welcome, {}", user.display_name());
            Ok(())
        }
        Command::Signout => {
            controller.logout().await?;
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            let user = controller.current_user().ok_or(CliError::NotSignedIn)?;
            print_json(&user)
        }
        Command::Profile => {
            require_signed_in(&controller)?;
            let profile = controller.get_profile().await?;
            print_json(&profile)
        }
        Command::UpdateProfile { name, email } => {
            require_signed_in(&controller)?;
            let patch = ProfilePatch { name, email };
            if patch.is_empty() {
                return Err(CliError::EmptyPatch);
            }
            let user = controller.update_profile(&patch).await?;
            print_json(&user)
        }
        Command::ChangePassword { current, new_password } => {
            require_signed_in(&controller)?;
            controller.change_password(&current, &new_password).await?;
            println!("password changed");
            Ok(())
        }
    }
}

fn require_signed_in(controller: &Controller) -> Result<(), CliError> {
    if controller.is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotSignedIn)
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
