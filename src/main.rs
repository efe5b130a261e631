use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use logros::config::{Config, ConfigError};
use logros::credentials::open_file_store;
use logros::failure::Failure;
use logros::guard::{self, GuardConfig};
use logros::hooks::{CreateRegistro, DeleteRegistro, EditRegistro, ListRegistros};
use logros::net::api::{ApiError, HttpApi};
use logros::net::types::EntryPayload;
use logros::session::AuthSession;
use logros::{views, web};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Failed(Failure),
    #[error("not signed in")]
    NotSignedIn,
    #[error("invalid entry")]
    InvalidEntry,
    #[error("entry #{0} not found")]
    EntryNotFound(i64),
}

#[derive(Parser, Debug)]
#[command(name = "logros", about = "Weekly achievement log client")]
struct Cli {
    #[arg(long, env = "LOGROS_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "LOGROS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the guarded page shells.
    Serve,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        apellido: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    List,
    Create(EntryArgs),
    Edit {
        id: i64,
        #[command(flatten)]
        entry: EditArgs,
    },
    Delete {
        id: i64,
    },
    /// Evaluate the navigation guard for a path against the stored cookie.
    Check {
        path: String,
    },
}

#[derive(Args, Debug)]
struct EntryArgs {
    #[arg(long)]
    titulo: String,
    #[arg(long)]
    descripcion: String,
    #[arg(long, help = "Week start, YYYY-MM-DD")]
    inicio: String,
    #[arg(long, help = "Week end, YYYY-MM-DD")]
    fin: String,
}

/// Fields left out keep the entry's current value.
#[derive(Args, Debug)]
struct EditArgs {
    #[arg(long)]
    titulo: Option<String>,
    #[arg(long)]
    descripcion: Option<String>,
    #[arg(long)]
    inicio: Option<String>,
    #[arg(long)]
    fin: Option<String>,
}

impl EditArgs {
    fn is_complete(&self) -> bool {
        self.titulo.is_some() && self.descripcion.is_some() && self.inicio.is_some() && self.fin.is_some()
    }

    fn apply(self, mut payload: EntryPayload) -> EntryPayload {
        if let Some(titulo) = self.titulo {
            payload.titulo = titulo;
        }
        if let Some(descripcion) = self.descripcion {
            payload.descripcion = descripcion;
        }
        if let Some(inicio) = self.inicio {
            payload.inicio_semana = inicio;
        }
        if let Some(fin) = self.fin {
            payload.fin_semana = fin;
        }
        payload
    }
}

impl From<EntryArgs> for EntryPayload {
    fn from(args: EntryArgs) -> Self {
        Self { titulo: args.titulo, descripcion: args.descripcion, inicio_semana: args.inicio, fin_semana: args.fin }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = settings(&cli)?;

    if matches!(cli.command, Command::Serve) {
        return Ok(web::serve(&config).await?);
    }

    let api = Arc::new(HttpApi::new(&config.api_url, config.timeouts)?);
    let credentials = Arc::new(open_file_store(&config.data_dir, config.cookie_days));
    let session = Arc::new(AuthSession::new(api, credentials));

    match cli.command {
        Command::Serve => Ok(()),
        Command::Login { email, password } => {
            let user = session.login(&email, &password).await.map_err(report)?;
            println!("{}", views::welcome(&user));
            Ok(())
        }
        Command::Register { nombre, apellido, email, password } => {
            let user = session.register(&nombre, &apellido, &email, &password).await.map_err(report)?;
            println!("{}", views::welcome(&user));
            Ok(())
        }
        Command::Logout => {
            session.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => {
            println!("{}", views::whoami(&session.session()));
            Ok(())
        }
        Command::Check { path } => {
            let token_present = session
                .credentials()
                .cookie()
                .get()
                .unwrap_or_default()
                .is_some_and(|v| !v.is_empty());
            let guard_config = GuardConfig::new(config.protected_prefixes.clone());
            let decision = guard::decide(&guard_config, &path, token_present);
            println!("{}", views::guard_report(&path, &decision));
            Ok(())
        }
        Command::List => {
            require_session(&session)?;
            let entries = ListRegistros::new(session).fetch().await.map_err(report)?;
            println!("{}", views::entry_list(&entries));
            Ok(())
        }
        Command::Create(args) => {
            require_session(&session)?;
            let payload = validated(args.into())?;
            CreateRegistro::new(session).create(&payload).await.map_err(report)?;
            println!("entry created");
            Ok(())
        }
        Command::Edit { id, entry } => {
            require_session(&session)?;
            let payload = if entry.is_complete() {
                entry.apply(EntryPayload::default())
            } else {
                let current = ListRegistros::new(session.clone())
                    .fetch()
                    .await
                    .map_err(report)?
                    .into_iter()
                    .find(|e| e.id() == id)
                    .ok_or(CliError::EntryNotFound(id))?;
                entry.apply(current.to_payload())
            };
            let payload = validated(payload)?;
            EditRegistro::new(session).edit(id, &payload).await.map_err(report)?;
            println!("entry #{id} updated");
            Ok(())
        }
        Command::Delete { id } => {
            require_session(&session)?;
            DeleteRegistro::new(session).delete(id).await.map_err(report)?;
            println!("entry #{id} deleted");
            Ok(())
        }
    }
}

/// Environment config with the command-line overrides applied. Runs after
/// argument parsing so `--help` works even with a broken environment.
fn settings(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.trim_end_matches('/').to_owned();
    }
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir.clone_from(data_dir);
    }
    Ok(config)
}

/// Terminal stand-in for the guard's redirect to the login page.
fn require_session(session: &AuthSession) -> Result<(), CliError> {
    if session.session().is_authenticated() {
        return Ok(());
    }
    eprintln!("{}", views::LOGIN_PROMPT);
    Err(CliError::NotSignedIn)
}

fn validated(payload: EntryPayload) -> Result<EntryPayload, CliError> {
    let fields = payload.validate();
    if fields.is_empty() {
        return Ok(payload);
    }
    eprintln!("error: invalid entry\n{}", views::field_errors(&fields));
    Err(CliError::InvalidEntry)
}

fn report(failure: Failure) -> CliError {
    eprintln!("{}", views::failure_report(&failure));
    CliError::Failed(failure)
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
