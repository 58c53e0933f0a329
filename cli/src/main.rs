mod backend;

use {
    crate::backend::DesktopBackend,
    autologin::{
        Credentials, LoginConfig, LoginError, LoginOrchestrator, LoginOutcome, TemplateStore,
    },
    clap::{error::ErrorKind, Parser},
    std::process,
    tracing::{error, info},
    tracing_subscriber::{filter::LevelFilter, EnvFilter},
};

/// Logs into the application by filling its login form.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Username to enter.
    #[arg(short = 'u', value_name = "USERNAME")]
    pub username: String,
    /// Password to enter.
    #[arg(short = 'p', value_name = "PASSWORD")]
    pub password: String,
}

impl Args {
    fn credentials(self) -> Credentials {
        Credentials::new(self.username, self.password)
    }
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env()?,
        )
        .init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            error!("missing username or password\n{}", err.render());
            process::exit(1);
        }
    };

    let backend = DesktopBackend::new()?;
    let mut orchestrator =
        LoginOrchestrator::new(&backend, TemplateStore::new(), LoginConfig::default());
    let result = orchestrator.run(&args.credentials());
    let code = exit_code(&result);
    match result {
        Ok(outcome) if outcome.is_success() => {
            info!("login submitted (retries: {})", outcome.attempts());
        }
        // Already reported by the orchestrator.
        Ok(_) => {}
        Err(err) => error!("{:#}", anyhow::Error::new(err)),
    }
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}

/// Exhausted retries still exit with status 0; only a run that couldn't
/// start (no window, no initial capture) is a failure.
fn exit_code(result: &Result<LoginOutcome, LoginError>) -> i32 {
    match result {
        Ok(LoginOutcome::Success { .. } | LoginOutcome::Failed { .. }) => 0,
        Err(_) => 1,
    }
}
