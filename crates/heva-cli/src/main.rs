//! HEVA CLI: loads a seed into the in-memory store and prints
//! dashboard reports as JSON.

mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use heva_analytics::{AdminOverview, BeneficiaryAnalytics, OfficerOverview, county_chart};
use heva_auth::{LoginInput, PasswordIgnored, SessionService};
use heva_core::models::user::{Role, User, UserStatus};
use heva_core::models::vulnerable_group::VulnerableGroup;
use heva_store::repository::{MemBusinessRepository, MemSessionRepository, MemUserRepository};
use heva_store::{MemoryStore, apply_seed, load_seed};
use heva_workflow::{BeneficiaryFilter, WorkflowService};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, Settings};

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const DEFAULT_FILTER: &str = "heva=info";

#[derive(Parser, Debug)]
#[command(name = "heva")]
#[command(about = "Case-management reports over a seeded in-memory store")]
struct Cli {
    /// Settings file; `HEVA_*` environment variables override it.
    #[arg(long, default_value = "heva.toml")]
    config: PathBuf,

    /// JSON seed file with `users` and `businesses` arrays.
    #[arg(long)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Admin dashboard overview.
    Overview,
    /// Dashboard of one data-entry officer.
    Officer {
        #[arg(long)]
        id: String,
    },
    /// Beneficiary analytics.
    Analytics,
    /// Beneficiaries per county, top counties plus "Others".
    Counties,
    /// Log in and print the resolved actor.
    Login(LoginArgs),
    /// Search the beneficiaries visible to a user.
    Search(SearchArgs),
    /// Businesses whose owner no longer exists.
    Orphans,
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Accepted but not checked.
    #[arg(long, default_value = "")]
    password: String,
}

#[derive(Args, Debug)]
struct SearchArgs {
    #[command(flatten)]
    login: LoginArgs,
    #[arg(long)]
    query: Option<String>,
    #[arg(long)]
    group: Option<VulnerableGroup>,
    #[arg(long)]
    county: Option<String>,
    #[arg(long, value_parser = parse_status)]
    status: Option<UserStatus>,
}

fn parse_status(raw: &str) -> Result<UserStatus, String> {
    match raw {
        "pending" => Ok(UserStatus::Pending),
        "approved" => Ok(UserStatus::Approved),
        "rejected" => Ok(UserStatus::Rejected),
        other => Err(format!("unknown status: {other}")),
    }
}

fn init_tracing(format: LogFormat) -> CliResult<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

struct App {
    workflow: WorkflowService<MemUserRepository, MemBusinessRepository, MemSessionRepository>,
    sessions: SessionService<MemUserRepository, MemSessionRepository, PasswordIgnored>,
}

impl App {
    fn new(store: &MemoryStore, settings: &Settings) -> Self {
        let users = MemUserRepository::new(store.clone());
        let sessions = MemSessionRepository::new(store.clone());
        Self {
            workflow: WorkflowService::new(
                users.clone(),
                MemBusinessRepository::new(store.clone()),
                sessions.clone(),
            ),
            sessions: SessionService::new(users, sessions, PasswordIgnored, settings.auth_config()),
        }
    }

    /// Log in, run `f` as the resolved actor, then log out.
    async fn as_actor<T, F, Fut>(&self, args: &LoginArgs, f: F) -> CliResult<T>
    where
        F: FnOnce(User) -> Fut,
        Fut: Future<Output = CliResult<T>>,
    {
        let login = self
            .sessions
            .login(LoginInput {
                email: args.email.clone(),
                password: args.password.clone(),
            })
            .await?;
        let actor = self.sessions.current_actor(login.session_id).await?;
        let result = f(actor).await;
        self.sessions.logout(login.session_id).await?;
        result
    }

    async fn run(&self, command: Command) -> CliResult<()> {
        match command {
            Command::Overview => {
                let users = self.workflow.list_users().await?;
                let businesses = self.workflow.list_businesses().await?;
                print_json(&AdminOverview::compute(&users, &businesses))
            }
            Command::Officer { id } => {
                let users = self.workflow.list_users().await?;
                let businesses = self.workflow.list_businesses().await?;
                print_json(&OfficerOverview::compute(&id, &users, &businesses))
            }
            Command::Analytics => {
                let users = self.workflow.list_users().await?;
                print_json(&BeneficiaryAnalytics::compute(&users))
            }
            Command::Counties => {
                let users = self.workflow.list_users().await?;
                let chart = county_chart(users.iter().filter(|u| u.role() == Role::Beneficiary));
                print_json(&chart)
            }
            Command::Login(args) => {
                self.as_actor(&args, |actor| async move { print_json(&json!({ "actor": actor })) })
                    .await
            }
            Command::Search(args) => {
                let filter = BeneficiaryFilter {
                    query: args.query,
                    group: args.group,
                    county: args.county,
                    status: args.status,
                };
                self.as_actor(&args.login, |actor| async move {
                    let found = self.workflow.search_beneficiaries(&actor, &filter).await?;
                    print_json(&found)
                })
                .await
            }
            Command::Orphans => print_json(&self.workflow.orphaned_businesses().await?),
        }
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)?;
    if cli.seed.is_some() {
        settings.seed_path = cli.seed;
    }

    init_tracing(settings.log_format)?;

    let store = MemoryStore::new();
    if let Some(path) = settings.seed_path.as_deref() {
        let seed = load_seed(path)?;
        apply_seed(&store, seed).await?;
    } else {
        tracing::warn!("No seed file configured; the store is empty");
    }

    App::new(&store, &settings).run(cli.command).await
}
