use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use strux_client::api::projects::ProjectsApi;
use strux_client::api::{ApiClient, ApiConfig, PageParams};
use strux_client::auth::{LogNavigator, LoginCredentials, RegistrationForm, Session, SessionState};
use strux_client::dashboard::load_dashboard;
use strux_client::storage::{COMPANY_ID_KEY, FileStore, SessionStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Command line client for the Strux gateway", long_about = None)]
struct Cli {
    /// Gateway origin; defaults to STRUX_API_GATEWAY or http://localhost:8081
    #[arg(long, global = true)]
    gateway: Option<String>,

    /// Where the session is kept between runs
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Project, task and worker counts for a company
    Dashboard {
        /// Company id; remembered for later runs once given
        #[arg(long)]
        company: Option<String>,
    },
    /// List projects
    Projects {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("strux_client=info,strux=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn restored_session(client: ApiClient) -> Result<Session> {
    let mut session = Session::new(client, Arc::new(LogNavigator));
    if let SessionState::Unauthenticated = session.restore().await {
        bail!("Not signed in. Run `strux login` first.");
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let config = match cli.gateway {
        Some(url) => ApiConfig::new(url),
        None => ApiConfig::from_env(),
    };
    let session_path = match cli.session_file {
        Some(path) => path,
        None => FileStore::default_path()?,
    };
    let store = Arc::new(
        FileStore::open(&session_path)
            .with_context(|| format!("Failed to open session file {}", session_path.display()))?,
    );
    let client = ApiClient::new(config, store.clone());

    match cli.command {
        Commands::Login { email, password } => {
            let mut session = Session::new(client, Arc::new(LogNavigator));
            let user = session.login(LoginCredentials { email, password }).await?;
            println!("Signed in as {} <{}>", user.full_name(), user.email);
        }
        Commands::Register {
            first_name,
            last_name,
            email,
            phone,
            password,
            confirm_password,
        } => {
            let mut session = Session::new(client, Arc::new(LogNavigator));
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                phone_number: phone,
                password,
                confirm_password,
            };
            let user = session.register(form).await?;
            println!("Registered and signed in as {} <{}>", user.full_name(), user.email);
        }
        Commands::Logout => {
            let mut session = Session::new(client, Arc::new(LogNavigator));
            session.logout().await;
            println!("Signed out");
        }
        Commands::Whoami => {
            let session = restored_session(client).await?;
            if let Some(user) = session.user() {
                println!("{} <{}>", user.full_name(), user.email);
                println!("id:     {}", user.id);
                println!("status: {:?}", user.status);
            }
        }
        Commands::Dashboard { company } => {
            let session = restored_session(client).await?;
            let company_id = match company {
                Some(company_id) => {
                    store.set(COMPANY_ID_KEY, &company_id)?;
                    company_id
                }
                None => store
                    .get(COMPANY_ID_KEY)
                    .context("No company given. Pass --company <id>.")?,
            };
            let dashboard = load_dashboard(session.client(), &company_id).await;
            println!("{}", serde_json::to_string_pretty(&dashboard.stats)?);
        }
        Commands::Projects { page, size } => {
            let session = restored_session(client).await?;
            let projects = ProjectsApi::new(session.client().clone())
                .list_projects(&PageParams::new(page, size))
                .await?;
            for project in &projects.content {
                println!(
                    "{:<24} {:<12} {:>5.1}%  {}",
                    project.id,
                    format!("{:?}", project.status),
                    project.progress,
                    project.name
                );
            }
            println!(
                "page {} of {} ({} projects)",
                projects.number + 1,
                projects.total_pages.max(1),
                projects.total_elements
            );
        }
    }

    Ok(())
}
