use clap::{Args, Parser, Subcommand};
use rb_db::schema;
use rb_db::seed::{SeedData, apply_seed};
use rb_serve::{AppState, ServeOptions};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "rb", about = "Retrospective feedback backend")]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "RB_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Clone)]
struct DbArgs {
    #[arg(long, env = "RB_DB_PATH", default_value = ".retroboard/retro.db")]
    db_path: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[command(flatten)]
        db: DbArgs,
        #[arg(long, env = "RB_HOST", default_value = "127.0.0.1")]
        host: IpAddr,
        #[arg(long, env = "RB_PORT", default_value_t = 4830)]
        port: u16,
        /// Allow any origin; for local frontend development
        #[arg(long, env = "RB_CORS")]
        cors: bool,
    },
    /// Create or update the database schema
    Migrate {
        #[command(flatten)]
        db: DbArgs,
    },
    /// Load users, retrospectives, sprints and sprint tasks from a JSON file
    Seed {
        path: PathBuf,
        #[command(flatten)]
        db: DbArgs,
    },
    /// Print the OpenAPI document
    Openapi,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match cli.command {
        Command::Serve {
            db,
            host,
            port,
            cors,
        } => serve(db, SocketAddr::new(host, port), cors).await,
        Command::Migrate { db } => migrate(&db),
        Command::Seed { path, db } => seed(&db, &path),
        Command::Openapi => {
            println!("{}", rb_serve::openapi::generate_spec());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(db: DbArgs, addr: SocketAddr, cors: bool) -> Result<(), String> {
    migrate(&db)?;
    let options = ServeOptions {
        permissive_cors: cors,
    };
    rb_serve::serve(AppState::new(db.db_path), addr, options)
        .await
        .map_err(|err| format!("serve error: {err}"))
}

fn migrate(db: &DbArgs) -> Result<(), String> {
    if let Some(parent) = Path::new(&db.db_path).parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("failed to create {}: {err}", parent.display()))?;
    }
    schema::open_and_migrate(&db.db_path)
        .map_err(|err| format!("migration failed for {}: {err}", db.db_path))?;
    info!(db_path = %db.db_path, "schema up to date");
    Ok(())
}

fn seed(db: &DbArgs, path: &Path) -> Result<(), String> {
    migrate(db)?;
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read {}: {err}", path.display()))?;
    let data: SeedData = serde_json::from_str(&raw)
        .map_err(|err| format!("failed to parse {}: {err}", path.display()))?;
    let conn = schema::open(&db.db_path).map_err(|err| err.to_string())?;
    let summary = apply_seed(&conn, &data).map_err(|err| err.to_string())?;
    info!(
        users = summary.users,
        retrospectives = summary.retrospectives,
        members = summary.members,
        sprints = summary.sprints,
        sprint_tasks = summary.sprint_tasks,
        "seed applied"
    );
    Ok(())
}
