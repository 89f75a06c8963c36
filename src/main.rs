use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use voss_core::{
    config::Config,
    domain::Role,
    migration,
    repository::{user::UserRepositoryImpl, UserRepository},
    server::{self, AppState},
    state::HasServices,
    telemetry,
};

#[derive(Parser)]
#[command(name = "voss-core")]
#[command(about = "Voss agricultural marketplace backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the database if needed and apply pending migrations
    Migrate,
    /// Provision an admin-pool account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "VOSS_ADMIN_PASSWORD")]
        password: String,
        #[arg(long, default_value = "Administrator")]
        name: String,
        /// admin or moderator
        #[arg(long, default_value = "admin")]
        role: Role,
    },
    /// Print registered users
    ListUsers {
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;
    let metrics_handle = telemetry::init(&config.telemetry)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting Voss Core Service");
            info!("HTTP server listening on {}", config.http_addr());
            server::run(config, metrics_handle).await
        }
        Command::Migrate => {
            migration::run_migrations(&config).await?;
            info!("Migrations applied");
            Ok(())
        }
        Command::CreateAdmin {
            email,
            password,
            name,
            role,
        } => {
            let pool = server::connect_pool(&config).await?;
            let state = AppState::new(config, pool)?;
            let admin = state
                .admin_service()
                .create_admin_account(&email, &password, &name, role)
                .await?;
            println!("Created {} {} ({})", admin.role, admin.email, admin.id);
            Ok(())
        }
        Command::ListUsers { limit } => {
            let pool = server::connect_pool(&config).await?;
            let users = UserRepositoryImpl::new(pool).list(0, limit).await?;
            for user in users {
                println!(
                    "{}\t{}\t{}\tverified={}",
                    user.id, user.email, user.role, user.is_verified
                );
            }
            Ok(())
        }
    }
}
