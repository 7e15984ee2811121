use std::sync::Arc;

use clap::Parser;
use poem::{listener::TcpListener, Server};

use gatehouse_backend::api::build_app;
use gatehouse_backend::app_data::AppData;
use gatehouse_backend::cli::{self, Cli, Commands};
use gatehouse_backend::config::database::{init_database, migrate_database};
use gatehouse_backend::config::{init_logging, BootstrapSettings, EnvironmentProvider, SystemEnvironment};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let env_provider: Arc<dyn EnvironmentProvider + Send + Sync> = Arc::new(SystemEnvironment);

    init_logging(env_provider.as_ref())?;

    let cli = Cli::parse();

    let bootstrap_settings = BootstrapSettings::from_env_provider(env_provider.clone())?;

    let db = init_database(&bootstrap_settings).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db, env_provider).await?);

    let command = cli.command();
    if command != Commands::Serve {
        return cli::execute_command(command, &app_data).await;
    }

    if cli::admin::startup_admin_check(&app_data).await? {
        return Ok(());
    }

    let server_address = bootstrap_settings.server_address();
    let server_url = format!("http://{}/api", server_address);
    let app = build_app(app_data, &server_url);

    tracing::info!("Starting server on http://{}", server_address);
    tracing::info!("Swagger UI available at http://{}/swagger", server_address);
    tracing::info!("API endpoints available at {}", server_url);

    Server::new(TcpListener::bind(server_address)).run(app).await?;

    Ok(())
}
