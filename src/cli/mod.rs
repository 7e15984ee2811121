// CLI module for administrative operations requiring database access

pub mod admin;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Gatehouse CLI
#[derive(Parser, Debug)]
#[command(name = "gatehouse")]
#[command(about = "Gatehouse administrator authentication backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create the administrator, or reset the existing administrator's password
    CreateAdmin {
        /// Administrator name
        #[arg(long, default_value = admin::DEFAULT_ADMIN_NAME)]
        name: String,

        /// Password to set; generated when omitted
        #[arg(long, default_value = "")]
        password: String,
    },

    /// Show the first administrator, warning when there is none
    CheckAdmin,
}

impl Cli {
    /// Subcommand to run, `serve` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve)
    }
}

/// Execute a non-serving CLI command
///
/// Routes the parsed command to the appropriate handler function. `Serve` is
/// handled by the binary and is a no-op here.
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve => {}
        Commands::CreateAdmin { name, password } => {
            admin::create_admin(app_data, &name, &password).await?;
        }
        Commands::CheckAdmin => {
            admin::check_admin(app_data).await?;
        }
    }

    Ok(())
}
