// Administrator bootstrap commands
// Creates the first administrator, resets its password, or reports whether one exists

use crate::app_data::AppData;
use crate::errors::InternalError;
use crate::providers::BootstrapOutcome;

/// Name used when the bootstrap is triggered through `CREATE_ADMIN=1`
pub const DEFAULT_ADMIN_NAME: &str = "admin";

const NO_ADMINS_WARNING: &str = "You have no admins. Use `gatehouse create-admin` or CREATE_ADMIN=1 to create one.";

/// Create the administrator, or reset the existing one, and print the credentials
///
/// An empty `password` gets a generated one.
pub async fn create_admin(app_data: &AppData, name: &str, password: &str) -> Result<BootstrapOutcome, InternalError> {
    let outcome = app_data.admin_provider.create_or_reset(name, password).await?;

    if outcome.was_updated {
        println!("Password of admin has been reset:");
    } else {
        println!("New admin has been created:");
    }
    println!("  - name: {}", outcome.name);
    println!("  - password: {}", outcome.password);

    Ok(outcome)
}

/// Report the first administrator's name, warning when there is none
pub async fn check_admin(app_data: &AppData) -> Result<Option<String>, InternalError> {
    let outcome = app_data.admin_provider.create_or_reset("", "").await?;

    if outcome.name.is_empty() {
        tracing::warn!("{}", NO_ADMINS_WARNING);
        return Ok(None);
    }

    println!("Admin: {}", outcome.name);
    Ok(Some(outcome.name))
}

/// Startup check run before serving
///
/// With `CREATE_ADMIN=1` the default administrator is created or reset with a
/// generated password and `true` is returned, telling the caller to exit
/// instead of serving. Otherwise only warns when no administrator exists.
pub async fn startup_admin_check(app_data: &AppData) -> Result<bool, InternalError> {
    if app_data.env_provider.is_enabled("CREATE_ADMIN") {
        let outcome = create_admin(app_data, DEFAULT_ADMIN_NAME, "").await?;
        tracing::info!(was_updated = outcome.was_updated, "Bootstrapped admin {} from CREATE_ADMIN", outcome.name);
        return Ok(true);
    }

    let outcome = app_data.admin_provider.create_or_reset("", "").await?;
    if outcome.name.is_empty() {
        tracing::warn!("{}", NO_ADMINS_WARNING);
    }

    Ok(false)
}
