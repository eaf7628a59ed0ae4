//! Create-admin command - Bootstraps the first administrator.

use crate::cli::args::CreateAdminArgs;
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{AdminProvisioning, ServiceContainer, Services};

/// Execute the create-admin command
pub async fn execute(args: CreateAdminArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let services = Services::from_connection(db.get_connection(), config);

    let (user, outcome) = services
        .users()
        .promote_or_create_admin(args.name, args.email, args.password)
        .await?;

    match outcome {
        AdminProvisioning::Created => println!("Created admin account {} ({})", user.email, user.id),
        AdminProvisioning::Promoted => println!("Promoted {} ({}) to ADMIN", user.email, user.id),
        AdminProvisioning::AlreadyAdmin => println!("{} is already an admin", user.email),
    }

    Ok(())
}
