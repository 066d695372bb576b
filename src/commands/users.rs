//! Users command - account administration from the shell.

use std::sync::Arc;

use crate::cli::args::{CreateUserArgs, UsersAction, UsersArgs};
use crate::config::Config;
use crate::domain::UserUpdate;
use crate::errors::AppResult;
use crate::infra::{Database, Persistence, UnitOfWork};
use crate::services::{NewAccount, UserManager, UserService};
use crate::types::PaginationParams;

impl From<CreateUserArgs> for NewAccount {
    fn from(args: CreateUserArgs) -> Self {
        Self {
            username: args.username,
            password: args.password,
            email: args.email,
            role: args.role,
            first_name: args.first_name,
            last_name: args.last_name,
            user_code: args.user_code,
            year_level: None,
            position: args.position,
        }
    }
}

/// Execute the users command
pub async fn execute(args: UsersArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let uow = Arc::new(Persistence::new(db.get_connection()));

    match args.action {
        UsersAction::Create(create) => {
            let user = UserManager::new(uow).create_user(create.into()).await?;
            println!("Created {} {} ({})", user.role, user.username, user.id);
        }
        UsersAction::Deactivate { id } => {
            // Goes straight to the store: there is no acting admin session here.
            let user = uow.users().deactivate(id).await?;
            tracing::info!(user_id = %id, "User deactivated from the command line");
            println!("Deactivated {} ({})", user.username, user.id);
        }
        UsersAction::Reactivate { id } => {
            let changes = UserUpdate {
                is_active: Some(true),
                ..Default::default()
            };
            let user = uow.users().update(id, changes).await?;
            tracing::info!(user_id = %id, "User reactivated from the command line");
            println!("Reactivated {} ({})", user.username, user.id);
        }
        UsersAction::List { role } => {
            let manager = UserManager::new(uow);
            let mut params = PaginationParams::default();
            loop {
                let (users, total) = manager.list_users(role, params).await?;
                for user in &users {
                    println!(
                        "{}\t{}\t{}\t{}",
                        user.id,
                        user.username,
                        user.role,
                        if user.is_active { "active" } else { "inactive" }
                    );
                }
                if users.is_empty() || params.page * params.limit() >= total {
                    break;
                }
                params.page += 1;
            }
        }
    }

    Ok(())
}
