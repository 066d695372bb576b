//! CLI argument definitions.

use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::domain::UserRole;

/// Incident report and counseling case tracker
#[derive(Parser, Debug)]
#[command(name = "casetrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage accounts without going through the API
    Users(UsersArgs),
}

/// Arguments for the serve command. Unset values fall back to the environment.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

#[derive(Parser, Debug)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub action: UsersAction,
}

#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// Create an account of any role, e.g. the first administrator
    Create(CreateUserArgs),
    /// Deactivate an account so it can no longer sign in
    Deactivate {
        /// User ID
        id: Uuid,
    },
    /// Let a deactivated account sign in again
    Reactivate {
        /// User ID
        id: Uuid,
    },
    /// List accounts
    List {
        /// Only show this role
        #[arg(long, value_parser = parse_role)]
        role: Option<UserRole>,
    },
}

#[derive(Parser, Debug)]
pub struct CreateUserArgs {
    #[arg(long)]
    pub username: String,

    /// Read from the environment so it stays out of shell history
    #[arg(long, env = "CASETRACK_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[arg(long)]
    pub email: String,

    #[arg(long, value_parser = parse_role)]
    pub role: UserRole,

    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    /// Student number or employee code
    #[arg(long)]
    pub user_code: Option<String>,

    #[arg(long)]
    pub position: Option<String>,
}

fn parse_role(s: &str) -> Result<UserRole, String> {
    s.parse().map_err(|e: crate::errors::AppError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_admin() {
        let cli = Cli::try_parse_from([
            "casetrack",
            "users",
            "create",
            "--username",
            "principal",
            "--password",
            "Bootstrap-pass-1",
            "--email",
            "principal@school.edu",
            "--role",
            "ADMIN",
            "--first-name",
            "Ana",
            "--last-name",
            "Reyes",
        ])
        .unwrap();

        match cli.command {
            Commands::Users(UsersArgs {
                action: UsersAction::Create(args),
            }) => {
                assert_eq!(args.role, UserRole::Admin);
                assert_eq!(args.username, "principal");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_reactivate_takes_user_id() {
        let id = Uuid::new_v4();
        let id_arg = id.to_string();
        let cli =
            Cli::try_parse_from(["casetrack", "users", "reactivate", id_arg.as_str()]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Users(UsersArgs {
                action: UsersAction::Reactivate { id: parsed },
            }) if parsed == id
        ));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result = Cli::try_parse_from(["casetrack", "users", "list", "--role", "janitor"]);
        assert!(result.is_err());
    }
}
