//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Marketplace API - accounts, catalog and orders over HTTP
#[derive(Parser, Debug)]
#[command(name = "marketplace-api")]
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

    /// Insert the demo catalog and optionally an admin account
    Seed(SeedArgs),
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

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
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

/// Arguments for the seed command
#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Email of an ADMIN account to create
    #[arg(long, env = "SEED_ADMIN_EMAIL", requires = "admin_password")]
    pub admin_email: Option<String>,

    /// Password of the ADMIN account
    #[arg(long, env = "SEED_ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_with_admin() {
        let cli = Cli::parse_from([
            "marketplace-api",
            "seed",
            "--admin-email",
            "root@example.com",
            "--admin-password",
            "password123",
        ]);

        match cli.command {
            Commands::Seed(args) => {
                assert_eq!(args.admin_email.as_deref(), Some("root@example.com"));
                assert_eq!(args.admin_password.as_deref(), Some("password123"));
            }
            other => panic!("expected seed, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["marketplace-api", "-v", "serve", "--port", "8080"]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, Some(8080));
                assert!(args.host.is_none());
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }
}
