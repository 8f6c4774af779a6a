pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "forum-api")]
#[command(about = "Discussion forum backend - users, categories, threads and comments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT / FORUM_API_PORT)")]
        port: Option<u16>,

        #[arg(
            long,
            help = "Use a process-local store instead of PostgreSQL; data is lost on exit"
        )]
        in_memory: bool,
    },

    #[command(about = "Create tables and seed the predefined categories, then exit")]
    InitDb,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        in_memory: false,
    }) {
        Commands::Serve { port, in_memory } => {
            commands::serve::handle(config, port, in_memory).await
        }
        Commands::InitDb => commands::init_db::handle(config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["forum-api"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_flags_parse() {
        let cli = Cli::try_parse_from(["forum-api", "serve", "--port", "9000", "--in-memory"])
            .unwrap();
        match cli.command {
            Some(Commands::Serve { port, in_memory }) => {
                assert_eq!(port, Some(9000));
                assert!(in_memory);
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn init_db_parses() {
        let cli = Cli::try_parse_from(["forum-api", "init-db"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::InitDb)));
    }
}
