//! Echo Nav CLI - bookmarks in the terminal, synced through a GitHub Gist

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::{CommandFactory, Parser};

use crate::cli::{AuthCommands, Cli, Commands, ConfigCommands};
use crate::commands::add::{run_add, NewWebsite};
use crate::commands::auth_cmd::{run_auth_login, run_auth_logout, run_auth_status};
use crate::commands::auto_sync::run_auto_sync;
use crate::commands::common::CliContext;
use crate::commands::completions::run_completions;
use crate::commands::config::{run_config_init, run_config_show};
use crate::commands::history::run_history;
use crate::commands::list::run_list;
use crate::commands::status::run_status;
use crate::commands::sync::{run_link, run_sync, SyncMode};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "echo_nav_core=info".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let context = CliContext::resolve(cli.profile.as_deref(), cli.data_dir)?;
    run_with_context(&context, command).await
}

async fn run_with_context(context: &CliContext, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Add {
            name,
            url,
            description,
            category,
            tags,
            favorite,
        } => {
            let input = NewWebsite {
                name,
                url,
                description,
                category,
                tags,
                favorite,
            };
            run_add(context, input).await
        }
        Commands::List { json } => run_list(context, json).await,
        Commands::Sync { resolve } => {
            run_sync(context, SyncMode::Auto, resolve.map(Into::into)).await
        }
        Commands::Push => run_sync(context, SyncMode::Push, None).await,
        Commands::Pull { resolve } => {
            run_sync(context, SyncMode::Pull, resolve.map(Into::into)).await
        }
        Commands::Link { gist_id } => run_link(context, &gist_id).await,
        Commands::Status { json } => run_status(context, json).await,
        Commands::History { limit, json, clear } => run_history(context, limit, json, clear).await,
        Commands::AutoSync {
            enable,
            disable,
            interval,
        } => run_auto_sync(context, enable, disable, interval).await,
        Commands::Auth { command } => match command {
            AuthCommands::Login { token } => run_auth_login(context, &token),
            AuthCommands::Status => run_auth_status(context),
            AuthCommands::Logout => run_auth_logout(context),
        },
        Commands::Completions { shell, output } => run_completions(shell, output.as_deref()),
        Commands::Config { command } => match command {
            ConfigCommands::Init {
                data_dir,
                api_base_url,
                no_activate,
            } => run_config_init(
                Some(context.profile_name.as_str()),
                data_dir,
                api_base_url,
                no_activate,
            ),
            ConfigCommands::Show => run_config_show(Some(context.profile_name.as_str())),
        },
    }
}
