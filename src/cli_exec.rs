use anyhow::{Context, Result};

use atpins::store::ConfigStore;

use crate::cli_runtime::{require_config, require_session};
use crate::{Commands, ConfigCommands};

mod account;
mod browse;
mod render;
mod transfer;

pub(crate) fn handle_command(store: &ConfigStore, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => account::handle_login_command(store, args),
        Commands::Logout => account::handle_logout_command(store),
        Commands::Config { command } => match command {
            ConfigCommands::Show { json } => account::handle_config_show(store, json),
            ConfigCommands::Set(args) => account::handle_config_set(store, args),
        },
        Commands::Ls(args) => browse::handle_ls_command(store, args),
        Commands::Show(args) => browse::handle_show_command(store, args),
        Commands::Upload(args) => transfer::handle_upload_command(store, args),
        Commands::Get(args) => transfer::handle_get_command(store, args),
        Commands::Rm(args) => transfer::handle_rm_command(store, args),
    }
}

fn print_json<T: serde::Serialize>(value: &T, what: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {} json", what))?
    );
    Ok(())
}
