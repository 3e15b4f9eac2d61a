mod cli_commands;
mod cli_exec;
mod cli_runtime;

pub(crate) use self::cli_commands::{Commands, ConfigCommands};

fn main() {
    if let Err(err) = cli_runtime::run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
