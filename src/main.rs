use std::process;
use log::error;

use floodkit::commands::{build_cli, Command, ConvertCommand};
use floodkit::utils::logger::init_global_logger;

fn main() {
    let matches = build_cli().get_matches();

    init_global_logger(matches.get_flag("verbose"));

    let command = match ConvertCommand::new(&matches) {
        Ok(command) => command,
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = command.execute() {
        error!("Command execution error: {}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
