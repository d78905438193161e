#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_main;
mod server_config;
mod server_main;

use clap::{Command, arg};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Relay")
        .version(clap::crate_version!())
        .about("Chess move relay server and console client")
        .subcommand_required(true)
        .subcommand(
            Command::new("server")
                .about("Run the relay server")
                .arg(arg!([config_file] "Path to the configuration file: yaml-serialized ServerConfig"))
                .arg(arg!(--address <address> "Address to listen on").required(false))
                .arg(
                    arg!(--topology <topology> "Fallback routing: broadcast-all or forward-to-game")
                        .required(false),
                ),
        )
        .subcommand(
            Command::new("client")
                .about("Connect to a relay as a participant")
                .arg(arg!(<role> "Role to register under, e.g. white, black or game"))
                .arg(arg!(--address <address> "Server address").required(false)),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("server", sub)) => {
            let config = server_config::resolve_config(
                sub.get_one::<String>("config_file").map(String::as_str),
                sub.get_one::<String>("address").map(String::as_str),
                sub.get_one::<String>("topology").map(String::as_str),
            )?;
            server_main::run(config)
        }
        Some(("client", sub)) => {
            let config = client_main::ClientConfig {
                server_address: sub
                    .get_one::<String>("address")
                    .cloned()
                    .unwrap_or_else(server_config::default_address),
                role: sub.get_one::<String>("role").unwrap().clone(),
            };
            client_main::run(config)
        }
        _ => unreachable!("subcommand_required is set"),
    }
}
