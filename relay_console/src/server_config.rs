use std::fs;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use chess_relay::network;
use chess_relay::router::RoutingTopology;


#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub topology: RoutingTopology,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            address: default_address(),
            topology: RoutingTopology::default(),
        }
    }
}

pub fn default_address() -> String { format!("127.0.0.1:{}", network::PORT) }

// Config file values load first; command-line flags override them.
pub fn resolve_config(
    config_file: Option<&str>, address: Option<&str>, topology: Option<&str>,
) -> anyhow::Result<ServerConfig> {
    let mut config = match config_file {
        Some(path) => {
            let content = fs::read_to_string(path)
                .context(format!("Failed to read config file '{path}'."))?;
            serde_yaml::from_str(&content)
                .context(format!("Failed to parse config file '{path}'."))?
        }
        None => ServerConfig::default(),
    };
    if let Some(address) = address {
        config.address = address.to_owned();
    }
    if let Some(topology) = topology {
        config.topology = RoutingTopology::from_str(topology)
            .map_err(|_| anyhow::anyhow!("Unknown routing topology '{topology}'."))?;
    }
    Ok(config)
}
