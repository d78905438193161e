// Thin console participant: registers a role, prints everything the relay
// sends, and forwards stdin lines as protocol messages. Choosing the moves is
// the operator's (or an external engine driver's) job, not this client's.

use anyhow::Context;
use async_std::io::BufReader;
use async_std::net::TcpStream;
use async_std::prelude::*;
use async_std::task;

use chess_relay::network;


pub struct ClientConfig {
    pub server_address: String,
    pub role: String,
}

pub fn run(config: ClientConfig) -> anyhow::Result<()> {
    task::block_on(async {
        let mut stream = TcpStream::connect(config.server_address.as_str())
            .await
            .context(format!("Cannot connect to {}", config.server_address))?;
        network::write_line(&mut stream, config.role.trim()).await?;
        println!("[{}] Connected to {}.", config.role, config.server_address);

        // Server -> console.
        let role = config.role.clone();
        let read_stream = stream.clone();
        task::spawn(async move {
            let mut lines = BufReader::new(read_stream).lines();
            loop {
                match lines.next().await {
                    Some(Ok(line)) => println!("[{}] Received from server: {}", role, line.trim()),
                    Some(Err(_)) | None => break,
                }
            }
            println!("[{}] Connection lost.", role);
            std::process::exit(0);
        });

        // Console -> server, one message per line; EOF ends the session.
        let stdin = async_std::io::stdin();
        loop {
            let mut input = String::new();
            let n = stdin.read_line(&mut input).await?;
            if n == 0 {
                break;
            }
            let line = input.trim();
            if line.is_empty() {
                continue;
            }
            network::write_line(&mut stream, line).await?;
        }
        Ok(())
    })
}
