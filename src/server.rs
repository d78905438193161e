// The relay proper: one task per connection reading lines, one per connection
// writing them. The role registry is the only shared state; its lock is held
// for single registry operations or one routing decision, never across a
// network write.

use std::io;
use std::sync::{Arc, Mutex};

use async_std::channel;
use async_std::io::BufReader;
use async_std::net::{TcpListener, TcpStream};
use async_std::prelude::*;
use async_std::task;
use log::{debug, error, info, warn};

use crate::network;
use crate::registry::{Clients, Role};
use crate::router::{Router, RoutingTopology};


async fn handle_connection(stream: TcpStream, clients: Arc<Mutex<Clients>>, router: Arc<Router>) {
    let peer_addr = match stream.peer_addr() {
        Ok(addr) => addr.to_string(),
        Err(_) => "<unknown>".to_owned(),
    };
    info!("Client connected: {}", peer_addr);

    let mut lines = BufReader::new(stream.clone()).lines();

    // The first line is the role, unconditionally. No uniqueness or format
    // validation: last-registration-wins, empty roles included.
    let role = match lines.next().await {
        Some(Ok(line)) => Role::new(line.trim().to_owned()),
        Some(Err(err)) => {
            warn!("Client {} dropped before registering: {}", peer_addr, err);
            return;
        }
        None => {
            info!("Client {} disconnected before registering", peer_addr);
            return;
        }
    };
    let (client_tx, client_rx) = channel::unbounded();
    let client_id = clients.lock().unwrap().register(role.clone(), client_tx, peer_addr.clone());
    info!("Registered {} as {}", peer_addr, role);

    // Server -> client. Ends when the registry entry is dropped (the channel
    // closes) or the peer stops accepting writes.
    let clients_remover = Arc::clone(&clients);
    let writer_role = role.clone();
    let mut write_stream = stream.clone();
    task::spawn(async move {
        while let Ok(event) = client_rx.recv().await {
            if let Err(err) = network::write_line(&mut write_stream, &event.to_string()).await {
                if clients_remover.lock().unwrap().remove(&writer_role, client_id) {
                    warn!("Client {} disconnected due to write error: {}", writer_role, err);
                }
                break;
            }
        }
    });

    // Client -> everyone else. A malformed line never ends the connection;
    // only end-of-stream or a read error does.
    loop {
        match lines.next().await {
            Some(Ok(line)) => {
                let line = line.trim();
                debug!("[{}] sent: {}", role, line);
                router.route(&clients.lock().unwrap(), &role, client_id, line);
            }
            Some(Err(err)) => {
                if clients.lock().unwrap().remove(&role, client_id) {
                    warn!("Client {} disconnected due to read error: {}", role, err);
                }
                break;
            }
            None => {
                if clients.lock().unwrap().remove(&role, client_id) {
                    info!("Client {} disconnected", role);
                }
                break;
            }
        }
    }
}

// Accept loop. Runs until the listener is closed; a failed accept on a live
// listener is logged and the loop continues.
pub async fn serve(listener: TcpListener, topology: RoutingTopology) -> io::Result<()> {
    let clients = Arc::new(Mutex::new(Clients::new()));
    let router = Arc::new(Router::new(topology));
    info!(
        "Listening on {} ({} fallback routing)",
        listener.local_addr()?,
        router.topology()
    );
    let mut incoming = listener.incoming();
    while let Some(stream) = incoming.next().await {
        match stream {
            Ok(stream) => {
                task::spawn(handle_connection(stream, Arc::clone(&clients), Arc::clone(&router)));
            }
            Err(err) => {
                error!("Cannot establish connection: {}", err);
            }
        }
    }
    Ok(())
}
