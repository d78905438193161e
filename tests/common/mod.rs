// Helpers for driving a real relay over localhost sockets.
//
// Registration is not acknowledged on the wire, so `connect` finishes with a
// self-addressed `TURN:<role>` handshake: the server processes lines of one
// connection in order, which makes the registration globally visible by the
// time the handshake answer arrives. Connecting clients one by one therefore
// yields a deterministic registry state.

use std::net::Shutdown;
use std::time::Duration;

use async_std::future;
use async_std::io::{BufReader, Lines};
use async_std::net::{TcpListener, TcpStream};
use async_std::prelude::*;
use async_std::task;
use chess_relay::network;
use chess_relay::router::RoutingTopology;
use chess_relay::server;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);
pub const SILENCE_GRACE: Duration = Duration::from_millis(200);

// Spawns a relay on an OS-assigned port and returns its address.
pub async fn start_relay(topology: RoutingTopology) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    task::spawn(async move {
        server::serve(listener, topology).await.unwrap();
    });
    addr
}

pub struct TestClient {
    role: String,
    stream: TcpStream,
    lines: Lines<BufReader<TcpStream>>,
}

impl TestClient {
    pub async fn connect(addr: &str, role: &str) -> Self {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let lines = BufReader::new(stream.clone()).lines();
        network::write_line(&mut stream, role).await.unwrap();
        let mut client = TestClient { role: role.to_owned(), stream, lines };
        client.send(&format!("TURN:{}", role.trim())).await;
        assert_eq!(client.recv().await, "TURN");
        client
    }

    pub async fn send(&mut self, line: &str) {
        network::write_line(&mut self.stream, line).await.unwrap();
    }

    // Next line from the relay; panics if nothing arrives in time.
    pub async fn recv(&mut self) -> String {
        let line = future::timeout(RECV_TIMEOUT, self.lines.next())
            .await
            .unwrap_or_else(|_| panic!("[{}] timed out waiting for a message", self.role));
        line.unwrap_or_else(|| panic!("[{}] connection closed", self.role)).unwrap()
    }

    // Asserts that nothing arrives within a short grace period.
    pub async fn assert_silent(&mut self) {
        if let Ok(line) = future::timeout(SILENCE_GRACE, self.lines.next()).await {
            panic!("[{}] unexpected message: {:?}", self.role, line);
        }
    }

    pub fn close(self) { self.stream.shutdown(Shutdown::Both).unwrap(); }
}

// Gives the relay a moment to observe an end-of-stream and clean up the
// registry entry; disconnects are not acknowledged on the wire either.
pub async fn settle() { task::sleep(SILENCE_GRACE).await; }
