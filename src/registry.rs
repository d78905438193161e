use std::collections::HashMap;
use std::fmt;

use async_std::channel;
use log::debug;

use crate::event::ServerMessage;


// Role names have no reserved vocabulary: the registry stores whatever string
// a client registers, empty strings included. "white", "black" and "game" are
// only special to the router.
#[derive(Clone, Debug, Hash, Eq, PartialEq)]
pub struct Role(String);

impl Role {
    pub fn new(s: String) -> Self { Self(s) }
    pub fn white() -> Self { Self("white".to_owned()) }
    pub fn black() -> Self { Self("black".to_owned()) }
    pub fn game() -> Self { Self("game".to_owned()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}


// Identifies one registration. Registering a role again yields a fresh id, so
// a connection can always tell whether a registry entry is still its own.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClientId(usize);

pub struct Client {
    id: ClientId,
    events_tx: channel::Sender<ServerMessage>,
    peer_addr: String,
}

impl Client {
    pub fn id(&self) -> ClientId { self.id }

    // Best-effort. The channel is unbounded, so this never blocks; it can
    // only fail when the receiving writer task is already gone.
    pub fn send(&self, event: ServerMessage) {
        if self.events_tx.try_send(event).is_err() {
            debug!("Dropping message to disconnected client {}", self.peer_addr);
        }
    }
}

pub struct Clients {
    map: HashMap<Role, Client>,
    next_id: usize,
}

impl Clients {
    pub fn new() -> Self {
        Clients {
            map: HashMap::new(),
            next_id: 0,
        }
    }

    // Last registration wins: an existing entry for the same role is silently
    // superseded. The superseded connection is not closed here; it merely
    // stops receiving routed messages.
    pub fn register(
        &mut self, role: Role, events_tx: channel::Sender<ServerMessage>, peer_addr: String,
    ) -> ClientId {
        let id = ClientId(self.next_id);
        self.next_id += 1;
        self.map.insert(role, Client { id, events_tx, peer_addr });
        id
    }

    pub fn get(&self, role: &Role) -> Option<&Client> { self.map.get(role) }

    // Removes the entry only if `id` still owns it. Cleanup of a superseded
    // connection must not evict its replacement.
    pub fn remove(&mut self, role: &Role, id: ClientId) -> bool {
        match self.map.get(role) {
            Some(client) if client.id == id => {
                self.map.remove(role);
                true
            }
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Role, &Client)> { self.map.iter() }

    pub fn len(&self) -> usize { self.map.len() }
    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}
