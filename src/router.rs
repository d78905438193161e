use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::event::{ClientMessage, ServerMessage};
use crate::registry::{ClientId, Clients, Role};


// What to do with a line that matches no directed-message prefix. Deployments
// disagree on this, so it is a configuration knob, not a hard-coded rule.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RoutingTopology {
    // Every other registered connection receives "<sender_role>:<text>".
    #[default]
    BroadcastAll,
    // Only the connection registered as "game" receives "<sender_role>:<text>".
    ForwardToGame,
}


pub struct Router {
    topology: RoutingTopology,
}

impl Router {
    pub fn new(topology: RoutingTopology) -> Self { Router { topology } }

    pub fn topology(&self) -> RoutingTopology { self.topology }

    // One classify-then-dispatch step. The caller holds the registry lock for
    // the whole call, so no insert or removal can interleave with the lookups
    // below. Nothing here blocks: sends go through unbounded channels.
    pub fn route(&self, clients: &Clients, sender_role: &Role, sender_id: ClientId, line: &str) {
        let message = match ClientMessage::parse(line) {
            Ok(message) => message,
            Err(err) => {
                warn!("[{}] {}", sender_role, err);
                return;
            }
        };
        match message {
            ClientMessage::Invalid { uci, target } => {
                self.send_to(clients, &target, ServerMessage::Invalid { uci });
            }
            ClientMessage::OutOfTurn { target } => {
                self.send_to(clients, &target, ServerMessage::OutOfTurn);
            }
            ClientMessage::Fen { fen } => {
                // Each player is checked independently: a missing player must
                // not prevent delivery to the other one.
                for target in [Role::white(), Role::black()] {
                    self.send_to(clients, &target, ServerMessage::Fen { fen: fen.clone() });
                }
            }
            ClientMessage::Turn { target } => {
                self.send_to(clients, &target, ServerMessage::Turn);
            }
            ClientMessage::Other(text) => {
                let relay = ServerMessage::Relay { from: sender_role.clone(), text };
                match self.topology {
                    RoutingTopology::BroadcastAll => {
                        // The sender is excluded by connection identity, not
                        // by role: a superseded connection under the same
                        // role is a different recipient.
                        for (_, client) in clients.iter() {
                            if client.id() != sender_id {
                                client.send(relay.clone());
                            }
                        }
                    }
                    RoutingTopology::ForwardToGame => match clients.get(&Role::game()) {
                        Some(client) if client.id() != sender_id => client.send(relay),
                        _ => debug!("[{}] No eligible recipient for: {}", sender_role, relay),
                    },
                }
            }
        }
    }

    fn send_to(&self, clients: &Clients, target: &Role, message: ServerMessage) {
        match clients.get(target) {
            Some(client) => client.send(message),
            None => debug!("Target {} is not registered, dropping: {}", target, message),
        }
    }
}
