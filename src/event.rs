use std::fmt;

use itertools::Itertools;

use crate::registry::Role;


// A line that matched a directed-message prefix but did not split into the
// advertised number of `:`-separated fields. The router logs these and drops
// the line; they are never reported back over the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedMessage {
    pub line: String,
}

impl fmt::Display for MalformedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Malformed message: {:?}", self.line)
    }
}


// One message from a client, one wire line. Classification is by prefix,
// first match wins. No escaping: `:` always separates fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    // INVALID:<uci>:<target_role> - tell the target its move was rejected.
    Invalid { uci: String, target: Role },
    // OUTOFTURN:<target_role> - tell the target it moved out of turn.
    OutOfTurn { target: Role },
    // FEN:<fen> - new position, for both players.
    Fen { fen: String },
    // TURN:<target_role> - tell the target it is to move.
    Turn { target: Role },
    // Anything else, typically a move in UCI notation.
    Other(String),
}

impl ClientMessage {
    pub fn parse(line: &str) -> Result<Self, MalformedMessage> {
        let malformed = || MalformedMessage { line: line.to_owned() };
        if line.starts_with("INVALID:") {
            let (_, uci, target) = line.split(':').collect_tuple().ok_or_else(malformed)?;
            Ok(ClientMessage::Invalid {
                uci: uci.to_owned(),
                target: Role::new(target.to_owned()),
            })
        } else if line.starts_with("OUTOFTURN:") {
            let (_, target) = line.split(':').collect_tuple().ok_or_else(malformed)?;
            Ok(ClientMessage::OutOfTurn { target: Role::new(target.to_owned()) })
        } else if line.starts_with("FEN:") {
            let (_, fen) = line.split(':').collect_tuple().ok_or_else(malformed)?;
            Ok(ClientMessage::Fen { fen: fen.to_owned() })
        } else if line.starts_with("TURN:") {
            let (_, target) = line.split(':').collect_tuple().ok_or_else(malformed)?;
            Ok(ClientMessage::Turn { target: Role::new(target.to_owned()) })
        } else {
            Ok(ClientMessage::Other(line.to_owned()))
        }
    }
}


// One message from the relay to a client. `Display` is the wire encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerMessage {
    Invalid { uci: String },
    OutOfTurn,
    Fen { fen: String },
    Turn,
    Relay { from: Role, text: String },
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Invalid { uci } => write!(f, "INVALID:{}", uci),
            ServerMessage::OutOfTurn => write!(f, "OUTOFTURN"),
            ServerMessage::Fen { fen } => write!(f, "FEN:{}", fen),
            ServerMessage::Turn => write!(f, "TURN"),
            ServerMessage::Relay { from, text } => write!(f, "{}:{}", from, text),
        }
    }
}
