//! Per-connection session: handshake, sequencing and the environment it owns.
//!
//! A session never touches the network. The server feeds it one line at a
//! time and writes back whatever it returns, so every connection gets exactly
//! one reply per non-empty line.

use tracing::debug;

use crate::env::{EnvConfig, TetrisEnv};
use crate::protocol::*;

/// Whether the connection stays open after a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Close,
}

pub struct Session {
    id: u64,
    handshaken: bool,
    last_seq: Option<u64>,
    /// Set until the first reset, and again once an episode ends
    needs_reset: bool,
    env: TetrisEnv,
}

impl Session {
    pub fn new(id: u64, config: EnvConfig) -> anyhow::Result<Self> {
        Ok(Self {
            id,
            handshaken: false,
            last_seq: None,
            needs_reset: true,
            env: TetrisEnv::new(config)?,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_handshaken(&self) -> bool {
        self.handshaken
    }

    pub fn env(&self) -> &TetrisEnv {
        &self.env
    }

    /// Record `seq` if it is strictly greater than the last one
    fn check_and_update_seq(&mut self, seq: u64) -> bool {
        match self.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                self.last_seq = Some(seq);
                true
            }
        }
    }

    /// Handle one trimmed, non-empty line
    pub fn handle_line(&mut self, line: &str) -> (ServerMessage, Flow) {
        match parse_message(line) {
            Ok(msg) => self.handle_message(msg),
            Err(e) => {
                let seq = extract_seq_best_effort(line).unwrap_or(0);
                let error = create_error(
                    seq,
                    ErrorCode::InvalidCommand,
                    &format!("JSON parse error: {}", e),
                );
                (ServerMessage::Error(error), Flow::Continue)
            }
        }
    }

    pub fn handle_message(&mut self, msg: ParsedMessage) -> (ServerMessage, Flow) {
        let seq = msg.seq();

        if !matches!(msg, ParsedMessage::Hello(_)) {
            // Handshake required.
            if !self.handshaken {
                let error = create_error(seq, ErrorCode::HandshakeRequired, "Send hello first");
                return (ServerMessage::Error(error), Flow::Continue);
            }

            // Sequencing: enforce monotonic seq per client.
            if !self.check_and_update_seq(seq) {
                return (seq_error(seq), Flow::Continue);
            }
        }

        let reply = match msg {
            ParsedMessage::Hello(hello) => return self.handle_hello(hello),
            ParsedMessage::Reset(reset) => {
                let obs = self.env.reset(reset.seed);
                self.needs_reset = false;
                debug!(
                    session = self.id,
                    seed = self.env.game().seed(),
                    "episode reset"
                );
                ServerMessage::Observation(create_reset_observation(seq, &obs, &self.env))
            }
            ParsedMessage::Step(step) => self.handle_step(seq, &step.action),
            ParsedMessage::Snapshot(_) => {
                ServerMessage::State(create_state(seq, &self.env.game().snapshot()))
            }
            ParsedMessage::Unknown(unknown) => ServerMessage::Error(create_error(
                seq,
                ErrorCode::InvalidCommand,
                &format!("Unknown message type: {}", unknown.msg_type),
            )),
        };
        (reply, Flow::Continue)
    }

    fn handle_hello(&mut self, hello: HelloMessage) -> (ServerMessage, Flow) {
        if self.handshaken && !self.check_and_update_seq(hello.seq) {
            return (seq_error(hello.seq), Flow::Continue);
        }

        // Validate protocol version
        if !hello.protocol_version.starts_with(PROTOCOL_MAJOR_PREFIX) {
            let error = create_error(
                hello.seq,
                ErrorCode::ProtocolMismatch,
                &format!("Protocol version {} not supported", hello.protocol_version),
            );
            return (ServerMessage::Error(error), Flow::Close);
        }

        self.handshaken = true;
        self.last_seq = Some(hello.seq);
        debug!(
            session = self.id,
            client = %hello.client.name,
            version = %hello.client.version,
            "handshake complete"
        );

        let welcome = create_welcome(hello.seq, self.id, &self.env);
        (ServerMessage::Welcome(welcome), Flow::Continue)
    }

    fn handle_step(&mut self, seq: u64, action: &ActionRef) -> ServerMessage {
        if self.needs_reset {
            return ServerMessage::Error(create_error(
                seq,
                ErrorCode::ResetRequired,
                "Send reset before step",
            ));
        }

        let Some(action) = action.resolve() else {
            return ServerMessage::Error(create_error(
                seq,
                ErrorCode::InvalidAction,
                &format!("Unknown action: {}", action),
            ));
        };

        let result = self.env.step(action);
        if result.terminated || result.truncated {
            self.needs_reset = true;
            debug!(
                session = self.id,
                score = result.info.score,
                frames = result.info.frame,
                terminated = result.terminated,
                "episode finished"
            );
        }
        ServerMessage::Observation(create_step_observation(
            seq,
            &result,
            self.env.game().seed(),
        ))
    }
}

fn seq_error(seq: u64) -> ServerMessage {
    ServerMessage::Error(create_error(
        seq,
        ErrorCode::InvalidCommand,
        "seq must be strictly increasing",
    ))
}
