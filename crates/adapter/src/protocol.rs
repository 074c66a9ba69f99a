//! Protocol module - JSON message types for the environment adapter
//!
//! Line-delimited JSON. All messages have: type, seq (sequence number), ts (timestamp in ms)

use serde::{Deserialize, Serialize};

use crate::core::{BoardMetrics, GameSnapshot, PieceSnapshot};
use crate::env::{Observation, StepInfo, StepResult, TetrisEnv};
use crate::types::{Action, PieceKind};

/// Protocol version spoken by this server; clients must share the major version
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Major version prefix a client's `protocol_version` must start with
pub const PROTOCOL_MAJOR_PREFIX: &str = "1.";

// ============== Client -> Server Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HelloType {
    #[default]
    #[serde(rename = "hello")]
    Hello,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResetType {
    #[default]
    #[serde(rename = "reset")]
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StepType {
    #[default]
    #[serde(rename = "step")]
    Step,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SnapshotType {
    #[default]
    #[serde(rename = "snapshot")]
    Snapshot,
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Start a new episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ResetType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

/// Advance the episode by one action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: StepType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: ActionRef,
}

/// Request the full engine state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: SnapshotType,
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
}

/// An action given either by discrete id or by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionRef {
    Index(u64),
    Name(String),
}

impl ActionRef {
    pub fn resolve(&self) -> Option<Action> {
        match self {
            ActionRef::Index(i) => usize::try_from(*i).ok().and_then(Action::from_index),
            ActionRef::Name(name) => Action::from_str(name),
        }
    }
}

impl std::fmt::Display for ActionRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionRef::Index(i) => write!(f, "{}", i),
            ActionRef::Name(name) => write!(f, "{}", name),
        }
    }
}

// ============== Server -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateType {
    #[serde(rename = "state")]
    State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "reset_required")]
    ResetRequired,
    #[serde(rename = "invalid_action")]
    InvalidAction,
    #[serde(rename = "session_limit")]
    SessionLimit,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub session_id: u64,
    pub env: EnvInfo,
}

/// Static description of the environment behind a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvInfo {
    pub rows: usize,
    pub cols: usize,
    pub action_count: usize,
    /// Action names, indexed by discrete action id
    pub actions: Vec<String>,
    pub observation_len: usize,
}

impl EnvInfo {
    pub fn from_env(env: &TetrisEnv) -> Self {
        let config = env.config();
        Self {
            rows: config.rows,
            cols: config.cols,
            action_count: env.action_count(),
            actions: Action::ALL.iter().map(|a| a.as_str().to_string()).collect(),
            observation_len: env.observation_len(),
        }
    }
}

/// Reply to `reset` and `step`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    /// Flattened observation vector
    pub obs: Vec<f32>,
    pub reward: f32,
    pub terminated: bool,
    pub truncated: bool,
    pub info: StepInfoWire,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInfoWire {
    pub froze: bool,
    pub lines_cleared: u32,
    pub score: u32,
    pub level: u32,
    pub frame: u64,
    pub piece_id: u32,
    pub seed: u32,
}

impl StepInfoWire {
    fn new(info: StepInfo, seed: u32) -> Self {
        Self {
            froze: info.froze,
            lines_cleared: info.lines_cleared,
            score: info.score,
            level: info.level,
            frame: info.frame,
            piece_id: info.piece_id,
            seed,
        }
    }
}

/// Reply to `snapshot`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMessage {
    #[serde(rename = "type")]
    pub msg_type: StateType,
    pub seq: u64,
    pub ts: u64,
    pub snapshot: SnapshotWire,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotWire {
    pub rows: usize,
    pub cols: usize,
    /// Cells, top row first: 0 = empty, 1-4 = color tag
    pub board: Vec<Vec<u8>>,
    pub active: PieceWire,
    pub ghost_y: i32,
    pub next: PieceWire,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold: Option<PieceWire>,
    pub allow_hold: bool,
    pub score: u32,
    pub level: u32,
    pub game_over: bool,
    pub max_height: u32,
    pub seed: u32,
    pub piece_id: u32,
    pub metrics: MetricsWire,
}

impl From<&GameSnapshot> for SnapshotWire {
    fn from(s: &GameSnapshot) -> Self {
        Self {
            rows: s.rows,
            cols: s.cols,
            board: (0..s.rows).map(|r| s.board_row(r).to_vec()).collect(),
            active: PieceWire::from(s.active),
            ghost_y: s.ghost_y,
            next: PieceWire::from(s.next),
            hold: s.hold.map(PieceWire::from),
            allow_hold: s.allow_hold,
            score: s.score,
            level: s.level,
            game_over: s.game_over,
            max_height: s.max_height,
            seed: s.seed,
            piece_id: s.piece_id,
            metrics: MetricsWire::from(s.metrics),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceWire {
    pub kind: PieceKindLower,
    pub orientation: u8,
    pub x: i32,
    pub y: i32,
    pub color: u8,
}

impl From<PieceSnapshot> for PieceWire {
    fn from(p: PieceSnapshot) -> Self {
        Self {
            kind: PieceKindLower::from(p.kind),
            orientation: p.orientation,
            x: p.x,
            y: p.y,
            color: p.color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKindLower {
    #[serde(rename = "i")]
    I,
    #[serde(rename = "z")]
    Z,
    #[serde(rename = "s")]
    S,
    #[serde(rename = "j")]
    J,
    #[serde(rename = "l")]
    L,
    #[serde(rename = "t")]
    T,
    #[serde(rename = "o")]
    O,
}

impl From<PieceKind> for PieceKindLower {
    fn from(value: PieceKind) -> Self {
        match value {
            PieceKind::I => Self::I,
            PieceKind::Z => Self::Z,
            PieceKind::S => Self::S,
            PieceKind::J => Self::J,
            PieceKind::L => Self::L,
            PieceKind::T => Self::T,
            PieceKind::O => Self::O,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricsWire {
    pub max_height: u32,
    pub aggregate_height: u32,
    pub holes: u32,
    pub bumpiness: u32,
}

impl From<BoardMetrics> for MetricsWire {
    fn from(m: BoardMetrics) -> Self {
        Self {
            max_height: m.max_height,
            aggregate_height: m.aggregate_height,
            holes: m.holes,
            bumpiness: m.bumpiness,
        }
    }
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Any server -> client message
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ServerMessage {
    Welcome(WelcomeMessage),
    Observation(ObservationMessage),
    State(StateMessage),
    Error(ErrorMessage),
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "reset")]
        Reset(ResetMessage),
        #[serde(rename = "step")]
        Step(StepMessage),
        #[serde(rename = "snapshot")]
        Snapshot(SnapshotMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Reset(m)) => Ok(ParsedMessage::Reset(m)),
        Ok(InboundMessage::Step(m)) => Ok(ParsedMessage::Step(m)),
        Ok(InboundMessage::Snapshot(m)) => Ok(ParsedMessage::Snapshot(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)?
                .msg_type
                .unwrap_or("unknown");
            if !matches!(msg_type, "hello" | "reset" | "step" | "snapshot") {
                #[derive(Debug, Deserialize)]
                struct SeqOnly {
                    seq: Option<u64>,
                }
                let seq = serde_json::from_str::<SeqOnly>(json)?.seq.unwrap_or(0);
                return Ok(ParsedMessage::Unknown(UnknownMessage {
                    seq,
                    msg_type: msg_type.to_string(),
                }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Reset(ResetMessage),
    Step(StepMessage),
    Snapshot(SnapshotMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Reset(m) => m.seq,
            ParsedMessage::Step(m) => m.seq,
            ParsedMessage::Snapshot(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Pull `"seq": <digits>` out of a line that failed to parse
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

/// Create a welcome message
pub fn create_welcome(seq: u64, session_id: u64, env: &TetrisEnv) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        session_id,
        env: EnvInfo::from_env(env),
    }
}

/// Observation reply right after a reset
pub fn create_reset_observation(seq: u64, obs: &Observation, env: &TetrisEnv) -> ObservationMessage {
    let game = env.game();
    let info = StepInfo {
        froze: false,
        lines_cleared: 0,
        score: game.score(),
        level: game.level(),
        frame: env.frame(),
        piece_id: game.piece_id(),
    };
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        obs: obs.to_vec(),
        reward: 0.0,
        terminated: game.is_game_over(),
        truncated: false,
        info: StepInfoWire::new(info, game.seed()),
    }
}

/// Observation reply to a step
pub fn create_step_observation(seq: u64, result: &StepResult, seed: u32) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        obs: result.observation.to_vec(),
        reward: result.reward,
        terminated: result.terminated,
        truncated: result.truncated,
        info: StepInfoWire::new(result.info, seed),
    }
}

/// Create a state message from an engine snapshot
pub fn create_state(seq: u64, snapshot: &GameSnapshot) -> StateMessage {
    StateMessage {
        msg_type: StateType::State,
        seq,
        ts: current_timestamp_ms(),
        snapshot: SnapshotWire::from(snapshot),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
