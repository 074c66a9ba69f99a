//! Adapter - drive environments over a TCP socket with a JSON protocol
//!
//! Every connection gets its own [`Session`], and every session owns one
//! [`TetrisEnv`](env::TetrisEnv). Sessions never share state, so many
//! training workers can run against one server.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Episode**: Client sends `reset`, then `step`s until terminated or truncated
//! 4. **Inspection**: `snapshot` returns the full engine state at any time
//!
//! Every non-empty request line gets exactly one reply line. `seq` must be
//! strictly increasing per connection after the handshake.
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and protocol version
//! - **reset**: Start an episode, optionally with a seed
//! - **step**: Apply one action, by name (`"hardDrop"`) or index (`4`)
//! - **snapshot**: Request the engine state
//!
//! ## Server → Client
//!
//! - **welcome**: Session id plus board size, action list and observation length
//! - **observation**: Flat observation vector, reward and episode flags
//! - **state**: Full engine snapshot
//! - **error**: Error response with code and message
//!
//! # Environment Variables
//!
//! - `TETRIS_ENV_HOST`: Bind address (default: "127.0.0.1")
//! - `TETRIS_ENV_PORT`: Port number (default: 7878)
//! - `TETRIS_ENV_MAX_SESSIONS`: Concurrent sessions (default: 16)
//! - `TETRIS_ENV_ROWS` / `TETRIS_ENV_COLS`: Board size (default: 20 x 10)
//! - `TETRIS_ENV_FALL_INTERVAL`: Steps between gravity drops at level 1 (default: 24)
//! - `TETRIS_ENV_TRUNCATE_AFTER`: Freezes without a line clear before truncation (default: 35)
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"trainer","version":"0.1.0"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","session_id":1,"env":{...}}
//! Client -> Server: {"type":"reset","seq":2,"seed":42}
//! Server -> Client: {"type":"observation","seq":2,"obs":[...],"reward":0.0,"terminated":false,"truncated":false,"info":{...}}
//! Client -> Server: {"type":"step","seq":3,"action":"hardDrop"}
//! Server -> Client: {"type":"observation","seq":3,"obs":[...],"reward":-0.9,...}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"client":{"name":"test","version":"1.0.0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod server;
pub mod session;

pub use rl_tetris_core as core;
pub use rl_tetris_env as env;
pub use rl_tetris_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::{run_server, ServerConfig};
pub use session::{Flow, Session};
