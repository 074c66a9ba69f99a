//! TCP server for the environment adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking; every connection task owns its session.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use crate::env::EnvConfig;
use crate::protocol::*;
use crate::session::{Flow, Session};
use crate::types::{BASE_FALL_INTERVAL, DEFAULT_COLS, DEFAULT_ROWS, STEPS_UNTIL_TRUNCATED};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Concurrent sessions; further connections get `session_limit` and are closed
    pub max_sessions: usize,
    /// Environment every new session starts with
    pub env: EnvConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            max_sessions: 16,
            env: EnvConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
            env::var(key)
                .ok()
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        }

        let host = env::var("TETRIS_ENV_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = parsed("TETRIS_ENV_PORT", 7878);
        let max_sessions = parsed("TETRIS_ENV_MAX_SESSIONS", 16);

        let env = EnvConfig {
            rows: parsed("TETRIS_ENV_ROWS", DEFAULT_ROWS),
            cols: parsed("TETRIS_ENV_COLS", DEFAULT_COLS),
            base_fall_interval: parsed("TETRIS_ENV_FALL_INTERVAL", BASE_FALL_INTERVAL),
            steps_until_truncated: parsed("TETRIS_ENV_TRUNCATE_AFTER", STEPS_UNTIL_TRUNCATED),
            ..EnvConfig::default()
        };

        Self {
            host,
            port,
            max_sessions,
            env,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up (useful with port 0).
pub async fn run_server(
    config: ServerConfig,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    // Fail fast on a bad environment config instead of on the first connection.
    Session::new(0, config.env).context("invalid environment configuration")?;

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let bound = listener.local_addr()?;
    info!(
        addr = %bound,
        rows = config.env.rows,
        cols = config.env.cols,
        max_sessions = config.max_sessions,
        "adapter listening"
    );
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let sessions = Arc::new(Semaphore::new(config.max_sessions));
    let mut session_id_counter = 0u64;

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        session_id_counter += 1;
        let session_id = session_id_counter;

        let Ok(permit) = Arc::clone(&sessions).try_acquire_owned() else {
            warn!(session = session_id, %addr, "session limit reached, rejecting");
            tokio::spawn(reject_client(socket, config.max_sessions));
            continue;
        };

        info!(session = session_id, %addr, "client connected");
        let env_config = config.env;

        // Spawn task to handle this client
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, session_id, env_config, permit).await {
                warn!(session = session_id, error = %e, "client error");
            }
            info!(session = session_id, "client disconnected");
        });
    }
}

/// Tell an over-limit client why it is being dropped
async fn reject_client(mut socket: TcpStream, max_sessions: usize) {
    let error = create_error(
        0,
        ErrorCode::SessionLimit,
        &format!("Server is at its limit of {} sessions", max_sessions),
    );
    let Ok(mut line) = serde_json::to_vec(&ServerMessage::Error(error)) else {
        return;
    };
    line.push(b'\n');
    let _ = socket.write_all(&line).await;
    let _ = socket.shutdown().await;
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    session_id: u64,
    env_config: EnvConfig,
    _permit: OwnedSemaphorePermit,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    // Channel to send messages to this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    // Spawn task to write messages to client
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            buf.clear();
            if serde_json::to_writer(&mut buf, &msg).is_err() {
                continue;
            }
            buf.push(b'\n');
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
        }
    });

    let mut session = Session::new(session_id, env_config)?;

    // Handle incoming messages
    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;

        if bytes_read == 0 {
            // Client disconnected
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let (reply, flow) = session.handle_line(trimmed);
        if let ServerMessage::Error(ref e) = reply {
            debug!(session = session_id, code = ?e.code, message = %e.message, "request rejected");
        }
        if tx.send(reply).is_err() {
            break;
        }
        if flow == Flow::Close {
            break;
        }
    }

    // Let the writer drain queued replies before the socket closes
    drop(tx);
    let _ = write_task.await;

    Ok(())
}
