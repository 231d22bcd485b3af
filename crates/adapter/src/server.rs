//! TCP server for the remote adapter
//!
//! One task per connection reads lines and enforces the session rules
//! (handshake first, increasing `seq`, single controller). Accepted commands
//! are queued for the game loop on a bounded channel; replies produced by the
//! game loop come back through the outbound dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use log::{debug, info, trace, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, watch, RwLock};

use crate::core::{Fnv1aHasher, GameSnapshot, Outcome};
use crate::protocol::*;
use crate::runtime::{AdapterStatus, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::BOARD_COLUMNS;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7788,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
        }
    }
}

impl ServerConfig {
    /// Create from `PAIRS_AI_HOST`, `PAIRS_AI_PORT` and `PAIRS_AI_MAX_PENDING`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let host = lookup("PAIRS_AI_HOST").unwrap_or(defaults.host);
        let port = lookup("PAIRS_AI_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = lookup("PAIRS_AI_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            max_pending_commands,
            ..defaults
        }
    }

    /// Check if remote control is disabled via `PAIRS_AI_DISABLED`.
    pub fn disabled_by(lookup: impl Fn(&str) -> Option<String>) -> bool {
        lookup("PAIRS_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }

    fn major_version(&self) -> &str {
        self.protocol_version.split('.').next().unwrap_or("")
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// Shared server state
struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
}

impl ServerState {
    async fn client<T>(&self, client_id: usize, f: impl FnOnce(&ClientHandle) -> T) -> Option<T> {
        let clients = self.clients.read().await;
        clients.iter().find(|c| c.id == client_id).map(f)
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        self.client(client_id, |c| c.handshaken).await.unwrap_or(false)
    }

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Accept `seq` if it is strictly greater than the last one seen.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
        let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
            return true;
        };

        match client.last_seq {
            Some(prev) if seq <= prev => false,
            _ => {
                client.last_seq = Some(seq);
                true
            }
        }
    }

    async fn publish_status(&self) {
        let Some(tx) = self.status_tx.as_ref() else {
            return;
        };
        let controller_id = *self.controller.read().await;
        let clients = self.clients.read().await;
        let status = AdapterStatus {
            client_count: clients.iter().filter(|c| c.handshaken).count() as u16,
            controller_id,
            streaming_count: clients
                .iter()
                .filter(|c| c.handshaken && c.stream_observations)
                .count() as u16,
        };
        let _ = tx.send(status);
    }

    async fn send_to(&self, client_id: usize, msg: ClientOutbound) {
        if let Some(tx) = self.client(client_id, |c| c.tx.clone()).await {
            let _ = tx.send(msg);
        }
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address (useful with port 0); `status_tx`
/// receives a new [`AdapterStatus`] whenever clients or the controller change.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    status_tx: Option<watch::Sender<AdapterStatus>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind adapter on {}", addr))?;
    let bound = listener.local_addr()?;
    info!(target: "adapter", "listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState {
        config,
        clients: RwLock::new(Vec::new()),
        controller: RwLock::new(None),
        status_tx,
    });
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        state.send_to(client_id, ClientOutbound::Ack(ack)).await;
                    }
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        state.send_to(client_id, ClientOutbound::Observation(obs)).await;
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        let clients = state.clients.read().await;
                        for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
                            let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
                        }
                    }
                }
            }
        });
    }

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        info!(target: "adapter", "client {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        tokio::spawn(async move {
            if let Err(e) =
                handle_client(socket, addr, client_id, Arc::clone(&state), command_tx).await
            {
                warn!(target: "adapter", "client {} error: {:#}", client_id, e);
            }
            disconnect(&state, client_id).await;
            info!(target: "adapter", "client {} disconnected", client_id);
        });
    }
}

/// Remove a client, promoting the lowest remaining handshaken id if it held
/// the controller slot.
async fn disconnect(state: &ServerState, client_id: usize) {
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;
        clients.retain(|c| c.id != client_id);

        if *controller == Some(client_id) {
            *controller = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            match *controller {
                Some(new_id) => {
                    info!(target: "adapter", "client {} promoted to controller", new_id)
                }
                None => info!(target: "adapter", "controller {} released", client_id),
            }
        }
    }
    state.publish_status().await;
}

/// Handle a single client connection until EOF or a protocol mismatch.
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let (tx, rx) = mpsc::unbounded_channel::<ClientOutbound>();

    state.clients.write().await.push(ClientHandle {
        id: client_id,
        addr,
        stream_observations: false,
        handshaken: false,
        last_seq: None,
        tx: tx.clone(),
    });

    // Ends once `disconnect` drops the last sender, after flushing queued replies.
    tokio::spawn(write_loop(client_id, writer, rx));

    let reply_error = |seq: u64, code: ErrorCode, message: &str| {
        debug!(target: "adapter", "client {} seq {}: {:?} {}", client_id, seq, code, message);
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        trace!(target: "adapter::wire", "<- {} {}", client_id, trimmed);

        let parsed = match parse_message(trimmed) {
            Ok(parsed) => parsed,
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reply_error(seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {}", e));
                continue;
            }
        };

        match parsed {
            ParsedMessage::Hello(hello) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    reply_error(
                        hello.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }

                let major = state.config.major_version();
                if hello.protocol_version.split('.').next() != Some(major) {
                    reply_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                let stream = hello.requested.stream_observations;
                let wants_control = hello.requested.role != Some(RequestedRole::Observer);
                let (role, controller_id) = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = stream;
                    }

                    if controller.is_none() && wants_control {
                        *controller = Some(client_id);
                        info!(
                            target: "adapter",
                            "client {} ({}) is now controller",
                            client_id,
                            hello.client.name
                        );
                    }
                    let role = if *controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    (role, *controller)
                };
                state.publish_status().await;

                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id as u64,
                    role,
                    controller_id.map(|id| id as u64),
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if stream {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            ParsedMessage::Command(cmd) => {
                if !state.is_handshaken(client_id).await {
                    reply_error(cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    reply_error(
                        cmd.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }
                if !state.is_controller(client_id).await {
                    reply_error(
                        cmd.seq,
                        ErrorCode::NotController,
                        "Only controller may send commands",
                    );
                    continue;
                }
                if cmd.actions.0.is_empty() {
                    reply_error(cmd.seq, ErrorCode::InvalidCommand, "Missing actions");
                    continue;
                }

                let inbound = InboundCommand {
                    client_id,
                    seq: cmd.seq,
                    payload: InboundPayload::Actions(cmd.actions.0),
                };
                // The game loop acks once the command has been applied.
                if command_tx.try_send(inbound).is_err() {
                    reply_error(cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            ParsedMessage::Control(ctrl) => {
                if !state.is_handshaken(client_id).await {
                    reply_error(
                        ctrl.seq,
                        ErrorCode::HandshakeRequired,
                        "Send hello before control",
                    );
                    continue;
                }
                if !state.check_and_update_seq(client_id, ctrl.seq).await {
                    reply_error(
                        ctrl.seq,
                        ErrorCode::InvalidCommand,
                        "seq must be strictly increasing",
                    );
                    continue;
                }

                let result = {
                    let mut controller = state.controller.write().await;
                    match ctrl.action {
                        ControlAction::Claim
                            if controller.is_none() || *controller == Some(client_id) =>
                        {
                            *controller = Some(client_id);
                            Ok(())
                        }
                        ControlAction::Claim => {
                            Err((ErrorCode::ControllerActive, "Controller already assigned"))
                        }
                        ControlAction::Release if *controller == Some(client_id) => {
                            *controller = None;
                            Ok(())
                        }
                        ControlAction::Release => {
                            Err((ErrorCode::NotController, "Only controller may release"))
                        }
                    }
                };

                match result {
                    Ok(()) => {
                        info!(target: "adapter", "client {} control {:?}", client_id, ctrl.action);
                        state.publish_status().await;
                        let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq)));
                    }
                    Err((code, message)) => reply_error(ctrl.seq, code, message),
                }
            }

            ParsedMessage::Unknown(UnknownMessage { seq }) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, seq).await
                {
                    reply_error(seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                reply_error(seq, ErrorCode::InvalidCommand, "Unknown message type");
            }
        }
    }

    Ok(())
}

async fn write_loop(
    client_id: usize,
    mut writer: tokio::net::tcp::OwnedWriteHalf,
    mut rx: mpsc::UnboundedReceiver<ClientOutbound>,
) {
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    while let Some(msg) = rx.recv().await {
        buf.clear();
        let encoded = match &msg {
            ClientOutbound::Welcome(m) => serde_json::to_writer(&mut buf, m),
            ClientOutbound::Ack(m) => serde_json::to_writer(&mut buf, m),
            ClientOutbound::Error(m) => serde_json::to_writer(&mut buf, m),
            ClientOutbound::Observation(m) => serde_json::to_writer(&mut buf, m),
        };
        if let Err(e) = encoded {
            warn!(target: "adapter", "client {} encode failed: {}", client_id, e);
            continue;
        }
        trace!(target: "adapter::wire", "-> {} {}", client_id, String::from_utf8_lossy(&buf));
        buf.push(b'\n');

        if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
            break;
        }
    }
}

/// Build an observation from a game snapshot.
///
/// Symbols of face-down tiles are withheld, and `state_hash` covers only what
/// the observation shows.
pub fn build_observation(
    snap: &GameSnapshot,
    seq: u64,
    last: Option<Outcome>,
) -> ObservationMessage {
    use std::hash::{Hash, Hasher};

    let tiles: Vec<TileObservation> = snap
        .tiles
        .iter()
        .map(|t| {
            let visible = t.face_up || t.matched;
            TileObservation {
                id: t.id,
                face_up: t.face_up,
                matched: t.matched,
                symbol: visible.then_some(t.symbol.ordinal()),
                class: visible.then(|| ColorName::from(t.symbol.color())),
            }
        })
        .collect();

    let mut hasher = Fnv1aHasher::new();
    tiles.hash(&mut hasher);
    snap.selection.hash(&mut hasher);
    snap.move_count.hash(&mut hasher);
    snap.phase.hash(&mut hasher);
    snap.won.hash(&mut hasher);
    snap.generation.hash(&mut hasher);

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        playable: snap.playable(),
        phase: snap.phase.into(),
        won: snap.won,
        generation: snap.generation,
        move_count: snap.move_count,
        pairs_found: snap.pairs_found,
        total_pairs: snap.total_pairs,
        columns: BOARD_COLUMNS,
        tiles,
        selection: snap.selection.to_vec(),
        last_event: last.and_then(LastEvent::from_outcome),
        state_hash: StateHash(hasher.finish()),
    }
}
