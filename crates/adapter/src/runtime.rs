//! Adapter runtime integration.
//!
//! Bridges the synchronous game loop with the async TCP server. The server
//! runs on its own small tokio runtime; the game loop only ever touches the
//! two channel ends held by [`Adapter`].

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use arrayvec::ArrayVec;
use log::error;
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot, watch};

use crate::protocol::{AckMessage, ObservationMessage, MAX_ACTIONS_PER_COMMAND};
use crate::server::{run_server, ServerConfig};
use crate::types::PlayerAction;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundPayload {
    /// Player actions from the controller, applied in order.
    Actions(ArrayVec<PlayerAction, MAX_ACTIONS_PER_COMMAND>),
    /// A client wants a fresh observation right away (sent after hello).
    SnapshotRequest,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientObservation { client_id: usize, obs: ObservationMessage },
    /// Sent to every handshaken client that asked for observations.
    BroadcastObservation { obs: ObservationMessage },
}

/// Connection summary published by the server for the status panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterStatus {
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    addr: SocketAddr,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status_rx: watch::Receiver<AdapterStatus>,
}

impl Adapter {
    /// Bind the listener and start serving. Fails if the address cannot be bound.
    pub fn start(config: ServerConfig) -> Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (status_tx, status_rx) = watch::channel(AdapterStatus::default());
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("pairs-adapter")
            .enable_all()
            .build()
            .context("failed to create adapter runtime")?;

        rt.spawn(async move {
            if let Err(e) =
                run_server(config, cmd_tx, out_rx, Some(ready_tx), Some(status_tx)).await
            {
                error!(target: "adapter", "server stopped: {:#}", e);
            }
        });

        let addr = rt
            .block_on(async { tokio::time::timeout(Duration::from_secs(2), ready_rx).await })
            .map_err(|_| anyhow!("adapter did not start within 2s"))?
            .map_err(|_| anyhow!("adapter failed to bind"))?;

        Ok(Self {
            _rt: rt,
            addr,
            cmd_rx,
            out_tx,
            status_rx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn status(&self) -> AdapterStatus {
        *self.status_rx.borrow()
    }
}
