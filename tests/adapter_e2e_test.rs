use std::net::SocketAddr;
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use tui_pairs::adapter::{
    build_observation, create_ack, create_hello, run_server, AdapterStatus, InboundCommand,
    InboundPayload, OutboundMessage, ServerConfig,
};
use tui_pairs::core::GameState;
use tui_pairs::engine::Session;
use tui_pairs::types::{PlayerAction, Symbol};

struct TestServer {
    addr: SocketAddr,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    status_rx: watch::Receiver<AdapterStatus>,
    handle: JoinHandle<()>,
}

async fn start_server(max_pending_commands: usize) -> TestServer {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        protocol_version: "1.0.0".to_string(),
        max_pending_commands,
    };

    let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending_commands);
    let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
    let (ready_tx, ready_rx) = oneshot::channel();
    let (status_tx, status_rx) = watch::channel(AdapterStatus::default());

    let handle = tokio::spawn(async move {
        let _ = run_server(config, cmd_tx, out_rx, Some(ready_tx), Some(status_tx)).await;
    });

    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx)
        .await
        .expect("server did not signal ready")
        .expect("ready channel dropped");

    TestServer {
        addr,
        cmd_rx,
        out_tx,
        status_rx,
        handle,
    }
}

struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("connect failed");
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }

    async fn send(&mut self, line: &str) {
        self.writer.write_all(line.as_bytes()).await.unwrap();
        self.writer.write_all(b"\n").await.unwrap();
        self.writer.flush().await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(2), self.lines.next_line())
            .await
            .expect("timed out waiting for a line")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&line).unwrap()
    }

    /// Hello without observation streaming, so no snapshot request is queued.
    async fn hello_quiet(&mut self, seq: u64) -> Value {
        self.send(&format!(
            r#"{{"type":"hello","seq":{seq},"ts":0,"client":{{"name":"test","version":"0"}},"protocol_version":"1.0.0","requested":{{"stream_observations":false}}}}"#
        ))
        .await;
        self.recv().await
    }
}

fn select_command(seq: u64, tiles: &[u8]) -> String {
    let actions: Vec<String> = tiles
        .iter()
        .map(|t| format!(r#"{{"action":"select","tile":{t}}}"#))
        .collect();
    format!(
        r#"{{"type":"command","seq":{seq},"ts":0,"actions":[{}]}}"#,
        actions.join(",")
    )
}

async fn wait_for_status(
    rx: &mut watch::Receiver<AdapterStatus>,
    pred: impl Fn(&AdapterStatus) -> bool,
) -> AdapterStatus {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            {
                let st = rx.borrow_and_update();
                if pred(&*st) {
                    return *st;
                }
            }
            rx.changed().await.expect("status channel closed");
        }
    })
    .await
    .expect("status never matched")
}

#[tokio::test]
async fn adapter_hello_command_ack_and_observation() {
    let mut server = start_server(8).await;
    let mut client = TestClient::connect(server.addr).await;

    let hello = create_hello(1, "e2e-test", "1.0.0");
    client.send(&serde_json::to_string(&hello).unwrap()).await;

    let welcome = client.recv().await;
    assert_eq!(welcome["type"], "welcome");
    assert_eq!(welcome["seq"], 1);
    assert_eq!(welcome["role"], "controller");
    assert_eq!(welcome["client_id"], 1);
    assert_eq!(welcome["capabilities"]["resolve_delay_ms"], 600);

    // Streaming clients get a snapshot request right after the welcome.
    let request = tokio::time::timeout(Duration::from_secs(2), server.cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected snapshot request");
    assert_eq!(request.payload, InboundPayload::SnapshotRequest);

    let snap = GameState::new(1).snapshot();
    server
        .out_tx
        .send(OutboundMessage::ToClientObservation {
            client_id: request.client_id,
            obs: build_observation(&snap, 1, None),
        })
        .unwrap();
    let obs = client.recv().await;
    assert_eq!(obs["type"], "observation");
    assert_eq!(obs["phase"], "idle");
    assert_eq!(obs["tiles"].as_array().unwrap().len(), 16);
    assert!(obs["tiles"][0].get("symbol").is_none());

    client.send(&select_command(2, &[5])).await;
    let inbound = tokio::time::timeout(Duration::from_secs(2), server.cmd_rx.recv())
        .await
        .unwrap()
        .expect("expected inbound command");
    assert_eq!(inbound.seq, 2);
    match inbound.payload {
        InboundPayload::Actions(actions) => {
            assert_eq!(actions.as_slice(), &[PlayerAction::Select(5)]);
        }
        other => panic!("unexpected payload: {:?}", other),
    }

    server
        .out_tx
        .send(OutboundMessage::ToClientAck {
            client_id: inbound.client_id,
            ack: create_ack(2),
        })
        .unwrap();
    let ack = client.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 2);
    assert_eq!(ack["status"], "ok");

    server.handle.abort();
}

#[tokio::test]
async fn adapter_backpressure_returns_error() {
    let server = start_server(1).await;
    let mut client = TestClient::connect(server.addr).await;
    assert_eq!(client.hello_quiet(1).await["type"], "welcome");

    // Nobody drains the queue: the first command fills it.
    client.send(&select_command(2, &[0])).await;
    client.send(&select_command(3, &[1])).await;

    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["seq"], 3);
    assert_eq!(err["code"], "backpressure");

    server.handle.abort();
}

#[tokio::test]
async fn adapter_second_client_observes_and_cannot_command() {
    let server = start_server(8).await;
    let mut first = TestClient::connect(server.addr).await;
    let mut second = TestClient::connect(server.addr).await;

    assert_eq!(first.hello_quiet(1).await["role"], "controller");
    let welcome = second.hello_quiet(1).await;
    assert_eq!(welcome["role"], "observer");
    assert_eq!(welcome["controller_id"], 1);

    second.send(&select_command(2, &[0])).await;
    let err = second.recv().await;
    assert_eq!(err["code"], "not_controller");

    // Claiming an occupied slot fails; once released it succeeds.
    second
        .send(r#"{"type":"control","seq":3,"ts":0,"action":"claim"}"#)
        .await;
    assert_eq!(second.recv().await["code"], "controller_active");

    first
        .send(r#"{"type":"control","seq":2,"ts":0,"action":"release"}"#)
        .await;
    assert_eq!(first.recv().await["type"], "ack");

    second
        .send(r#"{"type":"control","seq":4,"ts":0,"action":"CLAIM"}"#)
        .await;
    let ack = second.recv().await;
    assert_eq!(ack["type"], "ack");
    assert_eq!(ack["seq"], 4);

    server.handle.abort();
}

#[tokio::test]
async fn adapter_requires_hello_first() {
    let server = start_server(8).await;
    let mut client = TestClient::connect(server.addr).await;

    client.send(&select_command(1, &[0])).await;
    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["seq"], 1);
    assert_eq!(err["code"], "handshake_required");

    server.handle.abort();
}

#[tokio::test]
async fn adapter_rejects_non_increasing_seq() {
    let server = start_server(8).await;
    let mut client = TestClient::connect(server.addr).await;
    client.hello_quiet(5).await;

    client.send(&select_command(5, &[0])).await;
    let err = client.recv().await;
    assert_eq!(err["code"], "invalid_command");
    assert_eq!(err["seq"], 5);

    client.send("{not json").await;
    assert_eq!(client.recv().await["code"], "invalid_command");

    client
        .send(r#"{"type":"command","seq":6,"ts":0,"actions":[]}"#)
        .await;
    assert_eq!(client.recv().await["code"], "invalid_command");

    server.handle.abort();
}

#[tokio::test]
async fn adapter_protocol_mismatch_closes_connection() {
    let server = start_server(8).await;
    let mut client = TestClient::connect(server.addr).await;

    let hello = create_hello(1, "future-bot", "2.0.0");
    client.send(&serde_json::to_string(&hello).unwrap()).await;

    let err = client.recv().await;
    assert_eq!(err["type"], "error");
    assert_eq!(err["code"], "protocol_mismatch");

    let closed = tokio::time::timeout(Duration::from_secs(2), client.lines.next_line())
        .await
        .expect("connection stayed open")
        .unwrap();
    assert!(closed.is_none());

    server.handle.abort();
}

#[tokio::test]
async fn adapter_controller_disconnect_promotes_next_client() {
    let mut server = start_server(8).await;
    let mut first = TestClient::connect(server.addr).await;
    let mut second = TestClient::connect(server.addr).await;

    first.hello_quiet(1).await;
    second.hello_quiet(1).await;
    wait_for_status(&mut server.status_rx, |st| st.client_count == 2).await;

    drop(first);
    let st = wait_for_status(&mut server.status_rx, |st| st.client_count == 1).await;
    assert_eq!(st.controller_id, Some(2));

    second.send(&select_command(2, &[3])).await;
    let inbound = tokio::time::timeout(Duration::from_secs(2), server.cmd_rx.recv())
        .await
        .unwrap()
        .expect("promoted client should be accepted");
    assert_eq!(inbound.client_id, 2);

    server.handle.abort();
}

#[tokio::test]
async fn adapter_closed_loop_plays_to_a_win() {
    let server = start_server(8).await;
    let TestServer {
        addr,
        mut cmd_rx,
        out_tx,
        handle,
        ..
    } = server;

    let a = Symbol::new(0);
    let b = Symbol::new(1);
    let state = GameState::with_layout(&[a, b, a, b]).unwrap();

    // Minimal game loop: apply, resolve without waiting, ack, then broadcast.
    let engine = tokio::spawn(async move {
        let mut session = Session::with_state(state);
        let mut seq = 0u64;
        while let Some(cmd) = cmd_rx.recv().await {
            seq += 1;
            match cmd.payload {
                InboundPayload::SnapshotRequest => {
                    let obs = build_observation(&session.snapshot(), seq, None);
                    let _ = out_tx.send(OutboundMessage::ToClientObservation {
                        client_id: cmd.client_id,
                        obs,
                    });
                }
                InboundPayload::Actions(actions) => {
                    let mut last = None;
                    for action in actions {
                        last = Some(session.apply_action(action));
                    }
                    if let Some(outcome) = session.fire_pending() {
                        last = Some(outcome);
                    }
                    let _ = out_tx.send(OutboundMessage::ToClientAck {
                        client_id: cmd.client_id,
                        ack: create_ack(cmd.seq),
                    });
                    let obs = build_observation(&session.snapshot(), seq, last);
                    let _ = out_tx.send(OutboundMessage::BroadcastObservation { obs });
                }
            }
        }
    });

    let mut client = TestClient::connect(addr).await;
    let hello = create_hello(1, "closed-loop", "1.0.0");
    client.send(&serde_json::to_string(&hello).unwrap()).await;
    assert_eq!(client.recv().await["type"], "welcome");

    let first = client.recv().await;
    assert_eq!(first["type"], "observation");
    assert_eq!(first["total_pairs"], 2);
    assert_eq!(first["won"], false);

    client.send(&select_command(2, &[0, 2])).await;
    assert_eq!(client.recv().await["type"], "ack");
    let obs = client.recv().await;
    assert_eq!(obs["pairs_found"], 1);
    assert_eq!(obs["last_event"]["kind"], "matched");
    assert_eq!(obs["tiles"][0]["symbol"], 0);
    assert!(obs["tiles"][1].get("symbol").is_none());

    client.send(&select_command(3, &[1, 3])).await;
    assert_eq!(client.recv().await["type"], "ack");
    let obs = client.recv().await;
    assert_eq!(obs["won"], true);
    assert_eq!(obs["phase"], "won");
    assert_eq!(obs["move_count"], 2);
    assert_eq!(obs["playable"], false);

    handle.abort();
    engine.abort();
}
