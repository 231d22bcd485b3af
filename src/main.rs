//! Terminal pairs runner (default binary).
//!
//! Fixed-timestep loop: drain remote commands, draw when something changed,
//! poll input until the next tick, then advance the resolution timer.

use std::fs::OpenOptions;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEventKind};
use log::{info, warn};

use tui_pairs::adapter::{
    build_observation, create_ack, Adapter, InboundPayload, OutboundMessage,
};
use tui_pairs::core::{GameSnapshot, Outcome};
use tui_pairs::engine::Session;
use tui_pairs::input::{handle_key_event, should_quit, BoardCursor};
use tui_pairs::term::{
    AdapterStatusView, FrameBuffer, GameView, RenderThrottle, TerminalRenderer, Viewport,
};
use tui_pairs::types::{PlayerAction, STATIC_FRAME_INTERVAL_MS, TICK_MS};
use tui_pairs::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config)?;
    info!("starting with seed {}", config.seed);

    let adapter = match config.adapter.clone() {
        Some(server_config) => match Adapter::start(server_config) {
            Ok(adapter) => {
                info!(target: "adapter", "remote control on {}", adapter.local_addr());
                Some(adapter)
            }
            Err(e) => {
                warn!(target: "adapter", "remote control unavailable: {:#}", e);
                None
            }
        },
        None => None,
    };

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, Session::new(config.seed), adapter);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

/// Logs go to `PAIRS_LOG_PATH` when set; stderr is hidden behind the
/// alternate screen while the game runs.
fn init_logging(config: &AppConfig) -> Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(path) = config.log_path.as_ref() {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// Remote observers: what was last sent, so unchanged frames are not re-broadcast.
struct Remote {
    adapter: Adapter,
    seq: u64,
    last_hash: Option<u64>,
    last_outcome: Option<Outcome>,
}

impl Remote {
    fn record(&mut self, outcome: Outcome) {
        if outcome.changed() {
            self.last_outcome = Some(outcome);
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Apply queued commands in arrival order, acking each once applied.
    fn drain_commands(&mut self, session: &mut Session, snap: &mut GameSnapshot) {
        while let Some(cmd) = self.adapter.try_recv() {
            match cmd.payload {
                InboundPayload::Actions(actions) => {
                    for action in actions {
                        let outcome = session.apply_action(action);
                        self.record(outcome);
                    }
                    self.adapter.send(OutboundMessage::ToClientAck {
                        client_id: cmd.client_id,
                        ack: create_ack(cmd.seq),
                    });
                }
                InboundPayload::SnapshotRequest => {
                    session.snapshot_into(snap);
                    let seq = self.next_seq();
                    self.adapter.send(OutboundMessage::ToClientObservation {
                        client_id: cmd.client_id,
                        obs: build_observation(snap, seq, self.last_outcome),
                    });
                }
            }
        }
    }

    fn broadcast_if_changed(&mut self, snap: &GameSnapshot, fingerprint: u64) {
        if self.last_hash == Some(fingerprint) {
            return;
        }
        self.last_hash = Some(fingerprint);
        let seq = self.next_seq();
        self.adapter.send(OutboundMessage::BroadcastObservation {
            obs: build_observation(snap, seq, self.last_outcome),
        });
    }

    fn status_view(&self) -> AdapterStatusView {
        let st = self.adapter.status();
        AdapterStatusView {
            enabled: true,
            client_count: st.client_count,
            controller_id: st.controller_id,
            streaming_count: st.streaming_count,
            listen_port: Some(self.adapter.local_addr().port()),
        }
    }
}

fn run(term: &mut TerminalRenderer, mut session: Session, adapter: Option<Adapter>) -> Result<()> {
    let view = GameView::default();
    let mut cursor = BoardCursor::new(session.state().tiles().len() as u8);
    let mut remote = adapter.map(|adapter| Remote {
        adapter,
        seq: 0,
        last_hash: None,
        last_outcome: None,
    });

    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut throttle = RenderThrottle::new(STATIC_FRAME_INTERVAL_MS);
    let mut force_redraw = true;

    let started = Instant::now();
    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    loop {
        if let Some(remote) = remote.as_mut() {
            remote.drain_commands(&mut session, &mut snap);
        }

        session.snapshot_into(&mut snap);
        cursor.reset(snap.tiles.len() as u8);
        let fingerprint = snap.fingerprint();

        if let Some(remote) = remote.as_mut() {
            remote.broadcast_if_changed(&snap, fingerprint);
        }

        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);
        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_render(now_ms, fingerprint, force_redraw) {
            let status = remote.as_ref().map(Remote::status_view);
            view.render_into_with_adapter(
                &snap,
                Some(cursor.index()),
                status.as_ref(),
                viewport,
                &mut fb,
            );
            term.draw_swap(&mut fb)?;
            force_redraw = false;
        }

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    force_redraw = true;
                    handle_key_event(key).and_then(|ui| cursor.handle(ui))
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let layout = view.layout(snap.tiles.len(), viewport);
                    layout.hit_test(mouse.column, mouse.row).map(|id| {
                        cursor.set(id);
                        force_redraw = true;
                        PlayerAction::Select(id)
                    })
                }
                Event::Resize(..) => {
                    term.invalidate();
                    force_redraw = true;
                    None
                }
                _ => None,
            };

            if let Some(action) = action {
                let outcome = session.apply_action(action);
                if let Some(remote) = remote.as_mut() {
                    remote.record(outcome);
                }
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            if let Some(outcome) = session.tick(TICK_MS) {
                if let Some(remote) = remote.as_mut() {
                    remote.record(outcome);
                }
            }
        }
    }
}
