/*
[INPUT]:  StationConfig, operator commands over mpsc, shutdown token
[OUTPUT]: Serialized board mutations, countdown tickers, board snapshots over watch
[POS]:    Runtime layer - the single event loop owning the order board
[UPDATE]: When event routing, countdown driving or shutdown changes
*/

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tako_stall_engine::{BoardSnapshot, OrderBoard, RemovalHandle, TickOutcome};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::StationConfig;
use crate::event::{CommandHandler, StationCommand, StationEvent};

const EVENT_CHANNEL_CAPACITY: usize = 100;
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Cloneable sender side handed to renderers.
#[derive(Debug, Clone)]
pub struct StationHandle {
    event_tx: mpsc::Sender<StationEvent>,
    snapshots: watch::Receiver<BoardSnapshot>,
    shutdown: CancellationToken,
}

impl StationHandle {
    pub async fn send(&self, command: StationCommand) -> Result<()> {
        self.event_tx
            .send(StationEvent::Command(command))
            .await
            .map_err(|_| anyhow!("station is not running"))
    }

    /// Latest board read-out; updated after every processed event.
    pub fn snapshots(&self) -> watch::Receiver<BoardSnapshot> {
        self.snapshots.clone()
    }

    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Owns the order board and applies every event to it in arrival order.
pub struct Station {
    board: Arc<Mutex<OrderBoard>>,
    event_tx: mpsc::Sender<StationEvent>,
    event_rx: mpsc::Receiver<StationEvent>,
    snapshot_tx: watch::Sender<BoardSnapshot>,
    snapshot_rx: watch::Receiver<BoardSnapshot>,
    tickers: JoinSet<()>,
    shutdown: CancellationToken,
    countdown_period: Duration,
    ui_tick: Duration,
}

impl Station {
    pub fn new(config: &StationConfig) -> Result<Self> {
        config.validate()?;
        let board =
            OrderBoard::with_clock(config.engine.clone(), now).context("build order board")?;
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(board.snapshot(now()));

        Ok(Self {
            board: Arc::new(Mutex::new(board)),
            event_tx,
            event_rx,
            snapshot_tx,
            snapshot_rx,
            tickers: JoinSet::new(),
            shutdown: CancellationToken::new(),
            countdown_period: config.countdown_period(),
            ui_tick: config.ui_tick(),
        })
    }

    pub fn handle(&self) -> StationHandle {
        StationHandle {
            event_tx: self.event_tx.clone(),
            snapshots: self.snapshot_rx.clone(),
            shutdown: self.shutdown.clone(),
        }
    }

    /// Shared board for read-only inspection. Mutations go through [`StationHandle::send`].
    pub fn board(&self) -> Arc<Mutex<OrderBoard>> {
        self.board.clone()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Process events until shutdown is requested, then stop all tickers.
    pub async fn run(&mut self) -> Result<()> {
        let mut interval = tokio::time::interval(self.ui_tick);
        tracing::info!(
            ui_tick_ms = self.ui_tick.as_millis() as u64,
            countdown_ms = self.countdown_period.as_millis() as u64,
            "station started"
        );

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = interval.tick() => {
                    self.handle_event(StationEvent::Tick).await;
                }
                Some(event) = self.event_rx.recv() => {
                    if matches!(event, StationEvent::Shutdown) {
                        break;
                    }
                    self.handle_event(event).await;
                }
            }
        }

        tracing::info!("station stopping");
        self.shutdown_and_wait().await
    }

    async fn handle_event(&mut self, event: StationEvent) {
        let board = self.board.clone();
        let mut board = board.lock().await;
        match event {
            StationEvent::Tick => {
                board.expire_notices(now());
            }
            StationEvent::Command(command) => {
                tracing::debug!(command = ?command, "command received");
                match board.apply(command) {
                    Ok(Some(handle)) => self.spawn_countdown(handle),
                    Ok(None) => {}
                    Err(err) => tracing::debug!(error = %err, "command rejected"),
                }
            }
            StationEvent::CountdownTick {
                queue_number,
                generation,
            } => {
                match board.countdown_tick(queue_number, generation) {
                    TickOutcome::Counting { remaining, .. } => {
                        tracing::debug!(queue_number = %queue_number, remaining, "countdown tick");
                    }
                    TickOutcome::Ignored => {
                        tracing::debug!(
                            queue_number = %queue_number,
                            generation,
                            "stale countdown tick"
                        );
                    }
                    TickOutcome::Removed { .. } | TickOutcome::Aborted { .. } => {}
                }
                while self.tickers.try_join_next().is_some() {}
            }
            StationEvent::Shutdown => self.shutdown.cancel(),
        }
        self.snapshot_tx.send_replace(board.snapshot(now()));
    }

    /// Send one `CountdownTick` per period until the handle is cancelled.
    fn spawn_countdown(&mut self, handle: RemovalHandle) {
        let queue_number = handle.queue_number();
        let generation = handle.generation();
        let token = handle.token();
        let shutdown = self.shutdown.clone();
        let event_tx = self.event_tx.clone();
        let period = self.countdown_period;

        self.tickers.spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = shutdown.cancelled() => break,
                    _ = interval.tick() => {
                        let tick = StationEvent::CountdownTick { queue_number, generation };
                        if event_tx.send(tick).await.is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::debug!(queue_number = %queue_number, "countdown ticker stopped");
        });
    }

    /// Request shutdown and wait for every countdown ticker to exit.
    ///
    /// Tickers still running after the timeout are aborted.
    pub async fn shutdown_and_wait(&mut self) -> Result<()> {
        self.shutdown.cancel();
        let tickers = &mut self.tickers;
        let joined = tokio::time::timeout(SHUTDOWN_TIMEOUT, async {
            while let Some(res) = tickers.join_next().await {
                if let Err(join_err) = res {
                    tracing::warn!(error = %join_err, "countdown ticker failed");
                }
            }
        })
        .await;

        if joined.is_err() {
            self.tickers.abort_all();
            return Err(anyhow!("shutdown timed out after {SHUTDOWN_TIMEOUT:?}"));
        }
        Ok(())
    }
}

/// Current time on the tokio clock. Notices are stamped and expired with it.
fn now() -> std::time::Instant {
    Instant::now().into_std()
}
