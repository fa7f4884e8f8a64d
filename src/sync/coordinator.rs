//! Sync coordination
//!
//! Owns the decision of which update source (stream vs. poll) is
//! authoritative and turns every signal from either into a full concurrent
//! re-fetch of agents, tasks, and events. Fetch failures degrade: they are
//! logged and the previous store contents stay in place.

use crate::client::ApiClient;
use crate::config::SyncConfig;
use crate::state::{ScopeToken, ViewStore};
use crate::sync::channel::{ChannelSignal, LiveChannel};
use crate::sync::poller::PollScheduler;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Which update source currently drives refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Event stream is connected; polling is suspended
    Live,
    /// Stream is down (or not yet up); the poll scheduler drives refreshes
    Polling,
}

/// Owner of the running sync coordinator
///
/// Spawning starts a coordinator task for the configured workspace scope;
/// switching workspaces tears the old task down (closing its stream and
/// timer) and starts a fresh one. Dropping the service shuts everything
/// down.
pub struct SyncService {
    client: ApiClient,
    store: ViewStore,
    config: SyncConfig,
    workspace: Option<String>,
    mode_tx: watch::Sender<SyncMode>,
    connected_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SyncService {
    /// Create a stopped service for the workspace named in `config`
    pub fn new(client: ApiClient, store: ViewStore, config: SyncConfig) -> Self {
        let (mode_tx, _) = watch::channel(SyncMode::Polling);
        let (connected_tx, _) = watch::channel(false);
        let workspace = config.api.workspace.clone();
        Self {
            client,
            store,
            config,
            workspace,
            mode_tx,
            connected_tx,
            task: None,
        }
    }

    /// Subscribe to the sync mode (the "fallback mode" indicator)
    pub fn mode(&self) -> watch::Receiver<SyncMode> {
        self.mode_tx.subscribe()
    }

    /// Subscribe to the backend connectivity probe result
    pub fn connectivity(&self) -> watch::Receiver<bool> {
        self.connected_tx.subscribe()
    }

    /// Workspace scope currently being synced
    pub fn workspace(&self) -> Option<&str> {
        self.workspace.as_deref()
    }

    /// Start syncing; no-op if already running
    pub fn spawn(&mut self) {
        if self.task.as_ref().is_some_and(|task| !task.is_finished()) {
            return;
        }
        info!(workspace = ?self.workspace, "Starting sync coordinator");
        // A fresh mount runs on polling until its own stream reports in;
        // a Live reading left over from a previous scope must not survive
        // the restart.
        self.mode_tx.send_replace(SyncMode::Polling);
        let coordinator = SyncCoordinator {
            client: self.client.clone(),
            store: self.store.clone(),
            token: self.store.begin_scope(),
            workspace: self.workspace.clone(),
            poll_interval: Duration::from_secs(self.config.polling.activity_interval_secs),
            status_interval: Duration::from_secs(self.config.polling.status_interval_secs),
            events_limit: self.config.fetch.events_limit,
            mode_tx: self.mode_tx.clone(),
            connected_tx: self.connected_tx.clone(),
        };
        self.task = Some(tokio::spawn(coordinator.run()));
    }

    /// Switch to a different workspace scope
    ///
    /// Treated as a fresh mount: the current coordinator is torn down and a
    /// new one starts for the new scope. In-flight fetch results for the
    /// old scope are invalidated and cannot write to the store.
    pub fn set_workspace(&mut self, workspace: Option<String>) {
        self.shutdown();
        self.workspace = workspace;
        self.spawn();
    }

    /// Stop the coordinator, its poll timer, and its stream connection
    ///
    /// Idempotent. Aborting the coordinator task drops the channel and the
    /// scheduler, which release their connection and timer.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!(workspace = ?self.workspace, "Sync coordinator stopped");
        }
        // Invalidate any fetch that was already past its await point when
        // the abort landed.
        let _ = self.store.begin_scope();
    }
}

impl Drop for SyncService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct SyncCoordinator {
    client: ApiClient,
    store: ViewStore,
    token: ScopeToken,
    workspace: Option<String>,
    poll_interval: Duration,
    status_interval: Duration,
    events_limit: usize,
    mode_tx: watch::Sender<SyncMode>,
    connected_tx: watch::Sender<bool>,
}

impl SyncCoordinator {
    async fn run(self) {
        let (tick_tx, mut tick_rx) = mpsc::channel(8);
        let mut poller = PollScheduler::new(self.poll_interval, tick_tx);
        let mut status_probe = tokio::time::interval(self.status_interval);

        // Polling covers the window before the stream handshake completes;
        // the channel's Opened signal suspends it again.
        poller.start();
        let mut channel = Some(LiveChannel::connect(
            self.client.clone(),
            self.workspace.clone(),
        ));

        // Initial refresh is unconditional and runs regardless of how the
        // stream handshake turns out.
        self.refresh("initial").await;

        loop {
            tokio::select! {
                signal = Self::next_signal(&mut channel) => match signal {
                    Some(ChannelSignal::Opened) => {
                        info!("Live channel healthy, suspending polling");
                        self.set_mode(SyncMode::Live);
                        poller.stop();
                        self.refresh("stream_open").await;
                    }
                    Some(ChannelSignal::Message) => {
                        self.refresh("stream_message").await;
                    }
                    Some(ChannelSignal::Closed) | None => {
                        warn!("Live channel down, falling back to polling");
                        // No reconnect: the stream stays down for the rest
                        // of this coordinator's lifetime.
                        channel = None;
                        self.set_mode(SyncMode::Polling);
                        poller.start();
                        self.refresh("stream_closed").await;
                    }
                },
                Some(()) = tick_rx.recv() => {
                    self.refresh("poll_tick").await;
                }
                _ = status_probe.tick() => {
                    let connected = self.client.check_connectivity().await;
                    self.connected_tx.send_replace(connected);
                }
            }
        }
    }

    // Resolves to the channel's next signal, or never when no channel is
    // open (the select loop then runs on poll ticks alone).
    async fn next_signal(channel: &mut Option<LiveChannel>) -> Option<ChannelSignal> {
        match channel.as_mut() {
            Some(channel) => channel.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Re-fetch all three collections concurrently and replace each one in
    /// the store on success; failures leave the previous value intact.
    async fn refresh(&self, trigger: &str) {
        let refresh_id = Uuid::new_v4();
        let span = info_span!(
            "refresh",
            refresh_id = %refresh_id,
            trigger = trigger,
            workspace = ?self.workspace,
        );
        async {
            let workspace = self.workspace.as_deref();
            let (agents, tasks, events) = tokio::join!(
                self.client.fetch_agents(workspace),
                self.client.fetch_tasks(workspace),
                self.client.fetch_events(workspace, self.events_limit),
            );

            match agents {
                Ok(agents) => {
                    self.store.replace_agents(&self.token, agents).await;
                }
                Err(e) => warn!(error = %e, "Agents fetch failed, keeping previous data"),
            }
            match tasks {
                Ok(tasks) => {
                    self.store.replace_tasks(&self.token, tasks).await;
                }
                Err(e) => warn!(error = %e, "Tasks fetch failed, keeping previous data"),
            }
            match events {
                Ok(events) => {
                    self.store.replace_events(&self.token, events).await;
                }
                Err(e) => warn!(error = %e, "Events fetch failed, keeping previous data"),
            }

            debug!("Refresh complete");
        }
        .instrument(span)
        .await
    }

    fn set_mode(&self, mode: SyncMode) {
        self.mode_tx.send_replace(mode);
    }
}
