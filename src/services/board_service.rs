//! Board Service.
//!
//! Async boundary over [`BoardApp`]. The app sits behind a `tokio::sync::Mutex`
//! so gestures and store notifications are applied one at a time; full renders go
//! through a [`RenderGate`] so bursts of notifications coalesce into a single
//! trailing pass.
//!
//! `attach` spawns one listener task per notification kind. `detach` unsubscribes
//! and aborts them; calling it twice is harmless.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app::{BoardApp, OrderListener};
use crate::services::board_renderer::RemovalPatch;
use crate::services::change_reconciler::ReconcileStep;
use crate::services::drag_reconciler::{DropOutcome, DropRequest};
use crate::services::render_gate::RenderGate;
use crate::types::board::Board;
use crate::types::bookmark::{BookmarkNode, ChangeEvent, ChangeKind};
use crate::types::errors::{MoveError, RenderError};
use crate::types::notice::Notice;

/// What a render request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// This call ran the pass (and any trailing pass requested meanwhile).
    Rendered,
    /// A pass was already running; this request was folded into its trailing pass.
    Coalesced,
}

struct Listener {
    subscription_id: Uuid,
    task: JoinHandle<()>,
}

#[derive(Clone)]
pub struct BoardService {
    app: Arc<Mutex<BoardApp>>,
    gate: Arc<RenderGate>,
    listeners: Arc<std::sync::Mutex<Vec<Listener>>>,
}

impl BoardService {
    pub fn new(app: BoardApp) -> Self {
        Self {
            app: Arc::new(Mutex::new(app)),
            gate: Arc::new(RenderGate::new()),
            listeners: Arc::new(std::sync::Mutex::new(Vec::new())),
        }
    }

    /// Shared handle to the wrapped app.
    pub fn app(&self) -> Arc<Mutex<BoardApp>> {
        self.app.clone()
    }

    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs a full render, or folds the request into the pass already running.
    pub async fn render_board(&self) -> Result<RenderPass, RenderError> {
        if !self.gate.try_enter() {
            debug!("render coalesced");
            return Ok(RenderPass::Coalesced);
        }
        loop {
            let result = self.app.lock().await.render_board().map(|_| ());
            if !self.gate.finish_pass() {
                return result.map(|()| RenderPass::Rendered);
            }
        }
    }

    /// Snapshot of the live board.
    pub async fn board(&self) -> Board {
        self.app.lock().await.board().clone()
    }

    pub async fn on_drop(&self, request: DropRequest) -> Result<DropOutcome, MoveError> {
        self.app.lock().await.on_drop(&request)
    }

    pub async fn on_column_drag_end(&self) -> Vec<String> {
        self.app.lock().await.on_column_drag_end()
    }

    pub async fn remove_item(&self, id: &str) -> Option<RemovalPatch> {
        self.app.lock().await.remove_item(id)
    }

    pub async fn update_item(&self, node: BookmarkNode) -> bool {
        self.app.lock().await.update_item(&node)
    }

    pub async fn on_order_changed(&self, listener: OrderListener) {
        self.app.lock().await.on_order_changed(listener);
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        self.app.lock().await.take_notices()
    }

    /// Applies one notification. Events that only need a full render go through
    /// the gate; removals patch the board under the lock first.
    pub async fn dispatch(&self, event: ChangeEvent) {
        let render_only = {
            let app = self.app.lock().await;
            app.change_plan(&event) == [ReconcileStep::FullRender]
        };
        if render_only {
            if let Err(e) = self.render_board().await {
                warn!(kind = ?event.kind(), error = %e, "render after change failed");
            }
            return;
        }
        self.app.lock().await.handle_change(&event);
    }

    /// Subscribes to all four notification kinds of the app's store. Returns the
    /// number of listeners started; zero if already attached.
    pub async fn attach(&self) -> usize {
        if !self.listeners().is_empty() {
            return 0;
        }
        let store = self.app.lock().await.store.clone();
        let mut started = Vec::new();
        for kind in [
            ChangeKind::Created,
            ChangeKind::Moved,
            ChangeKind::Changed,
            ChangeKind::Removed,
        ] {
            let mut subscription = store.subscribe(kind);
            let service = self.clone();
            let task = tokio::spawn(async move {
                while let Some(event) = subscription.receiver.recv().await {
                    service.dispatch(event).await;
                }
            });
            started.push(Listener {
                subscription_id: subscription.id,
                task,
            });
        }
        let count = started.len();
        self.listeners().extend(started);
        debug!(count, "change listeners attached");
        count
    }

    /// Stops observing notifications. Returns the number of listeners stopped.
    pub async fn detach(&self) -> usize {
        let listeners: Vec<Listener> = std::mem::take(&mut *self.listeners());
        if listeners.is_empty() {
            return 0;
        }
        let store = self.app.lock().await.store.clone();
        for listener in &listeners {
            store.unsubscribe(listener.subscription_id);
            listener.task.abort();
        }
        debug!(count = listeners.len(), "change listeners detached");
        listeners.len()
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners().is_empty()
    }
}
