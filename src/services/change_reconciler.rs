//! Change Reconciler.
//!
//! Maps bookmark store notifications onto board updates. `created`, `moved` and
//! `changed` trigger a full render. `removed` first patches the board in place
//! (fade, count, placeholder), drops the id from the saved order, and then runs
//! the full render too unless `refresh_on_remove` is off.
//!
//! The saved order is edited, never replaced by a board snapshot: the board may
//! not be rendered yet when a notification arrives.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::managers::bookmark_store::BookmarkStore;
use crate::managers::order_store::OrderStore;
use crate::services::board_renderer::{BoardRenderer, RemovalPatch};
use crate::types::bookmark::ChangeEvent;
use crate::types::order::OrderKey;
use crate::types::settings::ReconcileSettings;

/// One step of reconciling a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileStep {
    /// Remove the item from the board in place.
    Remove { id: String },
    /// Drop the id from the saved order.
    PersistOrder { id: String },
    /// Re-fetch the tree and rebuild the board.
    FullRender,
}

/// What applying a notification did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub removal: Option<RemovalPatch>,
    /// The bookmark order saved after a removal, if it changed.
    pub saved_order: Option<BTreeMap<OrderKey, Vec<String>>>,
    pub rendered: bool,
}

#[derive(Debug, Clone)]
pub struct ChangeReconciler {
    refresh_on_remove: bool,
    fade_millis: u64,
}

impl ChangeReconciler {
    pub fn new(settings: &ReconcileSettings) -> Self {
        Self {
            refresh_on_remove: settings.refresh_on_remove,
            fade_millis: settings.fade_millis,
        }
    }

    /// Steps to run for an event, in order.
    pub fn plan(&self, event: &ChangeEvent) -> Vec<ReconcileStep> {
        match event {
            ChangeEvent::Created(_) | ChangeEvent::Moved { .. } | ChangeEvent::Changed { .. } => {
                vec![ReconcileStep::FullRender]
            }
            ChangeEvent::Removed { id, .. } => {
                let mut steps = vec![
                    ReconcileStep::Remove { id: id.clone() },
                    ReconcileStep::PersistOrder { id: id.clone() },
                ];
                if self.refresh_on_remove {
                    steps.push(ReconcileStep::FullRender);
                }
                steps
            }
        }
    }

    /// Runs the planned steps against the live board.
    pub fn apply(
        &self,
        event: &ChangeEvent,
        store: &dyn BookmarkStore,
        orders: &OrderStore,
        renderer: &mut BoardRenderer,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        for step in self.plan(event) {
            match step {
                ReconcileStep::Remove { id } => {
                    report.removal = renderer.remove_item(&id, self.fade_millis);
                    if report.removal.is_none() {
                        debug!(%id, "removed item was not on the board");
                    }
                }
                ReconcileStep::PersistOrder { id } => {
                    let mut record = orders.load_record();
                    if record.forget(&id) {
                        orders.save_bookmark_order(&record.bookmark_order);
                        report.saved_order = Some(record.bookmark_order);
                    }
                }
                ReconcileStep::FullRender => {
                    if let Err(e) = renderer.render(store, orders) {
                        warn!(kind = ?event.kind(), error = %e, "refresh after change failed");
                    }
                    report.rendered = true;
                }
            }
        }
        report
    }
}
