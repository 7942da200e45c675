/// Optimistic reordering of the reading list
///
/// The reconciler owns the locally displayed ordering. Server snapshots
/// replace it while nothing is in flight; a finished drag rewrites it
/// immediately and holds it until a snapshot shows the server has caught up
/// with the new id sequence.
///
/// If the batched order patch never fully lands, no snapshot will ever match
/// and the lock stays held: the local order is then never overwritten again.

use serde::Serialize;
use tracing::debug;

use crate::domain::{Book, BookId, OrderUpdate};

/// Where the reconciler is in the drag/confirm cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum SyncState {
    /// Snapshots flow straight into the local list
    Idle,
    /// A drag gesture is in progress; snapshots are remembered but not applied
    Dragging {
        /// An earlier reorder is still waiting for the server
        confirmation_pending: bool,
    },
    /// A reorder was sent; waiting for a snapshot with the same id sequence
    AwaitingConfirmation,
}

/// What a snapshot did to the local list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOutcome {
    /// Local list replaced with the snapshot
    Applied,
    /// Snapshot already matched the local list
    Unchanged,
    /// Snapshot stored but the local list was left alone
    Held,
    /// Pending reorder confirmed; `applied` tells whether fields were resynced
    Confirmed { applied: bool },
}

/// Client-side owner of the visible book order
#[derive(Debug, Clone)]
pub struct ListReconciler {
    local: Vec<Book>,
    latest_snapshot: Vec<Book>,
    state: SyncState,
}

impl ListReconciler {
    pub fn new() -> Self {
        Self {
            local: Vec::new(),
            latest_snapshot: Vec::new(),
            state: SyncState::Idle,
        }
    }

    /// Start from a known server list
    pub fn with_snapshot(books: Vec<Book>) -> Self {
        Self {
            local: books.clone(),
            latest_snapshot: books,
            state: SyncState::Idle,
        }
    }

    /// The list as it should be displayed right now
    pub fn books(&self) -> &[Book] {
        &self.local
    }

    pub fn ids(&self) -> Vec<BookId> {
        self.local.iter().map(|b| b.id.clone()).collect()
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// True while a sent reorder has not been confirmed by the server
    pub fn is_reordering(&self) -> bool {
        self.confirmation_pending()
    }

    /// Feed the store's current ordered list
    pub fn on_server_snapshot(&mut self, snapshot: Vec<Book>) -> SnapshotOutcome {
        self.latest_snapshot = snapshot;

        match self.state {
            SyncState::Idle => {
                if self.sync_from_latest() {
                    SnapshotOutcome::Applied
                } else {
                    SnapshotOutcome::Unchanged
                }
            }
            SyncState::Dragging {
                confirmation_pending: true,
            } => {
                if same_ids(&self.local, &self.latest_snapshot) {
                    debug!("Reorder confirmed while dragging");
                    self.state = SyncState::Dragging {
                        confirmation_pending: false,
                    };
                }
                SnapshotOutcome::Held
            }
            SyncState::Dragging {
                confirmation_pending: false,
            } => SnapshotOutcome::Held,
            SyncState::AwaitingConfirmation => {
                if same_ids(&self.local, &self.latest_snapshot) {
                    debug!("Reorder confirmed, releasing lock");
                    self.state = SyncState::Idle;
                    let applied = self.sync_from_latest();
                    SnapshotOutcome::Confirmed { applied }
                } else {
                    SnapshotOutcome::Held
                }
            }
        }
    }

    /// A drag gesture started
    pub fn begin_drag(&mut self) {
        self.state = SyncState::Dragging {
            confirmation_pending: self.confirmation_pending(),
        };
        debug!(state = ?self.state, "Drag started");
    }

    /// A drag gesture ended over `target` (None if dropped outside the list)
    ///
    /// Returns the batched order patch to send, or `None` when nothing moved.
    pub fn end_drag(&mut self, source: usize, target: Option<usize>) -> Option<Vec<OrderUpdate>> {
        let len = self.local.len();
        let target = match target {
            Some(t) if t != source && source < len && t < len => t,
            _ => {
                self.finish_without_move();
                return None;
            }
        };

        let moved = self.local.remove(source);
        self.local.insert(target, moved);
        self.state = SyncState::AwaitingConfirmation;

        let updates: Vec<OrderUpdate> = self
            .local
            .iter()
            .enumerate()
            .map(|(i, book)| OrderUpdate {
                id: book.id.clone(),
                order: i as i64 + 1,
            })
            .collect();

        debug!(source, target, books = updates.len(), "Book moved, awaiting confirmation");
        Some(updates)
    }

    /// Like `end_drag`, but addressed by the dragged book and the book it was dropped on
    pub fn end_drag_onto(&mut self, active: &BookId, over: Option<&BookId>) -> Option<Vec<OrderUpdate>> {
        let source = self.position_of(active);
        let target = over.and_then(|id| self.position_of(id));
        match (source, target) {
            (Some(source), Some(target)) => self.end_drag(source, Some(target)),
            _ => {
                self.finish_without_move();
                None
            }
        }
    }

    pub fn position_of(&self, id: &BookId) -> Option<usize> {
        self.local.iter().position(|b| &b.id == id)
    }

    fn confirmation_pending(&self) -> bool {
        matches!(
            self.state,
            SyncState::AwaitingConfirmation
                | SyncState::Dragging {
                    confirmation_pending: true
                }
        )
    }

    fn finish_without_move(&mut self) {
        if self.confirmation_pending() {
            self.state = SyncState::AwaitingConfirmation;
        } else {
            self.state = SyncState::Idle;
            self.sync_from_latest();
        }
    }

    /// Idle sync rule: replace local when ids or tracked fields differ
    fn sync_from_latest(&mut self) -> bool {
        let differs = !same_ids(&self.local, &self.latest_snapshot)
            || tracked_fields_differ(&self.local, &self.latest_snapshot);
        if differs {
            self.local = self.latest_snapshot.clone();
        }
        differs
    }
}

impl Default for ListReconciler {
    fn default() -> Self {
        Self::new()
    }
}

fn same_ids(a: &[Book], b: &[Book]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.id == y.id)
}

/// Positional comparison of the fields a snapshot may change
fn tracked_fields_differ(a: &[Book], b: &[Book]) -> bool {
    a.iter().zip(b).any(|(x, y)| {
        x.title != y.title
            || x.status != y.status
            || x.order != y.order
            || x.started_at != y.started_at
            || x.completed_at != y.completed_at
    })
}
