/// Tool for moving a book within the list
///
/// This module implements the book_move MCP tool. A move is a drag gesture
/// played through the reconciler: the local order changes at once, one
/// batched order patch goes to the store, and the store's list is then fed
/// back to confirm it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{ListReconciler, SnapshotOutcome, SyncState};
use crate::storage::BookStorage;
use crate::tools::{parse_book_id, sync_snapshot, ToolError};

/// Parameters for moving a book
#[derive(Debug, Deserialize, JsonSchema)]
pub struct MoveBookParams {
    /// ID of the book being moved
    pub book_id: String,
    /// ID of the book it is dropped onto; it takes that book's position.
    /// Omit to cancel the move.
    pub target_book_id: Option<String>,
}

/// Response from moving a book
#[derive(Debug, Serialize)]
pub struct MoveBookResponse {
    pub success: bool,
    pub moved: bool,
    /// Whether the store has confirmed the new order
    pub confirmed: bool,
    pub state: SyncState,
    /// Titles in the order now shown
    pub order: Vec<String>,
    pub message: String,
}

/// Move a book onto another book's position
///
/// If the store rejects the batch, the optimistic order stays in place and
/// the reconciler keeps waiting for confirmation.
pub fn move_book<S: BookStorage>(
    storage: &S,
    reconciler: &mut ListReconciler,
    params: MoveBookParams,
) -> Result<MoveBookResponse, ToolError> {
    let active = parse_book_id(&params.book_id)?;
    let over = params
        .target_book_id
        .as_deref()
        .map(parse_book_id)
        .transpose()?;

    reconciler.begin_drag();
    let updates = reconciler.end_drag_onto(&active, over.as_ref());

    let (moved, confirmed) = match updates {
        Some(updates) => {
            storage.batch_set_order(&updates)?;
            let outcome = sync_snapshot(storage, reconciler)?;
            (true, matches!(outcome, SnapshotOutcome::Confirmed { .. }))
        }
        None => (false, false),
    };

    let order: Vec<String> = reconciler
        .books()
        .iter()
        .map(|b| b.display_title().to_string())
        .collect();

    let message = match (moved, confirmed) {
        (true, true) => format!("↕️ New order: {}", order.join(" → ")),
        (true, false) => "↕️ Moved locally; waiting for the store to catch up".to_string(),
        (false, _) => "Nothing moved".to_string(),
    };

    Ok(MoveBookResponse {
        success: true,
        moved,
        confirmed,
        state: reconciler.state(),
        order,
        message,
    })
}
