use crate::models::{Board, Column, Status};

/// Make the column map total: one entry per status value.
///
/// Synthesizes any missing column with its display title and empty ordering.
/// Never removes or merges existing columns, so applying it twice equals
/// applying it once. Returns the statuses that had to be synthesized so the
/// caller can log or assert on the drift it found.
pub fn ensure_columns(board: &mut Board) -> Vec<Status> {
    let mut synthesized = Vec::new();
    for status in Status::ALL {
        board.columns.entry(status).or_insert_with(|| {
            synthesized.push(status);
            Column::empty(status)
        });
    }
    synthesized
}
