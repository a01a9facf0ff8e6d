pub mod filter;
pub mod repair;

use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};
use rusqlite::Connection;
use ulid::Ulid;

use crate::db::board_repo::{self, BOARD_KEY};
use crate::models::{Board, Column, Priority, Status, Task, TaskDraft, TaskPatch};

use filter::{Filters, SEARCH_DEBOUNCE};

/// Owns the canonical board state for one session.
///
/// Mutations run to completion, keep the board invariants (total column map,
/// each task listed exactly once under its own status), and write the result
/// to the durable store. Persistence failures are logged and masked; the
/// in-memory board stays authoritative.
pub struct BoardStore {
    conn: Connection,
    board: Board,
    filters: Filters,
}

impl BoardStore {
    /// Load the stored board, seeding the sample board on first run (empty
    /// or unreadable store).
    pub fn open(conn: Connection) -> Self {
        let board = board_repo::load(&conn, BOARD_KEY, Board::sample());
        Self::with_board(conn, board)
    }

    /// Build a store around an explicit initial board.
    ///
    /// Nothing is written until the first mutation.
    pub fn with_board(conn: Connection, board: Board) -> Self {
        let mut store = Self {
            conn,
            board,
            filters: Filters::new(SEARCH_DEBOUNCE),
        };
        store.repair();
        store
    }

    /// Current board snapshot.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Create a task from `draft` and append it to its column's ordering.
    /// The store assigns the id and timestamps. Returns the new id.
    pub fn add_task(&mut self, draft: TaskDraft) -> String {
        self.repair();
        let now = Utc::now().timestamp_millis();
        let id = Ulid::new().to_string();
        let task = Task {
            id: id.clone(),
            title: draft.title.trim().to_string(),
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };
        self.append(draft.status, &id);
        self.board.tasks.insert(id.clone(), task);
        self.persist();
        id
    }

    /// Merge `patch` into the task, stamping `updated_at`. A status change
    /// moves the id to the end of the new column. Unknown ids are ignored.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) {
        if !self.board.tasks.contains_key(id) {
            debug!("update for unknown task {id}; ignoring");
            return;
        }
        self.repair();
        let mut destination = None;
        if let Some(task) = self.board.tasks.get_mut(id) {
            if let Some(title) = patch.title {
                task.title = title.trim().to_string();
            }
            if let Some(description) = patch.description {
                task.description = description;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                task.due_date = due_date;
            }
            if let Some(status) = patch.status {
                if status != task.status {
                    task.status = status;
                    destination = Some(status);
                }
            }
            task.updated_at = Utc::now().timestamp_millis();
        }
        if let Some(status) = destination {
            self.detach(id);
            self.append(status, id);
        }
        self.persist();
    }

    /// Remove the task record and its column listing. Unknown ids are
    /// ignored.
    pub fn delete_task(&mut self, id: &str) {
        if self.board.tasks.remove(id).is_none() {
            debug!("delete for unknown task {id}; ignoring");
            return;
        }
        self.repair();
        self.detach(id);
        self.persist();
    }

    /// Move a task across columns: detach it from `source`'s ordering
    /// (safe even if absent) and append it to `destination`'s, updating the
    /// task's status. Unknown ids are ignored.
    pub fn move_task(&mut self, id: &str, source: Status, destination: Status) {
        if !self.board.tasks.contains_key(id) {
            debug!("move for unknown task {id}; ignoring");
            return;
        }
        self.repair();
        // Detach from every column, not just the declared source; a stale
        // drag event may disagree with the board about where the task is.
        let found = self.detach(id);
        if found != Some(source) {
            debug!("move expected task {id} in {source}, found it in {found:?}");
        }
        self.append(destination, id);
        if let Some(task) = self.board.tasks.get_mut(id) {
            task.status = destination;
            task.updated_at = Utc::now().timestamp_millis();
        }
        self.persist();
    }

    /// Reorder within one column: remove the id at `from_index` and reinsert
    /// it at `to_index`. Out-of-range indices leave the board unchanged.
    /// Pure ordering change; no task's status or `updated_at` moves.
    pub fn reorder_tasks(&mut self, status: Status, from_index: usize, to_index: usize) {
        self.repair();
        let Some(column) = self.board.columns.get_mut(&status) else {
            return;
        };
        let len = column.task_ids.len();
        if from_index >= len || to_index >= len {
            return;
        }
        let id = column.task_ids.remove(from_index);
        column.task_ids.insert(to_index, id);
        self.persist();
    }

    /// Replace the board with the canonical empty one and persist it.
    pub fn reset_board(&mut self) {
        self.board = Board::empty();
        self.persist();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.set_term(term);
    }

    /// The search term as last typed, before the debounce settles.
    pub fn search_term(&self) -> &str {
        self.filters.term()
    }

    pub fn set_priority_filter(&mut self, priority: Option<Priority>) {
        self.filters.set_priority(priority);
    }

    pub fn priority_filter(&self) -> Option<Priority> {
        self.filters.priority()
    }

    /// Override the search quiet period (default [`SEARCH_DEBOUNCE`]).
    pub fn set_search_debounce(&mut self, debounce: Duration) {
        self.filters.set_debounce(debounce);
    }

    /// Tasks visible in `status`'s column under the current filters, in
    /// column order. Ids that no longer resolve are skipped.
    pub fn tasks_for(&self, status: Status) -> Vec<&Task> {
        let term = self.filters.settled_term().to_lowercase();
        let priority = self.filters.priority();
        let Some(column) = self.board.columns.get(&status) else {
            return Vec::new();
        };
        column
            .task_ids
            .iter()
            .filter_map(|id| self.board.tasks.get(id))
            .filter(|task| {
                let matches_term = term.is_empty()
                    || task.title.to_lowercase().contains(&term)
                    || task.description.to_lowercase().contains(&term);
                let matches_priority = priority.map_or(true, |p| p == task.priority);
                matches_term && matches_priority
            })
            .collect()
    }

    fn repair(&mut self) {
        for status in repair::ensure_columns(&mut self.board) {
            warn!("board was missing the {status} column; synthesized it empty");
        }
    }

    /// Remove `id` from every column's ordering. Returns the first column
    /// that actually held it, if any.
    fn detach(&mut self, id: &str) -> Option<Status> {
        let mut found = None;
        for (status, column) in self.board.columns.iter_mut() {
            let before = column.task_ids.len();
            column.task_ids.retain(|t| t != id);
            if column.task_ids.len() != before {
                found.get_or_insert(*status);
            }
        }
        found
    }

    fn append(&mut self, status: Status, id: &str) {
        self.board
            .columns
            .entry(status)
            .or_insert_with(|| Column::empty(status))
            .task_ids
            .push(id.to_string());
    }

    fn persist(&self) {
        board_repo::save(&self.conn, BOARD_KEY, &self.board);
    }
}
