use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::task::{Priority, Status, Task};

/// One workflow column. Identity is the status value; `task_ids` is the
/// caller-controlled drag order, never sorted by content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: Status,
    pub title: String,
    pub task_ids: Vec<String>,
}

impl Column {
    pub fn empty(status: Status) -> Self {
        Self {
            id: status,
            title: status.column_title().to_string(),
            task_ids: Vec::new(),
        }
    }
}

/// The whole board: a column per status plus the task records themselves.
///
/// `columns` is keyed by status and kept total (one entry per status value)
/// by the repair routine. `tasks` is unordered; ordering lives in the
/// columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub columns: BTreeMap<Status, Column>,
    pub tasks: HashMap<String, Task>,
}

impl Board {
    /// The canonical empty board: all three columns, no tasks.
    pub fn empty() -> Self {
        Self {
            columns: Status::ALL
                .iter()
                .map(|&status| (status, Column::empty(status)))
                .collect(),
            tasks: HashMap::new(),
        }
    }

    /// Demo board seeded on first run, when the durable store holds nothing
    /// usable yet. One task per column.
    pub fn sample() -> Self {
        let now = Utc::now();
        let now_ms = now.timestamp_millis();
        let hour_ms = 3_600_000;

        let mut board = Self::empty();
        let tasks = [
            Task {
                id: "task-1".to_string(),
                title: "Create project structure".to_string(),
                description: "Set up folders and initial configuration".to_string(),
                priority: Priority::High,
                status: Status::Done,
                due_date: Some(now - Duration::hours(12)),
                created_at: now_ms - 24 * hour_ms,
                updated_at: now_ms - 12 * hour_ms,
            },
            Task {
                id: "task-2".to_string(),
                title: "Implement drag and drop".to_string(),
                description: "Add DnD functionality between columns".to_string(),
                priority: Priority::Medium,
                status: Status::InProgress,
                due_date: Some(now + Duration::days(1)),
                created_at: now_ms - 12 * hour_ms,
                updated_at: now_ms - 6 * hour_ms,
            },
            Task {
                id: "task-3".to_string(),
                title: "Add task filtering".to_string(),
                description: "Implement search and priority filtering".to_string(),
                priority: Priority::Low,
                status: Status::Todo,
                due_date: Some(now + Duration::days(3)),
                created_at: now_ms - 6 * hour_ms,
                updated_at: now_ms - 6 * hour_ms,
            },
        ];
        for task in tasks {
            board
                .columns
                .entry(task.status)
                .or_insert_with(|| Column::empty(task.status))
                .task_ids
                .push(task.id.clone());
            board.tasks.insert(task.id.clone(), task);
        }
        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_board_has_one_column_per_status() {
        let board = Board::empty();
        assert_eq!(board.columns.len(), 3);
        for status in Status::ALL {
            let column = &board.columns[&status];
            assert_eq!(column.id, status);
            assert_eq!(column.title, status.column_title());
            assert!(column.task_ids.is_empty());
        }
        assert!(board.tasks.is_empty());
    }

    #[test]
    fn sample_board_lists_each_task_in_its_own_column() {
        let board = Board::sample();
        assert_eq!(board.tasks.len(), 3);
        for (id, task) in &board.tasks {
            assert_eq!(board.columns[&task.status].task_ids, vec![id.clone()]);
        }
    }

    #[test]
    fn board_serializes_with_stored_field_names() {
        let board = Board::sample();
        let value = serde_json::to_value(&board).expect("serialize board");

        let columns = value["columns"].as_object().expect("columns object");
        assert!(columns.contains_key("todo"));
        assert!(columns.contains_key("in-progress"));
        assert!(columns.contains_key("done"));
        assert!(columns["todo"]["taskIds"].is_array());

        let task = &value["tasks"]["task-1"];
        assert_eq!(task["priority"], json!("high"));
        assert_eq!(task["status"], json!("done"));
        assert!(task["createdAt"].is_i64());
        assert!(task["updatedAt"].is_i64());
        assert!(task["dueDate"].is_string());
    }

    #[test]
    fn board_with_missing_due_date_deserializes() {
        let text = r#"{
            "columns": {
                "todo": {"id": "todo", "title": "To Do", "taskIds": ["a"]},
                "in-progress": {"id": "in-progress", "title": "In Progress", "taskIds": []},
                "done": {"id": "done", "title": "Done", "taskIds": []}
            },
            "tasks": {
                "a": {
                    "id": "a", "title": "A", "description": "",
                    "priority": "low", "status": "todo",
                    "createdAt": 1, "updatedAt": 1
                }
            }
        }"#;
        let board: Board = serde_json::from_str(text).expect("deserialize board");
        assert_eq!(board.tasks["a"].due_date, None);
        assert_eq!(board.columns[&Status::Todo].task_ids, vec!["a"]);
    }
}
