use super::records::{Task, TaskStatus};

/// One kanban column
#[derive(Debug)]
pub struct Column<'a> {
    pub status: TaskStatus,
    pub tasks: Vec<&'a Task>,
}

/// Tasks grouped by status, one column per status in board order.
/// Within a column tasks keep their store order.
#[derive(Debug)]
pub struct Board<'a> {
    pub columns: Vec<Column<'a>>,
}

impl<'a> Board<'a> {
    pub fn from_tasks(tasks: &'a [Task]) -> Self {
        let columns = TaskStatus::ALL
            .iter()
            .map(|&status| Column {
                status,
                tasks: tasks.iter().filter(|t| t.status == status).collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, status: TaskStatus) -> &Column<'a> {
        // Columns follow TaskStatus::ALL, which is declaration order
        &self.columns[status as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::records::TaskPriority;
    use chrono::NaiveDate;

    fn task(id: &str, status: TaskStatus) -> Task {
        Task {
            id: id.into(),
            title: format!("task {id}"),
            description: String::new(),
            client_id: "1".into(),
            project_id: "1".into(),
            status,
            priority: TaskPriority::Medium,
            due_date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
        }
    }

    #[test]
    fn test_groups_by_status_in_order() {
        let tasks = vec![
            task("a", TaskStatus::Todo),
            task("b", TaskStatus::Completed),
            task("c", TaskStatus::Todo),
        ];
        let board = Board::from_tasks(&tasks);

        assert_eq!(board.columns.len(), 3);
        let todo: Vec<_> = board
            .column(TaskStatus::Todo)
            .tasks
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(todo, ["a", "c"]);
        assert!(board.column(TaskStatus::InProgress).tasks.is_empty());
        assert_eq!(board.column(TaskStatus::Completed).tasks.len(), 1);
    }
}
