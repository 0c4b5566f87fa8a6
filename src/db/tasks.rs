//! Task repository: tasks with their subtasks and tags.
//!
//! Multi-row writes (task creation with its children) run in one
//! transaction. Deleting a task removes its subtasks and tags through the
//! `ON DELETE CASCADE` rules installed by the tasks schema, inside the same
//! transaction as the parent delete.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use todo_app::db::{db::Db, tasks::Tasks};
//! use todo_app::libs::task::{Task, TaskFilter, TaskSort};
//!
//! let db = Db::new()?;
//! let tasks = Tasks::new(&db)?;
//! let id = tasks.create(&Task::new("Write report").with_tag("work"))?;
//! let all = tasks.list(TaskFilter::All, TaskSort::Created)?;
//! # Ok::<(), todo_app::libs::error::StoreError>(())
//! ```

use super::db::Db;
use super::migrations::{migrate, Domain};
use super::rows::{query_all, query_all_by_ids, query_one, FromRow};
use crate::libs::error::{Context, Entity, StoreError, StoreResult};
use crate::libs::task::{sort_tasks, validate_tag, validate_title, Priority, Subtask, Task, TaskFilter, TaskSort, TaskStatus};
use chrono::Local;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::collections::HashMap;
use tracing::debug;

const INSERT_TASK: &str =
    "INSERT INTO tasks (title, description, status, priority, created_at, due_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const INSERT_SUBTASK: &str = "INSERT INTO subtasks (task_id, title, completed, position)
    VALUES (?1, ?2, ?3, (SELECT COALESCE(MAX(position), -1) + 1 FROM subtasks WHERE task_id = ?1))";
const INSERT_TAG: &str = "INSERT OR IGNORE INTO task_tags (task_id, name) VALUES (?1, ?2)";
const UPDATE_TASK: &str =
    "UPDATE tasks SET title = ?2, description = ?3, status = ?4, priority = ?5, due_date = ?6 WHERE id = ?1";
const UPDATE_STATUS: &str = "UPDATE tasks SET status = ?2 WHERE id = ?1";
const TOGGLE_SUBTASK: &str = "UPDATE subtasks SET completed = NOT completed WHERE id = ?1 AND task_id = ?2";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const DELETE_SUBTASK: &str = "DELETE FROM subtasks WHERE id = ?1 AND task_id = ?2";
const DELETE_TAG: &str = "DELETE FROM task_tags WHERE task_id = ?1 AND name = ?2";
const SELECT_TASKS: &str = "SELECT id, title, description, status, priority, created_at, due_date FROM tasks";
const SELECT_TASK_EXISTS: &str = "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)";
const SELECT_SUBTASK: &str = "SELECT id, task_id, title, completed FROM subtasks WHERE id = ?1 AND task_id = ?2";
const SELECT_SUBTASKS_IN: &str = "SELECT id, task_id, title, completed FROM subtasks WHERE task_id IN";
const SELECT_TAGS_IN: &str = "SELECT task_id, name FROM task_tags WHERE task_id IN";
const SELECT_TASKS_IN: &str =
    "SELECT id, title, description, status, priority, created_at, due_date FROM tasks WHERE id IN";

impl FromRow for Task {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        let status = status
            .parse::<TaskStatus>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
        let priority: i64 = row.get("priority")?;
        let priority = Priority::from_i64(priority).ok_or(rusqlite::Error::IntegralValueOutOfRange(4, priority))?;

        Ok(Task {
            id: Some(row.get("id")?),
            title: row.get("title")?,
            description: row.get("description")?,
            status,
            priority,
            created_at: Some(row.get("created_at")?),
            due_date: row.get("due_date")?,
            subtasks: Vec::new(),
            tags: Vec::new(),
        })
    }
}

impl FromRow for Subtask {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Subtask {
            id: Some(row.get("id")?),
            task_id: Some(row.get("task_id")?),
            title: row.get("title")?,
            completed: row.get("completed")?,
        })
    }
}

struct TagRow {
    task_id: i64,
    name: String,
}

impl FromRow for TagRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TagRow {
            task_id: row.get("task_id")?,
            name: row.get("name")?,
        })
    }
}

pub struct Tasks<'a> {
    db: &'a Db,
}

impl<'a> Tasks<'a> {
    /// Binds the repository to `db`, creating the tasks schema if needed.
    pub fn new(db: &'a Db) -> StoreResult<Self> {
        migrate(&db.conn, Domain::Tasks)?;
        Ok(Tasks { db })
    }

    fn conn(&self) -> &Connection {
        &self.db.conn
    }

    /// Inserts the task together with its initial subtasks and tags and
    /// returns the new id. Either every row is written or none is.
    pub fn create(&self, task: &Task) -> StoreResult<i64> {
        task.validate()?;
        let created_at = Local::now().naive_local();

        let tx = self.conn().unchecked_transaction().context("begin insert task")?;
        tx.execute(
            INSERT_TASK,
            params![
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_i64(),
                created_at,
                task.due_date
            ],
        )
        .context("insert task")?;
        let id = tx.last_insert_rowid();

        for subtask in &task.subtasks {
            tx.execute(INSERT_SUBTASK, params![id, subtask.title, subtask.completed])
                .with_context(|| format!("insert subtask for task {id}"))?;
        }
        for tag in &task.tags {
            tx.execute(INSERT_TAG, params![id, tag.trim()])
                .with_context(|| format!("insert tag for task {id}"))?;
        }
        tx.commit().with_context(|| format!("commit task {id}"))?;

        debug!(task_id = id, subtasks = task.subtasks.len(), tags = task.tags.len(), "task created");
        Ok(id)
    }

    /// Loads the tasks selected by `filter` in creation order, each with its
    /// subtasks and tags populated.
    pub fn fetch(&self, filter: TaskFilter) -> StoreResult<Vec<Task>> {
        let mut tasks: Vec<Task> = match filter {
            TaskFilter::All => query_all(self.conn(), &format!("{SELECT_TASKS} ORDER BY id"), [], "select tasks")?,
            TaskFilter::Status(status) => query_all(
                self.conn(),
                &format!("{SELECT_TASKS} WHERE status = ?1 ORDER BY id"),
                params![status.as_str()],
                "select tasks by status",
            )?,
            TaskFilter::ByIds(ids) if ids.is_empty() => Vec::new(),
            TaskFilter::ByIds(ids) => {
                let mut tasks: Vec<Task> = query_all_by_ids(self.conn(), SELECT_TASKS_IN, "", &ids, "select tasks by id")?;
                tasks.sort_by_key(|t| t.id);
                tasks
            }
        };

        self.attach_children(&mut tasks)?;
        Ok(tasks)
    }

    /// [`fetch`](Self::fetch) followed by the requested read-time ordering.
    pub fn list(&self, filter: TaskFilter, sort: TaskSort) -> StoreResult<Vec<Task>> {
        let mut tasks = self.fetch(filter)?;
        sort_tasks(&mut tasks, sort);
        Ok(tasks)
    }

    pub fn get_by_id(&self, id: i64) -> StoreResult<Task> {
        let task: Option<Task> = query_one(
            self.conn(),
            &format!("{SELECT_TASKS} WHERE id = ?1"),
            params![id],
            &format!("select task {id}"),
        )?;
        let task = task.ok_or_else(|| StoreError::not_found(Entity::Task, id))?;
        let mut tasks = vec![task];
        self.attach_children(&mut tasks)?;
        tasks.pop().ok_or_else(|| StoreError::not_found(Entity::Task, id))
    }

    /// Replaces the task's own fields. Subtasks, tags and the creation
    /// timestamp are left as they are.
    pub fn update(&self, task: &Task) -> StoreResult<()> {
        let id = task.id.ok_or_else(|| StoreError::validation("task has no id"))?;
        validate_title(&task.title, "task title")?;

        let affected = self
            .conn()
            .execute(
                UPDATE_TASK,
                params![
                    id,
                    task.title,
                    task.description,
                    task.status.as_str(),
                    task.priority.as_i64(),
                    task.due_date
                ],
            )
            .with_context(|| format!("update task {id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::Task, id));
        }
        Ok(())
    }

    pub fn set_status(&self, id: i64, status: TaskStatus) -> StoreResult<()> {
        let affected = self
            .conn()
            .execute(UPDATE_STATUS, params![id, status.as_str()])
            .with_context(|| format!("update status of task {id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::Task, id));
        }
        Ok(())
    }

    /// Removes the task; its subtasks and tags go with it in the same
    /// transaction.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let tx = self
            .conn()
            .unchecked_transaction()
            .with_context(|| format!("begin delete task {id}"))?;
        let affected = tx.execute(DELETE_TASK, params![id]).with_context(|| format!("delete task {id}"))?;
        if affected == 0 {
            // Dropping the transaction rolls it back.
            return Err(StoreError::not_found(Entity::Task, id));
        }
        tx.commit().with_context(|| format!("commit delete task {id}"))?;

        debug!(task_id = id, "task deleted");
        Ok(())
    }

    /// Appends a subtask to the end of the task's list and returns its id.
    pub fn add_subtask(&self, task_id: i64, title: &str) -> StoreResult<i64> {
        validate_title(title, "subtask title")?;
        self.ensure_task(task_id)?;
        self.conn()
            .execute(INSERT_SUBTASK, params![task_id, title, false])
            .with_context(|| format!("insert subtask for task {task_id}"))?;
        Ok(self.conn().last_insert_rowid())
    }

    /// Flips the completed flag and returns the new value.
    pub fn toggle_subtask(&self, task_id: i64, subtask_id: i64) -> StoreResult<bool> {
        self.ensure_task(task_id)?;
        let affected = self
            .conn()
            .execute(TOGGLE_SUBTASK, params![subtask_id, task_id])
            .with_context(|| format!("toggle subtask {subtask_id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::Subtask, subtask_id));
        }

        let subtask: Option<Subtask> = query_one(
            self.conn(),
            SELECT_SUBTASK,
            params![subtask_id, task_id],
            &format!("select subtask {subtask_id}"),
        )?;
        subtask
            .map(|s| s.completed)
            .ok_or_else(|| StoreError::not_found(Entity::Subtask, subtask_id))
    }

    pub fn remove_subtask(&self, task_id: i64, subtask_id: i64) -> StoreResult<()> {
        self.ensure_task(task_id)?;
        let affected = self
            .conn()
            .execute(DELETE_SUBTASK, params![subtask_id, task_id])
            .with_context(|| format!("delete subtask {subtask_id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::Subtask, subtask_id));
        }
        Ok(())
    }

    /// Attaches a tag label to the task. Adding a label the task already
    /// carries changes nothing.
    pub fn add_tag(&self, task_id: i64, tag: &str) -> StoreResult<()> {
        validate_tag(tag)?;
        self.ensure_task(task_id)?;
        self.conn()
            .execute(INSERT_TAG, params![task_id, tag.trim()])
            .with_context(|| format!("insert tag for task {task_id}"))?;
        Ok(())
    }

    pub fn remove_tag(&self, task_id: i64, tag: &str) -> StoreResult<()> {
        self.ensure_task(task_id)?;
        let affected = self
            .conn()
            .execute(DELETE_TAG, params![task_id, tag.trim()])
            .with_context(|| format!("delete tag from task {task_id}"))?;
        if affected == 0 {
            return Err(StoreError::not_found(Entity::Tag, tag.trim()));
        }
        Ok(())
    }

    fn ensure_task(&self, id: i64) -> StoreResult<()> {
        let exists: bool = self
            .conn()
            .query_row(SELECT_TASK_EXISTS, params![id], |row| row.get(0))
            .with_context(|| format!("look up task {id}"))?;
        if !exists {
            return Err(StoreError::not_found(Entity::Task, id));
        }
        Ok(())
    }

    /// Fills subtasks and tags with batched queries keyed by the ids of the
    /// tasks already loaded. All children of one task come back from the
    /// same chunk, so their order holds.
    fn attach_children(&self, tasks: &mut [Task]) -> StoreResult<()> {
        let ids: Vec<i64> = tasks.iter().filter_map(|t| t.id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let subtasks: Vec<Subtask> = query_all_by_ids(
            self.conn(),
            SELECT_SUBTASKS_IN,
            "ORDER BY task_id, position, id",
            &ids,
            "select subtasks",
        )?;
        let tags: Vec<TagRow> = query_all_by_ids(self.conn(), SELECT_TAGS_IN, "ORDER BY task_id, id", &ids, "select tags")?;

        let mut subtasks_by_task: HashMap<i64, Vec<Subtask>> = HashMap::new();
        for subtask in subtasks {
            if let Some(task_id) = subtask.task_id {
                subtasks_by_task.entry(task_id).or_default().push(subtask);
            }
        }
        let mut tags_by_task: HashMap<i64, Vec<String>> = HashMap::new();
        for tag in tags {
            tags_by_task.entry(tag.task_id).or_default().push(tag.name);
        }

        for task in tasks.iter_mut() {
            let Some(id) = task.id else { continue };
            task.subtasks = subtasks_by_task.remove(&id).unwrap_or_default();
            task.tags = tags_by_task.remove(&id).unwrap_or_default();
        }
        Ok(())
    }
}
