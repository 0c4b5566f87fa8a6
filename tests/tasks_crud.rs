#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todo_app::db::db::Db;
    use todo_app::db::tasks::Tasks;
    use todo_app::libs::error::{ErrorKind, StoreError};
    use todo_app::libs::task::{search_tasks, Priority, Task, TaskFilter, TaskSort, TaskStatus};

    struct TaskTestContext {
        db: Db,
        _temp_dir: TempDir,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("todo.db")).unwrap();
            TaskTestContext { db, _temp_dir: temp_dir }
        }
    }

    fn count(db: &Db, table: &str) -> i64 {
        db.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_create_stores_task_with_children(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let task = Task::new("Plan release")
            .with_description("Cut the branch")
            .with_priority(Priority::High)
            .with_due_date(date(2024, 5, 1))
            .with_subtask("Freeze")
            .with_subtask("Tag")
            .with_subtask("Announce")
            .with_tag("work")
            .with_tag("q2");

        let id = tasks.create(&task).unwrap();
        let stored = tasks.get_by_id(id).unwrap();

        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.title, "Plan release");
        assert_eq!(stored.description.as_deref(), Some("Cut the branch"));
        assert_eq!(stored.priority, Priority::High);
        assert_eq!(stored.status, TaskStatus::Pending);
        assert_eq!(stored.due_date, Some(date(2024, 5, 1)));
        assert!(stored.created_at.is_some());
        let titles: Vec<&str> = stored.subtasks.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Freeze", "Tag", "Announce"]);
        assert!(stored.subtasks.iter().all(|s| s.task_id == Some(id) && !s.completed));
        let mut tags = stored.tags.clone();
        tags.sort();
        assert_eq!(tags, vec!["q2", "work"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_create_rejects_empty_title(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();

        let err = tasks.create(&Task::new("   ")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(count(&ctx.db, "tasks"), 0);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_create_with_invalid_child_writes_nothing(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let task = Task::new("Valid").with_subtask("ok").with_subtask("").with_tag("x");

        let err = tasks.create(&task).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(count(&ctx.db, "tasks"), 0);
        assert_eq!(count(&ctx.db, "subtasks"), 0);
        assert_eq!(count(&ctx.db, "task_tags"), 0);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_create_rolls_back_when_a_child_insert_fails(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        ctx.db
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_tags BEFORE INSERT ON task_tags
                 BEGIN SELECT RAISE(ABORT, 'tags rejected'); END;",
            )
            .unwrap();
        let task = Task::new("Half written").with_subtask("a").with_subtask("b").with_tag("x");

        let err = tasks.create(&task).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert_eq!(count(&ctx.db, "tasks"), 0);
        assert_eq!(count(&ctx.db, "subtasks"), 0);
        assert_eq!(count(&ctx.db, "task_tags"), 0);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_delete_cascades_to_children(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let doomed = tasks
            .create(&Task::new("Doomed").with_subtask("a").with_subtask("b").with_tag("t"))
            .unwrap();
        let kept = tasks.create(&Task::new("Kept").with_subtask("c").with_tag("t")).unwrap();

        tasks.delete(doomed).unwrap();

        assert_eq!(count(&ctx.db, "tasks"), 1);
        assert_eq!(count(&ctx.db, "subtasks"), 1);
        assert_eq!(count(&ctx.db, "task_tags"), 1);
        let orphans: i64 = ctx
            .db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM subtasks WHERE task_id NOT IN (SELECT id FROM tasks)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
        assert_eq!(tasks.get_by_id(kept).unwrap().subtasks.len(), 1);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_missing_task_is_not_found(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();

        assert_eq!(tasks.get_by_id(42).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(tasks.delete(42).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(tasks.set_status(42, TaskStatus::Done).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(tasks.add_subtask(42, "x").unwrap_err().kind(), ErrorKind::NotFound);

        let mut ghost = Task::new("Ghost");
        ghost.id = Some(42);
        let err = tasks.update(&ghost).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(err.kind().exit_code(), 4);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_update_changes_own_fields_only(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let id = tasks.create(&Task::new("Draft").with_subtask("step").with_tag("tag")).unwrap();
        let original = tasks.get_by_id(id).unwrap();

        let mut task = original.clone();
        task.title = "Final".to_string();
        task.status = TaskStatus::InProgress;
        task.priority = Priority::Urgent;
        task.subtasks.clear();
        task.tags.clear();
        tasks.update(&task).unwrap();

        let updated = tasks.get_by_id(id).unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(updated.priority, Priority::Urgent);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.subtasks.len(), 1);
        assert_eq!(updated.tags, vec!["tag"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_set_status_and_filter(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let a = tasks.create(&Task::new("a")).unwrap();
        let b = tasks.create(&Task::new("b")).unwrap();

        tasks.set_status(b, TaskStatus::Done).unwrap();

        let done = tasks.fetch(TaskFilter::Status(TaskStatus::Done)).unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, Some(b));
        let pending = tasks.fetch(TaskFilter::Status(TaskStatus::Pending)).unwrap();
        assert_eq!(pending[0].id, Some(a));
        let by_ids = tasks.fetch(TaskFilter::ByIds(vec![b, 999])).unwrap();
        assert_eq!(by_ids.len(), 1);
        assert!(tasks.fetch(TaskFilter::ByIds(Vec::new())).unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_list_sorting(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let low = tasks
            .create(&Task::new("low").with_priority(Priority::Low).with_due_date(date(2024, 3, 1)))
            .unwrap();
        let urgent = tasks.create(&Task::new("urgent").with_priority(Priority::Urgent)).unwrap();
        let high = tasks
            .create(&Task::new("high").with_priority(Priority::High).with_due_date(date(2024, 1, 1)))
            .unwrap();
        tasks.set_status(urgent, TaskStatus::Done).unwrap();

        let ids = |sort| -> Vec<i64> {
            tasks
                .list(TaskFilter::All, sort)
                .unwrap()
                .iter()
                .filter_map(|t| t.id)
                .collect()
        };
        assert_eq!(ids(TaskSort::Created), vec![low, urgent, high]);
        assert_eq!(ids(TaskSort::Priority), vec![urgent, high, low]);
        assert_eq!(ids(TaskSort::Due), vec![high, low, urgent]);
        assert_eq!(ids(TaskSort::Status), vec![low, high, urgent]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_search_matches_title_description_and_tags(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        tasks.create(&Task::new("Buy MILK")).unwrap();
        tasks.create(&Task::new("Call bank").with_description("about the milkshake fund")).unwrap();
        tasks.create(&Task::new("Errands").with_tag("Milk-run")).unwrap();
        tasks.create(&Task::new("Unrelated")).unwrap();

        let all = tasks.list(TaskFilter::All, TaskSort::Created).unwrap();
        let found: Vec<&str> = search_tasks(&all, "milk").iter().map(|t| t.title.as_str()).collect();

        assert_eq!(found, vec!["Buy MILK", "Call bank", "Errands"]);
        assert_eq!(search_tasks(&all, "").len(), 4);
        assert!(search_tasks(&all, "nothing").is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_ids_are_not_reused(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let first = tasks.create(&Task::new("first")).unwrap();
        let second = tasks.create(&Task::new("second")).unwrap();
        tasks.delete(second).unwrap();

        let third = tasks.create(&Task::new("third")).unwrap();

        assert!(second > first);
        assert!(third > second);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_subtask_lifecycle(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let id = tasks.create(&Task::new("Parent").with_subtask("first")).unwrap();
        let other = tasks.create(&Task::new("Other")).unwrap();

        let added = tasks.add_subtask(id, "second").unwrap();
        assert!(tasks.toggle_subtask(id, added).unwrap());
        assert!(!tasks.toggle_subtask(id, added).unwrap());
        assert!(tasks.toggle_subtask(id, added).unwrap());

        let task = tasks.get_by_id(id).unwrap();
        assert_eq!(task.subtasks.last().map(|s| s.title.as_str()), Some("second"));
        assert_eq!(task.completed_subtasks(), 1);

        assert_eq!(tasks.toggle_subtask(other, added).unwrap_err().kind(), ErrorKind::NotFound);
        tasks.remove_subtask(id, added).unwrap();
        assert_eq!(tasks.remove_subtask(id, added).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(tasks.add_subtask(id, " ").unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_tags_are_unique_per_task(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let id = tasks.create(&Task::new("Tagged").with_tag("home")).unwrap();

        tasks.add_tag(id, "home").unwrap();
        tasks.add_tag(id, "garden").unwrap();
        let mut tags = tasks.get_by_id(id).unwrap().tags;
        tags.sort();
        assert_eq!(tags, vec!["garden", "home"]);

        tasks.remove_tag(id, "home").unwrap();
        assert_eq!(tasks.remove_tag(id, "home").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(tasks.add_tag(id, "").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(tasks.get_by_id(id).unwrap().tags, vec!["garden"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_fetch_more_tasks_than_sqlite_can_bind(ctx: &mut TaskTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        ctx.db
            .conn
            .execute(
                "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 33000)
                 INSERT INTO tasks (title, status, priority, created_at)
                 SELECT 'bulk ' || n, 'pending', 1, '2024-06-01 09:00:00' FROM seq",
                [],
            )
            .unwrap();
        let last = tasks.create(&Task::new("Last").with_subtask("child").with_tag("end")).unwrap();
        tasks.add_subtask(1, "first child").unwrap();

        let all = tasks.fetch(TaskFilter::All).unwrap();

        assert_eq!(all.len(), 33001);
        assert_eq!(all[0].subtasks.len(), 1);
        let tail = all.last().unwrap();
        assert_eq!(tail.id, Some(last));
        assert_eq!(tail.subtasks[0].title, "child");
        assert_eq!(tail.tags, vec!["end"]);

        let ids: Vec<i64> = (1..=1200).rev().collect();
        let picked = tasks.fetch(TaskFilter::ByIds(ids)).unwrap();
        assert_eq!(picked.len(), 1200);
        assert!(picked.windows(2).all(|w| w[0].id < w[1].id));
        assert_eq!(picked[0].subtasks[0].title, "first child");
    }
}
