#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todo_app::db::db::Db;
    use todo_app::db::focus::FocusSessions;
    use todo_app::db::journal::Journal;
    use todo_app::db::migrations::{index_exists, migrate, table_exists, Domain, MigrationManager};
    use todo_app::db::tasks::Tasks;
    use todo_app::libs::task::Task;

    struct MigrationTestContext {
        db: Db,
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("todo.db")).unwrap();
            MigrationTestContext { db, temp_dir }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_each_domain_creates_its_schema(ctx: &mut MigrationTestContext) {
        let conn = &ctx.db.conn;
        assert!(!table_exists(conn, "tasks").unwrap());

        migrate(conn, Domain::Tasks).unwrap();
        for table in ["tasks", "subtasks", "task_tags"] {
            assert!(table_exists(conn, table).unwrap(), "{table}");
        }
        assert!(index_exists(conn, "idx_subtasks_task_id").unwrap());
        assert!(index_exists(conn, "idx_task_tags_task_id").unwrap());
        assert!(!table_exists(conn, "journal_notes").unwrap());

        migrate(conn, Domain::Journal).unwrap();
        assert!(table_exists(conn, "journal_notes").unwrap());
        assert!(table_exists(conn, "journal_entries").unwrap());
        assert!(index_exists(conn, "idx_journal_entries_note_id").unwrap());

        migrate(conn, Domain::Focus).unwrap();
        assert!(table_exists(conn, "focus_sessions").unwrap());
        assert!(index_exists(conn, "idx_focus_sessions_task_id").unwrap());
        assert!(index_exists(conn, "idx_focus_sessions_completed_at").unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_are_idempotent(ctx: &mut MigrationTestContext) {
        let tasks = Tasks::new(&ctx.db).unwrap();
        let id = tasks.create(&Task::new("survives").with_tag("t")).unwrap();

        for _ in 0..3 {
            migrate(&ctx.db.conn, Domain::Tasks).unwrap();
            Tasks::new(&ctx.db).unwrap();
            Journal::new(&ctx.db).unwrap();
            FocusSessions::new(&ctx.db).unwrap();
        }

        assert_eq!(tasks.get_by_id(id).unwrap().tags, vec!["t"]);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_schema_survives_reopen(ctx: &mut MigrationTestContext) {
        let id = Tasks::new(&ctx.db).unwrap().create(&Task::new("persisted")).unwrap();
        let path = ctx.temp_dir.path().join("todo.db");

        let reopened = Db::open(&path).unwrap();
        let task = Tasks::new(&reopened).unwrap().get_by_id(id).unwrap();

        assert_eq!(task.title, "persisted");
        reopened.close().unwrap();
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_connection_pragmas(ctx: &mut MigrationTestContext) {
        assert_eq!(ctx.db.journal_mode().unwrap().to_lowercase(), "wal");
        assert!(ctx.db.foreign_keys_enabled().unwrap());
        assert_eq!(ctx.db.path(), Some(ctx.temp_dir.path().join("todo.db").as_path()));
    }

    #[test]
    fn test_in_memory_database_enforces_foreign_keys() {
        let db = Db::open_in_memory().unwrap();

        assert!(db.foreign_keys_enabled().unwrap());
        assert!(db.path().is_none());
        migrate(&db.conn, Domain::Tasks).unwrap();
        let orphan = db
            .conn
            .execute("INSERT INTO subtasks (task_id, title) VALUES (999, 'orphan')", []);
        assert!(orphan.is_err());
        db.close().unwrap();
    }

    #[test]
    fn test_migration_steps_are_named() {
        assert_eq!(
            MigrationManager::new(Domain::Tasks).step_names(),
            vec!["create_tasks", "create_subtasks", "create_task_tags"]
        );
        assert_eq!(
            MigrationManager::new(Domain::Journal).step_names(),
            vec!["create_journal_notes", "create_journal_entries"]
        );
        assert_eq!(MigrationManager::new(Domain::Focus).step_names(), vec!["create_focus_sessions"]);
    }
}
