#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use rusqlite::params;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use todo_app::db::db::Db;
    use todo_app::db::journal::Journal;
    use todo_app::libs::error::{Context, ErrorKind};

    struct JournalTestContext {
        db: Db,
        _temp_dir: TempDir,
    }

    impl TestContext for JournalTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("todo.db")).unwrap();
            JournalTestContext { db, _temp_dir: temp_dir }
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_same_day_returns_same_note(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();

        let first = journal.get_or_create_for(day(3)).unwrap();
        let second = journal.get_or_create_for(day(3)).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.date, day(3));
        assert!(!first.hidden);
        assert_eq!(journal.list_notes(true).unwrap().len(), 1);
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_today_note_is_stable(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();

        let first = journal.get_or_create_today().unwrap();
        let second = journal.get_or_create_today().unwrap();

        assert_eq!(first.id, second.id);
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_different_days_get_distinct_notes(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();

        let monday = journal.get_or_create_for(day(3)).unwrap();
        let tuesday = journal.get_or_create_for(day(4)).unwrap();

        assert_ne!(monday.id, tuesday.id);
        let dates: Vec<NaiveDate> = journal.list_notes(false).unwrap().iter().map(|n| n.date).collect();
        assert_eq!(dates, vec![day(4), day(3)]);
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_duplicate_date_insert_is_a_conflict(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();
        journal.get_or_create_for(day(5)).unwrap();

        let err = ctx
            .db
            .conn
            .execute("INSERT INTO journal_notes (date) VALUES (?1)", params![day(5)])
            .context("insert duplicate note")
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.kind().exit_code(), 5);
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_entries_are_loaded_in_written_order(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();
        let note = journal.get_or_create_for(day(3)).unwrap();
        let other = journal.get_or_create_for(day(4)).unwrap();

        journal.add_entry_at(note.id, "afternoon", at(3, 15, 0)).unwrap();
        journal.add_entry_at(note.id, "morning", at(3, 9, 30)).unwrap();
        journal.add_entry_at(other.id, "next day", at(4, 8, 0)).unwrap();

        let loaded = journal.get_note(note.id).unwrap();
        let bodies: Vec<&str> = loaded.entries.iter().map(|e| e.body.as_str()).collect();
        assert_eq!(bodies, vec!["morning", "afternoon"]);

        let notes = journal.list_notes(false).unwrap();
        assert_eq!(notes[0].entries.len(), 1);
        assert_eq!(notes[1].entries.len(), 2);
        assert!(notes[1].entries.iter().all(|e| e.note_id == note.id));
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_hide_and_restore(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();
        let note = journal.get_or_create_for(day(3)).unwrap();
        journal.get_or_create_for(day(4)).unwrap();

        journal.hide(note.id).unwrap();
        assert_eq!(journal.list_notes(false).unwrap().len(), 1);
        let all = journal.list_notes(true).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|n| n.id == note.id && n.hidden));

        journal.restore(note.id).unwrap();
        assert_eq!(journal.list_notes(false).unwrap().len(), 2);
        assert_eq!(journal.hide(999).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(journal.restore(999).unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_edit_and_delete_entries(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();
        let note = journal.get_or_create_for(day(3)).unwrap();
        let entry = journal.add_entry_at(note.id, "typo", at(3, 10, 0)).unwrap();

        journal.edit_entry(entry, "fixed").unwrap();
        assert_eq!(journal.get_note(note.id).unwrap().entries[0].body, "fixed");
        assert_eq!(journal.edit_entry(entry, "  ").unwrap_err().kind(), ErrorKind::Validation);

        journal.delete_entry(entry).unwrap();
        assert!(journal.get_note(note.id).unwrap().entries.is_empty());
        assert_eq!(journal.delete_entry(entry).unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(journal.edit_entry(entry, "again").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_entry_validation_and_missing_note(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();
        let note = journal.get_or_create_for(day(3)).unwrap();

        assert_eq!(journal.add_entry(note.id, "").unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(journal.add_entry(999, "text").unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(journal.get_note(999).unwrap_err().kind(), ErrorKind::NotFound);
        assert!(journal.find_by_date(day(20)).unwrap().is_none());
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_failed_note_insert_leaves_nothing(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();
        ctx.db
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_notes BEFORE INSERT ON journal_notes
                 BEGIN SELECT RAISE(ABORT, 'notes rejected'); END;",
            )
            .unwrap();

        let err = journal.get_or_create_for(day(9)).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(journal.list_notes(true).unwrap().is_empty());
        ctx.db.conn.execute_batch("DROP TRIGGER reject_notes").unwrap();
        assert_eq!(journal.get_or_create_for(day(9)).unwrap().date, day(9));
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_list_more_notes_than_sqlite_can_bind(ctx: &mut JournalTestContext) {
        let journal = Journal::new(&ctx.db).unwrap();
        ctx.db
            .conn
            .execute(
                "WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 33000)
                 INSERT INTO journal_notes (date) SELECT date('1900-01-01', '+' || n || ' days') FROM seq",
                [],
            )
            .unwrap();
        let note = journal.get_or_create_for(day(1)).unwrap();
        journal.add_entry_at(note.id, "still attached", at(1, 8, 0)).unwrap();

        let notes = journal.list_notes(false).unwrap();

        assert_eq!(notes.len(), 33001);
        assert_eq!(notes[0].date, day(1));
        assert_eq!(notes[0].entries.len(), 1);
        assert_eq!(notes[0].entries[0].body, "still attached");
    }
}
