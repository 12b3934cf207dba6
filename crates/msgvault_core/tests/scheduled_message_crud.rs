mod common;

use common::{sample_message, LockedCipher, ReverseCipher, ENVELOPE_PREFIX};
use msgvault_core::db::open_db_in_memory;
use msgvault_core::{
    query_records, CipherErrorKind, RemoteScheduledMessageBody, RepoError, ScheduleMessageRequest,
    ScheduledMessage, ScheduledMessageQuery, ScheduledMessageRepository, ScheduledMessageService,
    SqliteScheduledMessageRepository,
};
use rusqlite::Connection;

fn row_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM scheduled_message;", [], |row| row.get(0))
        .unwrap()
}

fn remote_body(device_id: i64, title: &str) -> RemoteScheduledMessageBody {
    RemoteScheduledMessageBody {
        device_id,
        title: title.to_string(),
        to: "5550100".to_string(),
        data: "synced body".to_string(),
        mime_type: "text/plain".to_string(),
        timestamp: 2_000,
    }
}

#[test]
fn insert_and_get_roundtrip() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);

    let message = sample_message("Lunch", 1_000);
    let id = repo.insert(&message).expect("insert should return id");
    assert_eq!(id, 1);

    let loaded = repo.get(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.title, message.title);
    assert_eq!(loaded.destination, message.destination);
    assert_eq!(loaded.payload, message.payload);
    assert_eq!(loaded.mime_type, message.mime_type);
    assert_eq!(loaded.timestamp, message.timestamp);
}

#[test]
fn stored_text_columns_are_ciphertext() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);
    let id = repo.insert(&sample_message("Lunch", 1_000)).expect("insert should return id");

    let (title, destination, data, mime_type, timestamp): (String, String, String, String, i64) =
        conn.query_row(
            "SELECT title, phone_number, data, mime_type, timestamp
             FROM scheduled_message WHERE _id = ?1;",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
        )
        .unwrap();

    assert_eq!(title, "enc:hcnuL");
    for value in [&destination, &data, &mime_type] {
        assert!(value.starts_with(ENVELOPE_PREFIX), "plaintext at rest: {value}");
    }
    assert_eq!(timestamp, 1_000);
}

#[test]
fn insert_does_not_mutate_caller_record() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);

    let message = sample_message("Lunch", 1_000);
    let before = message.clone();
    repo.insert(&message).expect("insert should return id");
    assert_eq!(message, before);
}

#[test]
fn encrypt_failure_writes_nothing() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &LockedCipher);

    let err = repo.insert(&sample_message("Lunch", 1_000)).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Cipher(ref cause) if cause.kind() == CipherErrorKind::KeyUnavailable
    ));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn insert_rejects_missing_required_field() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);

    let mut message = sample_message("Lunch", 1_000);
    message.payload = None;
    let err = repo.insert(&message).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(row_count(&conn), 0);
}

#[test]
fn list_survives_corrupted_row() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);
    let first = repo.insert(&sample_message("first", 1_000)).expect("insert should return id");
    let second = repo.insert(&sample_message("second", 2_000)).expect("insert should return id");

    conn.execute(
        "UPDATE scheduled_message SET phone_number = 'corrupted' WHERE _id = ?1;",
        [first],
    )
    .unwrap();

    let messages = repo.list(&ScheduledMessageQuery::default()).unwrap();
    assert_eq!(messages.len(), 2);

    assert_eq!(messages[0].id, first);
    assert_eq!(messages[0].title.as_deref(), Some("first"));
    assert_eq!(messages[0].destination.as_deref(), Some("corrupted"));
    assert_eq!(messages[0].payload.as_deref(), Some("see you at noon"));

    assert_eq!(messages[1].id, second);
    assert_eq!(messages[1].destination.as_deref(), Some("5550100"));
}

#[test]
fn list_skips_row_with_unreadable_timestamp() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);
    let garbled = repo
        .insert(&sample_message("garbled", 1_000))
        .expect("insert should return id");
    let intact = repo
        .insert(&sample_message("intact", 2_000))
        .expect("insert should return id");

    conn.execute(
        "UPDATE scheduled_message SET timestamp = 'garbled' WHERE _id = ?1;",
        [garbled],
    )
    .expect("corrupt timestamp cell");

    let messages = repo
        .list(&ScheduledMessageQuery::default())
        .expect("list should tolerate unreadable rows");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, intact);
    assert_eq!(messages[0].title.as_deref(), Some("intact"));
    assert_eq!(messages[0].timestamp, 2_000);

    assert_eq!(repo.get(garbled).expect("get should not fail"), None);
    assert_eq!(row_count(&conn), 2);

    let service = ScheduledMessageService::new(repo);
    let upcoming = service.upcoming().expect("upcoming should not fail");
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].id, intact);
}

#[test]
fn read_with_wrong_key_returns_ciphertext_without_error() {
    let conn = open_db_in_memory().expect("open db");
    let id = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher)
        .insert(&sample_message("Lunch", 1_000))
        .unwrap();

    let locked = SqliteScheduledMessageRepository::new(&conn, &LockedCipher);
    let loaded = locked.get(id).unwrap().unwrap();
    assert_eq!(loaded.title.as_deref(), Some("enc:hcnuL"));
}

#[test]
fn hydration_ignores_select_column_order_and_extra_columns() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);
    let id = repo.insert(&sample_message("Lunch", 1_000)).expect("insert should return id");

    let mut stmt = conn
        .prepare(
            "SELECT timestamp, data, 'extra' AS color, _id, mime_type, phone_number, title
             FROM scheduled_message WHERE _id = ?1;",
        )
        .unwrap();
    let shuffled: Vec<ScheduledMessage> = query_records(&mut stmt, [id], &ReverseCipher).unwrap();

    assert_eq!(shuffled.len(), 1);
    assert_eq!(Some(&shuffled[0]), repo.get(id).unwrap().as_ref());
}

#[test]
fn update_and_delete_existing_row() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);
    let id = repo.insert(&sample_message("Lunch", 1_000)).expect("insert should return id");

    let mut message = repo.get(id).unwrap().unwrap();
    message.title = Some("Late lunch".to_string());
    message.timestamp = 3_000;
    repo.update(&message).expect("update should succeed");

    let loaded = repo.get(id).unwrap().unwrap();
    assert_eq!(loaded.title.as_deref(), Some("Late lunch"));
    assert_eq!(loaded.timestamp, 3_000);

    repo.delete(id).expect("delete should succeed");
    assert_eq!(repo.get(id).unwrap(), None);
}

#[test]
fn update_and_delete_missing_row_return_not_found() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);

    let mut message = sample_message("ghost", 1);
    message.id = 77;
    assert!(matches!(repo.update(&message), Err(RepoError::NotFound(77))));
    assert!(matches!(repo.delete(77), Err(RepoError::NotFound(77))));
}

#[test]
fn list_filters_by_due_time_and_orders_by_timestamp() {
    let conn = open_db_in_memory().expect("open db");
    let repo = SqliteScheduledMessageRepository::new(&conn, &ReverseCipher);
    repo.insert(&sample_message("later", 3_000)).expect("insert should return id");
    repo.insert(&sample_message("soon", 1_000)).expect("insert should return id");
    repo.insert(&sample_message("middle", 2_000)).expect("insert should return id");

    let due = repo
        .list(&ScheduledMessageQuery {
            due_at_or_before: Some(2_000),
            limit: None,
        })
        .unwrap();
    let titles: Vec<_> = due.iter().filter_map(|m| m.title.as_deref()).collect();
    assert_eq!(titles, ["soon", "middle"]);

    let first = repo
        .list(&ScheduledMessageQuery {
            due_at_or_before: None,
            limit: Some(1),
        })
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].title.as_deref(), Some("soon"));
}

#[test]
fn service_applies_remote_body_keyed_by_device_id() {
    let conn = open_db_in_memory().expect("open db");
    let service =
        ScheduledMessageService::new(SqliteScheduledMessageRepository::new(&conn, &ReverseCipher));

    let id = service
        .apply_remote(&remote_body(42, "from phone"))
        .expect("apply_remote should succeed");
    assert_eq!(id, 42);
    service
        .apply_remote(&remote_body(42, "edited on tablet"))
        .expect("apply_remote should succeed");

    assert_eq!(row_count(&conn), 1);
    let loaded = service.get(42).unwrap().unwrap();
    assert_eq!(loaded.title.as_deref(), Some("edited on tablet"));
    assert_eq!(loaded.destination.as_deref(), Some("5550100"));
    assert_eq!(loaded.payload.as_deref(), Some("synced body"));

    let exported = service.export_remote(42).unwrap().unwrap();
    assert_eq!(exported, remote_body(42, "edited on tablet"));
    assert_eq!(service.export_remote(43).unwrap(), None);
}

#[test]
fn service_reapplying_body_with_zero_device_id_replaces_row() {
    let conn = open_db_in_memory().expect("open db");
    let service =
        ScheduledMessageService::new(SqliteScheduledMessageRepository::new(&conn, &ReverseCipher));

    let first = service
        .apply_remote(&remote_body(0, "draft"))
        .expect("apply_remote should succeed");
    let second = service
        .apply_remote(&remote_body(0, "final"))
        .expect("apply_remote should succeed");

    assert_eq!((first, second), (0, 0));
    assert_eq!(row_count(&conn), 1);
    let loaded = service.get(0).unwrap().unwrap();
    assert_eq!(loaded.title.as_deref(), Some("final"));
}

#[test]
fn service_schedules_and_cancels_due_messages() {
    let conn = open_db_in_memory().expect("open db");
    let service =
        ScheduledMessageService::new(SqliteScheduledMessageRepository::new(&conn, &ReverseCipher));

    let due_id = service
        .schedule(&ScheduleMessageRequest {
            title: "Mom".to_string(),
            destination: "5550100".to_string(),
            payload: "happy birthday".to_string(),
            mime_type: "text/plain".to_string(),
            timestamp: 500,
        })
        .unwrap();
    service
        .schedule(&ScheduleMessageRequest {
            title: "Dad".to_string(),
            destination: "5550101".to_string(),
            payload: "see you sunday".to_string(),
            mime_type: "text/plain".to_string(),
            timestamp: 5_000,
        })
        .unwrap();

    let due = service.due_messages(1_000).unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, due_id);
    assert!(due[0].is_text());

    service.cancel(due_id).expect("cancel should succeed");
    assert!(service.due_messages(1_000).unwrap().is_empty());
    assert_eq!(service.upcoming().unwrap().len(), 1);
}

#[test]
fn service_reschedule_moves_delivery_time() {
    let conn = open_db_in_memory().expect("open db");
    let service =
        ScheduledMessageService::new(SqliteScheduledMessageRepository::new(&conn, &ReverseCipher));
    let id = service.apply_remote(&remote_body(9, "ping")).expect("apply_remote should succeed");

    let mut message = service.get(id).unwrap().unwrap();
    message.timestamp = 100;
    service.reschedule(&message).expect("reschedule should succeed");

    assert_eq!(service.due_messages(100).unwrap()[0].id, 9);
}
