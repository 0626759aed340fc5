use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{Engine, EngineError, EntryKind, EntryPatch, EntryStatus, NewEntry};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db.clone()).build().await.unwrap();
    (engine, db)
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

async fn stored_balance(db: &DatabaseConnection, entry_id: Uuid) -> Option<i64> {
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT balance_minor AS value FROM ledger_entries WHERE id = ?",
            [entry_id.to_string().into()],
        ))
        .await
        .unwrap();
    row.map(|r| r.try_get("", "value").unwrap())
}

async fn entry_count(db: &DatabaseConnection, customer_id: &str) -> i64 {
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT COUNT(*) AS value FROM ledger_entries WHERE customer_id = ?",
            [customer_id.into()],
        ))
        .await
        .unwrap();
    row.map(|r| r.try_get("", "value").unwrap()).unwrap_or(0)
}

#[tokio::test]
async fn manual_debit_with_tax_extends_the_running_balance() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_entry(NewEntry::new("cust-1", date(1), "Opening balance").debit(1000_00))
        .await
        .unwrap();

    let (principal, tax) = engine
        .create_entry(
            NewEntry::new("cust-1", date(10), "Consulting fee")
                .debit(500_00)
                .tax(1000, 50_00),
        )
        .await
        .unwrap();
    let tax = tax.unwrap();

    assert_eq!(principal.debit_minor, 500_00);
    assert_eq!(principal.balance_minor, 1500_00);
    assert_eq!(tax.debit_minor, 50_00);
    assert_eq!(tax.balance_minor, 1550_00);
    assert_eq!(tax.sequence, principal.sequence.tax_slot());
    assert_eq!(tax.sequence.as_f64(), principal.sequence.as_f64() + 0.5);
    assert_eq!(tax.principal_entry_id, Some(principal.id));
    assert_eq!(tax.entry_no, principal.entry_no + 1);
}

#[tokio::test]
async fn credit_principals_get_credit_tax_siblings() {
    let (engine, _db) = engine_with_db().await;

    let (principal, tax) = engine
        .create_entry(
            NewEntry::new("cust-1", date(10), "Settlement")
                .credit(200_00)
                .tax(1000, 20_00),
        )
        .await
        .unwrap();
    let tax = tax.unwrap();

    assert_eq!(principal.balance_minor, -200_00);
    assert_eq!(tax.credit_minor, 20_00);
    assert_eq!(tax.balance_minor, -220_00);
}

#[tokio::test]
async fn tax_kinds_do_not_get_siblings_of_their_own() {
    let (engine, _db) = engine_with_db().await;

    let (_, tax) = engine
        .create_entry(
            NewEntry::new("cust-1", date(10), "Tax 10% on INV-1")
                .debit(50_00)
                .tax(1000, 50_00)
                .kind(EntryKind::InvoiceTax),
        )
        .await
        .unwrap();
    assert!(tax.is_none());
}

#[tokio::test]
async fn create_validates_amounts_before_persisting() {
    let (engine, db) = engine_with_db().await;

    let no_amount = NewEntry::new("cust-1", date(10), "Broken");
    let both_sides = NewEntry::new("cust-1", date(10), "Broken").debit(10).credit(10);
    let negative = NewEntry::new("cust-1", date(10), "Broken").debit(-5);
    let blank_description = NewEntry::new("cust-1", date(10), "  ").debit(10);

    for cmd in [no_amount, both_sides, negative, blank_description] {
        let err = engine.create_entry(cmd).await.unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "{err}");
    }
    assert_eq!(entry_count(&db, "cust-1").await, 0);
}

#[tokio::test]
async fn same_day_entries_take_increasing_whole_sequences() {
    let (engine, _db) = engine_with_db().await;

    let (first, _) = engine
        .create_entry(NewEntry::new("cust-1", date(10), "First").debit(10_00))
        .await
        .unwrap();
    let (second, _) = engine
        .create_entry(NewEntry::new("cust-1", date(10), "Second").debit(20_00))
        .await
        .unwrap();

    assert_eq!(first.sequence.as_f64(), 1.0);
    assert_eq!(second.sequence.as_f64(), 2.0);
    assert_eq!(second.entry_no, first.entry_no + 1);
}

#[tokio::test]
async fn single_create_chains_from_the_chronological_tail() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_entry(NewEntry::new("cust-1", date(1), "Opening").debit(1000_00))
        .await
        .unwrap();
    engine
        .create_entry(NewEntry::new("cust-1", date(5), "Payment").credit(700_00))
        .await
        .unwrap();

    // Tail balance is 300, the max persisted balance is 1000: single create
    // must take the tail.
    let (entry, _) = engine
        .create_entry(NewEntry::new("cust-1", date(10), "New charge").debit(100_00))
        .await
        .unwrap();
    assert_eq!(entry.balance_minor, 400_00);
}

#[tokio::test]
async fn bulk_create_chains_from_the_max_persisted_balance() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_entry(NewEntry::new("cust-1", date(1), "Opening").debit(1000_00))
        .await
        .unwrap();
    engine
        .create_entry(NewEntry::new("cust-1", date(5), "Payment").credit(700_00))
        .await
        .unwrap();

    // Same starting state as the single-create test; the bulk path chains
    // from the maximum (1000), not the tail (300). Divergent on purpose.
    let created = engine
        .create_entries_bulk(
            "cust-1",
            vec![NewEntry::new("cust-1", date(10), "New charge").debit(100_00)],
        )
        .await
        .unwrap();
    assert_eq!(created[0].balance_minor, 1100_00);
}

#[tokio::test]
async fn bulk_chaining_accumulates_over_the_batch() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_entry(NewEntry::new("cust-1", date(1), "Opening").debit(1000_00))
        .await
        .unwrap();

    let created = engine
        .create_entries_bulk(
            "cust-1",
            vec![
                NewEntry::new("cust-1", date(10), "Principal").debit(200_00),
                NewEntry::new("cust-1", date(10), "More").debit(300_00),
            ],
        )
        .await
        .unwrap();

    // Starting max balance 1000 plus the whole batch's deltas.
    assert_eq!(created.last().unwrap().balance_minor, 1500_00);
}

#[tokio::test]
async fn bulk_chaining_uses_max_within_the_batch_too() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_entries_bulk(
            "cust-1",
            vec![
                NewEntry::new("cust-1", date(10), "Charge").debit(100_00),
                NewEntry::new("cust-1", date(11), "Partial payment").credit(50_00),
                NewEntry::new("cust-1", date(12), "Fee").debit(10_00),
            ],
        )
        .await
        .unwrap();

    assert_eq!(created[0].balance_minor, 100_00);
    assert_eq!(created[1].balance_minor, 50_00);
    // The third item chains from max(100, 50), not from the tail.
    assert_eq!(created[2].balance_minor, 110_00);
}

#[tokio::test]
async fn bulk_tax_items_adopt_the_preceding_principal_slot() {
    let (engine, _db) = engine_with_db().await;

    let created = engine
        .create_entries_bulk(
            "cust-1",
            vec![
                NewEntry::new("cust-1", date(10), "Invoice INV-5")
                    .debit(500_00)
                    .bill_reference("INV-5")
                    .kind(EntryKind::Invoice),
                NewEntry::new("cust-1", date(10), "Tax 10% on INV-5")
                    .debit(50_00)
                    .bill_reference("INV-5")
                    .kind(EntryKind::InvoiceTax),
            ],
        )
        .await
        .unwrap();

    assert_eq!(created[1].sequence, created[0].sequence.tax_slot());
    assert_eq!(created[1].principal_entry_id, Some(created[0].id));
}

#[tokio::test]
async fn bulk_is_all_or_nothing() {
    let (engine, db) = engine_with_db().await;

    let result = engine
        .create_entries_bulk(
            "cust-1",
            vec![
                NewEntry::new("cust-1", date(10), "Good").debit(100_00),
                NewEntry::new("cust-1", date(11), "Bad"),
            ],
        )
        .await;

    assert!(matches!(result, Err(EngineError::Validation(_))));
    assert_eq!(entry_count(&db, "cust-1").await, 0);
}

#[tokio::test]
async fn bulk_rejects_empty_and_mixed_customer_batches() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.create_entries_bulk("cust-1", Vec::new()).await,
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine
            .create_entries_bulk(
                "cust-1",
                vec![NewEntry::new("cust-2", date(10), "Stray").debit(10_00)]
            )
            .await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn delete_recomputes_downstream_and_preserves_upstream() {
    let (engine, db) = engine_with_db().await;

    let (first, _) = engine
        .create_entry(NewEntry::new("cust-1", date(1), "Opening").debit(1000_00))
        .await
        .unwrap();
    let (second, _) = engine
        .create_entry(NewEntry::new("cust-1", date(10), "Charge").debit(500_00))
        .await
        .unwrap();
    let (third, _) = engine
        .create_entry(NewEntry::new("cust-1", date(20), "Payment").credit(200_00))
        .await
        .unwrap();
    assert_eq!(third.balance_minor, 1300_00);

    engine.delete_entry(second.id).await.unwrap();

    // Downstream balances equal the as-if-never-existed fold; upstream rows
    // are untouched.
    assert_eq!(stored_balance(&db, first.id).await, Some(1000_00));
    assert_eq!(stored_balance(&db, third.id).await, Some(800_00));
    assert_eq!(stored_balance(&db, second.id).await, None);
}

#[tokio::test]
async fn delete_cascades_to_the_linked_tax_sibling() {
    let (engine, db) = engine_with_db().await;

    let (principal, tax) = engine
        .create_entry(
            NewEntry::new("cust-1", date(10), "Consulting fee")
                .debit(500_00)
                .tax(1000, 50_00),
        )
        .await
        .unwrap();
    assert_eq!(entry_count(&db, "cust-1").await, 2);

    engine.delete_entry(principal.id).await.unwrap();

    assert_eq!(entry_count(&db, "cust-1").await, 0);
    assert_eq!(stored_balance(&db, tax.unwrap().id).await, None);
}

#[tokio::test]
async fn delete_missing_entry_is_not_found() {
    let (engine, _db) = engine_with_db().await;
    let err = engine.delete_entry(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn update_touches_non_amount_fields_only() {
    let (engine, _db) = engine_with_db().await;

    let (entry, _) = engine
        .create_entry(NewEntry::new("cust-1", date(10), "Charge").debit(500_00))
        .await
        .unwrap();

    let updated = engine
        .update_entry(
            entry.id,
            EntryPatch {
                description: Some("Charge (reviewed)".to_string()),
                status: Some(EntryStatus::Paid),
                due_date: Some(date(30)),
                payment_mode: Some("bank transfer".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.description, "Charge (reviewed)");
    assert_eq!(updated.status, EntryStatus::Paid);
    assert_eq!(updated.due_date, Some(date(30)));
    assert_eq!(updated.payment_mode.as_deref(), Some("bank transfer"));
    // Balance-affecting fields are untouched.
    assert_eq!(updated.debit_minor, 500_00);
    assert_eq!(updated.balance_minor, entry.balance_minor);
    assert_eq!(updated.sequence, entry.sequence);
}

#[tokio::test]
async fn update_rejects_empty_patches_and_missing_entries() {
    let (engine, _db) = engine_with_db().await;

    assert!(matches!(
        engine.update_entry(Uuid::new_v4(), EntryPatch::default()).await,
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine
            .update_entry(
                Uuid::new_v4(),
                EntryPatch {
                    description: Some("x".to_string()),
                    ..Default::default()
                }
            )
            .await,
        Err(EngineError::NotFound(_))
    ));
}
