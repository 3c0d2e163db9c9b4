//! Repository and unit-of-work behavior over the in-memory backend

use rust_decimal_macros::dec;

use transact_api::domain::item::Item;
use transact_api::domain::repository::{Entity, Filter, PageRequest};
use transact_api::domain::uow::UnitOfWork;
use transact_api::domain::user::User;
use transact_api::infrastructure::memory::{MemStore, MemUnitOfWork};

fn uow() -> MemUnitOfWork {
    MemUnitOfWork::new(MemStore::new())
}

#[tokio::test]
async fn test_identity_is_assigned_at_save() {
    let uow = uow();

    let staged = uow
        .users()
        .add(User::new("alice", "alice@example.com", "hash"))
        .await
        .unwrap();
    assert_eq!(staged.id(), None);

    uow.save_changes().await.unwrap();

    let saved = uow
        .users()
        .get_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.id(), Some(1));
}

#[tokio::test]
async fn test_sequential_identities() {
    let uow = uow();

    for i in 0..3 {
        uow.items()
            .add(Item::new(
                format!("item-{}", i),
                "desc",
                dec!(1.0),
            ))
            .await
            .unwrap();
    }
    uow.save_changes().await.unwrap();

    let ids: Vec<_> = uow
        .items()
        .get_all()
        .await
        .unwrap()
        .iter()
        .map(|i| i.id())
        .collect();
    assert_eq!(ids, vec![Some(1), Some(2), Some(3)]);
}

#[tokio::test]
async fn test_pages_are_disjoint_and_cover_everything() {
    let uow = uow();

    for i in 0..10 {
        uow.items()
            .add(Item::new(format!("item-{:02}", i), "desc", dec!(1.0)))
            .await
            .unwrap();
    }
    uow.save_changes().await.unwrap();

    let mut seen = Vec::new();
    for page_number in 1..=4 {
        let page = uow.items().get_page(page_number, 3).await.unwrap();
        for item in &page {
            let id = item.id().unwrap();
            assert!(!seen.contains(&id), "id {} appeared twice", id);
            seen.push(id);
        }
    }

    assert_eq!(seen.len(), 10);
}

#[tokio::test]
async fn test_filtered_page_reports_total() {
    let uow = uow();

    for i in 0..6 {
        uow.users()
            .add(User::new(
                format!("user{}", i),
                format!("user{}@example.com", i),
                "hash",
            ))
            .await
            .unwrap();
    }
    uow.save_changes().await.unwrap();

    let request = PageRequest::new(1, 2).with_filter(Filter::eq("username", "user3"));
    let (page, total) = uow.users().get_page_filtered(request).await.unwrap();

    assert_eq!(page.len(), 1);
    assert_eq!(total, 1);

    let (page, total) = uow
        .users()
        .get_page_filtered(PageRequest::new(2, 4))
        .await
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(total, 6);
}

#[tokio::test]
async fn test_unknown_filter_column_is_rejected() {
    let uow = uow();

    let result = uow.users().find(Filter::eq("no_such_column", 1)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unsupported_operations_say_so() {
    let uow = uow();

    let includes = uow
        .users()
        .get_with_includes(Filter::eq("id", 1), &["transactions"])
        .await;
    assert!(includes.is_err());

    let raw = uow.users().from_sql_raw("SELECT * FROM users").await;
    assert!(raw.is_err());
}

#[tokio::test]
async fn test_failed_batch_can_be_retried_after_fixing() {
    let store = MemStore::new();
    let uow = MemUnitOfWork::new(store.clone());

    // Duplicate emails in one batch: second insert fails, batch stays
    // staged, nothing is applied.
    uow.users()
        .add(User::new("a", "same@example.com", "h"))
        .await
        .unwrap();
    uow.users()
        .add(User::new("b", "same@example.com", "h"))
        .await
        .unwrap();
    assert!(uow.save_changes().await.is_err());
    assert!(uow.users().get_all().await.unwrap().is_empty());

    uow.discard_changes().await;

    uow.users()
        .add(User::new("a", "a@example.com", "h"))
        .await
        .unwrap();
    assert_eq!(uow.save_changes().await.unwrap(), 1);
}

#[tokio::test]
async fn test_delete_by_id_default_method() {
    let uow = uow();

    uow.users()
        .add(User::new("alice", "alice@example.com", "hash"))
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    assert!(uow.users().delete_by_id(1).await.unwrap());
    uow.save_changes().await.unwrap();
    assert!(uow.users().get_by_id(1).await.unwrap().is_none());

    assert!(!uow.users().delete_by_id(42).await.unwrap());
}

#[tokio::test]
async fn test_transact_delete_by_date() {
    use chrono::{TimeZone, Utc};
    use transact_api::domain::transact::Transact;

    let uow = uow();
    uow.users()
        .add(User::new("alice", "alice@example.com", "hash"))
        .await
        .unwrap();
    uow.items()
        .add(Item::new("sword", "sharp", dec!(10.0)))
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    let date = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    uow.transacts()
        .create(Transact::new(1, date, vec![1]))
        .await
        .unwrap();
    uow.save_changes().await.unwrap();

    assert!(uow.transacts().delete_by_date(date).await.unwrap());
    uow.save_changes().await.unwrap();
    assert!(uow.transacts().get_all().await.unwrap().is_empty());

    assert!(!uow.transacts().delete_by_date(date).await.unwrap());
}
