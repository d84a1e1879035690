//! Store tests against a real database. Run with
//! `DATABASE_URL=postgres://... cargo test --test postgres_store -- --ignored`.

use bookshelf::application::repos::{
    AuthorStore, BookStore, CreateAuthorParams, CreateBookParams, StoreError, StoreHealth,
    UpdateAuthorParams, UpdateBookParams,
};
use bookshelf::infra::db::PostgresStore;
use sqlx::PgPool;

fn author(name: &str, email: Option<&str>) -> CreateAuthorParams {
    CreateAuthorParams {
        name: name.to_string(),
        email: email.map(str::to_string),
        bio: Some("Writes things.".to_string()),
        birth_date: bookshelf::domain::dates::parse_iso_date("1980-01-01"),
    }
}

fn book(author_id: i64, title: &str) -> CreateBookParams {
    CreateBookParams {
        title: title.to_string(),
        author_id,
        description: None,
        publish_date: bookshelf::domain::dates::parse_iso_date("2020-05-17"),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn authors_round_trip_and_update_partially(pool: PgPool) {
    let store = PostgresStore::new(pool);

    let created = store
        .create_author(author("Jane Doe", Some("jane@example.com")))
        .await
        .expect("create");
    assert_eq!(created.name, "Jane Doe");

    let updated = store
        .update_author(
            created.id,
            UpdateAuthorParams {
                bio: Some(None),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    assert!(updated);

    let found = store
        .find_author(created.id)
        .await
        .expect("find")
        .expect("author exists");
    assert_eq!(found.name, "Jane Doe");
    assert_eq!(found.bio, None);
    assert_eq!(found.birth_date, created.birth_date);
    assert!(found.updated_at >= created.updated_at);

    assert!(
        !store
            .update_author(created.id + 1000, UpdateAuthorParams::default())
            .await
            .expect("update missing")
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_maps_to_duplicate_error(pool: PgPool) {
    let store = PostgresStore::new(pool);
    store
        .create_author(author("Jane Doe", Some("jane@example.com")))
        .await
        .expect("create");

    let err = store
        .create_author(author("Other", Some("jane@example.com")))
        .await
        .expect_err("duplicate email");

    assert!(matches!(
        err,
        StoreError::Duplicate { ref constraint } if constraint == "authors_email_unique"
    ));
    assert!(
        store
            .author_email_taken("jane@example.com", None)
            .await
            .expect("lookup")
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deleting_an_author_cascades_to_books(pool: PgPool) {
    let store = PostgresStore::new(pool);
    let jane = store
        .create_author(author("Jane Doe", None))
        .await
        .expect("create");
    for title in ["One", "Two", "Three"] {
        store.create_book(book(jane.id, title)).await.expect("book");
    }

    assert_eq!(
        store
            .list_books_for_author(jane.id)
            .await
            .expect("books")
            .len(),
        3
    );
    assert!(store.delete_author(jane.id).await.expect("delete"));
    assert_eq!(store.count_books().await.expect("count"), 0);
    assert!(!store.author_exists(jane.id).await.expect("exists"));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn books_page_in_insertion_order(pool: PgPool) {
    let store = PostgresStore::new(pool);
    let jane = store
        .create_author(author("Jane Doe", None))
        .await
        .expect("create");
    for n in 1..=7 {
        store
            .create_book(book(jane.id, &format!("Book {n}")))
            .await
            .expect("book");
    }

    let page = store.list_books_page(3, 3).await.expect("page");
    let titles: Vec<&str> = page.iter().map(|book| book.title.as_str()).collect();
    assert_eq!(titles, ["Book 4", "Book 5", "Book 6"]);
    assert_eq!(store.count_books().await.expect("count"), 7);

    let first = &page[0];
    assert!(
        store
            .update_book(
                first.id,
                UpdateBookParams {
                    title: Some("Renamed".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update")
    );
    let renamed = store.find_book(first.id).await.expect("find").expect("book");
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.publish_date, first.publish_date);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn book_with_unknown_author_is_rejected_by_the_foreign_key(pool: PgPool) {
    let store = PostgresStore::new(pool);

    let err = store
        .create_book(book(4242, "Orphan"))
        .await
        .expect_err("foreign key");

    assert!(matches!(err, StoreError::InvalidInput { .. }));
    store.ping().await.expect("ping");
}
