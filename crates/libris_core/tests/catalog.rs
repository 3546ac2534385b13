use libris_core::{
    open_db_in_memory, CatalogService, LibraryError, NewBook, NewMember, ValidationError,
};

#[test]
fn add_book_makes_every_copy_available() {
    let mut db = open_db_in_memory().unwrap();
    let mut catalog = CatalogService::new(&mut db);

    let id = catalog
        .add_book(
            &NewBook::new("Dune", "Frank Herbert")
                .with_genre("Science fiction")
                .with_copies(3),
        )
        .unwrap();

    let book = catalog.get_book(id).unwrap().unwrap();
    assert_eq!(book.title, "Dune");
    assert_eq!(book.genre.as_deref(), Some("Science fiction"));
    assert_eq!(book.isbn, None);
    assert_eq!(book.copies_total, 3);
    assert_eq!(book.copies_available, 3);
}

#[test]
fn add_book_rejects_negative_copies_without_inserting() {
    let mut db = open_db_in_memory().unwrap();
    let mut catalog = CatalogService::new(&mut db);

    let err = catalog
        .add_book(&NewBook::new("Dune", "Frank Herbert").with_copies(-1))
        .unwrap_err();

    assert!(matches!(
        err,
        LibraryError::Validation(ValidationError::NegativeCopies(-1))
    ));
    assert!(catalog.list_books().unwrap().is_empty());
}

#[test]
fn list_books_is_empty_for_new_catalog() {
    let mut db = open_db_in_memory().unwrap();
    assert!(CatalogService::new(&mut db).list_books().unwrap().is_empty());
}

#[test]
fn list_books_orders_by_title() {
    let mut db = open_db_in_memory().unwrap();
    let mut catalog = CatalogService::new(&mut db);
    for title in ["Neuromancer", "Dune", "Solaris"] {
        catalog.add_book(&NewBook::new(title, "Someone")).unwrap();
    }

    let titles: Vec<String> = catalog
        .list_books()
        .unwrap()
        .into_iter()
        .map(|book| book.title)
        .collect();
    assert_eq!(titles, ["Dune", "Neuromancer", "Solaris"]);
}

#[test]
fn add_member_returns_assigned_ids() {
    let mut db = open_db_in_memory().unwrap();
    let mut catalog = CatalogService::new(&mut db);

    let alice = catalog
        .add_member(&NewMember::new("Alice").with_email("alice@example.org"))
        .unwrap();
    let bob = catalog.add_member(&NewMember::new("Bob")).unwrap();
    assert_ne!(alice, bob);

    let members = catalog.list_members().unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(members[0].id, alice);
    assert_eq!(members[0].email.as_deref(), Some("alice@example.org"));
    assert_eq!(members[1].email, None);
}

#[test]
fn add_member_rejects_empty_name() {
    let mut db = open_db_in_memory().unwrap();
    let mut catalog = CatalogService::new(&mut db);

    let err = catalog.add_member(&NewMember::new("")).unwrap_err();
    assert!(matches!(
        err,
        LibraryError::Validation(ValidationError::EmptyField("full_name"))
    ));
    assert!(catalog.list_members().unwrap().is_empty());
}

#[test]
fn get_member_returns_none_for_unknown_id() {
    let mut db = open_db_in_memory().unwrap();
    assert!(CatalogService::new(&mut db)
        .get_member(404)
        .unwrap()
        .is_none());
}
