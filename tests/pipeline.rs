use bookshop_app::bookshop::{
    export_oldest_science_books, export_prolific_authors, import_authors, import_books,
    oldest_science_books, prolific_authors, OLDEST_BOOKS_LIMIT,
};
use bookshop_db::{JsonFileStore, MemoryStore, Store};
use chrono::NaiveDate;

fn book(name: &str, genre: u8, price: &str, pages: u32, published: &str) -> String {
    format!(
        "<Book><Name>{}</Name><Genre>{}</Genre><Price>{}</Price><Pages>{}</Pages><PublishedOn>{}</PublishedOn></Book>",
        name, genre, price, pages, published
    )
}

fn books(entries: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Books>{}</Books>",
        entries.concat()
    )
}

fn author(first: &str, last: &str, email: &str, ids: &[i64]) -> String {
    let refs: Vec<String> = ids.iter().map(|id| format!(r#"{{"Id":{}}}"#, id)).collect();
    format!(
        r#"{{"FirstName":"{}","LastName":"{}","Email":"{}","Phone":"088-812-3456","Books":[{}]}}"#,
        first,
        last,
        email,
        refs.join(",")
    )
}

fn cutoff(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

#[test]
fn dune_round_trip() {
    let mut store = MemoryStore::new();

    let report = import_books(&mut store, &books(&[book("Dune", 1, "15.5", 500, "08/01/1965")]))
        .unwrap();
    assert_eq!(report.to_string(), "Successfully imported book Dune for 15.50.");

    let report = import_authors(
        &mut store,
        &format!(
            "[{},{}]",
            author("Frank", "Herbert", "frank@example.com", &[1]),
            author("Nobody", "Known", "nobody@example.com", &[999]),
        ),
    )
    .unwrap();
    assert_eq!(
        report.to_string(),
        "Successfully imported author - Frank Herbert with 1 books.\nInvalid data!"
    );
    assert_eq!(report.imported(), 1);
    assert_eq!(report.rejected(), 1);

    let json = export_prolific_authors(&store).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([{
            "AuthorName": "Frank Herbert",
            "Books": [{ "BookName": "Dune", "BookPrice": "15.50" }]
        }])
    );

    let xml = export_oldest_science_books(&store, cutoff("1970-01-01")).unwrap();
    assert!(xml.contains("<BookName>Dune</BookName>"));
    assert!(xml.contains("<Date>08/01/1965</Date>"));
    assert!(xml.contains("<Pages>500</Pages>"));
}

#[test]
fn duplicate_email_keeps_first_author_only() {
    let mut store = MemoryStore::new();
    import_books(&mut store, &books(&[book("Dune", 1, "15.5", 500, "08/01/1965")])).unwrap();

    let report = import_authors(
        &mut store,
        &format!(
            "[{},{}]",
            author("Frank", "Herbert", "shared@example.com", &[1]),
            author("Brian", "Herbert", "shared@example.com", &[1]),
        ),
    )
    .unwrap();

    assert_eq!(report.rejected(), 1);
    let authors = store.authors().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].full_name(), "Frank Herbert");
}

#[test]
fn science_export_is_capped_and_ignores_other_genres() {
    let mut store = MemoryStore::new();
    let mut entries: Vec<String> = (0..12)
        .map(|i| book(&format!("Science {:02}", i), 1, "10", 100 + i, "03/10/1950"))
        .collect();
    entries.push(book("Memoir", 2, "10", 4000, "03/10/1950"));
    entries.push(book("Ledger", 3, "10", 4000, "03/10/1950"));
    import_books(&mut store, &books(&entries)).unwrap();

    let selected = oldest_science_books(&store, cutoff("2000-01-01")).unwrap();

    assert_eq!(selected.len(), OLDEST_BOOKS_LIMIT);
    assert_eq!(selected[0].book_name, "Science 11");
    assert!(selected.iter().all(|b| b.book_name.starts_with("Science")));
}

#[test]
fn exports_do_not_depend_on_import_order() {
    let catalogue = [
        book("Foundation", 1, "12.00", 255, "06/01/1951"),
        book("Solaris", 1, "12.00", 255, "06/01/1961"),
        book("Biography One", 2, "30", 400, "01/01/1990"),
        book("Balance Sheet", 3, "8.75", 90, "01/01/2001"),
    ];

    let mut forward = MemoryStore::new();
    import_books(&mut forward, &books(&catalogue)).unwrap();
    import_authors(
        &mut forward,
        &format!(
            "[{},{}]",
            author("Ann", "Lee", "ann@example.com", &[1, 2]),
            author("Ann", "Lee", "ann.lee@example.com", &[3, 4]),
        ),
    )
    .unwrap();

    let mut reversed = MemoryStore::new();
    let mut backwards = catalogue.to_vec();
    backwards.reverse();
    import_books(&mut reversed, &books(&backwards)).unwrap();
    import_authors(
        &mut reversed,
        &format!(
            "[{},{}]",
            author("Ann", "Lee", "ann.lee@example.com", &[2, 1]),
            author("Ann", "Lee", "ann@example.com", &[4, 3]),
        ),
    )
    .unwrap();

    assert_eq!(
        prolific_authors(&forward).unwrap(),
        prolific_authors(&reversed).unwrap()
    );
    assert_eq!(
        oldest_science_books(&forward, cutoff("2000-01-01")).unwrap(),
        oldest_science_books(&reversed, cutoff("2000-01-01")).unwrap()
    );
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookshop.json");

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        import_books(&mut store, &books(&[book("Dune", 1, "15.5", 500, "08/01/1965")])).unwrap();
        import_authors(
            &mut store,
            &format!("[{}]", author("Frank", "Herbert", "frank@example.com", &[1])),
        )
        .unwrap();
    }

    let reopened = JsonFileStore::open(&path).unwrap();
    let authors = prolific_authors(&reopened).unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].books[0].book_price, "15.50");
}
