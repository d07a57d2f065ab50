mod common;
use common::*;

use bson::doc;
use pretty_assertions::assert_eq;
use tours_db::{DbError, MemoryCollection};
use tours_query::{CollectionQuery, Projection, QueryParams, QueryTranslator, Sort};

fn run(collection: &MemoryCollection, query: &str) -> Vec<bson::Document> {
    let params = QueryParams::parse(query);
    let directives = QueryTranslator::new(&params).translate().unwrap();
    directives.apply(collection.query()).exec()
}

// ── Query tests ─────────────────────────────────────────────────

#[test]
fn query_without_steps_returns_everything_in_id_order() {
    let tours = seeded_collection();
    let docs = tours.query().exec();
    assert_eq!(ids(&docs), vec!["t1", "t2", "t3", "t4", "t5", "t6"]);
}

#[test]
fn range_filter_sort_and_page() {
    let tours = seeded_collection();
    let docs = run(&tours, "price[gte]=500&sort=-price&page=1&limit=2");
    assert_eq!(ids(&docs), vec!["t6", "t5"]);

    let docs = run(&tours, "price[gte]=500&sort=-price&page=2&limit=2");
    assert_eq!(ids(&docs), vec!["t4", "t3"]);
}

#[test]
fn equality_with_multi_key_sort() {
    let tours = seeded_collection();
    let docs = run(&tours, "difficulty=easy&difficulty=medium&sort=difficulty,-price");
    assert_eq!(ids(&docs), vec!["t4", "t1", "t5", "t2"]);
}

#[test]
fn select_includes_only_listed_fields() {
    let tours = seeded_collection();
    let docs = run(&tours, "select=name,price&_id=t1");
    assert_eq!(
        docs,
        vec![doc! { "_id": "t1", "name": "The Forest Hiker", "price": 397_i32 }]
    );
}

#[test]
fn default_projection_hides_version() {
    let tours = seeded_collection();
    let docs = run(&tours, "");
    assert!(!docs.is_empty());
    assert!(docs.iter().all(|d| !d.contains_key("__v")));
}

#[test]
fn page_past_the_end_is_empty() {
    let tours = seeded_collection();
    assert!(run(&tours, "page=5&limit=2").is_empty());
}

#[test]
fn count_ignores_paging() {
    let tours = seeded_collection();
    let query = tours
        .query()
        .find(&QueryTranslator::new(&QueryParams::parse("duration[lte]=7")).filter().unwrap())
        .skip(1)
        .limit(1);
    assert_eq!(query.count(), 4);
    assert_eq!(query.exec().len(), 1);
}

#[test]
fn repeated_steps_replace_earlier_ones() {
    let tours = seeded_collection();
    let docs = tours
        .query()
        .sort(&[Sort::asc("price")])
        .sort(&[Sort::desc("price")])
        .select(&Projection::Include(vec!["name".into()]))
        .limit(1)
        .limit(2)
        .exec();
    assert_eq!(ids(&docs), vec!["t6", "t5"]);
}

// ── Scope ───────────────────────────────────────────────────────

#[test]
fn scope_hides_secret_tours() {
    let tours = seeded_collection().with_scope(hide_secret_tours());
    let docs = run(&tours, "sort=-price");
    assert_eq!(ids(&docs), vec!["t5", "t4", "t3", "t2", "t1"]);

    // asking for them explicitly does not bypass the scope
    assert!(run(&tours, "secretTour=true").is_empty());
    assert!(tours.find_by_id("t6").is_none());
    assert!(tours.find_by_id("t1").is_some());
    assert_eq!(tours.len(), 6);
}

// ── Writes ──────────────────────────────────────────────────────

#[test]
fn insert_assigns_missing_ids() {
    let tours = MemoryCollection::new(COLLECTION);
    let ids = tours
        .insert_many(vec![doc! { "name": "a" }, doc! { "name": "b" }])
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    let stored = tours.find_by_id(&ids[0]).unwrap();
    assert_eq!(stored.get_str("_id").unwrap(), ids[0]);
}

#[test]
fn duplicate_ids_leave_collection_unchanged() {
    let tours = seeded_collection();
    let err = tours
        .insert_many(vec![doc! { "_id": "t7", "name": "new" }, doc! { "_id": "t1" }])
        .unwrap_err();
    assert!(matches!(err, DbError::DuplicateId(id) if id == "t1"));
    assert_eq!(tours.len(), 6);
    assert!(tours.find_by_id("t7").is_none());
}

#[test]
fn unusable_ids_are_rejected() {
    let tours = MemoryCollection::new(COLLECTION);
    let err = tours.insert_many(vec![doc! { "_id": true }]).unwrap_err();
    assert!(matches!(err, DbError::InvalidDocument(_)));
}

#[test]
fn delete_many_clears_and_snapshots_survive() {
    let tours = seeded_collection();
    let snapshot = tours.query();
    assert_eq!(tours.delete_many(), 6);
    assert!(tours.is_empty());
    assert_eq!(snapshot.exec().len(), 6);
}

#[test]
fn update_merges_fields_in_scope() {
    let tours = seeded_collection().with_scope(hide_secret_tours());
    let updated = tours
        .update_one("t1", doc! { "price": 450_i32, "maxGroupSize": 12_i32 })
        .unwrap()
        .unwrap();
    assert_eq!(updated.get_i32("price").unwrap(), 450);
    assert_eq!(updated.get_i32("maxGroupSize").unwrap(), 12);
    assert_eq!(updated.get_str("name").unwrap(), "The Forest Hiker");
    assert_eq!(run(&tours, "price=450").len(), 1);

    assert_eq!(tours.update_one("t6", doc! { "price": 1_i32 }).unwrap(), None);
    assert_eq!(tours.update_one("nope", doc! { "price": 1_i32 }).unwrap(), None);
}

#[test]
fn update_cannot_change_id() {
    let tours = seeded_collection();
    let err = tours.update_one("t1", doc! { "_id": "t9" }).unwrap_err();
    assert!(matches!(err, DbError::InvalidDocument(_)));
    assert!(tours.find_by_id("t9").is_none());

    // restating the same id is fine
    assert!(tours.update_one("t1", doc! { "_id": "t1" }).unwrap().is_some());
}

#[test]
fn delete_one_honours_scope() {
    let tours = seeded_collection().with_scope(hide_secret_tours());
    let snapshot = tours.query();

    assert!(tours.delete_one("t2"));
    assert!(!tours.delete_one("t2"));
    assert!(!tours.delete_one("t6"));
    assert_eq!(tours.len(), 5);
    assert!(tours.find_by_id("t2").is_none());
    assert_eq!(snapshot.exec().len(), 5);
}

// ── Hidden fields ───────────────────────────────────────────────

#[test]
fn hidden_fields_are_dropped_unless_selected() {
    let tours = seeded_collection().with_hidden_fields(["duration"]);

    let docs = run(&tours, "sort=duration");
    assert_eq!(ids(&docs), vec!["t6", "t3", "t1", "t2", "t4", "t5"]);
    assert!(docs.iter().all(|d| !d.contains_key("duration")));

    let docs = run(&tours, "select=-price");
    assert!(docs.iter().all(|d| !d.contains_key("duration") && !d.contains_key("price")));

    let docs = run(&tours, "select=name,duration&_id=t1");
    assert_eq!(
        docs,
        vec![doc! { "_id": "t1", "name": "The Forest Hiker", "duration": 5_i32 }]
    );

    let tour = tours.find_by_id("t1").unwrap();
    assert!(!tour.contains_key("duration"));
    assert_eq!(tour.get_i32("__v").unwrap(), 0);
}
