use bson::doc;
use tours_db::MemoryCollection;
use tours_query::{FieldFilter, FilterSpec, Operator};

pub const COLLECTION: &str = "tours";

pub fn seeded_collection() -> MemoryCollection {
    let tours = MemoryCollection::new(COLLECTION);
    tours
        .insert_many(vec![
            doc! { "_id": "t1", "name": "The Forest Hiker", "difficulty": "easy", "price": 397_i32, "ratingsAverage": 4.7, "duration": 5_i32, "__v": 0_i32 },
            doc! { "_id": "t2", "name": "The Sea Explorer", "difficulty": "medium", "price": 497_i32, "ratingsAverage": 4.8, "duration": 7_i32, "__v": 0_i32 },
            doc! { "_id": "t3", "name": "The Snow Adventurer", "difficulty": "difficult", "price": 997_i32, "ratingsAverage": 4.5, "duration": 4_i32, "__v": 0_i32 },
            doc! { "_id": "t4", "name": "The City Wanderer", "difficulty": "easy", "price": 1197_i32, "ratingsAverage": 4.6, "duration": 9_i32, "__v": 0_i32 },
            doc! { "_id": "t5", "name": "The Park Camper", "difficulty": "medium", "price": 1497_i32, "ratingsAverage": 4.9, "duration": 10_i32, "__v": 0_i32 },
            doc! { "_id": "t6", "name": "The Secret Summit", "difficulty": "difficult", "price": 2997_i32, "ratingsAverage": 5.0, "duration": 3_i32, "secretTour": true, "__v": 0_i32 },
        ])
        .unwrap();
    tours
}

pub fn hide_secret_tours() -> FilterSpec {
    FilterSpec::new().with("secretTour", FieldFilter::compare(Operator::Ne, true))
}

pub fn ids(docs: &[bson::Document]) -> Vec<&str> {
    docs.iter().map(|d| d.get_str("_id").unwrap()).collect()
}
