use mongodb::{
    Database,
    bson::{Document, doc},
    options::ReturnDocument,
};

use crate::common::{DatabaseError, DatabaseResult};

/// Collection holding one `{ _id: <name>, seq: <i64> }` document per counter.
pub const COUNTERS_COLLECTION: &str = "counters";

/// Atomically increment the counter `name` and return its new value.
///
/// The counter is created on first use, so the first value handed out is 1.
/// Concurrent callers always observe distinct values.
pub async fn next_sequence(db: &Database, name: &str) -> DatabaseResult<i64> {
    let counter = db
        .collection::<Document>(COUNTERS_COLLECTION)
        .find_one_and_update(doc! { "_id": name }, doc! { "$inc": { "seq": 1_i64 } })
        .upsert(true)
        .return_document(ReturnDocument::After)
        .await?;

    counter
        .as_ref()
        .and_then(|c| c.get_i64("seq").ok())
        .ok_or_else(|| DatabaseError::SequenceUnavailable(name.to_string()))
}
