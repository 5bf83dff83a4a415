//! Serde adapter storing a [`Uuid`] as its hyphenated string.
//!
//! The driver decodes cursor documents with a non human-readable
//! deserializer, where `uuid` expects 16 raw bytes. Pinning the
//! representation keeps the stored value, the `_id` filters and the JSON
//! responses identical.
//!
//! ```ignore
//! #[serde(rename = "_id", with = "database::mongodb::uuid_string")]
//! pub id: Uuid,
//! ```

use serde::{Deserialize, Deserializer, Serializer, de::Error as _};
use uuid::Uuid;

pub fn serialize<S: Serializer>(id: &Uuid, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id.as_hyphenated())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Uuid, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Uuid::parse_str(&raw).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use mongodb::bson::{self, doc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(rename = "_id", with = "super")]
        id: Uuid,
    }

    #[test]
    fn test_stored_as_string() {
        let id = Uuid::now_v7();
        let document = bson::to_document(&Record { id }).unwrap();
        assert_eq!(document, doc! { "_id": id.to_string() });
    }

    #[test]
    fn test_raw_bytes_read_back() {
        let record = Record { id: Uuid::now_v7() };
        let bytes = bson::to_vec(&bson::to_document(&record).unwrap()).unwrap();
        let decoded: Record = bson::from_slice(&bytes).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_json_matches_bson() {
        let id = Uuid::now_v7();
        let json = serde_json::to_value(Record { id }).unwrap();
        assert_eq!(json["_id"], id.to_string());
    }

    #[test]
    fn test_rejects_malformed_id() {
        let bytes = bson::to_vec(&doc! { "_id": "not-a-uuid" }).unwrap();
        assert!(bson::from_slice::<Record>(&bytes).is_err());
    }
}
