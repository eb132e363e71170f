//! Persisted form of the collection: a bare JSON array of
//! `{"id", "status", "description"}` objects, no envelope or version tag.
//! Unknown extra fields are ignored on read. Decoded items must pass
//! [`Item::validate`], the same check `add` applies.

use crate::error::{ItemResult, ItemStoreError};
use crate::item::Item;

pub fn encode(items: &[Item]) -> ItemResult<String> {
    serde_json::to_string(items).map_err(ItemStoreError::Encode)
}

/// `key` is only used to label the error
pub fn decode(key: &str, raw: &str) -> ItemResult<Vec<Item>> {
    let items: Vec<Item> = serde_json::from_str(raw).map_err(|source| ItemStoreError::Decode {
        key: key.to_string(),
        source,
    })?;

    for (index, item) in items.iter().enumerate() {
        if let Err(e) = item.validate() {
            let reason = match e {
                ItemStoreError::InvalidItem(reason) => reason,
                other => other.to_string(),
            };
            return Err(ItemStoreError::Corrupt {
                key: key.to_string(),
                index,
                reason,
            });
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStatus;

    fn sample() -> Vec<Item> {
        vec![
            Item::with_id("1", ItemStatus::Pending, "1 pct de café").unwrap(),
            Item::with_id("2", ItemStatus::Done, "3 cebolas").unwrap(),
        ]
    }

    #[test]
    fn test_encoding_matches_wire_format() {
        let encoded = encode(&sample()[..1]).unwrap();
        assert_eq!(
            encoded,
            r#"[{"id":"1","status":"pending","description":"1 pct de café"}]"#
        );
    }

    #[test]
    fn test_roundtrip_preserves_order() {
        let items = sample();
        let decoded = decode("k", &encode(&items).unwrap()).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(encode(&[]).unwrap(), "[]");
        assert!(decode("k", "[]").unwrap().is_empty());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let raw = r#"[{"id":"1","status":"done","description":"milk","qty":2}]"#;
        let items = decode("k", raw).unwrap();
        assert_eq!(items[0].status, ItemStatus::Done);
    }

    #[test]
    fn test_malformed_values_fail() {
        for raw in [
            "not json",
            r#"{"id":"1"}"#,
            r#"[{"id":"1","status":"pending"}]"#,
            r#"[{"id":"1","status":"bought","description":"milk"}]"#,
        ] {
            match decode("@comprar:items", raw) {
                Err(ItemStoreError::Decode { key, .. }) => assert_eq!(key, "@comprar:items"),
                other => panic!("expected decode error for {}, got {:?}", raw, other),
            }
        }
    }

    #[test]
    fn test_items_failing_validation_are_rejected() {
        for (raw, bad_index) in [
            (r#"[{"id":"","status":"done","description":"milk"}]"#, 0),
            (
                r#"[{"id":"1","status":"done","description":"milk"},{"id":"2","status":"pending","description":"  "}]"#,
                1,
            ),
        ] {
            match decode("@comprar:items", raw) {
                Err(ItemStoreError::Corrupt { key, index, .. }) => {
                    assert_eq!(key, "@comprar:items");
                    assert_eq!(index, bad_index);
                }
                other => panic!("expected corrupt error for {}, got {:?}", raw, other),
            }
        }
    }
}
