use serde_json::Value;

/// Keys that carry a card's printing code, in order of precedence.
pub const ID_KEYS: [&str; 8] = [
    "card_set_id",
    "card_id",
    "cardId",
    "id",
    "Card ID",
    "cardID",
    "card_image_id",
    "image_id",
];

/// Keys that carry the full card image URL, in order of precedence.
pub const IMAGE_KEYS: [&str; 9] = [
    "card_image",
    "image_url",
    "image",
    "img",
    "imageUrl",
    "image_link",
    "imageLink",
    "art_url",
    "artUrl",
];

pub const MIN_ID_LEN: usize = 5;

/// A single catalog entry as the source delivered it.
pub type CardRecord = Value;

/**
 * Flattens catalog payloads into one record list, keeping source order.
 *
 * A payload is either a bare array of records or an object with a `results` array.
 * Anything else contributes no records.
 */
pub fn normalize<'a, I>(payloads: I) -> Vec<CardRecord>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut records = vec![];
    for payload in payloads {
        records.extend(records_of(payload).iter().cloned());
    }
    records
}

fn records_of(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items,
            _ => &[],
        },
        _ => &[],
    }
}

/// First string under `keys` accepted by `accept`.
fn pick<'r>(record: &'r CardRecord, keys: &[&str], accept: fn(&str) -> bool) -> Option<&'r str> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|value| accept(value))
}

/// Trimmed identifier; the length rule applies after trimming, so blank values never win.
pub fn card_id(record: &CardRecord) -> Option<String> {
    pick(record, &ID_KEYS, |v| v.trim().chars().count() >= MIN_ID_LEN).map(|v| v.trim().to_string())
}

pub fn image_url(record: &CardRecord) -> Option<String> {
    pick(record, &IMAGE_KEYS, |v| v.starts_with("http")).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_and_wrapped_payloads_concatenate_in_order() {
        let a = json!([{"id": "OP01-001"}, {"id": "OP01-002"}]);
        let b = json!({"count": 1, "results": [{"id": "ST01-001"}]});
        let records = normalize([&a, &b]);
        let ids: Vec<_> = records.iter().filter_map(card_id).collect();
        assert_eq!(ids, vec!["OP01-001", "OP01-002", "ST01-001"]);
    }

    #[test]
    fn unexpected_shapes_are_empty() {
        let payloads = [
            json!({"data": []}),
            json!({"results": "nope"}),
            json!("text"),
            json!(null),
            json!(42),
        ];
        assert!(normalize(payloads.iter()).is_empty());
    }

    #[test]
    fn id_aliases() {
        assert_eq!(
            card_id(&json!({"card_set_id": "OP01-001"})).as_deref(),
            Some("OP01-001")
        );
        assert_eq!(
            card_id(&json!({"Card ID": " OP02-010 "})).as_deref(),
            Some("OP02-010")
        );
        assert_eq!(card_id(&json!({"name": "Luffy"})), None);
    }

    #[test]
    fn short_or_non_string_ids_fall_through() {
        let record = json!({"card_set_id": "OP1", "card_id": 12345, "id": "OP01-003"});
        assert_eq!(card_id(&record).as_deref(), Some("OP01-003"));
        assert_eq!(card_id(&json!({"id": "abcd"})), None);
    }

    #[test]
    fn blank_or_padded_short_ids_are_rejected() {
        assert_eq!(card_id(&json!({"id": "     "})), None);
        assert_eq!(card_id(&json!({"id": " OP1 "})), None);
        let record = json!({"card_set_id": "      ", "card_id": "OP01-005"});
        assert_eq!(card_id(&record).as_deref(), Some("OP01-005"));
    }

    #[test]
    fn id_precedence_follows_key_order() {
        let record = json!({"id": "OP01-999", "card_set_id": "OP01-001"});
        assert_eq!(card_id(&record).as_deref(), Some("OP01-001"));
    }

    #[test]
    fn image_aliases_require_http() {
        assert_eq!(
            image_url(&json!({"card_image": "http://x/a.png"})).as_deref(),
            Some("http://x/a.png")
        );
        let record = json!({"image_url": "/relative.png", "img": "https://x/b.png"});
        assert_eq!(image_url(&record).as_deref(), Some("https://x/b.png"));
        assert_eq!(image_url(&json!({"image": null})), None);
    }
}
