//! JSON interchange for exporting and importing quote files.
//!
//! The file format is a bare JSON array of quotes, pretty-printed on export.
//! Import accepts any array whose elements deserialize as [`Quote`]; missing
//! ids, categories and timestamps are tolerated and fixed up by the store.

use crate::{error::Result, Error, Quote};

/// Suggested file name for exports.
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Serialize quotes as a pretty-printed JSON array.
pub fn export_json(quotes: &[Quote]) -> Result<String> {
    serde_json::to_string_pretty(quotes).map_err(|e| Error::Serialization(e.to_string()))
}

/// Parse the contents of an import file.
pub fn parse_import(json: &str) -> Result<Vec<Quote>> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| Error::InvalidImport(e.to_string()))?;

    if !value.is_array() {
        return Err(Error::InvalidImport(
            "expected a top-level JSON array".to_string(),
        ));
    }

    serde_json::from_value(value).map_err(|e| Error::InvalidImport(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_is_pretty_array() {
        let quotes = vec![Quote::new("local-1", "A", "B", 1)];
        let json = export_json(&quotes).unwrap();
        assert!(json.starts_with("[\n"));
        assert!(json.contains("  {"));
    }

    #[test]
    fn export_empty() {
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn import_rejects_object() {
        let err = parse_import(r#"{"text":"A"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidImport(_)));
    }

    #[test]
    fn import_rejects_malformed() {
        let err = parse_import("[{").unwrap_err();
        assert!(matches!(err, Error::InvalidImport(_)));
    }

    #[test]
    fn import_rejects_elements_without_text() {
        let err = parse_import(r#"[{"category":"A"}]"#).unwrap_err();
        assert!(matches!(err, Error::InvalidImport(_)));
    }

    #[test]
    fn import_accepts_both_timestamp_names() {
        let json = r#"[
            {"id":"local-1","text":"A","category":"B","timestamp":1,"lastUpdated":2},
            {"id":"local-2","text":"C","category":"D","lastUpdated":3}
        ]"#;
        let quotes = parse_import(json).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].timestamp, 1);
        assert_eq!(quotes[1].timestamp, 3);

        let exported = export_json(&quotes).unwrap();
        assert!(!exported.contains("lastUpdated"));
    }

    #[test]
    fn import_preserves_order() {
        let json = r#"[
            {"id":"local-2","text":"second","category":"X","timestamp":2},
            {"id":"local-1","text":"first","category":"X","timestamp":1}
        ]"#;
        let quotes = parse_import(json).unwrap();
        assert_eq!(quotes[0].id, "local-2");
        assert_eq!(quotes[1].id, "local-1");
    }

    #[test]
    fn export_then_import() {
        let quotes = vec![
            Quote::new("local-1", "Believe", "Motivational", 10),
            Quote::from_server(3, "ea molestias", 20),
        ];
        let parsed = parse_import(&export_json(&quotes).unwrap()).unwrap();
        assert_eq!(parsed, quotes);
    }
}
