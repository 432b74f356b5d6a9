use anyhow::Context;
use serde_json::Value;

/// Read a JSON argument: inline JSON, or `@path` naming a JSON file.
pub fn read_json(arg: &str) -> anyhow::Result<Value> {
    match arg.strip_prefix('@') {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("{path} is not valid JSON"))
        }
        None => serde_json::from_str(arg).context("argument is not valid JSON"),
    }
}

/// Documents for `_bulk_docs`: a JSON array or an object with a `docs` array.
pub fn bulk_documents(value: Value) -> anyhow::Result<Vec<Value>> {
    match value {
        Value::Array(docs) => Ok(docs),
        Value::Object(mut map) => match map.remove("docs") {
            Some(Value::Array(docs)) => Ok(docs),
            _ => anyhow::bail!("expected a JSON array or an object with a \"docs\" array"),
        },
        _ => anyhow::bail!("expected a JSON array or an object with a \"docs\" array"),
    }
}

/// Parse a view key. Anything that is not valid JSON is taken as a string.
pub fn parse_key(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn inline_json() {
        assert_eq!(read_json(r#"{"_id": "a"}"#).unwrap(), json!({"_id": "a"}));
        assert!(read_json("{not json").is_err());
    }

    #[test]
    fn json_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"_id": "a"}}, {{"_id": "b"}}]"#).unwrap();
        let arg = format!("@{}", file.path().display());
        let docs = bulk_documents(read_json(&arg).unwrap()).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_json("@/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn bulk_accepts_docs_wrapper() {
        let docs = bulk_documents(json!({"docs": [{"_id": "x"}]})).unwrap();
        assert_eq!(docs, vec![json!({"_id": "x"})]);
        assert!(bulk_documents(json!({"rows": []})).is_err());
        assert!(bulk_documents(json!("nope")).is_err());
    }

    #[test]
    fn keys_fall_back_to_strings() {
        assert_eq!(parse_key("\"Herbert\""), json!("Herbert"));
        assert_eq!(parse_key("Herbert"), json!("Herbert"));
        assert_eq!(parse_key("[\"a\", 1]"), json!(["a", 1]));
        assert_eq!(parse_key("42"), json!(42));
    }
}
