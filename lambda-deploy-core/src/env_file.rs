//! `KEY = VALUE` env file parsing

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::ConfigError;

/// Read and parse an env file
pub fn load(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::EnvFile {
        path: path.to_path_buf(),
        source,
    })?;

    let vars = parse(&contents);
    debug!(path = %path.display(), count = vars.len(), "Loaded env file");
    Ok(vars)
}

/// Parse env file contents.
///
/// Accepts `KEY = VALUE` and `KEY=VALUE`, an optional leading `export`,
/// `#` comment lines and blank lines. Matching quotes around a value are
/// stripped. Lines without a `=` or with an empty key are skipped.
pub fn parse(contents: &str) -> HashMap<String, String> {
    let mut vars = HashMap::new();

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            warn!(line = index + 1, "Skipping env file line without '='");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            warn!(line = index + 1, "Skipping env file line with empty key");
            continue;
        }

        vars.insert(key.to_string(), unquote(value.trim()).to_string());
    }

    vars
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spaced_and_compact() {
        let vars = parse("DB_HOST = db.internal\nDB_PORT=5432\n");
        assert_eq!(vars.get("DB_HOST").map(String::as_str), Some("db.internal"));
        assert_eq!(vars.get("DB_PORT").map(String::as_str), Some("5432"));
    }

    #[test]
    fn test_parse_skips_comments_and_garbage() {
        let vars = parse("# comment\n\nnot a pair\n = orphan\nKEY = value\n");
        assert_eq!(vars.len(), 1);
        assert_eq!(vars.get("KEY").map(String::as_str), Some("value"));
    }

    #[test]
    fn test_parse_export_and_quotes() {
        let vars = parse("export TOKEN=\"a b c\"\nNAME = 'single'\nRAW = \"unbalanced\n");
        assert_eq!(vars.get("TOKEN").map(String::as_str), Some("a b c"));
        assert_eq!(vars.get("NAME").map(String::as_str), Some("single"));
        assert_eq!(vars.get("RAW").map(String::as_str), Some("\"unbalanced"));
    }

    #[test]
    fn test_value_keeps_inner_equals() {
        let vars = parse("URL = postgres://u:p@host/db?sslmode=require");
        assert_eq!(
            vars.get("URL").map(String::as_str),
            Some("postgres://u:p@host/db?sslmode=require")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = load(&dir.path().join("missing.env"));
        assert!(matches!(result, Err(ConfigError::EnvFile { .. })));
    }
}
