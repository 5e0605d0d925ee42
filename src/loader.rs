use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::table::{TranslationEntry, TranslationTable};
use crate::translator::TranslatorSettings;

fn read_file(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn parse_object(
    content: &str,
    origin: &str,
) -> Result<serde_json::Map<String, Value>, LoadError> {
    let json: Value = serde_json::from_str(content).map_err(|source| LoadError::Json {
        origin: origin.to_string(),
        source,
    })?;
    match json {
        Value::Object(object) => Ok(object),
        _ => Err(LoadError::InvalidTable {
            origin: origin.to_string(),
            reason: "root must be an object".to_string(),
        }),
    }
}

/// Parse a translation table from JSON.
///
/// The JSON should have the following structure:
/// ```json
/// {
///     "@metadata": { ... },  // Ignored
///     "greeting_title": {
///         "description": "Title of the welcome page",
///         "en": "Welcome",
///         "de": "Willkommen"
///     }
/// }
/// ```
///
/// Keys starting with `@` are metadata and skipped, at both levels. Entries
/// that are not objects and templates that are not strings are skipped with
/// a warning. `origin` names the source in errors and logs.
pub fn load_table_from_str(json: &str, origin: &str) -> Result<TranslationTable, LoadError> {
    let object = parse_object(json, origin)?;

    let mut table = TranslationTable::new();
    for (key, value) in &object {
        if key.starts_with('@') {
            continue;
        }
        let Some(fields) = value.as_object() else {
            warn!(origin, key = %key, "entry is not an object, skipping");
            continue;
        };

        let mut entry = TranslationEntry::default();
        for (field, value) in fields {
            if field.starts_with('@') {
                continue;
            }
            match (field.as_str(), value.as_str()) {
                ("description", Some(description)) => entry.description = description.to_string(),
                (_, Some(template)) => {
                    entry.set_translation(field, template);
                }
                (_, None) => {
                    warn!(origin, key = %key, field = %field, "value is not a string, skipping");
                }
            }
        }
        table.with_entry(key, entry);
    }

    debug!(origin, keys = table.len(), "loaded translation table");
    Ok(table)
}

pub fn load_table_from_file(path: &Path) -> Result<TranslationTable, LoadError> {
    let content = read_file(path)?;
    load_table_from_str(&content, &path.display().to_string())
}

/// Build a table from a directory of per-language message files.
///
/// Each `*.json` file is a flat `key → template` object and its file stem is
/// the language: `en.json` → `"en"`, `zh-hans.json` → `"zh-hans"`. Files are
/// read in name order.
pub fn load_table_from_dir(dir: &Path) -> Result<TranslationTable, LoadError> {
    let io_error = |source| LoadError::Io {
        path: dir.display().to_string(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut table = TranslationTable::new();
    for path in paths {
        let origin = path.display().to_string();
        let Some(language) = path.file_stem().and_then(|stem| stem.to_str()) else {
            return Err(LoadError::InvalidTable {
                origin,
                reason: "file name is not valid UTF-8".to_string(),
            });
        };

        let object = parse_object(&read_file(&path)?, &origin)?;
        for (key, value) in &object {
            if key.starts_with('@') {
                continue;
            }
            match value.as_str() {
                Some(template) => table.add_translation(key, language, template),
                None => warn!(origin = %origin, key = %key, "message is not a string, skipping"),
            }
        }
    }

    debug!(dir = %dir.display(), keys = table.len(), "loaded message directory");
    Ok(table)
}

/// Load [`TranslatorSettings`] from a JSON file.
pub fn load_settings_from_file(path: &Path) -> Result<TranslatorSettings, LoadError> {
    let origin = path.display().to_string();
    serde_json::from_str(&read_file(path)?).map_err(|source| LoadError::Json { origin, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::MissingStrategy;

    const TABLE: &str = r#"{
        "@metadata": { "authors": ["someone"] },
        "greeting_title": {
            "description": "Title of the welcome page",
            "en": "Welcome",
            "de": "Willkommen",
            "@comment": "ignored"
        },
        "cart.items": {
            "description": "Cart size",
            "en": "{count, plural, one {# item} other {# items}}",
            "es": "",
            "fr": 3
        },
        "stray": "not an entry"
    }"#;

    #[test]
    fn test_load_table_from_str() {
        let table = load_table_from_str(TABLE, "inline").unwrap();
        assert_eq!(table.keys(), vec!["cart.items", "greeting_title"]);

        let entry = table.get("greeting_title").unwrap();
        assert_eq!(entry.description, "Title of the welcome page");
        assert_eq!(entry.get("de"), Some("Willkommen"));
        assert_eq!(entry.languages().collect::<Vec<_>>(), vec!["de", "en"]);

        let cart = table.get("cart.items").unwrap();
        assert_eq!(cart.get("es"), Some(""));
        assert_eq!(cart.get("fr"), None);
    }

    #[test]
    fn test_invalid_json() {
        let err = load_table_from_str("{", "inline").unwrap_err();
        assert!(matches!(err, LoadError::Json { .. }));
        assert!(err.to_string().contains("inline"));
    }

    #[test]
    fn test_root_must_be_object() {
        let err = load_table_from_str("[]", "inline").unwrap_err();
        assert!(matches!(err, LoadError::InvalidTable { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = load_table_from_file(Path::new("/nonexistent/table.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_load_table_from_dir() {
        let dir = std::env::temp_dir().join(format!("typekit-i18n-loader-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("en.json"), r#"{"@metadata": {}, "hello": "Hello", "bye": "Bye"}"#).unwrap();
        fs::write(dir.join("fr.json"), r#"{"hello": "Bonjour", "count": 2}"#).unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let table = load_table_from_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(table.keys(), vec!["bye", "hello"]);
        assert_eq!(table.get("hello").and_then(|entry| entry.get("fr")), Some("Bonjour"));
        assert_eq!(table.get("bye").and_then(|entry| entry.get("fr")), None);
    }

    #[test]
    fn test_load_settings_from_file() {
        let path = std::env::temp_dir().join(format!("typekit-i18n-settings-{}.json", std::process::id()));
        fs::write(&path, r#"{"defaultLanguage": "en", "missingStrategy": "strict"}"#).unwrap();
        let settings = load_settings_from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(settings.default_language, "en");
        assert_eq!(settings.missing_strategy, MissingStrategy::Strict);
        assert!(settings.locale_by_language.is_empty());
    }
}
