use std::collections::{BTreeMap, HashMap};

/// Templates for one key, by language, plus a description for translators.
///
/// An empty template means the language has not been translated yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationEntry {
    pub description: String,
    translations: BTreeMap<String, String>,
}

impl TranslationEntry {
    pub fn new(description: &str) -> Self {
        TranslationEntry {
            description: description.to_string(),
            translations: BTreeMap::new(),
        }
    }

    pub fn with_translation(mut self, language: &str, template: &str) -> Self {
        self.set_translation(language, template);
        self
    }

    pub fn set_translation(&mut self, language: &str, template: &str) -> &mut Self {
        self.translations
            .insert(language.to_string(), template.to_string());
        self
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.translations.keys().map(String::as_str)
    }

    /// `(language, template)` pairs in language order.
    pub fn translations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.translations
            .iter()
            .map(|(language, template)| (language.as_str(), template.as_str()))
    }
}

/// Key → [`TranslationEntry`]. Built once and borrowed by translators.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TranslationTable(pub HashMap<String, TranslationEntry>);

impl TranslationTable {
    pub fn new() -> Self {
        TranslationTable(HashMap::new())
    }

    pub fn with_entry(&mut self, key: &str, entry: TranslationEntry) -> &mut Self {
        self.0.insert(key.to_owned(), entry);
        self
    }

    /// Set one template, creating the entry if needed.
    pub fn add_translation(&mut self, key: &str, language: &str, template: &str) {
        self.0
            .entry(key.to_string())
            .or_default()
            .set_translation(language, template);
    }

    pub fn get(&self, key: &str) -> Option<&TranslationEntry> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_lookup() {
        let entry = TranslationEntry::new("Title")
            .with_translation("en", "Welcome")
            .with_translation("de", "Willkommen");
        assert_eq!(entry.get("de"), Some("Willkommen"));
        assert_eq!(entry.get("fr"), None);
        assert_eq!(entry.languages().collect::<Vec<_>>(), vec!["de", "en"]);
    }

    #[test]
    fn test_add_translation_creates_entry() {
        let mut table = TranslationTable::new();
        table.add_translation("b", "en", "B");
        table.add_translation("a", "en", "A");
        table.add_translation("a", "fr", "A!");
        assert_eq!(table.len(), 2);
        assert_eq!(table.keys(), vec!["a", "b"]);
        assert_eq!(table.get("a").and_then(|entry| entry.get("fr")), Some("A!"));
    }
}
