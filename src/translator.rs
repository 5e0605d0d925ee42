use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::CachePolicy;
use crate::error::{Result, TranslateError};
use crate::fallback::{
    MissingStrategy, MissingTranslationCallback, MissingTranslationEvent, MissingTranslationPolicy,
    Resolution, TextSource, plan_resolution,
};
use crate::locale::to_locale;
use crate::render::{Formatter, FormatterContext, MessageRenderer, RenderContext};
use crate::table::TranslationTable;
use crate::value::{Placeholder, PlaceholderValue};

/// Options for [`Translator::new`].
#[derive(Clone)]
pub struct IcuTranslatorOptions {
    pub default_language: String,
    /// Initial current language; the default language when absent.
    pub language: Option<String>,
    pub missing_strategy: MissingStrategy,
    pub formatters: HashMap<String, Formatter>,
    pub locale_by_language: HashMap<String, String>,
    pub on_missing_translation: Option<MissingTranslationCallback>,
    pub cache_policy: CachePolicy,
}

impl fmt::Debug for IcuTranslatorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IcuTranslatorOptions")
            .field("default_language", &self.default_language)
            .field("language", &self.language)
            .field("missing_strategy", &self.missing_strategy)
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .field("locale_by_language", &self.locale_by_language)
            .field("has_missing_callback", &self.on_missing_translation.is_some())
            .field("cache_policy", &self.cache_policy)
            .finish()
    }
}

impl IcuTranslatorOptions {
    pub fn new(default_language: &str) -> Self {
        IcuTranslatorOptions {
            default_language: default_language.to_string(),
            language: None,
            missing_strategy: MissingStrategy::default(),
            formatters: HashMap::new(),
            locale_by_language: HashMap::new(),
            on_missing_translation: None,
            cache_policy: CachePolicy::default(),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    pub fn with_missing_strategy(mut self, strategy: MissingStrategy) -> Self {
        self.missing_strategy = strategy;
        self
    }

    pub fn with_formatter<F>(mut self, name: &str, formatter: F) -> Self
    where
        F: Fn(&PlaceholderValue, &FormatterContext<'_>) -> String + 'static,
    {
        self.formatters.insert(name.to_string(), Rc::new(formatter));
        self
    }

    /// Use `locale` (a BCP 47 tag) for plural rules and formatting in `language`.
    pub fn with_locale(mut self, language: &str, locale: &str) -> Self {
        self.locale_by_language
            .insert(language.to_string(), locale.to_string());
        self
    }

    pub fn on_missing_translation<F>(mut self, callback: F) -> Self
    where
        F: Fn(&MissingTranslationEvent) + 'static,
    {
        self.on_missing_translation = Some(Rc::new(callback));
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }
}

/// The serializable part of [`IcuTranslatorOptions`].
///
/// ```json
/// {
///     "defaultLanguage": "en",
///     "language": "de",
///     "missingStrategy": "strict",
///     "localeByLanguage": { "en": "en-GB" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorSettings {
    pub default_language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub missing_strategy: MissingStrategy,
    #[serde(default)]
    pub locale_by_language: HashMap<String, String>,
}

impl From<TranslatorSettings> for IcuTranslatorOptions {
    fn from(settings: TranslatorSettings) -> Self {
        let mut options = IcuTranslatorOptions::new(&settings.default_language)
            .with_missing_strategy(settings.missing_strategy);
        options.language = settings.language;
        options.locale_by_language = settings.locale_by_language;
        options
    }
}

/// Join a category and a key into a table key: `"checkout"` + `"title"` is
/// `"checkout.title"`. An empty category leaves the key unchanged.
pub fn category_key(category: &str, key: &str) -> String {
    if category.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", category, key)
    }
}

/// Resolves keys from a borrowed [`TranslationTable`].
///
/// A translator owns its caches and current language and is meant for a
/// single thread: it is neither `Send` nor `Sync`, and changing the current
/// language requires `&mut self`.
pub struct Translator<'t> {
    table: &'t TranslationTable,
    default_language: String,
    language: String,
    formatters: HashMap<String, Formatter>,
    locale_by_language: HashMap<String, String>,
    policy: MissingTranslationPolicy,
    renderer: MessageRenderer,
}

impl fmt::Debug for Translator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("keys", &self.table.len())
            .field("default_language", &self.default_language)
            .field("language", &self.language)
            .field("policy", &self.policy)
            .field("renderer", &self.renderer)
            .finish()
    }
}

impl<'t> Translator<'t> {
    pub fn new(table: &'t TranslationTable, options: IcuTranslatorOptions) -> Self {
        let language = options
            .language
            .unwrap_or_else(|| options.default_language.clone());
        Translator {
            table,
            default_language: options.default_language,
            language,
            formatters: options.formatters,
            locale_by_language: options.locale_by_language,
            policy: MissingTranslationPolicy::new(
                options.missing_strategy,
                options.on_missing_translation,
            ),
            renderer: MessageRenderer::with_cache_policy(options.cache_policy),
        }
    }

    /// The current language.
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
        debug!(language = %self.language, "current language changed");
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn table(&self) -> &'t TranslationTable {
        self.table
    }

    pub fn renderer(&self) -> &MessageRenderer {
        &self.renderer
    }

    /// Locale tag used when rendering `language`.
    pub fn locale_for(&self, language: &str) -> String {
        to_locale(language, &self.default_language, &self.locale_by_language)
    }

    /// Translate `key` into the current language.
    pub fn translate(&self, key: impl AsRef<str>) -> Result<String> {
        self.resolve(key.as_ref(), &self.language, &Placeholder::new())
    }

    pub fn translate_to(&self, key: impl AsRef<str>, language: impl AsRef<str>) -> Result<String> {
        self.resolve(key.as_ref(), language.as_ref(), &Placeholder::new())
    }

    pub fn translate_with(&self, key: impl AsRef<str>, placeholder: &Placeholder) -> Result<String> {
        self.resolve(key.as_ref(), &self.language, placeholder)
    }

    pub fn translate_to_with(
        &self,
        key: impl AsRef<str>,
        language: impl AsRef<str>,
        placeholder: &Placeholder,
    ) -> Result<String> {
        self.resolve(key.as_ref(), language.as_ref(), placeholder)
    }

    /// Translate `category.key` into the current language.
    pub fn translate_in(&self, category: &str, key: impl AsRef<str>) -> Result<String> {
        self.translate(category_key(category, key.as_ref()))
    }

    pub fn translate_in_with(
        &self,
        category: &str,
        key: impl AsRef<str>,
        placeholder: &Placeholder,
    ) -> Result<String> {
        self.translate_with(category_key(category, key.as_ref()), placeholder)
    }

    /// A view that prefixes every key with `category`.
    pub fn with_category<'a>(&'a self, category: &str) -> CategoryTranslator<'a, 't> {
        CategoryTranslator {
            translator: self,
            category: category.to_string(),
        }
    }

    /// Resolve `key` in `language`, falling back as configured, and render it.
    pub fn resolve(&self, key: &str, language: &str, placeholder: &Placeholder) -> Result<String> {
        match plan_resolution(self.table, key, language, &self.default_language) {
            Resolution::ReturnKey { event } => {
                self.policy.handle(&event)?;
                Ok(key.to_string())
            }
            Resolution::Render {
                template,
                source,
                event,
            } => {
                if let Some(event) = &event {
                    self.policy.handle(event)?;
                }
                let rendered_language = match source {
                    TextSource::Requested => language,
                    TextSource::Default => self.default_language.as_str(),
                };
                self.render(key, rendered_language, template, placeholder)
            }
        }
    }

    fn render(
        &self,
        key: &str,
        language: &str,
        template: &str,
        placeholder: &Placeholder,
    ) -> Result<String> {
        let locale = self.locale_for(language);
        let values = placeholder.to_map();
        let context = RenderContext {
            key,
            language,
            default_language: &self.default_language,
            locale: &locale,
            values: &values,
            formatters: Some(&self.formatters),
        };
        self.renderer.render(template, &context)
    }

    /// Compile every non-empty template in the table, including branch
    /// bodies, and return the syntax errors found. Keys and languages are
    /// visited in sorted order.
    pub fn validate(&self) -> Vec<TranslateError> {
        let mut errors = Vec::new();
        for key in self.table.keys() {
            let Some(entry) = self.table.get(key) else {
                continue;
            };
            for (language, template) in entry.translations() {
                if template.is_empty() {
                    continue;
                }
                if let Err(e) = self.renderer.validate(template) {
                    errors.push(e.locate(template, key, language));
                }
            }
        }
        errors
    }
}

/// A [`Translator`] bound to a key category.
#[derive(Debug)]
pub struct CategoryTranslator<'a, 't> {
    translator: &'a Translator<'t>,
    category: String,
}

impl CategoryTranslator<'_, '_> {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn translate(&self, key: impl AsRef<str>) -> Result<String> {
        self.translator.translate_in(&self.category, key)
    }

    pub fn translate_to(&self, key: impl AsRef<str>, language: impl AsRef<str>) -> Result<String> {
        self.translator
            .translate_to(category_key(&self.category, key.as_ref()), language)
    }

    pub fn translate_with(&self, key: impl AsRef<str>, placeholder: &Placeholder) -> Result<String> {
        self.translator.translate_in_with(&self.category, key, placeholder)
    }

    pub fn translate_to_with(
        &self,
        key: impl AsRef<str>,
        language: impl AsRef<str>,
        placeholder: &Placeholder,
    ) -> Result<String> {
        self.translator.translate_to_with(
            category_key(&self.category, key.as_ref()),
            language,
            placeholder,
        )
    }
}
