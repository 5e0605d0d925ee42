//! Typed translation lookup with an ICU MessageFormat subset.
//!
//! ```
//! use typekit_i18n::{IcuTranslatorOptions, Placeholder, TranslationEntry, TranslationTable, Translator};
//!
//! let mut table = TranslationTable::new();
//! table.with_entry(
//!     "cart.items",
//!     TranslationEntry::new("Cart size")
//!         .with_translation("en", "{count, plural, one {# item} other {# items}}"),
//! );
//!
//! let translator = Translator::new(&table, IcuTranslatorOptions::new("en"));
//! let text = translator
//!     .translate_with("cart.items", &Placeholder::new().with("count", 5))
//!     .unwrap();
//! assert_eq!(text, "5 items");
//! ```

pub mod ast;
pub mod cache;
pub mod compiler;
pub mod error;
pub mod fallback;
pub mod format;
pub mod loader;
pub mod locale;
pub mod parser;
pub mod patterns;
pub mod plural;
pub mod render;
pub mod scanner;
pub mod style;
pub mod table;
pub mod translator;
pub mod value;

pub use ast::{CompiledTemplate, ExpressionType, Token};
pub use cache::{CachePolicy, MemoCache};
pub use compiler::compile_template;
pub use error::{IcuError, LoadError, Result, TranslateError};
pub use fallback::{
    Decision, MissingReason, MissingStrategy, MissingTranslationCallback,
    MissingTranslationCollector, MissingTranslationEvent, MissingTranslationPolicy, Resolution,
    plan_resolution,
};
pub use loader::{
    load_settings_from_file, load_table_from_dir, load_table_from_file, load_table_from_str,
};
pub use locale::to_locale;
pub use plural::{PluralKind, plural_categories};
pub use render::{
    Formatter, FormatterContext, MessageRenderer, RenderContext, apply_simple_placeholders,
};
pub use scanner::{find_matching_brace, find_top_level_comma, is_quoted_position, unescape_icu_text};
pub use table::{TranslationEntry, TranslationTable};
pub use translator::{
    CategoryTranslator, IcuTranslatorOptions, Translator, TranslatorSettings, category_key,
};
pub use value::{Placeholder, PlaceholderEntry, PlaceholderValue};
