//! Fallback resolution for a `(key, language)` lookup and the handling of
//! missing translations.
//!
//! Resolution is planned by a pure function over the table, then the
//! translator reports any [`MissingTranslationEvent`] to the configured
//! [`MissingTranslationPolicy`] and asks it whether to continue.
//!
//! ```text
//! Start ─ key absent ──────────────────────────► ReportMissingKey ─► ReturnKey
//!   └─► TryRequested ─ non-empty ─────────────────────────────────► Render
//!            └─ empty ─► TryDefault ─ non-empty ─► ReportMissingLanguage ─► Render
//!                             └─ empty ───────► ReportMissingFallback ─► ReturnKey
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TranslateError;
use crate::table::TranslationTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingReason {
    /// The key is not in the table.
    MissingKey,
    /// The requested language is empty; the default language is used.
    MissingLanguage,
    /// Both the requested and the default language are empty.
    MissingFallback,
}

impl MissingReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MissingReason::MissingKey => "missingKey",
            MissingReason::MissingLanguage => "missingLanguage",
            MissingReason::MissingFallback => "missingFallback",
        }
    }
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingTranslationEvent {
    pub key: String,
    pub language: String,
    pub default_language: String,
    pub reason: MissingReason,
}

impl MissingTranslationEvent {
    pub fn new(key: &str, language: &str, default_language: &str, reason: MissingReason) -> Self {
        MissingTranslationEvent {
            key: key.to_string(),
            language: language.to_string(),
            default_language: default_language.to_string(),
            reason,
        }
    }

    pub fn to_error(&self) -> TranslateError {
        TranslateError::MissingTranslation {
            key: self.key.clone(),
            language: self.language.clone(),
            default_language: self.default_language.clone(),
            reason: self.reason,
        }
    }
}

/// How missing translations are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingStrategy {
    /// Use the default language text, then the key.
    #[default]
    Fallback,
    /// Fail on every missing translation.
    Strict,
}

/// Which language's text a [`Resolution::Render`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Requested,
    Default,
}

/// The planned outcome of a lookup, before any event is reported.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<'t> {
    Render {
        template: &'t str,
        source: TextSource,
        event: Option<MissingTranslationEvent>,
    },
    ReturnKey {
        event: MissingTranslationEvent,
    },
}

impl Resolution<'_> {
    pub fn event(&self) -> Option<&MissingTranslationEvent> {
        match self {
            Resolution::Render { event, .. } => event.as_ref(),
            Resolution::ReturnKey { event } => Some(event),
        }
    }
}

/// Decide what a lookup of `key` in `language` renders.
pub fn plan_resolution<'t>(
    table: &'t TranslationTable,
    key: &str,
    language: &str,
    default_language: &str,
) -> Resolution<'t> {
    let event = |reason| MissingTranslationEvent::new(key, language, default_language, reason);

    let Some(entry) = table.get(key) else {
        return Resolution::ReturnKey {
            event: event(MissingReason::MissingKey),
        };
    };

    if let Some(template) = entry.get(language).filter(|text| !text.is_empty()) {
        return Resolution::Render {
            template,
            source: TextSource::Requested,
            event: None,
        };
    }

    match entry.get(default_language).filter(|text| !text.is_empty()) {
        Some(template) => Resolution::Render {
            template,
            source: TextSource::Default,
            event: Some(event(MissingReason::MissingLanguage)),
        },
        None => Resolution::ReturnKey {
            event: event(MissingReason::MissingFallback),
        },
    }
}

pub type MissingTranslationCallback = Rc<dyn Fn(&MissingTranslationEvent)>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Continue,
    Fail(TranslateError),
}

/// Reports missing-translation events and decides whether a lookup may
/// continue with its best-effort result.
#[derive(Clone, Default)]
pub struct MissingTranslationPolicy {
    strategy: MissingStrategy,
    callback: Option<MissingTranslationCallback>,
}

impl fmt::Debug for MissingTranslationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissingTranslationPolicy")
            .field("strategy", &self.strategy)
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

impl MissingTranslationPolicy {
    pub fn new(strategy: MissingStrategy, callback: Option<MissingTranslationCallback>) -> Self {
        MissingTranslationPolicy { strategy, callback }
    }

    pub fn strategy(&self) -> MissingStrategy {
        self.strategy
    }

    pub fn report(&self, event: &MissingTranslationEvent) {
        debug!(
            key = %event.key,
            language = %event.language,
            default_language = %event.default_language,
            reason = %event.reason,
            "missing translation"
        );
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }

    pub fn decide(&self, event: &MissingTranslationEvent) -> Decision {
        match self.strategy {
            MissingStrategy::Fallback => Decision::Continue,
            MissingStrategy::Strict => Decision::Fail(event.to_error()),
        }
    }

    /// Report, then decide.
    pub fn handle(&self, event: &MissingTranslationEvent) -> Result<(), TranslateError> {
        self.report(event);
        match self.decide(event) {
            Decision::Continue => Ok(()),
            Decision::Fail(error) => Err(error),
        }
    }
}

/// Records missing-translation events for later inspection.
///
/// Clones share the same event list.
#[derive(Debug, Clone, Default)]
pub struct MissingTranslationCollector(Rc<RefCell<Vec<MissingTranslationEvent>>>);

impl MissingTranslationCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: &MissingTranslationEvent) {
        self.0.borrow_mut().push(event.clone());
    }

    pub fn events(&self) -> Vec<MissingTranslationEvent> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// A callback that records into this collector.
    pub fn callback(&self) -> MissingTranslationCallback {
        let collector = self.clone();
        Rc::new(move |event| collector.record(event))
    }
}
