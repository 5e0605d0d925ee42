//! Language code → ICU locale resolution.

use std::collections::HashMap;

use icu_locale::{Locale, locale};
use icu_provider::{DataIdentifierBorrowed, DataLocale, DataMarker, DataProvider, DataRequest};
use tracing::warn;

/// Locale tag used for a language: an explicit override for `language`, else
/// the override for `default_language`, else the language code itself.
pub fn to_locale(
    language: &str,
    default_language: &str,
    locale_by_language: &HashMap<String, String>,
) -> String {
    locale_by_language
        .get(language)
        .or_else(|| locale_by_language.get(default_language))
        .cloned()
        .unwrap_or_else(|| language.to_string())
}

/// Parse a locale tag, substituting `en` when the tag is not valid BCP 47.
///
/// Underscore-separated tags such as `pt_BR` are accepted.
pub fn parse_locale(tag: &str) -> Locale {
    let normalized = tag.trim().replace('_', "-");
    match normalized.parse::<Locale>() {
        Ok(locale) => locale,
        Err(e) => {
            warn!(tag, error = %e, "unsupported locale tag, using \"en\"");
            locale!("en")
        }
    }
}

/// Whether `provider` holds data for `locale` itself or a parent of it, as
/// opposed to only the root locale that ICU silently falls back to.
pub fn has_locale_data<M, P>(provider: &P, locale: &Locale) -> bool
where
    M: DataMarker,
    P: DataProvider<M> + ?Sized,
{
    let data_locale = DataLocale::from(locale);
    if data_locale.language.is_unknown() {
        return false;
    }
    let mut request = DataRequest::default();
    request.id = DataIdentifierBorrowed::for_locale(&data_locale);
    request.metadata.silent = true;
    match provider.load(request) {
        Ok(response) => !response
            .metadata
            .locale
            .is_some_and(|resolved| resolved.language.is_unknown()),
        Err(_) => false,
    }
}

/// `locale` when `provider` has data for it, else `en`.
pub fn locale_with_data<M, P>(provider: &P, locale: &Locale, what: &str) -> Locale
where
    M: DataMarker,
    P: DataProvider<M> + ?Sized,
{
    if has_locale_data::<M, P>(provider, locale) {
        return locale.clone();
    }
    warn!(locale = %locale, what, "no locale data, using \"en\"");
    locale!("en")
}

/// Parse `tag` and attach a `-u-hc-` hour-cycle keyword.
///
/// Tags that already carry Unicode extensions are returned unchanged.
pub fn with_hour_cycle(tag: &str, hour12: bool) -> Locale {
    let base = parse_locale(tag);
    let rendered = base.to_string();
    if rendered.contains("-u-") {
        return base;
    }
    let cycle = if hour12 { "h12" } else { "h23" };
    format!("{}-u-hc-{}", rendered, cycle)
        .parse::<Locale>()
        .unwrap_or(base)
}
