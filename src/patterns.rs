//! CLDR number patterns for percent and currency placement.
//!
//! ICU supplies digits, separators, grouping and compact notation; where the
//! `%` sign and the currency symbol go, and which symbol a locale uses for a
//! currency, comes from the tables below. Lookup tries `language-REGION`
//! first, then `language`, then the root patterns.

use icu_locale::Locale;

const NBSP: &str = "\u{a0}";

/// Where a currency symbol sits relative to the digits, and what separates
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    Before(&'static str),
    After(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberPatterns {
    /// Text before and after the digits of a percentage.
    pub percent: (&'static str, &'static str),
    pub currency: CurrencyPosition,
}

const ROOT: NumberPatterns = NumberPatterns {
    percent: ("", "%"),
    currency: CurrencyPosition::Before(NBSP),
};

const fn patterns(percent: (&'static str, &'static str), currency: CurrencyPosition) -> NumberPatterns {
    NumberPatterns { percent, currency }
}

fn patterns_for_tag(tag: &str) -> Option<NumberPatterns> {
    use CurrencyPosition::{After, Before};

    let spaced_percent = ("", "\u{a0}%");
    let found = match tag {
        "en" | "ja" | "zh" | "ko" | "hi" | "th" | "id" => patterns(("", "%"), Before("")),
        "de" => patterns(spaced_percent, After(NBSP)),
        "de-AT" => patterns(spaced_percent, Before(NBSP)),
        "de-CH" | "de-LI" => patterns(("", "%"), Before(NBSP)),
        "fr" => patterns(("", "\u{202f}%"), After(NBSP)),
        "fr-CH" => patterns(("", "%"), After(NBSP)),
        "es" => patterns(spaced_percent, After(NBSP)),
        "es-MX" | "es-US" | "es-419" => patterns(spaced_percent, Before("")),
        "it" | "pl" | "uk" | "hr" | "ro" => patterns(("", "%"), After(NBSP)),
        "pt" | "nl" => patterns(("", "%"), Before(NBSP)),
        "pt-PT" => patterns(("", "%"), After(NBSP)),
        "ru" | "cs" | "sk" | "sv" | "da" | "nb" | "no" | "fi" | "bg" | "el" | "hu" => {
            patterns(spaced_percent, After(NBSP))
        }
        "tr" => patterns(("%", ""), Before("")),
        _ => return None,
    };
    Some(found)
}

fn locale_keys(locale: &Locale) -> (String, Option<String>) {
    let language = locale.id.language.to_string();
    let regional = locale
        .id
        .region
        .map(|region| format!("{}-{}", language, region));
    (language, regional)
}

/// Percent and currency patterns for a locale.
pub fn number_patterns(locale: &Locale) -> NumberPatterns {
    let (language, regional) = locale_keys(locale);
    regional
        .as_deref()
        .and_then(patterns_for_tag)
        .or_else(|| patterns_for_tag(&language))
        .unwrap_or(ROOT)
}

fn base_symbol(code: &str) -> Option<&'static str> {
    let symbol = match code {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "ILS" => "₪",
        "VND" => "₫",
        "CAD" => "CA$",
        "AUD" => "A$",
        "MXN" => "MX$",
        "BRL" => "R$",
        "HKD" => "HK$",
        "NZD" => "NZ$",
        "TWD" => "NT$",
        _ => return None,
    };
    Some(symbol)
}

fn local_symbol(tag: &str, code: &str) -> Option<&'static str> {
    let symbol = match (tag, code) {
        ("ja", "JPY") => "￥",
        ("ja", "CNY") => "元",
        ("zh", "CNY") => "¥",
        ("zh", "USD") | ("ko", "USD") | ("es", "USD") | ("pt", "USD") => "US$",
        ("zh", "JPY") => "JP¥",
        ("fr", "USD") => "$US",
        ("fr", "CAD") => "$CA",
        ("en-CA", "USD") => "US$",
        ("en-CA", "CAD") => "$",
        ("en-AU", "AUD") => "$",
        ("pt-BR", "BRL") => "R$",
        ("es-MX", "MXN") => "$",
        _ => return None,
    };
    Some(symbol)
}

/// Display symbol of a currency in a locale. Codes without a known symbol
/// are shown as the code itself.
pub fn currency_symbol<'a>(locale: &Locale, code: &'a str) -> &'a str {
    let (language, regional) = locale_keys(locale);
    regional
        .as_deref()
        .and_then(|tag| local_symbol(tag, code))
        .or_else(|| local_symbol(&language, code))
        .or_else(|| base_symbol(code))
        .unwrap_or(code)
}

/// Fraction digits a currency is shown with.
pub fn currency_digits(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "UGX" | "PYG" => 0,
        "BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
        _ => 2,
    }
}

/// Put `digits` between the locale's sign affixes and a currency symbol.
pub fn place_currency(
    position: CurrencyPosition,
    symbol: &str,
    sign: (&str, &str),
    digits: &str,
) -> String {
    // a symbol that is a bare code always gets a separator
    let is_code = symbol.len() == 3 && symbol.bytes().all(|b| b.is_ascii_uppercase());
    match position {
        CurrencyPosition::Before(separator) => {
            let separator = if is_code && separator.is_empty() { NBSP } else { separator };
            format!("{}{}{}{}{}", sign.0, symbol, separator, digits, sign.1)
        }
        CurrencyPosition::After(separator) => {
            let separator = if is_code && separator.is_empty() { NBSP } else { separator };
            format!("{}{}{}{}{}", sign.0, digits, sign.1, separator, symbol)
        }
    }
}

/// Put `digits` between the locale's sign affixes and the percent sign.
pub fn place_percent(patterns: &NumberPatterns, sign: (&str, &str), digits: &str) -> String {
    let (before, after) = patterns.percent;
    format!("{}{}{}{}{}", sign.0, before, digits, after, sign.1)
}
