use std::str::FromStr;

use icu_locale::{Locale, locale};
use icu_plurals::provider::{Baked, PluralsCardinalV1, PluralsOrdinalV1};
use icu_plurals::{PluralCategory, PluralOperands, PluralRuleType, PluralRules};
use tracing::warn;

use crate::locale::locale_with_data;

/// Cardinal rules drive `plural`, ordinal rules drive `selectordinal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralKind {
    Cardinal,
    Ordinal,
}

impl From<PluralKind> for PluralRuleType {
    fn from(kind: PluralKind) -> Self {
        match kind {
            PluralKind::Cardinal => PluralRuleType::Cardinal,
            PluralKind::Ordinal => PluralRuleType::Ordinal,
        }
    }
}

/// Load plural rules for a locale, using `en` when CLDR has no rules for the
/// locale or any of its parents. `None` only if even `en` cannot be loaded;
/// callers then treat every number as `other`.
pub fn load_plural_rules(locale: &Locale, kind: PluralKind) -> Option<PluralRules> {
    let locale = match kind {
        PluralKind::Cardinal => locale_with_data::<PluralsCardinalV1, _>(&Baked, locale, "plural rules"),
        PluralKind::Ordinal => locale_with_data::<PluralsOrdinalV1, _>(&Baked, locale, "ordinal rules"),
    };
    match PluralRules::try_new(locale.clone().into(), PluralRuleType::from(kind).into()) {
        Ok(rules) => Some(rules),
        Err(e) => {
            warn!(locale = %locale, error = %e, "failed to load plural rules, using \"en\"");
            PluralRules::try_new(locale!("en").into(), PluralRuleType::from(kind).into()).ok()
        }
    }
}

/// CLDR selector name for a category, as written in ICU branches.
pub fn category_name(category: PluralCategory) -> &'static str {
    match category {
        PluralCategory::Zero => "zero",
        PluralCategory::One => "one",
        PluralCategory::Two => "two",
        PluralCategory::Few => "few",
        PluralCategory::Many => "many",
        PluralCategory::Other => "other",
    }
}

/// Category of a number. Integers go through the integer operands; other
/// values are parsed from their decimal representation so that visible
/// fraction digits count (`1.5` is not `one` in English).
pub fn category_for(rules: &PluralRules, value: f64) -> PluralCategory {
    let magnitude = value.abs();
    if magnitude.fract() == 0.0 && magnitude <= i64::MAX as f64 {
        return rules.category_for(magnitude as i64);
    }
    match PluralOperands::from_str(&magnitude.to_string()) {
        Ok(operands) => rules.category_for(operands),
        Err(_) => PluralCategory::Other,
    }
}

/// Categories a locale actually uses, in CLDR order.
///
/// Samples representative numbers for each category; a category is reported
/// when one of its samples lands on it.
pub fn plural_categories(locale: &Locale, kind: PluralKind) -> Vec<&'static str> {
    let Some(rules) = load_plural_rules(locale, kind) else {
        return vec![category_name(PluralCategory::Other)];
    };

    let samples_by_category = [
        (PluralCategory::Zero, vec![0u32]),
        (PluralCategory::One, vec![1u32, 21, 31, 41]),
        (PluralCategory::Two, vec![2u32, 22, 32]),
        (PluralCategory::Few, vec![3u32, 4, 23, 24, 103]),
        (PluralCategory::Many, vec![5u32, 6, 11, 20, 101, 1_000_000]),
        (
            PluralCategory::Other,
            vec![6u32, 7, 8, 9, 10, 25, 100, 1000],
        ),
    ];

    let mut categories = Vec::new();
    for (expected, samples) in samples_by_category.iter() {
        let used = samples
            .iter()
            .any(|&sample| rules.category_for(sample as usize) == *expected);
        // in some locales (e.g. Russian) only fractions reach `other`
        let used = used
            || (*expected == PluralCategory::Other
                && PluralOperands::from_str("1.5")
                    .map(|operands| rules.category_for(operands) == PluralCategory::Other)
                    .unwrap_or(false));
        if used {
            categories.push(category_name(*expected));
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rules(tag: &str, kind: PluralKind) -> PluralRules {
        load_plural_rules(&tag.parse().unwrap(), kind).unwrap()
    }

    #[rstest]
    #[case(0.0, "other")]
    #[case(1.0, "one")]
    #[case(2.0, "other")]
    #[case(1.5, "other")]
    #[case(-1.0, "one")]
    fn test_english_cardinal(#[case] value: f64, #[case] expected: &str) {
        let rules = rules("en", PluralKind::Cardinal);
        assert_eq!(category_name(category_for(&rules, value)), expected);
    }

    #[rstest]
    #[case(1.0, "one")]
    #[case(2.0, "two")]
    #[case(3.0, "few")]
    #[case(4.0, "other")]
    #[case(11.0, "other")]
    #[case(22.0, "two")]
    fn test_english_ordinal(#[case] value: f64, #[case] expected: &str) {
        let rules = rules("en", PluralKind::Ordinal);
        assert_eq!(category_name(category_for(&rules, value)), expected);
    }

    #[rstest]
    #[case(1.0, "one")]
    #[case(2.0, "few")]
    #[case(5.0, "many")]
    #[case(21.0, "one")]
    fn test_russian_cardinal(#[case] value: f64, #[case] expected: &str) {
        let rules = rules("ru", PluralKind::Cardinal);
        assert_eq!(category_name(category_for(&rules, value)), expected);
    }

    #[rstest]
    #[case("xx")]
    #[case("zz-ZZ")]
    #[case("qaa")]
    fn test_locale_without_rules_uses_english(#[case] tag: &str) {
        let cardinal = rules(tag, PluralKind::Cardinal);
        assert_eq!(category_name(category_for(&cardinal, 1.0)), "one");
        assert_eq!(category_name(category_for(&cardinal, 2.0)), "other");
        let ordinal = rules(tag, PluralKind::Ordinal);
        assert_eq!(category_name(category_for(&ordinal, 2.0)), "two");
    }

    #[test]
    fn test_regional_locale_uses_language_rules() {
        let rules = rules("fr-CA", PluralKind::Cardinal);
        assert_eq!(category_name(category_for(&rules, 0.0)), "one");
    }

    #[test]
    fn test_plural_categories_english() {
        let locale: Locale = "en".parse().unwrap();
        assert_eq!(
            plural_categories(&locale, PluralKind::Cardinal),
            vec!["one", "other"]
        );
        assert_eq!(
            plural_categories(&locale, PluralKind::Ordinal),
            vec!["one", "two", "few", "other"]
        );
    }

    #[test]
    fn test_plural_categories_arabic() {
        let locale: Locale = "ar".parse().unwrap();
        assert_eq!(
            plural_categories(&locale, PluralKind::Cardinal),
            vec!["zero", "one", "two", "few", "many", "other"]
        );
    }

    #[test]
    fn test_plural_categories_japanese() {
        let locale: Locale = "ja".parse().unwrap();
        assert_eq!(plural_categories(&locale, PluralKind::Cardinal), vec!["other"]);
    }
}
