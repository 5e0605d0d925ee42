//! Locale-aware number and date/time formatting for `number`, `date`, `time`
//! arguments and for `#` inside plural branches.
//!
//! Digits, separators, grouping and compact notation come from ICU data.
//! Percent and currency placement follow the CLDR patterns in
//! [`crate::patterns`].

use chrono::{DateTime, Datelike, Timelike, Utc};
use fixed_decimal::{Decimal, FloatPrecision, Sign};
use icu_calendar::Date;
use icu_datetime::DateTimeFormatter;
use icu_datetime::fieldsets::builder::{DateFields, FieldSetBuilder};
use icu_datetime::fieldsets::enums::CompositeDateTimeFieldSet;
use icu_datetime::input::{DateTime as IcuDateTime, Time};
use icu_datetime::options::{Alignment, Length, SubsecondDigits, TimePrecision, YearStyle};
use icu_decimal::options::{CompactDecimalFormatterOptions, DecimalFormatterOptions};
use icu_decimal::provider::{Baked, DecimalSymbolsV1};
use icu_decimal::{CompactDecimalFormatter, DecimalFormatter};
use icu_locale::{Locale, locale};
use tracing::warn;

use crate::locale::{locale_with_data, parse_locale, with_hour_cycle};
use crate::patterns::{currency_digits, currency_symbol, number_patterns, place_currency, place_percent};
use crate::style::{DateTimeOptions, DateTimeStyle, FieldWidth, Notation, NumberOptions, NumberStyle};

/// Parse `tag`, substituting `en` when ICU only has root data for it.
fn data_locale(tag: &str) -> Locale {
    locale_with_data::<DecimalSymbolsV1, _>(&Baked, &parse_locale(tag), "number and date formats")
}

fn load_decimal_formatter(locale: &Locale) -> Option<DecimalFormatter> {
    match DecimalFormatter::try_new(locale.clone().into(), DecimalFormatterOptions::default()) {
        Ok(formatter) => Some(formatter),
        Err(e) => {
            warn!(locale = %locale, error = %e, "failed to load number formatter, using \"en\"");
            DecimalFormatter::try_new(locale!("en").into(), DecimalFormatterOptions::default())
                .ok()
        }
    }
}

fn load_compact_formatter(locale: &Locale, notation: Notation) -> Option<CompactDecimalFormatter> {
    let load = |locale: &Locale| match notation {
        Notation::CompactLong => CompactDecimalFormatter::try_new_long(
            locale.clone().into(),
            CompactDecimalFormatterOptions::default(),
        ),
        _ => CompactDecimalFormatter::try_new_short(
            locale.clone().into(),
            CompactDecimalFormatterOptions::default(),
        ),
    };
    match load(locale) {
        Ok(formatter) => Some(formatter),
        Err(e) => {
            warn!(locale = %locale, error = %e, "failed to load compact formatter, using \"en\"");
            load(&locale!("en")).ok()
        }
    }
}

/// Split a signed rendering into the sign affixes around `unsigned`.
fn sign_affixes<'a>(signed: &'a str, unsigned: &str) -> (&'a str, &'a str) {
    match signed.find(unsigned) {
        Some(start) => (&signed[..start], &signed[start + unsigned.len()..]),
        None => ("", ""),
    }
}

/// A number formatter for one locale and one set of options.
pub struct NumberFormat {
    locale: Locale,
    formatter: Option<DecimalFormatter>,
    compact: Option<CompactDecimalFormatter>,
    options: NumberOptions,
}

impl std::fmt::Debug for NumberFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NumberFormat")
            .field("locale", &self.locale)
            .field("options", &self.options)
            .field("has_locale_data", &self.formatter.is_some())
            .field("compact", &self.compact.is_some())
            .finish()
    }
}

impl NumberFormat {
    pub fn new(locale_tag: &str, options: NumberOptions) -> Self {
        let locale = data_locale(locale_tag);
        let compact = match options.notation {
            Notation::Standard => None,
            notation => load_compact_formatter(&locale, notation),
        };
        NumberFormat {
            formatter: load_decimal_formatter(&locale),
            compact,
            locale,
            options,
        }
    }

    fn fraction_digits(&self) -> (u8, u8) {
        let (default_min, default_max) = match &self.options.style {
            NumberStyle::Decimal => (0, 3),
            NumberStyle::Percent => (0, 0),
            NumberStyle::Currency(code) => {
                let digits = currency_digits(code);
                (digits, digits)
            }
        };
        let minimum = self.options.minimum_fraction_digits.unwrap_or(default_min);
        let maximum = self
            .options
            .maximum_fraction_digits
            .unwrap_or(default_max)
            .max(minimum);
        (minimum, maximum)
    }

    fn render(&self, decimal: &Decimal) -> String {
        if let Some(compact) = &self.compact {
            return compact.format(decimal).to_string();
        }
        match &self.formatter {
            Some(formatter) => formatter.format(decimal).to_string(),
            None => decimal.to_string(),
        }
    }

    /// Signed and unsigned renderings of `value`, rounded per the options.
    fn digits(&self, value: f64) -> Option<(String, String)> {
        let mut decimal = Decimal::try_from_f64(value, FloatPrecision::RoundTrip).ok()?;
        let (minimum, maximum) = self.fraction_digits();
        decimal.round(-(maximum as i16));
        decimal.trim_end();
        if self.compact.is_none() {
            decimal.pad_end(-(minimum as i16));
        }
        let signed = self.render(&decimal);
        decimal.set_sign(Sign::None);
        Some((signed, self.render(&decimal)))
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let number = match self.options.style {
            NumberStyle::Percent => value * 100.0,
            _ => value,
        };
        let Some((signed, unsigned)) = self.digits(number) else {
            return number.to_string();
        };
        match &self.options.style {
            NumberStyle::Decimal => signed,
            NumberStyle::Percent => {
                let patterns = number_patterns(&self.locale);
                place_percent(&patterns, sign_affixes(&signed, &unsigned), &unsigned)
            }
            NumberStyle::Currency(code) => {
                let patterns = number_patterns(&self.locale);
                place_currency(
                    patterns.currency,
                    currency_symbol(&self.locale, code),
                    sign_affixes(&signed, &unsigned),
                    &unsigned,
                )
            }
        }
    }
}

fn length_for(style: DateTimeStyle) -> Length {
    match style {
        DateTimeStyle::Short => Length::Short,
        DateTimeStyle::Medium => Length::Medium,
        DateTimeStyle::Long | DateTimeStyle::Full => Length::Long,
    }
}

fn date_fields(options: &DateTimeOptions) -> Option<DateFields> {
    let year = options.year.is_some() || options.era.is_some();
    let month = options.month.is_some();
    let day = options.day.is_some();
    if options.weekday.is_some() {
        return Some(match (year, month, day) {
            (true, _, _) => DateFields::YMDE,
            (false, true, _) => DateFields::MDE,
            (false, false, true) => DateFields::DE,
            (false, false, false) => DateFields::E,
        });
    }
    match (year, month, day) {
        (true, true, true) | (true, false, true) => Some(DateFields::YMD),
        (true, true, false) => Some(DateFields::YM),
        (true, false, false) => Some(DateFields::Y),
        (false, true, true) => Some(DateFields::MD),
        (false, true, false) => Some(DateFields::M),
        (false, false, true) => Some(DateFields::D),
        (false, false, false) => None,
    }
}

fn time_precision(options: &DateTimeOptions) -> Option<TimePrecision> {
    if options.second.is_some() {
        return Some(match options.fractional_second_digits {
            Some(1) => TimePrecision::Subsecond(SubsecondDigits::S1),
            Some(2) => TimePrecision::Subsecond(SubsecondDigits::S2),
            Some(3) => TimePrecision::Subsecond(SubsecondDigits::S3),
            _ => TimePrecision::Second,
        });
    }
    if options.minute.is_some() {
        return Some(TimePrecision::Minute);
    }
    options.hour.map(|_| TimePrecision::Hour)
}

/// Text month or weekday widths pick the pattern length; numeric fields use
/// the short patterns.
fn skeleton_length(options: &DateTimeOptions) -> Length {
    match (options.month, options.weekday) {
        (Some(FieldWidth::Long), _) => Length::Long,
        (Some(FieldWidth::Short), _) | (Some(FieldWidth::Narrow), _) => Length::Medium,
        (Some(_), _) => Length::Short,
        (None, Some(FieldWidth::Long)) => Length::Long,
        (None, Some(_)) => Length::Medium,
        (None, None) => Length::Short,
    }
}

/// Field set builders in decreasing fidelity; the first one ICU accepts wins.
fn field_set_candidates(options: &DateTimeOptions) -> Vec<FieldSetBuilder> {
    let mut builder = FieldSetBuilder::new();

    if options.date_style.is_some() || options.time_style.is_some() {
        if let Some(style) = options.date_style {
            builder.length = Some(length_for(style));
            builder.date_fields = Some(if style == DateTimeStyle::Full {
                DateFields::YMDE
            } else {
                DateFields::YMD
            });
        }
        if let Some(style) = options.time_style {
            builder.length = builder.length.or(Some(length_for(style)));
            builder.time_precision = Some(if style == DateTimeStyle::Short {
                TimePrecision::Minute
            } else {
                TimePrecision::Second
            });
        }
        let mut bare = builder.clone();
        bare.length = None;
        return vec![builder, bare];
    }

    builder.date_fields = date_fields(options);
    builder.time_precision = time_precision(options);
    builder.length = Some(skeleton_length(options));

    let mut bare = builder.clone();
    bare.length = None;

    let padded = [options.month, options.day, options.hour, options.minute]
        .iter()
        .any(|width| *width == Some(FieldWidth::TwoDigit));
    if padded {
        builder.alignment = Some(Alignment::Column);
    }
    let simplified = builder.clone();

    if builder.date_fields.is_some_and(|fields| {
        matches!(fields, DateFields::YMD | DateFields::YM | DateFields::Y | DateFields::YMDE)
    }) {
        if options.era.is_some() {
            builder.year_style = Some(YearStyle::WithEra);
        } else if options.year == Some(FieldWidth::Numeric) {
            builder.year_style = Some(YearStyle::Full);
        }
    }

    vec![builder, simplified, bare]
}

fn to_icu_datetime(value: &DateTime<Utc>) -> Option<IcuDateTime<icu_calendar::Iso>> {
    let date = Date::try_new_iso(value.year(), value.month() as u8, value.day() as u8).ok()?;
    let time = Time::try_new(
        value.hour() as u8,
        value.minute() as u8,
        value.second() as u8,
        value.nanosecond().min(999_999_999),
    )
    .ok()?;
    Some(IcuDateTime { date, time })
}

/// A date/time formatter for one locale and one set of options.
pub struct DateTimeFormat {
    formatter: Option<DateTimeFormatter<CompositeDateTimeFieldSet>>,
    zone_suffix: bool,
}

impl std::fmt::Debug for DateTimeFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DateTimeFormat")
            .field("has_locale_data", &self.formatter.is_some())
            .field("zone_suffix", &self.zone_suffix)
            .finish()
    }
}

impl DateTimeFormat {
    pub fn new(locale_tag: &str, options: &DateTimeOptions) -> Self {
        let base = data_locale(locale_tag);
        let locale = match options.hour12 {
            Some(hour12) => with_hour_cycle(&base.to_string(), hour12),
            None => base,
        };

        let field_set = field_set_candidates(options)
            .into_iter()
            .find_map(|builder| builder.build_composite_datetime().ok());

        let formatter = field_set.and_then(|field_set| {
            match DateTimeFormatter::try_new(locale.clone().into(), field_set.clone()) {
                Ok(formatter) => Some(formatter),
                Err(e) => {
                    warn!(locale = %locale, error = %e, "failed to load date formatter, using \"en\"");
                    DateTimeFormatter::try_new(locale!("en").into(), field_set).ok()
                }
            }
        });

        // values are rendered in UTC; a requested zone name is always "UTC"
        let zone_suffix = options.time_zone_name.is_some()
            || matches!(
                options.time_style,
                Some(DateTimeStyle::Long) | Some(DateTimeStyle::Full)
            );

        DateTimeFormat {
            formatter,
            zone_suffix,
        }
    }

    pub fn format(&self, value: &DateTime<Utc>) -> String {
        let formatted = match (&self.formatter, to_icu_datetime(value)) {
            (Some(formatter), Some(input)) => formatter.format(&input).to_string(),
            _ => value.to_rfc3339(),
        };
        if self.zone_suffix {
            format!("{} UTC", formatted)
        } else {
            formatted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExpressionType;
    use crate::style::{resolve_date_time_style, resolve_number_style};
    use chrono::TimeZone;
    use rstest::rstest;

    fn number(locale: &str, style: &str, value: f64) -> String {
        NumberFormat::new(locale, resolve_number_style(style).unwrap()).format(value)
    }

    #[rstest]
    #[case("en", "", 1234567.0, "1,234,567")]
    #[case("en", "", 1234.5678, "1,234.568")]
    #[case("de", "", 1234.5, "1.234,5")]
    #[case("en", "", -42.0, "-42")]
    #[case("en", "integer", 2.4, "2")]
    #[case("en", "percent", 0.25, "25%")]
    #[case("en", "currency", 12.5, "$12.50")]
    #[case("en", "currency:EUR", -3.0, "-€3.00")]
    #[case("en", "currency/JPY", 1500.0, "¥1,500")]
    #[case("en", "currency/CHF", 5.0, "CHF\u{a0}5.00")]
    #[case("en", "::.00", 3.0, "3.00")]
    fn test_number_format(
        #[case] locale: &str,
        #[case] style: &str,
        #[case] value: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(number(locale, style, value), expected);
    }

    #[rstest]
    #[case("compactShort", 999.0, "999")]
    #[case("compactShort", 1234.0, "1.2K")]
    #[case("compactShort", 12345.0, "12K")]
    #[case("compactShort", 123456.0, "123K")]
    #[case("compactShort", 999_999.0, "1M")]
    #[case("compactLong", 1_500_000.0, "1.5 million")]
    #[case("::compact-short", 2_000_000_000.0, "2B")]
    #[case("compactShort", -1_172_700.0, "-1.2M")]
    fn test_compact_format(#[case] style: &str, #[case] value: f64, #[case] expected: &str) {
        assert_eq!(number("en", style, value), expected);
    }

    #[rstest]
    #[case("de", "currency:EUR", 12.5, "12,50\u{a0}€")]
    #[case("de", "currency:EUR", -3.0, "-3,00\u{a0}€")]
    #[case("de-AT", "currency:EUR", 12.5, "€\u{a0}12,50")]
    #[case("de", "currency/CHF", 5.0, "5,00\u{a0}CHF")]
    #[case("fr", "currency:USD", 7.0, "7,00\u{a0}$US")]
    #[case("ja", "currency/JPY", 1500.0, "￥1,500")]
    #[case("de", "percent", 0.5, "50\u{a0}%")]
    #[case("fr", "percent", 0.5, "50\u{202f}%")]
    #[case("tr", "percent", 0.5, "%50")]
    #[case("ja", "percent", 0.5, "50%")]
    fn test_locale_patterns(
        #[case] locale: &str,
        #[case] style: &str,
        #[case] value: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(number(locale, style, value), expected);
    }

    #[rstest]
    #[case("de", "compactLong", 1_500_000.0, "1,5 Millionen")]
    #[case("de", "compactShort", 1_500_000.0, "1,5\u{a0}Mio.")]
    #[case("fr", "compactLong", 35_357_670.0, "35 millions")]
    #[case("ja", "compactShort", 12345.0, "1.2万")]
    fn test_compact_by_locale(
        #[case] locale: &str,
        #[case] style: &str,
        #[case] value: f64,
        #[case] expected: &str,
    ) {
        assert_eq!(number(locale, style, value), expected);
    }

    #[test]
    fn test_compact_tiny_values() {
        assert_eq!(number("en", "compactShort", 1e-320), "0");
        assert_eq!(number("en", "compactShort", 0.2222), "0.22");
    }

    #[test]
    fn test_non_finite_numbers() {
        assert_eq!(number("en", "", f64::NAN), "NaN");
        assert_eq!(number("en", "", f64::INFINITY), "∞");
    }

    #[test]
    fn test_unknown_locale_still_formats() {
        assert_eq!(number("???", "", 1000.0), "1,000");
    }

    #[rstest]
    #[case("xx")]
    #[case("zz-ZZ")]
    #[case("qaa")]
    fn test_locale_without_data_formats_as_english(#[case] tag: &str) {
        assert_eq!(number(tag, "currency:EUR", 12.5), "€12.50");
        assert_eq!(number(tag, "compactShort", 12345.0), "12K");
        let month = date(tag, ExpressionType::Date, "long");
        assert!(month.contains("January"), "{}", month);
    }

    fn date(locale: &str, expression_type: ExpressionType, style: &str) -> String {
        let options = resolve_date_time_style(expression_type, style).unwrap();
        let value = Utc.with_ymd_and_hms(2024, 1, 15, 14, 5, 9).unwrap();
        DateTimeFormat::new(locale, &options).format(&value)
    }

    #[test]
    fn test_date_styles_contain_fields() {
        let medium = date("en", ExpressionType::Date, "");
        assert!(medium.contains("Jan"), "{}", medium);
        assert!(medium.contains("2024"), "{}", medium);

        let long = date("en", ExpressionType::Date, "long");
        assert!(long.contains("January"), "{}", long);

        let full = date("en", ExpressionType::Date, "full");
        assert!(full.contains("Monday"), "{}", full);
    }

    #[test]
    fn test_time_style_contains_minutes() {
        let short = date("en", ExpressionType::Time, "short");
        assert!(short.contains("05"), "{}", short);
        assert!(!short.contains("2024"), "{}", short);

        let long = date("en", ExpressionType::Time, "long");
        assert!(long.ends_with(" UTC"), "{}", long);
    }

    #[test]
    fn test_date_skeleton() {
        let formatted = date("en", ExpressionType::Date, "::yyyy-MM-dd");
        assert!(formatted.contains("2024"), "{}", formatted);
        assert!(formatted.contains("15"), "{}", formatted);
    }

    #[test]
    fn test_hour_cycle_from_skeleton() {
        let formatted = date("en", ExpressionType::Time, "::HH:mm");
        assert!(formatted.contains("14"), "{}", formatted);
        let formatted = date("en", ExpressionType::Time, "::h:mm a");
        assert!(formatted.contains('2'), "{}", formatted);
        assert!(!formatted.contains("14"), "{}", formatted);
    }

    #[test]
    fn test_german_month_names() {
        let formatted = date("de", ExpressionType::Date, "long");
        assert!(formatted.contains("Januar"), "{}", formatted);
    }
}
