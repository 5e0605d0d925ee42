//! Named styles and `::` skeletons for `number`, `date` and `time` arguments.
//!
//! Resolution happens at compile time and yields plain option structs; the
//! formatters in [`crate::format`] turn them into ICU formatters.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::ExpressionType;

static PRECISION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\.(0*)(#*)$").expect("valid precision pattern"));

const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberStyle {
    #[default]
    Decimal,
    Percent,
    /// ISO 4217 code, upper case.
    Currency(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Notation {
    #[default]
    Standard,
    CompactShort,
    CompactLong,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NumberOptions {
    pub style: NumberStyle,
    pub notation: Notation,
    pub minimum_fraction_digits: Option<u8>,
    pub maximum_fraction_digits: Option<u8>,
}

impl NumberOptions {
    fn apply_token(&mut self, token: &str) -> Result<(), String> {
        match token {
            "integer" => {
                self.minimum_fraction_digits = Some(0);
                self.maximum_fraction_digits = Some(0);
            }
            "percent" => self.style = NumberStyle::Percent,
            "compactShort" | "compact-short" => self.notation = Notation::CompactShort,
            "compactLong" | "compact-long" => self.notation = Notation::CompactLong,
            "currency" => self.style = NumberStyle::Currency(DEFAULT_CURRENCY.to_string()),
            _ => {
                if let Some(code) = token
                    .strip_prefix("currency:")
                    .or_else(|| token.strip_prefix("currency/"))
                {
                    if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
                        return Err(format!("Invalid currency code \"{}\"", code));
                    }
                    self.style = NumberStyle::Currency(code.to_ascii_uppercase());
                } else if let Some(captures) = PRECISION_RE.captures(token) {
                    let minimum = captures[1].len();
                    let maximum = minimum + captures[2].len();
                    if maximum == 0 || maximum > 20 {
                        return Err(format!("Unsupported number precision \"{}\"", token));
                    }
                    self.minimum_fraction_digits = Some(minimum as u8);
                    self.maximum_fraction_digits = Some(maximum as u8);
                } else {
                    return Err(format!("Unsupported number style \"{}\"", token));
                }
            }
        }
        Ok(())
    }
}

/// Resolve the style part of `{value, number, <style>}`.
pub fn resolve_number_style(style: &str) -> Result<NumberOptions, String> {
    let style = style.trim();
    let mut options = NumberOptions::default();
    if style.is_empty() {
        return Ok(options);
    }
    if let Some(skeleton) = style.strip_prefix("::") {
        let mut tokens = skeleton.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Err("Empty number skeleton".to_string());
        }
        for token in tokens {
            options.apply_token(token)?;
        }
        return Ok(options);
    }
    options.apply_token(style)?;
    Ok(options)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateTimeStyle {
    Short,
    Medium,
    Long,
    Full,
}

impl DateTimeStyle {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "short" => Some(DateTimeStyle::Short),
            "medium" => Some(DateTimeStyle::Medium),
            "long" => Some(DateTimeStyle::Long),
            "full" => Some(DateTimeStyle::Full),
            _ => None,
        }
    }
}

/// Width of a single date/time field, in `Intl.DateTimeFormat` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldWidth {
    Numeric,
    TwoDigit,
    Short,
    Long,
    Narrow,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DateTimeOptions {
    pub date_style: Option<DateTimeStyle>,
    pub time_style: Option<DateTimeStyle>,
    pub era: Option<FieldWidth>,
    pub year: Option<FieldWidth>,
    pub month: Option<FieldWidth>,
    pub day: Option<FieldWidth>,
    pub weekday: Option<FieldWidth>,
    pub hour: Option<FieldWidth>,
    pub minute: Option<FieldWidth>,
    pub second: Option<FieldWidth>,
    pub fractional_second_digits: Option<u8>,
    pub hour12: Option<bool>,
    pub time_zone_name: Option<FieldWidth>,
}

impl DateTimeOptions {
    pub fn has_date_fields(&self) -> bool {
        self.year.is_some() || self.month.is_some() || self.day.is_some() || self.weekday.is_some()
    }

    pub fn has_time_fields(&self) -> bool {
        self.hour.is_some() || self.minute.is_some() || self.second.is_some()
    }

    fn is_empty(&self) -> bool {
        self.date_style.is_none()
            && self.time_style.is_none()
            && self.era.is_none()
            && !self.has_date_fields()
            && !self.has_time_fields()
            && self.time_zone_name.is_none()
    }
}

fn text_width(run: usize) -> FieldWidth {
    match run {
        1..=3 => FieldWidth::Short,
        4 => FieldWidth::Long,
        _ => FieldWidth::Narrow,
    }
}

fn numeric_width(run: usize) -> FieldWidth {
    if run >= 2 {
        FieldWidth::TwoDigit
    } else {
        FieldWidth::Numeric
    }
}

fn month_width(run: usize) -> FieldWidth {
    match run {
        1 => FieldWidth::Numeric,
        2 => FieldWidth::TwoDigit,
        3 => FieldWidth::Short,
        4 => FieldWidth::Long,
        _ => FieldWidth::Narrow,
    }
}

/// Parse an ICU date skeleton such as `yyyy-MM-dd` or `EEEE h:mm a`.
///
/// The length of each run of a pattern letter selects the field width.
/// Characters other than ASCII letters are separators and are ignored.
fn parse_date_skeleton(skeleton: &str) -> Result<DateTimeOptions, String> {
    let mut options = DateTimeOptions::default();
    let mut chars = skeleton.chars().peekable();

    while let Some(letter) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&letter) {
            chars.next();
            run += 1;
        }
        if !letter.is_ascii_alphabetic() {
            continue;
        }
        match letter {
            'G' => options.era = Some(text_width(run)),
            'y' => {
                options.year = Some(if run == 2 {
                    FieldWidth::TwoDigit
                } else {
                    FieldWidth::Numeric
                })
            }
            'M' | 'L' => options.month = Some(month_width(run)),
            'd' => options.day = Some(numeric_width(run)),
            'E' | 'e' | 'c' => options.weekday = Some(text_width(run)),
            'a' => options.hour12 = Some(true),
            'h' | 'K' => {
                options.hour = Some(numeric_width(run));
                options.hour12 = Some(true);
            }
            'H' | 'k' => {
                options.hour = Some(numeric_width(run));
                options.hour12 = Some(false);
            }
            'm' => options.minute = Some(numeric_width(run)),
            's' => options.second = Some(numeric_width(run)),
            'S' => options.fractional_second_digits = Some(run.min(3) as u8),
            'z' => {
                options.time_zone_name = Some(if run >= 4 {
                    FieldWidth::Long
                } else {
                    FieldWidth::Short
                })
            }
            other => return Err(format!("Unsupported date skeleton letter \"{}\"", other)),
        }
    }

    if options.is_empty() {
        return Err(format!("Date skeleton \"{}\" has no fields", skeleton));
    }
    Ok(options)
}

/// Resolve the style part of `{value, date|time, <style>}`. An omitted style
/// means `medium`.
pub fn resolve_date_time_style(
    expression_type: ExpressionType,
    style: &str,
) -> Result<DateTimeOptions, String> {
    let style = style.trim();
    if let Some(skeleton) = style.strip_prefix("::") {
        return parse_date_skeleton(skeleton.trim());
    }

    let named = if style.is_empty() {
        DateTimeStyle::Medium
    } else {
        DateTimeStyle::parse(style)
            .ok_or_else(|| format!("Unsupported {} style \"{}\"", expression_type, style))?
    };

    let mut options = DateTimeOptions::default();
    if expression_type == ExpressionType::Time {
        options.time_style = Some(named);
    } else {
        options.date_style = Some(named);
    }
    Ok(options)
}
