//! Rendering of compiled templates.
//!
//! Rendering happens in two stages. ICU expressions are resolved first,
//! recursively, producing text that still carries ICU quoting and any simple
//! `{name}` placeholders. A single final pass then substitutes the simple
//! placeholders and removes the quoting.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use icu_plurals::PluralRules;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::ast::{CompiledTemplate, ExpressionFormat, ExpressionToken, ExpressionType, Token};
use crate::cache::{CachePolicy, MemoCache};
use crate::compiler::compile_template;
use crate::error::{IcuError, TranslateError};
use crate::format::{DateTimeFormat, NumberFormat};
use crate::locale::parse_locale;
use crate::plural::{PluralKind, category_for, category_name, load_plural_rules};
use crate::scanner::escape_apostrophes;
use crate::style::{DateTimeOptions, NumberOptions};
use crate::value::PlaceholderValue;

static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([\w.-]+)\s*(?:\|\s*([\w.-]+)\s*)?$").expect("valid placeholder pattern")
});

/// What a custom formatter learns about the placeholder it formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatterContext<'a> {
    pub key: &'a str,
    pub language: &'a str,
    pub default_language: &'a str,
    pub placeholder_key: &'a str,
    pub formatter_name: &'a str,
}

/// A named formatter used by `{name|formatter}` placeholders.
pub type Formatter = Rc<dyn Fn(&PlaceholderValue, &FormatterContext<'_>) -> String>;

/// Everything a render call needs besides the template.
#[derive(Clone)]
pub struct RenderContext<'a> {
    /// Translation key, used in error messages and formatter contexts.
    pub key: &'a str,
    pub language: &'a str,
    pub default_language: &'a str,
    /// Locale tag for plural rules and number/date formatting.
    pub locale: &'a str,
    pub values: &'a HashMap<String, PlaceholderValue>,
    pub formatters: Option<&'a HashMap<String, Formatter>>,
}

impl<'a> RenderContext<'a> {
    /// A context whose language is also its default language and locale.
    pub fn new(key: &'a str, language: &'a str, values: &'a HashMap<String, PlaceholderValue>) -> Self {
        RenderContext {
            key,
            language,
            default_language: language,
            locale: language,
            values,
            formatters: None,
        }
    }

    pub fn with_locale(mut self, locale: &'a str) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_default_language(mut self, default_language: &'a str) -> Self {
        self.default_language = default_language;
        self
    }

    pub fn with_formatters(mut self, formatters: &'a HashMap<String, Formatter>) -> Self {
        self.formatters = Some(formatters);
        self
    }

    fn substitute(&self, inner: &str) -> Option<String> {
        let captures = PLACEHOLDER_RE.captures(inner)?;
        let name = captures.get(1)?.as_str();
        let value = self.values.get(name)?;
        let Some(formatter_name) = captures.get(2).map(|m| m.as_str()) else {
            return Some(value.to_string());
        };
        match self.formatters.and_then(|formatters| formatters.get(formatter_name)) {
            Some(formatter) => Some(formatter(
                value,
                &FormatterContext {
                    key: self.key,
                    language: self.language,
                    default_language: self.default_language,
                    placeholder_key: name,
                    formatter_name,
                },
            )),
            None => Some(value.to_string()),
        }
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("key", &self.key)
            .field("language", &self.language)
            .field("default_language", &self.default_language)
            .field("locale", &self.locale)
            .field("values", &self.values)
            .field(
                "formatters",
                &self.formatters.map(|formatters| formatters.keys().collect::<Vec<_>>()),
            )
            .finish()
    }
}

/// Walk `text` tracking ICU quoting, replacing unquoted simple placeholders
/// whose value is known. With `unescape`, quoting is removed on the way.
fn placeholder_pass(text: &str, context: &RenderContext<'_>, unescape: bool) -> String {
    let bytes = text.as_bytes();
    let mut output = String::with_capacity(text.len());
    let mut quoted = false;
    let mut copied = 0;
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'\'' => {
                let doubled = bytes.get(index + 1) == Some(&b'\'');
                let next = if doubled { index + 2 } else { index + 1 };
                if !doubled {
                    quoted = !quoted;
                }
                if unescape {
                    output.push_str(&text[copied..index]);
                    if doubled {
                        output.push('\'');
                    }
                    copied = next;
                }
                index = next;
            }
            b'{' if !quoted => {
                let replacement = text[index + 1..].find('}').and_then(|length| {
                    let close = index + 1 + length;
                    context
                        .substitute(&text[index + 1..close])
                        .map(|value| (close, value))
                });
                match replacement {
                    Some((close, value)) => {
                        output.push_str(&text[copied..index]);
                        output.push_str(&value);
                        index = close + 1;
                        copied = index;
                    }
                    None => index += 1,
                }
            }
            _ => index += 1,
        }
    }
    output.push_str(&text[copied..]);
    output
}

/// Replace `{name}` and `{name|formatter}` with their values, leaving ICU
/// quoting in place. Unknown names stay literal.
pub fn apply_simple_placeholders(text: &str, context: &RenderContext<'_>) -> String {
    placeholder_pass(text, context, false)
}

/// Compiles, caches and renders templates.
///
/// Holds four content-keyed caches: compiled templates (including branch
/// bodies), plural rules, number formatters and date/time formatters.
pub struct MessageRenderer {
    templates: MemoCache<String, Rc<CompiledTemplate>>,
    plural_rules: MemoCache<(String, PluralKind), Rc<Option<PluralRules>>>,
    number_formats: MemoCache<(String, NumberOptions), Rc<NumberFormat>>,
    date_formats: MemoCache<(String, DateTimeOptions), Rc<DateTimeFormat>>,
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRenderer")
            .field("templates", &self.templates)
            .field("plural_rules", &self.plural_rules)
            .field("number_formats", &self.number_formats)
            .field("date_formats", &self.date_formats)
            .finish()
    }
}

impl MessageRenderer {
    pub fn new() -> Self {
        Self::with_cache_policy(CachePolicy::default())
    }

    pub fn with_cache_policy(policy: CachePolicy) -> Self {
        MessageRenderer {
            templates: MemoCache::new(policy),
            plural_rules: MemoCache::new(policy),
            number_formats: MemoCache::new(policy),
            date_formats: MemoCache::new(policy),
        }
    }

    /// Compile a template, or return the cached compilation.
    pub fn compile(&self, template: &str) -> Result<Rc<CompiledTemplate>, IcuError> {
        self.templates
            .get_or_try_insert_with(template.to_string(), || {
                compile_template(template).map(Rc::new)
            })
    }

    /// Compile a template and every branch body inside it, without rendering.
    pub fn validate(&self, template: &str) -> Result<(), IcuError> {
        self.validate_source(template, 0)
    }

    fn validate_source(&self, source: &str, base: usize) -> Result<(), IcuError> {
        let compiled = self.compile(source).map_err(|e| e.offset_by(base))?;
        for token in compiled.expressions() {
            if let ExpressionFormat::Branches(options) = &token.format {
                for branch in &options.branches {
                    self.validate_source(&branch.message, base + token.branch_start(branch))?;
                }
            }
        }
        Ok(())
    }

    /// Number of distinct templates and branch bodies compiled so far.
    pub fn compiled_template_count(&self) -> usize {
        self.templates.len()
    }

    /// Render `template` with the values in `context`.
    pub fn render(&self, template: &str, context: &RenderContext<'_>) -> Result<String, TranslateError> {
        let resolved = self
            .render_source(template, 0, None, context)
            .map_err(|e| e.locate(template, context.key, context.language))?;
        Ok(placeholder_pass(&resolved, context, true))
    }

    /// Resolve every ICU expression in `source`. `base` is the byte index of
    /// `source` in the top-level template; `pound` is the number `#` stands
    /// for, if any. It is set by the outermost plural around `source` and
    /// nested plurals keep it, so `#` reads as if that plural had written its
    /// value into the whole branch text.
    fn render_source(
        &self,
        source: &str,
        base: usize,
        pound: Option<f64>,
        context: &RenderContext<'_>,
    ) -> Result<String, IcuError> {
        let compiled = self.compile(source).map_err(|e| e.offset_by(base))?;
        let mut output = String::with_capacity(source.len());
        for token in compiled.iter() {
            match token {
                Token::Text(text) => output.push_str(text),
                Token::Pound => match pound {
                    Some(number) => output.push_str(&escape_apostrophes(
                        &self.format_number(context.locale, &NumberOptions::default(), number),
                    )),
                    None => output.push('#'),
                },
                Token::Expression(expression) => {
                    output.push_str(&self.render_expression(expression, base, pound, context)?)
                }
            }
        }
        Ok(output)
    }

    fn render_expression(
        &self,
        token: &ExpressionToken,
        base: usize,
        pound: Option<f64>,
        context: &RenderContext<'_>,
    ) -> Result<String, IcuError> {
        let expression = &token.expression;
        let value = context.values.get(&expression.variable_name);

        match &token.format {
            ExpressionFormat::Number(options) => {
                let number = value.map(PlaceholderValue::to_number).unwrap_or(0.0);
                Ok(escape_apostrophes(
                    &self.format_number(context.locale, options, number),
                ))
            }
            ExpressionFormat::DateTime(options) => {
                let date = value
                    .map(PlaceholderValue::to_date)
                    .unwrap_or_default();
                Ok(escape_apostrophes(
                    &self.format_date(context.locale, options, &date),
                ))
            }
            ExpressionFormat::Branches(options) => {
                if expression.expression_type == ExpressionType::Select {
                    let selector = value
                        .map(|value| value.to_string())
                        .unwrap_or_else(|| "other".to_string());
                    let branch = options
                        .get(&selector)
                        .or_else(|| options.get("other"))
                        .ok_or_else(|| {
                            IcuError::new(
                                base + token.source_index,
                                format!(
                                    "No matching branch for value \"{}\" in select expression; add an \"other\" branch",
                                    selector
                                ),
                            )
                        })?;
                    return self.render_source(
                        &branch.message,
                        base + token.branch_start(branch),
                        pound,
                        context,
                    );
                }

                let kind = if expression.expression_type == ExpressionType::SelectOrdinal {
                    PluralKind::Ordinal
                } else {
                    PluralKind::Cardinal
                };
                let number = value.map(PlaceholderValue::to_number).unwrap_or(0.0);
                let adjusted = number - options.offset;
                let branch = options
                    .exact(adjusted)
                    .or_else(|| options.get(self.plural_category(context.locale, kind, adjusted)))
                    .or_else(|| options.get("other"))
                    .ok_or_else(|| {
                        IcuError::new(
                            base + token.source_index,
                            format!(
                                "No matching branch for value {} in {} expression; add an \"other\" branch",
                                adjusted, expression.expression_type
                            ),
                        )
                    })?;
                self.render_source(
                    &branch.message,
                    base + token.branch_start(branch),
                    pound.or(Some(adjusted)),
                    context,
                )
            }
        }
    }

    fn plural_category(&self, locale: &str, kind: PluralKind, value: f64) -> &'static str {
        let rules = self
            .plural_rules
            .get_or_insert_with((locale.to_string(), kind), || {
                debug!(locale, ?kind, "loading plural rules");
                Rc::new(load_plural_rules(&parse_locale(locale), kind))
            });
        match rules.as_ref() {
            Some(rules) => category_name(category_for(rules, value)),
            None => "other",
        }
    }

    fn format_number(&self, locale: &str, options: &NumberOptions, value: f64) -> String {
        self.number_formats
            .get_or_insert_with((locale.to_string(), options.clone()), || {
                debug!(locale, ?options, "building number formatter");
                Rc::new(NumberFormat::new(locale, options.clone()))
            })
            .format(value)
    }

    fn format_date(&self, locale: &str, options: &DateTimeOptions, value: &DateTime<Utc>) -> String {
        self.date_formats
            .get_or_insert_with((locale.to_string(), options.clone()), || {
                debug!(locale, ?options, "building date/time formatter");
                Rc::new(DateTimeFormat::new(locale, options))
            })
            .format(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Placeholder;
    use rstest::rstest;

    fn render(template: &str, locale: &str, placeholder: Placeholder) -> Result<String, TranslateError> {
        let values = placeholder.to_map();
        let context = RenderContext::new("test_key", "en", &values).with_locale(locale);
        MessageRenderer::new().render(template, &context)
    }

    const ITEMS: &str = "{count, plural, one {# item} other {# items}}";

    #[rstest]
    #[case(1, "1 item")]
    #[case(5, "5 items")]
    #[case(0, "0 items")]
    #[case(1000, "1,000 items")]
    fn test_plural_english(#[case] count: i32, #[case] expected: &str) {
        let result = render(ITEMS, "en", Placeholder::new().with("count", count)).unwrap();
        assert_eq!(result, expected);
    }

    #[rstest]
    #[case("xx")]
    #[case("zz-ZZ")]
    #[case("qaa")]
    fn test_plural_locale_without_rules_uses_english(#[case] locale: &str) {
        let one = render(ITEMS, locale, Placeholder::new().with("count", 1)).unwrap();
        assert_eq!(one, "1 item");
        let two = render(ITEMS, locale, Placeholder::new().with("count", 2)).unwrap();
        assert_eq!(two, "2 items");
    }

    #[test]
    fn test_plural_missing_value_is_zero() {
        assert_eq!(render(ITEMS, "en", Placeholder::new()).unwrap(), "0 items");
    }

    #[test]
    fn test_plural_russian_categories() {
        let template = "{n, plural, one {# файл} few {# файла} many {# файлов} other {# файла}}";
        let five = render(template, "ru", Placeholder::new().with("n", 5)).unwrap();
        assert_eq!(five, "5 файлов");
        let two = render(template, "ru", Placeholder::new().with("n", 2)).unwrap();
        assert_eq!(two, "2 файла");
    }

    #[rstest]
    #[case("female", "She")]
    #[case("male", "He")]
    #[case("robot", "They")]
    fn test_select(#[case] gender: &str, #[case] expected: &str) {
        let template = "{gender, select, male {He} female {She} other {They}}";
        let result = render(template, "en", Placeholder::new().with("gender", gender)).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_select_missing_value_uses_other() {
        let template = "{gender, select, male {He} other {They}}";
        assert_eq!(render(template, "en", Placeholder::new()).unwrap(), "They");
    }

    #[test]
    fn test_select_boolean_value() {
        let template = "{admin, select, true {Admin} other {User}}";
        let result = render(template, "en", Placeholder::new().with("admin", true)).unwrap();
        assert_eq!(result, "Admin");
    }

    #[rstest]
    #[case(1, "1st")]
    #[case(2, "2nd")]
    #[case(3, "3rd")]
    #[case(4, "4th")]
    #[case(11, "11th")]
    #[case(22, "22nd")]
    fn test_selectordinal(#[case] n: i32, #[case] expected: &str) {
        let template = "{n, selectordinal, one {#st} two {#nd} few {#rd} other {#th}}";
        let result = render(template, "en", Placeholder::new().with("n", n)).unwrap();
        assert_eq!(result, expected);
    }

    #[test]
    fn test_offset_adjusts_category_and_pound() {
        let template = "{count, plural, offset:1 one {You and # other} other {You and # others}}";
        let two = render(template, "en", Placeholder::new().with("count", 2)).unwrap();
        assert_eq!(two, "You and 1 other");
        let four = render(template, "en", Placeholder::new().with("count", 4)).unwrap();
        assert_eq!(four, "You and 3 others");
    }

    #[test]
    fn test_exact_match_beats_category() {
        let template = "{count, plural, =0{none} other{some}}";
        let zero = render(template, "en", Placeholder::new().with("count", 0)).unwrap();
        assert_eq!(zero, "none");
        let one = render(template, "en", Placeholder::new().with("count", 1)).unwrap();
        assert_eq!(one, "some");
    }

    #[test]
    fn test_exact_selector_matches_value_text() {
        let template = "{n, plural, =1.0 {fraction} =2 {two} other {# other}}";
        let one = render(template, "en", Placeholder::new().with("n", 1)).unwrap();
        assert_eq!(one, "1 other");
        let two = render(template, "en", Placeholder::new().with("n", 2)).unwrap();
        assert_eq!(two, "two");
    }

    #[test]
    fn test_nested_plural_in_select() {
        let template = "{g, select, female {{n, plural, one {She has # cat} other {She has # cats}}} other {They have {n, number} cats}}";
        let result = render(template, "en", Placeholder::new().with("g", "female").with("n", 3)).unwrap();
        assert_eq!(result, "She has 3 cats");
        let result = render(template, "en", Placeholder::new().with("g", "x").with("n", 3)).unwrap();
        assert_eq!(result, "They have 3 cats");
    }

    #[test]
    fn test_pound_inherited_through_select() {
        let template = "{n, plural, other {{g, select, male {He has #} other {They have #}}}}";
        let result = render(template, "en", Placeholder::new().with("n", 2).with("g", "male")).unwrap();
        assert_eq!(result, "He has 2");
    }

    #[test]
    fn test_nested_plural_pound_is_outer_value() {
        let template = "{a, plural, other {# and {b, plural, one {one #} other {#}}}}";
        let result = render(template, "en", Placeholder::new().with("a", 1).with("b", 7)).unwrap();
        assert_eq!(result, "1 and 1");
        // the inner plural still selects its branch by its own value
        let result = render(template, "en", Placeholder::new().with("a", 3).with("b", 1)).unwrap();
        assert_eq!(result, "3 and one 3");
    }

    #[test]
    fn test_inner_plural_alone_uses_own_value() {
        let template = "{g, select, other {{b, plural, other {# left}}}}";
        let result = render(template, "en", Placeholder::new().with("g", "x").with("b", 7)).unwrap();
        assert_eq!(result, "7 left");
    }

    #[test]
    fn test_pound_in_nested_skeleton_untouched() {
        let template = "{n, plural, other {# at {p, number, ::.##}}}";
        let result = render(template, "en", Placeholder::new().with("n", 2).with("p", 1.256)).unwrap();
        assert_eq!(result, "2 at 1.26");
    }

    #[test]
    fn test_pound_outside_plural_is_literal() {
        assert_eq!(render("Issue #{id}", "en", Placeholder::new().with("id", 4)).unwrap(), "Issue #4");
    }

    #[test]
    fn test_quoted_pound_in_plural() {
        let template = "{n, plural, other {'#' is #}}";
        assert_eq!(render(template, "en", Placeholder::new().with("n", 5)).unwrap(), "# is 5");
    }

    #[test]
    fn test_number_format_by_locale() {
        let template = "Total: {n, number}";
        let en = render(template, "en", Placeholder::new().with("n", 1234567)).unwrap();
        assert_eq!(en, "Total: 1,234,567");
        let de = render(template, "de", Placeholder::new().with("n", 1234567)).unwrap();
        assert_eq!(de, "Total: 1.234.567");
    }

    #[test]
    fn test_number_styles_in_template() {
        let template = "{p, number, percent} of {c, number, currency:EUR}";
        let result = render(template, "en", Placeholder::new().with("p", 0.5).with("c", 10)).unwrap();
        assert_eq!(result, "50% of €10.00");
    }

    #[test]
    fn test_date_format_invalid_value_is_epoch() {
        let template = "{d, date, ::yyyy}";
        let result = render(template, "en", Placeholder::new().with("d", "not a date")).unwrap();
        assert!(result.contains("1970"), "{}", result);
    }

    #[test]
    fn test_simple_placeholders() {
        let result = render("Hello {name}!", "en", Placeholder::new().with("name", "Ann")).unwrap();
        assert_eq!(result, "Hello Ann!");
    }

    #[test]
    fn test_absent_placeholder_stays_literal() {
        let result = render("Hello {name}!", "en", Placeholder::new()).unwrap();
        assert_eq!(result, "Hello {name}!");
    }

    #[test]
    fn test_placeholder_values_keep_apostrophes() {
        let template = "{g, select, other {Hi {name}, it''s me}}";
        let result = render(template, "en", Placeholder::new().with("name", "O'Brien")).unwrap();
        assert_eq!(result, "Hi O'Brien, it's me");
    }

    #[test]
    fn test_quoted_placeholder_not_substituted() {
        let result = render("'{name}' is {name}", "en", Placeholder::new().with("name", "x")).unwrap();
        assert_eq!(result, "{name} is x");
    }

    fn upper(value: &PlaceholderValue, context: &FormatterContext<'_>) -> String {
        format!("{}:{}", context.placeholder_key, value.to_string().to_uppercase())
    }

    #[test]
    fn test_formatter_placeholder() {
        let mut formatters: HashMap<String, Formatter> = HashMap::new();
        formatters.insert("upper".to_string(), Rc::new(upper));
        let values = Placeholder::new().with("name", "ann").to_map();
        let context = RenderContext::new("k", "en", &values).with_formatters(&formatters);
        let renderer = MessageRenderer::new();
        assert_eq!(renderer.render("{name|upper}", &context).unwrap(), "name:ANN");
        assert_eq!(renderer.render("{name|missing}", &context).unwrap(), "ann");
    }

    #[test]
    fn test_apply_simple_placeholders_keeps_quotes() {
        let values = Placeholder::new().with("a", 1).to_map();
        let context = RenderContext::new("k", "en", &values);
        assert_eq!(apply_simple_placeholders("'{a}' {a} it''s", &context), "'{a}' 1 it''s");
    }

    #[test]
    fn test_missing_other_is_error() {
        let template = "x {g, select, male {He}}";
        let err = render(template, "en", Placeholder::new().with("g", "female")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 1, column 3"), "{}", message);
        assert!(message.contains("add an \"other\" branch"), "{}", message);
    }

    #[test]
    fn test_unterminated_error_location() {
        let err = render("{count, plural, one {#", "en", Placeholder::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ICU syntax error for key \"test_key\" in \"en\" at line 1, column 1: Unterminated \"{\""
        );
    }

    #[test]
    fn test_branch_error_located_in_template() {
        let template = "Line one\n{g, select, male {{n, plural, one}} other {x}}";
        let err = render(template, "en", Placeholder::new().with("g", "male")).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("at line 2, column 34"), "{}", message);
        assert!(message.contains("after selector \"one\""), "{}", message);
    }

    #[test]
    fn test_validate_reaches_unselected_branches() {
        let template = "{g, select, male {ok} other {{n, plural, one}}}";
        let renderer = MessageRenderer::new();
        let err = renderer.validate(template).unwrap_err();
        assert_eq!(err.index, template.len() - 3);
        assert!(renderer.validate("{g, select, male {ok} other {fine}}").is_ok());
    }

    #[test]
    fn test_cache_transparency() {
        let template = "{n, plural, one {# file} other {# files}} in {dir}";
        let values = Placeholder::new().with("n", 3).with("dir", "tmp").to_map();
        let context = RenderContext::new("k", "en", &values);

        let warm = MessageRenderer::new();
        warm.compile(template).unwrap();
        let cold = MessageRenderer::new();
        assert_eq!(warm.render(template, &context), cold.render(template, &context));
        assert_eq!(warm.render(template, &context), warm.render(template, &context));
    }

    #[test]
    fn test_branch_bodies_compiled_lazily() {
        let renderer = MessageRenderer::new();
        let values = Placeholder::new().with("g", "male").to_map();
        let context = RenderContext::new("k", "en", &values);
        renderer
            .render("{g, select, male {He} female {She} other {They}}", &context)
            .unwrap();
        // the template and the selected branch only
        assert_eq!(renderer.compiled_template_count(), 2);
    }

    #[test]
    fn test_lru_policy_renders_identically() {
        let capacity = std::num::NonZeroUsize::new(1).unwrap();
        let renderer = MessageRenderer::with_cache_policy(CachePolicy::Lru(capacity));
        let values = Placeholder::new().with("count", 2).to_map();
        let context = RenderContext::new("k", "en", &values);
        for _ in 0..3 {
            assert_eq!(renderer.render(ITEMS, &context).unwrap(), "2 items");
        }
    }
}
