//! Parsing of a single `{...}` block: its header and its branches.
//!
//! Error indices are relative to the text handed to each function; the
//! compiler shifts them into template coordinates.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Branch, ExpressionType, IcuExpression, IcuOptions};
use crate::error::IcuError;
use crate::scanner::{find_matching_brace, find_top_level_comma};

static OFFSET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^offset:\s*([+-]?\d+(?:\.\d+)?)").expect("valid offset pattern"));

/// Byte index of the first non-whitespace character at or after `index`.
fn skip_whitespace(text: &str, index: usize) -> usize {
    text[index..]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map(|(offset, _)| index + offset)
        .unwrap_or(text.len())
}

/// Classify the text between a matched `{` and `}`.
///
/// Returns `Ok(None)` when there is no top-level comma: the block is a plain
/// `{name}` or `{name|formatter}` reference and is left to the placeholder
/// pass. A comma means ICU syntax was attempted, so anything malformed is an
/// error.
pub fn parse_icu_expression(inner: &str) -> Result<Option<IcuExpression>, IcuError> {
    let Some(first) = find_top_level_comma(inner, 0) else {
        return Ok(None);
    };

    let variable_name = inner[..first].trim();
    if variable_name.is_empty() {
        return Err(IcuError::new(0, "Missing argument name"));
    }

    let second = find_top_level_comma(inner, first + 1);
    let type_end = second.unwrap_or(inner.len());
    let type_text = inner[first + 1..type_end].trim();
    let type_index = skip_whitespace(inner, first + 1);
    if type_text.is_empty() {
        return Err(IcuError::new(
            type_index,
            format!("Missing ICU expression type for argument \"{}\"", variable_name),
        ));
    }

    let expression_type = ExpressionType::parse(type_text).ok_or_else(|| {
        IcuError::new(
            type_index,
            format!("Unsupported ICU expression type \"{}\"", type_text),
        )
    })?;

    let (options_or_style_source, source_offset) = match second {
        Some(comma) => (inner[comma + 1..].to_string(), comma + 1),
        None => (String::new(), inner.len()),
    };

    Ok(Some(IcuExpression {
        variable_name: variable_name.to_string(),
        expression_type,
        options_or_style_source,
        source_offset,
    }))
}

/// Parse `[offset:N] selector {message} selector {message} ...`.
pub fn parse_icu_options(source: &str, allow_offset: bool) -> Result<IcuOptions, IcuError> {
    let mut options = IcuOptions {
        offset: 0.0,
        branches: Vec::new(),
    };
    let mut index = skip_whitespace(source, 0);

    if allow_offset {
        if let Some(captures) = OFFSET_RE.captures(&source[index..]) {
            let number = &captures[1];
            options.offset = number.parse::<f64>().map_err(|_| {
                IcuError::new(index, format!("Invalid plural offset \"{}\"", number))
            })?;
            index += captures[0].len();
        }
    }

    loop {
        index = skip_whitespace(source, index);
        if index >= source.len() {
            break;
        }

        let selector_end = source[index..]
            .char_indices()
            .find(|(_, ch)| ch.is_whitespace() || *ch == '{')
            .map(|(offset, _)| index + offset)
            .unwrap_or(source.len());
        let selector = &source[index..selector_end];
        if selector.is_empty() {
            return Err(IcuError::new(index, "Missing selector before \"{\""));
        }

        let open = skip_whitespace(source, selector_end);
        if source.as_bytes().get(open) != Some(&b'{') {
            return Err(IcuError::new(
                open,
                format!("Expected \"{{\" after selector \"{}\"", selector),
            ));
        }

        let close = find_matching_brace(source, open).ok_or_else(|| {
            IcuError::new(
                open,
                format!("Unterminated \"{{\" in branch \"{}\"", selector),
            )
        })?;

        options.insert(Branch {
            selector: selector.to_string(),
            message: source[open + 1..close].to_string(),
            body_start: open + 1,
        });
        index = close + 1;
    }

    if options.branches.is_empty() {
        return Err(IcuError::new(
            0,
            "Expected at least one \"selector {message}\" branch",
        ));
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_placeholder_is_not_icu() {
        assert_eq!(parse_icu_expression("name"), Ok(None));
        assert_eq!(parse_icu_expression("amount|currency"), Ok(None));
    }

    #[test]
    fn test_plural_header() {
        let expression = parse_icu_expression("count, plural, one {# item} other {# items}")
            .unwrap()
            .unwrap();
        assert_eq!(expression.variable_name, "count");
        assert_eq!(expression.expression_type, ExpressionType::Plural);
        assert_eq!(
            expression.options_or_style_source,
            " one {# item} other {# items}"
        );
        assert_eq!(expression.source_offset, 14);
    }

    #[test]
    fn test_number_header_without_style() {
        let expression = parse_icu_expression("total, number").unwrap().unwrap();
        assert_eq!(expression.expression_type, ExpressionType::Number);
        assert_eq!(expression.options_or_style_source, "");
    }

    #[test]
    fn test_unknown_type_is_error() {
        let err = parse_icu_expression("count, choice, 0#none").unwrap_err();
        assert!(err.reason.contains("Unsupported ICU expression type \"choice\""));
        assert_eq!(err.index, 7);
    }

    #[test]
    fn test_missing_argument_name() {
        let err = parse_icu_expression(" , plural, other {x}").unwrap_err();
        assert_eq!(err.reason, "Missing argument name");
    }

    #[test]
    fn test_options_with_offset() {
        let options = parse_icu_options(" offset:1 =0 {nobody} one {# other} other {# others}", true)
            .unwrap();
        assert_eq!(options.offset, 1.0);
        assert_eq!(options.branches.len(), 3);
        assert_eq!(options.get("=0").unwrap().message, "nobody");
        assert_eq!(options.get("one").unwrap().message, "# other");
    }

    #[test]
    fn test_options_decimal_and_negative_offset() {
        assert_eq!(parse_icu_options("offset:-2 other {x}", true).unwrap().offset, -2.0);
        assert_eq!(parse_icu_options("offset:0.5 other {x}", true).unwrap().offset, 0.5);
    }

    #[test]
    fn test_offset_rejected_for_select() {
        let err = parse_icu_options("offset:1 other {x}", false).unwrap_err();
        assert!(err.reason.contains("after selector \"offset:1\""));
    }

    #[test]
    fn test_branch_without_space() {
        let options = parse_icu_options("=0{none} other{some}", true).unwrap();
        assert_eq!(options.get("=0").unwrap().message, "none");
        assert_eq!(options.get("other").unwrap().body_start, 15);
    }

    #[test]
    fn test_nested_branch_body_kept_raw() {
        let options =
            parse_icu_options(" male {{n, plural, one {him} other {them}}} other {x}", false)
                .unwrap();
        assert_eq!(
            options.get("male").unwrap().message,
            "{n, plural, one {him} other {them}}"
        );
    }

    #[test]
    fn test_options_errors() {
        assert!(
            parse_icu_options("{x}", false)
                .unwrap_err()
                .reason
                .contains("Missing selector")
        );
        assert!(
            parse_icu_options("one", false)
                .unwrap_err()
                .reason
                .contains("Expected \"{\"")
        );
        assert!(
            parse_icu_options("one {#", false)
                .unwrap_err()
                .reason
                .contains("Unterminated")
        );
        assert!(
            parse_icu_options("   ", false)
                .unwrap_err()
                .reason
                .contains("at least one")
        );
    }
}
