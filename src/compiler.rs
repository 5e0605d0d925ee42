//! Template compilation: one pass over a template, producing text, `#` and
//! expression tokens.
//!
//! Branch bodies stay raw inside their expression token and are compiled by
//! the renderer the first time they are selected.

use tracing::trace;

use crate::ast::{
    CompiledTemplate, ExpressionFormat, ExpressionToken, ExpressionType, IcuExpression, Token,
};
use crate::error::IcuError;
use crate::parser::{parse_icu_expression, parse_icu_options};
use crate::scanner::{find_matching_brace, unquoted_bytes};
use crate::style::{resolve_date_time_style, resolve_number_style};

/// Resolve what an expression needs at render time. Error indices are
/// relative to the options/style source.
fn compile_format(expression: &IcuExpression) -> Result<ExpressionFormat, IcuError> {
    let source = expression.options_or_style_source.as_str();
    let expression_type = expression.expression_type;

    if expression_type.has_branches() {
        return parse_icu_options(source, expression_type.allows_offset())
            .map(ExpressionFormat::Branches);
    }

    let style_start = source.len() - source.trim_start().len();
    let located = |reason: String| IcuError::new(style_start, reason);
    match expression_type {
        ExpressionType::Number => resolve_number_style(source)
            .map(ExpressionFormat::Number)
            .map_err(located),
        _ => resolve_date_time_style(expression_type, source)
            .map(ExpressionFormat::DateTime)
            .map_err(located),
    }
}

/// Compile a template into tokens.
///
/// A `{...}` block without a top-level comma (`{name}`, `{name|formatter}`)
/// is kept as text for the placeholder pass. Any other block must be a valid
/// ICU argument. Errors carry the byte index in `template`.
pub fn compile_template(template: &str) -> Result<CompiledTemplate, IcuError> {
    let mut tokens = CompiledTemplate::new();
    let mut text_start = 0;
    let mut resume = 0;

    let flush = |tokens: &mut CompiledTemplate, start: usize, end: usize| {
        if end > start {
            tokens.push(Token::Text(template[start..end].to_string()));
        }
    };

    for (index, byte) in unquoted_bytes(template, 0) {
        if index < resume {
            continue;
        }
        match byte {
            b'#' => {
                flush(&mut tokens, text_start, index);
                tokens.push(Token::Pound);
                text_start = index + 1;
            }
            b'{' => {
                let close = find_matching_brace(template, index)
                    .ok_or_else(|| IcuError::new(index, "Unterminated \"{\""))?;
                resume = close + 1;

                let inner = &template[index + 1..close];
                let Some(expression) =
                    parse_icu_expression(inner).map_err(|e| e.offset_by(index + 1))?
                else {
                    continue;
                };

                let format = compile_format(&expression)
                    .map_err(|e| e.offset_by(index + 1 + expression.source_offset))?;

                flush(&mut tokens, text_start, index);
                tokens.push(Token::Expression(ExpressionToken {
                    expression,
                    format,
                    source_index: index,
                    raw: template[index..=close].to_string(),
                }));
                text_start = close + 1;
            }
            _ => {}
        }
    }
    flush(&mut tokens, text_start, template.len());

    trace!(tokens = tokens.len(), template, "compiled template");
    Ok(tokens)
}
