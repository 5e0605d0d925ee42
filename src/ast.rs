use std::fmt;

use crate::style::{DateTimeOptions, NumberOptions};
use crate::value::PlaceholderValue;

/// The argument type named in an ICU header, `{name, <type>, ...}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    Select,
    Plural,
    SelectOrdinal,
    Number,
    Date,
    Time,
}

impl ExpressionType {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "select" => Some(ExpressionType::Select),
            "plural" => Some(ExpressionType::Plural),
            "selectordinal" => Some(ExpressionType::SelectOrdinal),
            "number" => Some(ExpressionType::Number),
            "date" => Some(ExpressionType::Date),
            "time" => Some(ExpressionType::Time),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionType::Select => "select",
            ExpressionType::Plural => "plural",
            ExpressionType::SelectOrdinal => "selectordinal",
            ExpressionType::Number => "number",
            ExpressionType::Date => "date",
            ExpressionType::Time => "time",
        }
    }

    /// Types whose options are `selector {message}` branches.
    pub fn has_branches(&self) -> bool {
        matches!(
            self,
            ExpressionType::Select | ExpressionType::Plural | ExpressionType::SelectOrdinal
        )
    }

    /// Only plural-like types accept an `offset:` prefix.
    pub fn allows_offset(&self) -> bool {
        matches!(self, ExpressionType::Plural | ExpressionType::SelectOrdinal)
    }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header of one `{...}` block: `{variable_name, expression_type, source}`.
#[derive(Debug, Clone, PartialEq)]
pub struct IcuExpression {
    pub variable_name: String,
    pub expression_type: ExpressionType,
    /// Everything after the second top-level comma, untrimmed. Empty when absent.
    pub options_or_style_source: String,
    /// Byte offset of `options_or_style_source` inside the expression text.
    pub source_offset: usize,
}

/// One `selector {message}` pair. The message is kept raw and compiled only
/// when the branch is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    pub selector: String,
    pub message: String,
    /// Byte offset of `message` inside the options source.
    pub body_start: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IcuOptions {
    pub offset: f64,
    pub branches: Vec<Branch>,
}

impl IcuOptions {
    pub fn get(&self, selector: &str) -> Option<&Branch> {
        self.branches.iter().find(|branch| branch.selector == selector)
    }

    /// The `=N` branch written exactly as `=` followed by the value's
    /// string form (`=1`, `=0.5`), so `=1.0` never matches.
    pub fn exact(&self, value: f64) -> Option<&Branch> {
        self.get(&format!("={}", PlaceholderValue::Number(value)))
    }

    /// Insert a branch; a repeated selector replaces the earlier one.
    pub fn insert(&mut self, branch: Branch) {
        match self
            .branches
            .iter_mut()
            .find(|existing| existing.selector == branch.selector)
        {
            Some(existing) => *existing = branch,
            None => self.branches.push(branch),
        }
    }
}

/// What an expression token needs at render time, resolved at compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionFormat {
    Branches(IcuOptions),
    Number(NumberOptions),
    DateTime(DateTimeOptions),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionToken {
    pub expression: IcuExpression,
    pub format: ExpressionFormat,
    /// Byte index of the opening `{` in the compiled template.
    pub source_index: usize,
    /// The full `{...}` text, braces included.
    pub raw: String,
}

impl ExpressionToken {
    /// Byte index of a branch body inside the compiled template.
    pub fn branch_start(&self, branch: &Branch) -> usize {
        self.source_index + 1 + self.expression.source_offset + branch.body_start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal text, still carrying ICU quoting and any simple `{name}`
    /// placeholders; both are handled after branch resolution.
    Text(String),
    /// An unquoted `#`. Inside a plural branch it renders the formatted
    /// number of the outermost enclosing plural, elsewhere a literal `#`.
    Pound,
    Expression(ExpressionToken),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledTemplate(pub Vec<Token>);

impl CompiledTemplate {
    pub fn new() -> Self {
        CompiledTemplate(Vec::new())
    }

    pub fn push(&mut self, token: Token) {
        self.0.push(token);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.0.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }

    pub fn expressions(&self) -> impl Iterator<Item = &ExpressionToken> {
        self.0.iter().filter_map(|token| match token {
            Token::Expression(expression) => Some(expression),
            _ => None,
        })
    }
}

impl IntoIterator for CompiledTemplate {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a CompiledTemplate {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
