//! CSS Syntax Module Level 3 — Parsing and tokenization with source positions.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::SourceLocation;
use cssparser::StyleSheetParser;
use cssparser::Token;
use cssparser::parse_important;

/// At-rules whose block holds style rules rather than declarations.
const GROUPING_AT_RULES: [&str; 5] = ["media", "supports", "layer", "container", "document"];

/// One component of a declaration value, e.g. `10px` in `font-size: 10px`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValuePart {
    /// Unit-stripped magnitude for numbers, dimensions and percentages.
    /// `None` for keywords, strings, functions and other non-numeric tokens.
    pub value: Option<f32>,
    /// Original text of the component, unit suffix included.
    pub text: String,
    /// 1-based source line.
    pub line: u32,
    /// 1-based source column.
    pub col: u32,
}

/// Raw value text plus its positioned components.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyValue {
    /// Raw value text (without trailing !important).
    pub text: String,
    /// Value components in source order.
    pub parts: Vec<ValuePart>,
}

/// A single CSS declaration (property: value [!important]).
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    /// Property name, ASCII-lowercased since CSS property names are
    /// case-insensitive: `FONT-SIZE` is reported as `font-size`.
    pub name: String,
    /// Parsed value.
    pub value: PropertyValue,
    /// Whether the declaration was marked as `!important`.
    pub important: bool,
    /// 1-based line of the property name.
    pub line: u32,
    /// 1-based column of the property name.
    pub col: u32,
}

/// A single style rule with a raw prelude and parsed declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRule {
    /// Raw prelude text (the selector list, or `@name prelude` for at-rules
    /// such as `@font-face`).
    pub prelude: String,
    /// Declarations within the rule block.
    pub declarations: Vec<Declaration>,
}

/// A parsed stylesheet consisting of style rules.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Stylesheet {
    /// Style rules in source order, with grouping at-rules flattened.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Iterate every declaration of every rule in source order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.rules.iter().flat_map(|rule| rule.declarations.iter())
    }
}

/// cssparser lines are 0-based, columns already 1-based.
fn one_based(location: SourceLocation) -> (u32, u32) {
    (location.line.saturating_add(1), location.column)
}

/// Parse `!important` (any ASCII case) at the end of a value, returning (`value_without_important`, `important_flag`).
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    // ASCII lowercasing keeps byte offsets, so `pos` indexes `trimmed` too.
    if let Some(pos) = trimmed.to_ascii_lowercase().rfind("!important")
        && let Some(prefix) = trimmed.get(..pos)
    {
        let head = prefix.trim_end();
        return (head.to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// Length of the leading `<number>` in `text`: sign, digits, fraction and
/// exponent. An `e` only counts when digits follow it, so `1em` stops at `1`.
fn number_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let digits_from = |from: usize| {
        bytes
            .get(from..)
            .map_or(0, |rest| rest.iter().take_while(|byte| byte.is_ascii_digit()).count())
    };
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    end += digits_from(end);
    if bytes.get(end) == Some(&b'.') && digits_from(end + 1) > 0 {
        end += 1 + digits_from(end + 1);
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + sign);
        if exponent > 0 {
            end += 1 + sign + exponent;
        }
    }
    end
}

/// Numeric magnitude of a token as written in the source.
///
/// The number is re-read from `text` rather than taken from the token:
/// percentages are stored divided by 100, and scaling back in `f32` does not
/// always reproduce the written value (`53%` would read as `52.999…`).
fn magnitude(token: &Token<'_>, text: &str) -> Option<f32> {
    let tokenized = match *token {
        Token::Number { value, .. } | Token::Dimension { value, .. } => value,
        Token::Percentage { unit_value, .. } => unit_value * 100.0,
        _ => return None,
    };
    let written = text
        .get(..number_prefix_len(text))
        .and_then(|number| number.parse::<f32>().ok());
    Some(written.unwrap_or(tokenized))
}

/// Consume a declaration value into positioned parts. Returns the parts and
/// whether a `!important` marker was seen.
fn parse_value_parts(input: &mut Parser<'_, '_>) -> (Vec<ValuePart>, bool) {
    let mut parts = Vec::new();
    let mut important = false;
    loop {
        input.skip_whitespace();
        if input.try_parse(parse_important).is_ok() {
            important = true;
            continue;
        }
        let (line, col) = one_based(input.current_source_location());
        let start = input.position();
        let Ok(token) = input.next().cloned() else {
            break;
        };
        match token {
            Token::Comma | Token::Delim('/') => continue,
            Token::Function(_)
            | Token::ParenthesisBlock
            | Token::SquareBracketBlock
            | Token::CurlyBracketBlock => {
                let nested: Result<(), ParseError<'_, ()>> = input.parse_nested_block(|block| {
                    while block.next_including_whitespace_and_comments().is_ok() {}
                    Ok(())
                });
                if nested.is_err() {
                    break;
                }
            }
            _ => {}
        }
        let text = input.slice_from(start).trim();
        parts.push(ValuePart {
            value: magnitude(&token, text),
            text: text.to_owned(),
            line,
            col,
        });
    }
    (parts, important)
}

/// A declaration parser that records property name, position, and value parts.
struct BodyDeclParser;

impl<'input> CssDeclarationParser<'input> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'tokens>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, 'tokens>,
        decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        let (line, col) = one_based(decl_start.source_location());
        let start = input.position();
        let (parts, important_part) = parse_value_parts(input);
        let raw = input.slice_from(start);
        let (text, important_tail) = split_important_tail(raw);
        Ok(Declaration {
            name: name.to_ascii_lowercase(),
            value: PropertyValue { text, parts },
            important: important_part || important_tail,
            line,
            col,
        })
    }
}

impl<'input> CssAtRuleParser<'input> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration; // Not produced
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        _name: CowRcStr<'input>,
        _input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok(())
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        // Not produced by this parser
        Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        Err(())
    }
}

impl<'input> CssQualifiedRuleParser<'input> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration; // Not produced
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl CssRuleBodyItemParser<'_, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Prelude of a top-level at-rule.
struct AtRulePrelude {
    /// Lowercased at-rule name without the `@`.
    name: String,
    /// Raw prelude text.
    text: String,
}

/// Top-level parser that builds `StyleRule` items for qualified rules and
/// descends into block at-rules.
struct TopLevelParser;

impl<'input> CssAtRuleParser<'input> for TopLevelParser {
    type Prelude = AtRulePrelude;
    type AtRule = Vec<StyleRule>;
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(AtRulePrelude {
            name: name.to_ascii_lowercase(),
            text: input.slice_from(start).trim().to_owned(),
        })
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        if GROUPING_AT_RULES.contains(&prelude.name.as_str()) {
            return Ok(parse_rules(input));
        }
        let header = if prelude.text.is_empty() {
            format!("@{}", prelude.name)
        } else {
            format!("@{} {}", prelude.name, prelude.text)
        };
        Ok(vec![StyleRule {
            prelude: header,
            declarations: parse_declarations_from_block(input),
        }])
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        // @import, @charset and friends carry no declarations.
        Ok(Vec::new())
    }
}

impl<'input> CssQualifiedRuleParser<'input> for TopLevelParser {
    type Prelude = String; // raw selector/prelude
    type QualifiedRule = Vec<StyleRule>;
    type Error = ();

    #[inline]
    fn parse_prelude<'tokens>(
        &mut self,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(input.slice_from(start.position()).trim().to_owned())
    }

    #[inline]
    fn parse_block<'tokens>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, 'tokens>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        let decls = parse_declarations_from_block(input);
        Ok(vec![StyleRule {
            prelude,
            declarations: decls,
        }])
    }
}

/// Parse declarations from a rule block using `cssparser` body parser.
fn parse_declarations_from_block(block: &mut Parser) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();
    let mut body = BodyDeclParser;
    for decl in CssRuleBodyParser::new(block, &mut body).flatten() {
        out.push(decl);
    }
    out
}

/// Parse a sequence of rules, flattening nested grouping at-rules.
fn parse_rules(parser: &mut Parser) -> Vec<StyleRule> {
    let mut top = TopLevelParser;
    StyleSheetParser::new(parser, &mut top)
        .flatten()
        .flatten()
        .collect()
}

/// Parse a full stylesheet into a `Stylesheet` using cssparser.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    Stylesheet {
        rules: parse_rules(&mut parser),
    }
}
