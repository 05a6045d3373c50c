use std::sync::Arc;

use tracing::{debug, trace};
use winnow::ascii::Caseless;
use winnow::combinator::{alt, delimited, opt, peek, preceded};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::token::{one_of, take_while};
use winnow::ModalResult;
use winnow::Parser as _;

use crate::lines::{self, LineEnding, LinesWithTerminator};
use crate::{Body, Configuration, Description, Error, Footer, FooterSeparator, Message, Scope, Type};

pub(crate) const BREAKING_PHRASE: &str = "BREAKING CHANGE";
pub(crate) const BREAKING_ARROW: &str = "BREAKING-CHANGE";

/// Turns raw commit text into a [`Message`].
///
/// The parser only checks the Conventional Commits grammar. Configured rules
/// (allowed types, letter case, required footers, ...) are checked afterwards
/// with [`Message::validate`].
///
/// # Example
///
/// ```rust
/// use conventional_message::Parser;
///
/// let message = Parser::new().parse("fix(lexer)!: handle empty input").unwrap();
///
/// assert_eq!(message.type_(), "fix");
/// assert_eq!(message.scope().unwrap(), "lexer");
/// assert!(message.has_breaking_changes());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Parser {
    configuration: Option<Arc<Configuration>>,
}

impl Parser {
    /// A parser producing messages bound to the all-permissive configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser producing messages bound to `configuration`.
    pub fn with_configuration(configuration: Arc<Configuration>) -> Self {
        Self {
            configuration: Some(configuration),
        }
    }

    /// Parse a commit message.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCommitMessage`](crate::ErrorKind) when the
    /// header line or the blank line after it is malformed. A footer whose
    /// value cannot be represented fails with
    /// [`ErrorKind::InvalidArgument`](crate::ErrorKind).
    pub fn parse(&self, text: &str) -> Result<Message, Error> {
        let text = text.trim();

        let (first_line, after_header) = lines::split_first_line(text);
        let mut input = first_line;
        let header = match header.parse_next(&mut input) {
            Ok(header) if input.is_empty() => header,
            _ => {
                debug!(header = first_line, "commit header does not match the grammar");
                return Err(Error::invalid_commit_message(text));
            }
        };
        trace!(
            type_ = header.type_,
            scope = ?header.scope,
            breaking = header.breaking,
            "parsed commit header"
        );

        let rest = if after_header.is_empty() {
            after_header
        } else {
            match LineEnding::BLANK_LINES
                .iter()
                .find(|blank| after_header.starts_with(**blank))
            {
                Some(blank) => &after_header[blank.len()..],
                None => {
                    debug!("commit header is not followed by a blank line");
                    return Err(Error::invalid_commit_message(text));
                }
            }
        };

        let (body, footer_region) = split_body(rest);
        let footers = footers(footer_region)?;
        trace!(body_len = body.len(), footers = footers.len(), "split commit body");

        let mut message = Message::new(
            Type::parse(header.type_)?,
            Description::new(header.description)?,
            header.breaking,
        );
        if let Some(configuration) = &self.configuration {
            message.set_configuration(Arc::clone(configuration));
        }
        if let Some(scope) = header.scope {
            message.set_scope(Scope::parse(scope)?);
        }
        if !body.trim().is_empty() {
            message.set_body(Body::from_parsed(body));
        }
        for footer in footers {
            message.add_footer(footer);
        }

        Ok(message)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Header<'i> {
    type_: &'i str,
    scope: Option<&'i str>,
    breaking: bool,
    description: &'i str,
}

// <header>          ::= <type>, ["(", <scope>, ")"], ["!"], ": ", <description>
fn header<'i>(input: &mut &'i str) -> ModalResult<Header<'i>> {
    (
        noun.context(StrContext::Label("type")),
        opt(delimited('(', noun.context(StrContext::Label("scope")), ')')),
        opt('!'),
        preceded(": ", take_while(1.., is_printable))
            .context(StrContext::Label("description")),
    )
        .map(|(type_, scope, bang, description)| Header {
            type_,
            scope,
            breaking: bang.is_some(),
            description,
        })
        .parse_next(input)
}

// <noun>            ::= <alphanumeric>, (<alphanumeric> | "_" | "-")+
pub(crate) fn noun<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        one_of(|c: char| c.is_ascii_alphanumeric()),
        take_while(1.., is_noun_char),
    )
        .take()
        .parse_next(input)
}

/// Characters allowed in a description.
pub(crate) fn is_printable(c: char) -> bool {
    !c.is_control() && !matches!(c, '\u{2028}' | '\u{2029}')
}

fn is_noun_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

// <token>           ::= "BREAKING CHANGE" (any case)
//                    |  <noun>
pub(crate) fn token<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt((Caseless(BREAKING_PHRASE), noun)).parse_next(input)
}

// <separator>       ::= <SP>*, ": "
//                    |  <SP>+, "#", &<word>
fn separator(input: &mut &str) -> ModalResult<FooterSeparator> {
    alt((
        preceded(take_while(0.., ' '), ": ").value(FooterSeparator::ColonSpace),
        (take_while(1.., ' '), '#', peek(one_of(is_word_char)))
            .value(FooterSeparator::SpacePound),
    ))
    .parse_next(input)
}

/// Check whether `line` opens a footer.
///
/// Returns the token, the separator, and the byte length of the
/// token/separator prefix. A prefix followed by nothing but whitespace does
/// not count.
pub(crate) fn footer_start(line: &str) -> Option<(&str, FooterSeparator, usize)> {
    let mut input = line;
    let (token, separator) = (token, separator).parse_next(&mut input).ok()?;
    if input.trim().is_empty() {
        return None;
    }
    Some((token, separator, line.len() - input.len()))
}

/// Run `parser` over all of `value`.
pub(crate) fn complete<'i, O>(
    mut parser: impl winnow::Parser<&'i str, O, ErrMode<ContextError>>,
    value: &'i str,
) -> Option<O> {
    let mut input = value;
    let output = parser.parse_next(&mut input).ok()?;
    input.is_empty().then_some(output)
}

/// Split the region after the header's blank line into body and footers.
///
/// The body ends right before the first line that opens a footer.
fn split_body(rest: &str) -> (&str, &str) {
    let mut offset = 0;
    for line in LinesWithTerminator::new(rest) {
        if footer_start(lines::trim_terminator(line)).is_some() {
            break;
        }
        offset += line.len();
    }
    rest.split_at(offset)
}

/// Sub-parse the footer region.
///
/// Every footer-opening line starts a new footer; any other line continues
/// the value of the footer before it.
fn footers(region: &str) -> Result<Vec<Footer>, Error> {
    let mut footers = Vec::new();
    let mut pending: Option<(&str, FooterSeparator, usize)> = None;

    let mut offset = 0;
    for line in LinesWithTerminator::new(region) {
        if let Some((token, separator, prefix_len)) = footer_start(lines::trim_terminator(line)) {
            if let Some((token, separator, start)) = pending.take() {
                footers.push(Footer::new(token, separator, &region[start..offset])?);
            }
            pending = Some((token, separator, offset + prefix_len));
        }
        offset += line.len();
    }
    if let Some((token, separator, start)) = pending {
        footers.push(Footer::new(token, separator, &region[start..])?);
    }

    Ok(footers)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod grammar {
        use super::*;

        #[test]
        fn test_noun() {
            assert_eq!(complete(noun, "feat"), Some("feat"));
            assert_eq!(complete(noun, "Feat"), Some("Feat"));
            assert_eq!(complete(noun, "foo-bar"), Some("foo-bar"));
            assert_eq!(complete(noun, "foo_bar2"), Some("foo_bar2"));
            assert_eq!(complete(noun, "x86"), Some("x86"));

            assert_eq!(complete(noun, ""), None);
            assert_eq!(complete(noun, "f"), None);
            assert_eq!(complete(noun, "-foo"), None);
            assert_eq!(complete(noun, "_foo"), None);
            assert_eq!(complete(noun, "foo bar"), None);
            assert_eq!(complete(noun, "foo!"), None);
        }

        #[test]
        fn test_token() {
            assert_eq!(complete(token, "Signed-off-by"), Some("Signed-off-by"));
            assert_eq!(complete(token, "BREAKING CHANGE"), Some("BREAKING CHANGE"));
            assert_eq!(complete(token, "breaking change"), Some("breaking change"));
            assert_eq!(complete(token, "BREAKING-CHANGE"), Some("BREAKING-CHANGE"));

            assert_eq!(complete(token, "BREAKING CHANGES"), None);
            assert_eq!(complete(token, "two words"), None);
        }

        #[test]
        fn test_header() {
            let mut input = "feat(parser)!: add things";
            let parsed = header.parse_next(&mut input).unwrap();
            assert_eq!(input, "");
            assert_eq!(
                parsed,
                Header {
                    type_: "feat",
                    scope: Some("parser"),
                    breaking: true,
                    description: "add things",
                }
            );

            assert_eq!(
                complete(header, "fix: it"),
                Some(Header {
                    type_: "fix",
                    scope: None,
                    breaking: false,
                    description: "it",
                })
            );

            assert_eq!(complete(header, "feat implement thing"), None);
            assert_eq!(complete(header, "feat:implement thing"), None);
            assert_eq!(complete(header, "feat(): implement thing"), None);
            assert_eq!(complete(header, "feat (scope): implement thing"), None);
            assert_eq!(complete(header, "feat(my scope): implement thing"), None);
            assert_eq!(complete(header, "feat: "), None);
            assert_eq!(complete(header, "feat: tab\there"), None);
            assert_eq!(complete(header, "feat: line\u{2028}separator"), None);
        }

        #[test]
        fn test_footer_start() {
            assert_eq!(
                footer_start("Signed-off-by: Jane"),
                Some(("Signed-off-by", FooterSeparator::ColonSpace, 15))
            );
            assert_eq!(
                footer_start("Fix #1234"),
                Some(("Fix", FooterSeparator::SpacePound, 5))
            );
            assert_eq!(
                footer_start("Fix   #1234"),
                Some(("Fix", FooterSeparator::SpacePound, 7))
            );
            assert_eq!(
                footer_start("BREAKING CHANGE: oops"),
                Some(("BREAKING CHANGE", FooterSeparator::ColonSpace, 17))
            );

            assert_eq!(footer_start("Signed-off-by: "), None);
            assert_eq!(footer_start("Signed-off-by:Jane"), None);
            assert_eq!(footer_start("Fix #"), None);
            assert_eq!(footer_start("Fix # 12"), None);
            assert_eq!(footer_start("Fix#12"), None);
            assert_eq!(footer_start("  Indented: value"), None);
            assert_eq!(footer_start("Plain prose line."), None);
        }
    }

    mod split {
        use super::*;

        #[test]
        fn body_without_footers() {
            assert_eq!(split_body("foo\nbar\n\nbaz"), ("foo\nbar\n\nbaz", ""));
        }

        #[test]
        fn body_stops_at_first_footer() {
            assert_eq!(
                split_body("foo\n\nBREAKING CHANGE: oops!"),
                ("foo\n\n", "BREAKING CHANGE: oops!")
            );
            assert_eq!(
                split_body("foo\r\n\r\nMy-Footer #bar"),
                ("foo\r\n\r\n", "My-Footer #bar")
            );
        }

        #[test]
        fn only_footers() {
            assert_eq!(split_body("Fix #1\nAcked-by: B"), ("", "Fix #1\nAcked-by: B"));
        }

        #[test]
        fn multi_line_footer_values() {
            let footers = footers("BREAKING CHANGE: first line\n  second line\nFix #42").unwrap();

            assert_eq!(footers.len(), 2);
            assert_eq!(footers[0].value(), "first line\n  second line");
            assert_eq!(footers[1].token(), "Fix");
            assert_eq!(footers[1].value(), "42");
        }
    }
}
