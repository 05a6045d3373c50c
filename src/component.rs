//! Conventional Commit components.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use textwrap::{WordSeparator, WrapAlgorithm};
use unicase::UniCase;

use crate::lines::{self, LinesWithTerminator};
use crate::parser::{self, BREAKING_ARROW, BREAKING_PHRASE};
use crate::Error;

macro_rules! noun_components {
    ($($ty:ident => $plural:literal),+) => (
        $(
            /// A component of the conventional commit.
            ///
            /// Must start with an ASCII letter or digit, followed by at least
            /// one more letter, digit, underscore, or dash. Compares
            /// case-insensitively.
            #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $ty(UniCase<Cow<'static, str>>);

            impl $ty {
                /// See `parse` for ensuring the data is valid.
                pub const fn new_unchecked(value: &'static str) -> Self {
                    $ty(UniCase::unicode(Cow::Borrowed(value)))
                }

                #[doc = concat!("Parse a `str` into a `", stringify!($ty), "`.")]
                ///
                /// # Errors
                ///
                /// Fails with `ErrorKind::InvalidArgument` when `value` does
                /// not follow the noun grammar.
                pub fn parse(value: &str) -> Result<Self, Error> {
                    match parser::complete(parser::noun, value) {
                        Some(noun) => Ok($ty(UniCase::unicode(Cow::Owned(noun.to_owned())))),
                        None => Err(Error::invalid_argument(concat!(
                            $plural,
                            " must contain only alphanumeric characters, underscores, and dashes."
                        ))),
                    }
                }

                /// Access `str` representation
                pub fn as_str(&self) -> &str {
                    self.0.as_ref()
                }
            }

            impl Deref for $ty {
                type Target = str;

                fn deref(&self) -> &Self::Target {
                    self.as_str()
                }
            }

            impl PartialEq<str> for $ty {
                fn eq(&self, other: &str) -> bool {
                    UniCase::unicode(self.as_str()) == UniCase::unicode(other)
                }
            }

            impl PartialEq<&'_ str> for $ty {
                fn eq(&self, other: &&str) -> bool {
                    self == *other
                }
            }

            impl FromStr for $ty {
                type Err = Error;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    Self::parse(value)
                }
            }

            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            #[cfg(feature = "serde")]
            impl serde::Serialize for $ty {
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: serde::Serializer,
                {
                    serializer.serialize_str(self)
                }
            }
        )+
    )
}

noun_components![Type => "Types", Scope => "Scopes"];

/// Common commit types
impl Type {
    /// Commit type when introducing new features (correlates with `minor` in semver)
    pub const FEAT: Type = Type::new_unchecked("feat");
    /// Commit type when patching a bug (correlates with `patch` in semver)
    pub const FIX: Type = Type::new_unchecked("fix");
    /// Possible commit type when reverting changes.
    pub const REVERT: Type = Type::new_unchecked("revert");
    /// Possible commit type for changing documentation.
    pub const DOCS: Type = Type::new_unchecked("docs");
    /// Possible commit type for changing code style.
    pub const STYLE: Type = Type::new_unchecked("style");
    /// Possible commit type for refactoring code structure.
    pub const REFACTOR: Type = Type::new_unchecked("refactor");
    /// Possible commit type for performance optimizations.
    pub const PERF: Type = Type::new_unchecked("perf");
    /// Possible commit type for addressing tests.
    pub const TEST: Type = Type::new_unchecked("test");
    /// Possible commit type for other things.
    pub const CHORE: Type = Type::new_unchecked("chore");
}

/// The one-line summary following the header's `: `.
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Description(String);

impl Description {
    /// Create a description, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::InvalidArgument` when the text is blank or
    /// contains control characters such as tabs, line breaks, or the Unicode
    /// line and paragraph separators.
    pub fn new(text: &str) -> Result<Self, Error> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::invalid_argument("Description may not be empty"));
        }
        if !text.chars().all(parser::is_printable) {
            return Err(Error::invalid_argument(
                "Description may not contain any control characters",
            ));
        }
        Ok(Self(text.to_owned()))
    }

    /// Access `str` representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Description {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<str> for Description {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&'_ str> for Description {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The free-form commit body.
///
/// Surrounding whitespace is trimmed and line breaks are stored as `\n`.
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Body(String);

impl Body {
    /// Create a body from free text.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::InvalidArgument` when a line would open a
    /// footer, since the text could not be parsed back as a body.
    pub fn new(text: &str) -> Result<Self, Error> {
        let body = Self::from_parsed(text);
        if body
            .0
            .split('\n')
            .any(|line| parser::footer_start(line).is_some())
        {
            return Err(Error::invalid_argument(
                "Body may not contain a line that starts a footer",
            ));
        }
        Ok(body)
    }

    /// Build a body from text the parser already cut off before the first footer.
    pub(crate) fn from_parsed(text: &str) -> Self {
        Self(lines::normalize(text).trim().to_owned())
    }

    /// Greedily word-wrap every line to at most `width` columns.
    ///
    /// Lines only break at spaces; a word longer than `width` is kept whole.
    /// A `width` of zero leaves the body untouched.
    pub fn wrap(&self, width: usize) -> Body {
        if width == 0 {
            return self.clone();
        }

        let options = textwrap::Options::new(width)
            .break_words(false)
            .word_separator(WordSeparator::AsciiSpace)
            .wrap_algorithm(WrapAlgorithm::FirstFit);
        Self(textwrap::wrap(&self.0, &options).join("\n"))
    }

    /// Access `str` representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Body {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<str> for Body {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&'_ str> for Body {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The key of a footer.
///
/// Either a noun or the phrase `BREAKING CHANGE`. Any spelling of
/// `breaking change` or `breaking-change` is stored as `BREAKING CHANGE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FooterToken(UniCase<Cow<'static, str>>);

impl FooterToken {
    /// The token marking a breaking change.
    pub const BREAKING_CHANGE: FooterToken =
        FooterToken(UniCase::unicode(Cow::Borrowed(BREAKING_PHRASE)));

    /// Parse a `str` into a `FooterToken`.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::InvalidArgument` when `value` is neither a noun
    /// nor `BREAKING CHANGE`.
    pub fn parse(value: &str) -> Result<Self, Error> {
        let token = parser::complete(parser::token, value)
            .ok_or_else(|| Error::invalid_argument(format!("Token '{value}' is invalid")))?;

        let token = UniCase::unicode(token);
        if token == UniCase::unicode(BREAKING_PHRASE) || token == UniCase::unicode(BREAKING_ARROW) {
            return Ok(Self::BREAKING_CHANGE);
        }
        Ok(Self(UniCase::unicode(Cow::Owned(token.into_inner().to_owned()))))
    }

    /// Access `str` representation
    pub fn as_str(&self) -> &str {
        self.0.as_ref()
    }

    /// A flag to signal that the footer describes a breaking change.
    pub fn breaking(&self) -> bool {
        *self == Self::BREAKING_CHANGE
    }
}

impl Deref for FooterToken {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<str> for FooterToken {
    fn eq(&self, other: &str) -> bool {
        UniCase::unicode(self.as_str()) == UniCase::unicode(other)
    }
}

impl PartialEq<&'_ str> for FooterToken {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl FromStr for FooterToken {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl fmt::Display for FooterToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FooterToken {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self)
    }
}

/// The type of separator between the footer token and value.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum FooterSeparator {
    /// ": "
    ColonSpace,

    /// " #"
    SpacePound,
}

impl FooterSeparator {
    /// Access `str` representation of FooterSeparator
    pub fn as_str(self) -> &'static str {
        match self {
            FooterSeparator::ColonSpace => ": ",
            FooterSeparator::SpacePound => " #",
        }
    }
}

impl Deref for FooterSeparator {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl PartialEq<str> for FooterSeparator {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&'_ str> for FooterSeparator {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl fmt::Display for FooterSeparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl FromStr for FooterSeparator {
    type Err = Error;

    fn from_str(sep: &str) -> Result<Self, Self::Err> {
        match sep {
            ": " => Ok(FooterSeparator::ColonSpace),
            " #" => Ok(FooterSeparator::SpacePound),
            _ => Err(Error::invalid_argument(format!(
                "Separator '{sep}' is invalid; expected one of [': ', ' #']"
            ))),
        }
    }
}

/// A single footer.
///
/// A footer is similar to a Git trailer, with the exception of not requiring
/// whitespace before newlines.
///
/// See: <https://git-scm.com/docs/git-interpret-trailers>
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Footer {
    token: FooterToken,
    sep: FooterSeparator,
    value: String,
}

impl Footer {
    /// Piece together a footer.
    ///
    /// The value is trimmed and its line breaks are stored as `\n`.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::InvalidArgument` when the token is invalid, the
    /// value is blank, a line after the first one would open another footer,
    /// or a `" #"` value does not start with a word character.
    pub fn new(token: &str, sep: FooterSeparator, value: &str) -> Result<Self, Error> {
        let token = FooterToken::parse(token)?;
        let value = lines::normalize(value).trim().to_owned();

        if value.is_empty() {
            return Err(Error::invalid_argument("Footer values may not be empty"));
        }
        if LinesWithTerminator::new(&value)
            .skip(1)
            .any(|line| parser::footer_start(lines::trim_terminator(line)).is_some())
        {
            return Err(Error::invalid_argument(
                "Value contains unexpected footer tokens",
            ));
        }
        if sep == FooterSeparator::SpacePound
            && !value.starts_with(|c: char| c.is_alphanumeric() || c == '_')
        {
            return Err(Error::invalid_argument(format!(
                "Value '{value}' must start with a letter, digit, or underscore after ' #'"
            )));
        }

        Ok(Self { token, sep, value })
    }

    /// The token of the footer.
    pub fn token(&self) -> &FooterToken {
        &self.token
    }

    /// The separator between the footer token and its value.
    pub const fn separator(&self) -> FooterSeparator {
        self.sep
    }

    /// The value of the footer.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// A flag to signal that the footer describes a breaking change.
    pub fn breaking(&self) -> bool {
        self.token.breaking()
    }
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.token, self.sep, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use indoc::indoc;

    #[test]
    fn test_nouns() {
        let ty = Type::parse("feat").unwrap();
        assert_eq!(ty, Type::FEAT);
        assert_eq!(ty, "FEAT");
        assert_eq!(ty.as_str(), "feat");

        let scope: Scope = "My_Scope-2".parse().unwrap();
        assert_eq!(scope.as_str(), "My_Scope-2");
        assert_eq!(scope.to_string(), "My_Scope-2");
    }

    #[test]
    fn test_invalid_nouns() {
        for value in ["", "a", "-feat", "feat!", "feat ure", "fe:at", " feat"] {
            let err = Type::parse(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{value:?}");
        }

        let err = Scope::parse("my scope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Scopes must contain only alphanumeric characters, underscores, and dashes."
        );
        let err = Type::parse("my type").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Types must contain only alphanumeric characters, underscores, and dashes."
        );
    }

    #[test]
    fn test_description() {
        let description = Description::new("  add a thing (#1) ✨  ").unwrap();
        assert_eq!(description, "add a thing (#1) ✨");

        for value in ["", "   ", "tab\there", "new\nline", "carriage\rreturn"] {
            let err = Description::new(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{value:?}");
        }
        assert_eq!(
            Description::new("a\tb").unwrap_err().to_string(),
            "Description may not contain any control characters"
        );
        for value in ["line\u{2028}separator", "paragraph\u{2029}separator"] {
            let err = Description::new(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{value:?}");
        }
    }

    #[test]
    fn test_body_normalizes_line_endings() {
        let body = Body::new("\r\n  first\r\nsecond\r\rthird  \n").unwrap();
        assert_eq!(body, "first\nsecond\n\nthird");
    }

    #[test]
    fn test_body_rejects_footer_lines() {
        for text in [
            "Closes #12 after review",
            "Some context.\n\nBREAKING CHANGE: sneaky",
            "first\r\nAcked-by: B",
        ] {
            let err = Body::new(text).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{text:?}");
            assert_eq!(
                err.to_string(),
                "Body may not contain a line that starts a footer"
            );
        }

        // Indented or mid-line tokens do not open a footer.
        let body = Body::new("Details:\n  Closes #12\nsee Refs: 3").unwrap();
        assert_eq!(body, "Details:\n  Closes #12\nsee Refs: 3");
    }

    #[test]
    fn test_body_wrap() {
        let body = Body::new(indoc! {"
            Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor.

            Short line.
        "})
        .unwrap();

        assert_eq!(
            body.wrap(20),
            indoc! {"
                Lorem ipsum dolor
                sit amet,
                consectetur
                adipiscing elit, sed
                do eiusmod tempor.

                Short line."}
        );
        assert_eq!(body.wrap(0), body);
    }

    #[test]
    fn test_body_wrap_keeps_long_words() {
        let body = Body::new("https://example.com/a/very/long/url and more").unwrap();
        assert_eq!(body.wrap(10), "https://example.com/a/very/long/url\nand more");

        let wrapped = body.wrap(10);
        assert_eq!(wrapped.wrap(10), wrapped);
    }

    #[test]
    fn test_footer_tokens() {
        assert_eq!(FooterToken::parse("Signed-off-by").unwrap(), "signed-off-by");

        for value in ["BREAKING CHANGE", "breaking change", "Breaking-Change"] {
            let token = FooterToken::parse(value).unwrap();
            assert_eq!(token.as_str(), "BREAKING CHANGE");
            assert!(token.breaking());
        }

        assert!(!FooterToken::parse("Refs").unwrap().breaking());
        assert_eq!(
            FooterToken::parse("bad token").unwrap_err().to_string(),
            "Token 'bad token' is invalid"
        );
    }

    #[test]
    fn test_footer_separator() {
        assert_eq!(": ".parse::<FooterSeparator>().unwrap(), FooterSeparator::ColonSpace);
        assert_eq!(" #".parse::<FooterSeparator>().unwrap(), FooterSeparator::SpacePound);

        let err = ":".parse::<FooterSeparator>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            err.to_string(),
            "Separator ':' is invalid; expected one of [': ', ' #']"
        );
    }

    #[test]
    fn test_footer() {
        let footer = Footer::new("breaking-change", FooterSeparator::ColonSpace, "  it broke ").unwrap();
        assert_eq!(footer.token(), &FooterToken::BREAKING_CHANGE);
        assert_eq!(footer.value(), "it broke");
        assert!(footer.breaking());
        assert_eq!(footer.to_string(), "BREAKING CHANGE: it broke");

        let footer = Footer::new("Fix", FooterSeparator::SpacePound, "1234").unwrap();
        assert_eq!(footer.to_string(), "Fix #1234");
        assert!(!footer.breaking());
    }

    #[test]
    fn test_footer_multi_line_value() {
        let footer = Footer::new(
            "BREAKING CHANGE",
            FooterSeparator::ColonSpace,
            "first line\r\n  continued: still the same footer",
        )
        .unwrap();
        assert_eq!(footer.value(), "first line\n  continued: still the same footer");
    }

    #[test]
    fn test_invalid_footer_values() {
        let err = Footer::new("Refs", FooterSeparator::ColonSpace, "a\nAcked-by: B").unwrap_err();
        assert_eq!(err.to_string(), "Value contains unexpected footer tokens");

        let err = Footer::new("Refs", FooterSeparator::ColonSpace, "  ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = Footer::new("Fix", FooterSeparator::SpacePound, "-12").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        // The first line follows the separator and never opens a footer.
        let footer = Footer::new("Refs", FooterSeparator::ColonSpace, "See-also: #12").unwrap();
        assert_eq!(footer.value(), "See-also: #12");
    }
}
