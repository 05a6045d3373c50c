//! The structured commit message.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::{
    Body, Configuration, Description, Error, Footer, LineEnding, Parser, Scope, Type, Validator as _,
};

/// A conventional commit message.
///
/// Equality compares the message content only; the attached
/// [`Configuration`] is ignored.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Clone, Debug)]
pub struct Message {
    ty: Type,
    scope: Option<Scope>,
    description: Description,
    body: Option<Body>,
    breaking: bool,
    footers: Vec<Footer>,
    #[cfg_attr(feature = "serde", serde(skip))]
    configuration: Arc<Configuration>,
}

impl Message {
    /// Create a message bound to the all-permissive configuration.
    pub fn new(ty: Type, description: Description, breaking: bool) -> Self {
        Self {
            ty,
            scope: None,
            description,
            body: None,
            breaking,
            footers: Vec::new(),
            configuration: Configuration::shared_default(),
        }
    }

    /// Create a new Conventional Commit based on the provided commit message
    /// string.
    ///
    /// # Errors
    ///
    /// This function returns an error if the commit does not conform to the
    /// Conventional Commit specification.
    pub fn parse(text: &str) -> Result<Self, Error> {
        Parser::new().parse(text)
    }

    /// Bind the message to `configuration`.
    pub fn with_configuration(mut self, configuration: Arc<Configuration>) -> Self {
        self.set_configuration(configuration);
        self
    }

    /// Bind the message to `configuration`.
    pub fn set_configuration(&mut self, configuration: Arc<Configuration>) {
        self.configuration = configuration;
    }

    /// The configuration the message is validated and rendered with.
    pub fn configuration(&self) -> &Arc<Configuration> {
        &self.configuration
    }

    /// The type of the commit.
    pub fn type_(&self) -> &Type {
        &self.ty
    }

    /// The optional scope of the commit.
    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    /// Set the scope of the commit.
    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = Some(scope);
    }

    /// The commit description.
    pub fn description(&self) -> &Description {
        &self.description
    }

    /// The commit body, containing a more detailed explanation of the commit
    /// changes.
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Set the commit body.
    ///
    /// A blank body clears it.
    pub fn set_body(&mut self, body: Body) {
        self.body = (!body.is_empty()).then_some(body);
    }

    /// Append a footer.
    ///
    /// A `BREAKING CHANGE` footer marks the message as breaking.
    pub fn add_footer(&mut self, footer: Footer) {
        self.breaking |= footer.breaking();
        self.footers.push(footer);
    }

    /// The footers, in the order they were added.
    ///
    /// A footer is similar to a Git trailer, with the exception of not
    /// requiring whitespace before newlines.
    ///
    /// See: <https://git-scm.com/docs/git-interpret-trailers>
    pub fn footers(&self) -> &[Footer] {
        &self.footers
    }

    /// A flag to signal that the commit contains breaking changes.
    ///
    /// This flag is set either when the commit has an exclamation mark after
    /// the message type and scope, e.g.:
    /// ```text
    /// feat(scope)!: this is a breaking change
    /// ```
    ///
    /// Or when the `BREAKING CHANGE: ` footer is defined:
    /// ```text
    /// feat: my commit description
    ///
    /// BREAKING CHANGE: this is a breaking change
    /// ```
    pub fn has_breaking_changes(&self) -> bool {
        self.breaking
    }

    /// Explanation for the breaking change.
    ///
    /// Note: if no `BREAKING CHANGE` footer is provided, the `description` is expected to describe
    /// the breaking change.
    pub fn breaking_description(&self) -> Option<&str> {
        self.footers
            .iter()
            .find(|footer| footer.breaking())
            .map(Footer::value)
            .or_else(|| self.breaking.then(|| self.description.as_str()))
    }

    /// Check the message against the rules of its configuration.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as an
    /// [`ErrorKind::InvalidValue`](crate::ErrorKind) error.
    pub fn validate(&self) -> Result<(), Error> {
        self.configuration
            .message_validator()
            .is_valid_or_err(self)
            .inspect_err(|err| debug!(%err, header = %self.header(), "commit message is invalid"))
    }

    /// Render the canonical text using `line_ending` between lines.
    pub fn render(&self, line_ending: LineEnding) -> String {
        line_ending.apply(&self.to_string())
    }

    fn header(&self) -> Header<'_> {
        Header(self)
    }
}

struct Header<'a>(&'a Message);

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.0;
        f.write_str(message.ty.as_str())?;
        if let Some(scope) = &message.scope {
            write!(f, "({scope})")?;
        }
        if message.breaking {
            f.write_str("!")?;
        }
        write!(f, ": {}", message.description)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;

        if let Some(body) = &self.body {
            match self.configuration.body_wrap_width() {
                Some(width) if width > 0 => write!(f, "\n{}\n", body.wrap(width))?,
                _ => write!(f, "\n{body}\n")?,
            }
        }

        if !self.footers.is_empty() {
            f.write_str("\n")?;
            for footer in &self.footers {
                writeln!(f, "{footer}")?;
            }
        }

        Ok(())
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
            && self.scope == other.scope
            && self.description == other.description
            && self.body == other.body
            && self.breaking == other.breaking
            && self.footers == other.footers
    }
}

impl Eq for Message {}

impl FromStr for Message {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}
