//! Configurable rules layered on top of the commit grammar.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::{
    Body, Configuration, Description, Error, Footer, FooterToken, LetterCase,
    LetterCaseConverter, Message, Scope, Type,
};

/// A single rule over values of type `T`.
pub trait Validator<T: ?Sized> {
    /// Check `value` against the rule.
    fn is_valid(&self, value: &T) -> bool {
        self.is_valid_or_err(value).is_ok()
    }

    /// Check `value` against the rule, explaining a violation.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorKind::InvalidValue`](crate::ErrorKind) error
    /// describing what is expected.
    fn is_valid_or_err(&self, value: &T) -> Result<(), Error>;
}

/// Checks that text is already in a letter-case style.
#[derive(Clone, Debug)]
pub struct LetterCaseValidator {
    converter: Arc<LetterCaseConverter>,
}

impl LetterCaseValidator {
    /// Require `case`; `None` accepts any text.
    pub fn new(case: Option<LetterCase>) -> Self {
        Self::with_converter(Arc::new(LetterCaseConverter::new(case)))
    }

    /// Require the style produced by `converter`.
    pub fn with_converter(converter: Arc<LetterCaseConverter>) -> Self {
        Self { converter }
    }
}

impl Validator<str> for LetterCaseValidator {
    fn is_valid(&self, value: &str) -> bool {
        self.converter.convert(value) == value
    }

    fn is_valid_or_err(&self, value: &str) -> Result<(), Error> {
        match self.converter.case() {
            Some(case) if !self.is_valid(value) => Err(Error::invalid_value(format!(
                "'{value}' is not formatted in {case} case."
            ))),
            _ => Ok(()),
        }
    }
}

/// Checks how text ends.
///
/// An end mark of `""` forbids trailing punctuation; any other mark must end
/// the text exactly.
#[derive(Clone, Debug, Default)]
pub struct EndMarkValidator {
    end_mark: Option<String>,
}

impl EndMarkValidator {
    /// Require `end_mark`; `None` accepts any ending.
    pub fn new(end_mark: Option<String>) -> Self {
        Self { end_mark }
    }
}

impl Validator<str> for EndMarkValidator {
    fn is_valid(&self, value: &str) -> bool {
        match self.end_mark.as_deref() {
            None => true,
            Some("") => value
                .chars()
                .next_back()
                .is_some_and(|c| !is_punctuation(c)),
            Some(end_mark) => value.ends_with(end_mark),
        }
    }

    fn is_valid_or_err(&self, value: &str) -> Result<(), Error> {
        if self.is_valid(value) {
            return Ok(());
        }
        Err(Error::invalid_value(format!(
            "'{value}' does not end with the expected end mark '{}'.",
            self.end_mark.as_deref().unwrap_or_default()
        )))
    }
}

pub(crate) fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
}

/// Checks a commit type against the configured types.
///
/// `feat` and `fix` are always allowed once any types are configured; no
/// configured types means every type is allowed.
#[derive(Clone, Debug, Default)]
pub struct TypeValidator {
    types: Vec<Type>,
}

impl TypeValidator {
    /// Bind to the types of `configuration`.
    pub fn new(configuration: &Configuration) -> Self {
        let types = if configuration.types().is_empty() {
            Vec::new()
        } else {
            [Type::FEAT, Type::FIX]
                .into_iter()
                .chain(configuration.types().iter().cloned())
                .collect()
        };
        Self { types }
    }
}

impl Validator<str> for TypeValidator {
    fn is_valid(&self, value: &str) -> bool {
        Type::parse(value).is_ok_and(|ty| self.types.is_empty() || self.types.contains(&ty))
    }

    fn is_valid_or_err(&self, value: &str) -> Result<(), Error> {
        if self.is_valid(value) {
            return Ok(());
        }
        if self.types.is_empty() {
            return Err(Error::invalid_value(format!(
                "'{value}' is not a valid type value."
            )));
        }
        Err(Error::invalid_value(format!(
            "'{value}' is not one of the valid types '{}'.",
            lowercase_list(&self.types)
        )))
    }
}

/// Checks a scope against the configured scopes.
#[derive(Clone, Debug, Default)]
pub struct ScopeValidator {
    scopes: Vec<Scope>,
}

impl ScopeValidator {
    /// Bind to the scopes of `configuration`.
    pub fn new(configuration: &Configuration) -> Self {
        Self {
            scopes: configuration.scopes().to_vec(),
        }
    }
}

impl Validator<str> for ScopeValidator {
    fn is_valid(&self, value: &str) -> bool {
        Scope::parse(value)
            .is_ok_and(|scope| self.scopes.is_empty() || self.scopes.contains(&scope))
    }

    fn is_valid_or_err(&self, value: &str) -> Result<(), Error> {
        if self.is_valid(value) {
            return Ok(());
        }
        if self.scopes.is_empty() {
            return Err(Error::invalid_value(format!(
                "'{value}' is not a valid scope value."
            )));
        }
        Err(Error::invalid_value(format!(
            "'{value}' is not one of the valid scopes '{}'.",
            lowercase_list(&self.scopes)
        )))
    }
}

/// Checks that every configured footer token is present.
#[derive(Clone, Debug, Default)]
pub struct RequiredFootersValidator {
    required: Vec<FooterToken>,
}

impl RequiredFootersValidator {
    /// Bind to the required footers of `configuration`.
    pub fn new(configuration: &Configuration) -> Self {
        Self {
            required: configuration.required_footers().to_vec(),
        }
    }

    fn missing<'a>(&'a self, footers: &'a [Footer]) -> impl Iterator<Item = &'a FooterToken> + 'a {
        self.required
            .iter()
            .filter(move |required| !footers.iter().any(|footer| footer.token() == *required))
    }
}

impl Validator<[Footer]> for RequiredFootersValidator {
    fn is_valid(&self, footers: &[Footer]) -> bool {
        self.missing(footers).next().is_none()
    }

    fn is_valid_or_err(&self, footers: &[Footer]) -> Result<(), Error> {
        let missing: Vec<_> = self.missing(footers).collect();
        if missing.is_empty() {
            return Ok(());
        }
        Err(Error::invalid_value(format!(
            "Please provide the following required footers: {}.",
            lowercase_list(missing)
        )))
    }
}

fn lowercase_list<T: fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|value| value.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validates a whole [`Message`], one field at a time.
pub trait MessageValidator: Validator<Message> + Send + Sync {
    /// Check the commit type.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate_type(&self, ty: &Type) -> Result<(), Error>;

    /// Check the scope, or its absence.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate_scope(&self, scope: Option<&Scope>) -> Result<(), Error>;

    /// Check the description.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate_description(&self, description: &Description) -> Result<(), Error>;

    /// Check the body, or its absence.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate_body(&self, body: Option<&Body>) -> Result<(), Error>;

    /// Check the footers.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule.
    fn validate_footers(&self, footers: &[Footer]) -> Result<(), Error>;
}

/// The rules a [`Configuration`] describes.
///
/// Runs, in order: type case and allowed types, scope presence, case, and
/// allowed scopes, description case and end mark, body presence, and
/// required footers. The first violation stops the run.
#[derive(Clone, Debug)]
pub struct DefaultMessageValidator {
    type_case: LetterCaseValidator,
    types: TypeValidator,
    scope_required: bool,
    scope_case: LetterCaseValidator,
    scopes: ScopeValidator,
    description_case: LetterCaseValidator,
    description_end_mark: EndMarkValidator,
    body_required: bool,
    required_footers: RequiredFootersValidator,
}

impl DefaultMessageValidator {
    /// Bind to the rules of `configuration`.
    pub fn new(configuration: &Configuration) -> Self {
        let case_validator = |case| {
            LetterCaseValidator::with_converter(configuration.letter_case_converter(case))
        };

        Self {
            type_case: case_validator(configuration.type_case()),
            types: TypeValidator::new(configuration),
            scope_required: configuration.is_scope_required(),
            scope_case: case_validator(configuration.scope_case()),
            scopes: ScopeValidator::new(configuration),
            description_case: case_validator(configuration.description_case()),
            description_end_mark: EndMarkValidator::new(
                configuration.description_end_mark().map(str::to_owned),
            ),
            body_required: configuration.is_body_required(),
            required_footers: RequiredFootersValidator::new(configuration),
        }
    }
}

impl Validator<Message> for DefaultMessageValidator {
    fn is_valid_or_err(&self, message: &Message) -> Result<(), Error> {
        self.validate_type(message.type_())?;
        self.validate_scope(message.scope())?;
        self.validate_description(message.description())?;
        self.validate_body(message.body())?;
        self.validate_footers(message.footers())?;
        Ok(())
    }
}

impl MessageValidator for DefaultMessageValidator {
    fn validate_type(&self, ty: &Type) -> Result<(), Error> {
        self.type_case
            .is_valid_or_err(ty.as_str())
            .and_then(|()| self.types.is_valid_or_err(ty.as_str()))
            .inspect_err(|err| debug!(%err, "commit type failed validation"))
    }

    fn validate_scope(&self, scope: Option<&Scope>) -> Result<(), Error> {
        let Some(scope) = scope else {
            if self.scope_required {
                debug!("commit scope is required");
                return Err(Error::invalid_value("You must provide a scope."));
            }
            return Ok(());
        };

        self.scope_case
            .is_valid_or_err(scope.as_str())
            .and_then(|()| self.scopes.is_valid_or_err(scope.as_str()))
            .inspect_err(|err| debug!(%err, "commit scope failed validation"))
    }

    fn validate_description(&self, description: &Description) -> Result<(), Error> {
        self.description_case
            .is_valid_or_err(description.as_str())
            .and_then(|()| self.description_end_mark.is_valid_or_err(description.as_str()))
            .inspect_err(|err| debug!(%err, "commit description failed validation"))
    }

    fn validate_body(&self, body: Option<&Body>) -> Result<(), Error> {
        let is_empty = body.map_or(true, |body| body.trim().is_empty());
        if is_empty && self.body_required {
            debug!("commit body is required");
            return Err(Error::invalid_value("You must provide a body."));
        }
        Ok(())
    }

    fn validate_footers(&self, footers: &[Footer]) -> Result<(), Error> {
        self.required_footers
            .is_valid_or_err(footers)
            .inspect_err(|err| debug!(%err, "commit footers failed validation"))
    }
}
