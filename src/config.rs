//! Rule configuration for validating commit messages.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use tracing::debug;

use crate::validator::{is_punctuation, DefaultMessageValidator, MessageValidator};
use crate::{Error, FooterToken, LetterCase, LetterCaseConverter, Scope, Type};

/// The flat, unvalidated options a [`Configuration`] is built from.
///
/// Lists default to empty (no restriction) and cases default to `None` (any
/// case). With the `serde` feature, keys use camelCase, unknown keys are
/// ignored, and a single string is accepted wherever a list is expected.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Letter case required for the type.
    pub type_case: Option<String>,
    /// Allowed types, in addition to `feat` and `fix`.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "one_or_many"))]
    pub types: Vec<String>,
    /// Letter case required for the scope.
    pub scope_case: Option<String>,
    /// Whether every message needs a scope.
    pub scope_required: bool,
    /// Allowed scopes.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "one_or_many"))]
    pub scopes: Vec<String>,
    /// Letter case required for the description.
    pub description_case: Option<String>,
    /// Punctuation the description must end with; `""` forbids any.
    pub description_end_mark: Option<String>,
    /// Whether every message needs a body.
    pub body_required: bool,
    /// Column width the body is wrapped to when rendering.
    pub body_wrap_width: Option<usize>,
    /// Footer tokens every message needs.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "one_or_many"))]
    pub required_footers: Vec<String>,
}

#[cfg(feature = "serde")]
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize as _;

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// An immutable, validated rule set.
///
/// Share it behind an [`Arc`]; messages and validators only read from it.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use conventional_message::{Configuration, Options, Parser};
///
/// let configuration = Configuration::new(Options {
///     types: vec!["chore".to_owned()],
///     scope_required: true,
///     ..Options::default()
/// })
/// .unwrap();
///
/// let parser = Parser::with_configuration(Arc::new(configuration));
/// let message = parser.parse("chore: tidy up").unwrap();
///
/// let err = message.validate().unwrap_err();
/// assert_eq!(err.to_string(), "You must provide a scope.");
/// ```
pub struct Configuration {
    type_case: Option<LetterCase>,
    types: Vec<Type>,
    scope_case: Option<LetterCase>,
    scope_required: bool,
    scopes: Vec<Scope>,
    description_case: Option<LetterCase>,
    description_end_mark: Option<String>,
    body_required: bool,
    body_wrap_width: Option<usize>,
    required_footers: Vec<FooterToken>,

    letter_case_converters: RwLock<HashMap<Option<LetterCase>, Arc<LetterCaseConverter>>>,
    message_validator: OnceLock<Arc<dyn MessageValidator>>,
}

impl Configuration {
    /// Validate `options` into a configuration.
    ///
    /// # Errors
    ///
    /// Fails with `ErrorKind::InvalidConfiguration` when a case name is
    /// unknown, the end mark is not a single punctuation character (or
    /// empty), or a listed type, scope, or footer token is malformed.
    pub fn new(options: Options) -> Result<Self, Error> {
        let configuration = Self {
            type_case: case_if_valid(options.type_case.as_deref(), "typeCase")?,
            types: options
                .types
                .iter()
                .map(|ty| {
                    Type::parse(ty).map_err(|_| {
                        Error::invalid_configuration(format!(
                            "'{ty}' is not a valid type; types may contain only \
                             alphanumeric characters, underscores, and dashes."
                        ))
                    })
                })
                .collect::<Result<_, _>>()?,
            scope_case: case_if_valid(options.scope_case.as_deref(), "scopeCase")?,
            scope_required: options.scope_required,
            scopes: options
                .scopes
                .iter()
                .map(|scope| {
                    Scope::parse(scope).map_err(|_| {
                        Error::invalid_configuration(format!(
                            "'{scope}' is not a valid scope; scopes may contain only \
                             alphanumeric characters, underscores, and dashes."
                        ))
                    })
                })
                .collect::<Result<_, _>>()?,
            description_case: case_if_valid(options.description_case.as_deref(), "descriptionCase")?,
            description_end_mark: end_mark_if_valid(options.description_end_mark)?,
            body_required: options.body_required,
            body_wrap_width: options.body_wrap_width,
            required_footers: options
                .required_footers
                .iter()
                .map(|token| {
                    FooterToken::parse(token).map_err(|_| {
                        Error::invalid_configuration(format!(
                            "'{token}' is not a valid footer token; footer tokens may contain only \
                             alphanumeric characters and dashes or the phrase 'BREAKING CHANGE'."
                        ))
                    })
                })
                .collect::<Result<_, _>>()?,
            letter_case_converters: RwLock::default(),
            message_validator: OnceLock::new(),
        };
        debug!(?configuration, "built commit message configuration");

        Ok(configuration)
    }

    /// The all-permissive configuration messages use unless given another.
    pub(crate) fn shared_default() -> Arc<Configuration> {
        static DEFAULT: OnceLock<Arc<Configuration>> = OnceLock::new();
        Arc::clone(DEFAULT.get_or_init(|| Arc::new(Configuration::default())))
    }

    /// Replace the validator returned by [`Configuration::message_validator`].
    pub fn with_message_validator(mut self, validator: Arc<dyn MessageValidator>) -> Self {
        self.message_validator = OnceLock::from(validator);
        self
    }

    /// Letter case required for the type.
    pub fn type_case(&self) -> Option<LetterCase> {
        self.type_case
    }

    /// Allowed types; empty allows any type.
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Letter case required for the scope.
    pub fn scope_case(&self) -> Option<LetterCase> {
        self.scope_case
    }

    /// Whether every message needs a scope.
    pub fn is_scope_required(&self) -> bool {
        self.scope_required
    }

    /// Allowed scopes; empty allows any scope.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Letter case required for the description.
    pub fn description_case(&self) -> Option<LetterCase> {
        self.description_case
    }

    /// End mark required for the description.
    pub fn description_end_mark(&self) -> Option<&str> {
        self.description_end_mark.as_deref()
    }

    /// Whether every message needs a body.
    pub fn is_body_required(&self) -> bool {
        self.body_required
    }

    /// Column width bodies are wrapped to when rendering.
    pub fn body_wrap_width(&self) -> Option<usize> {
        self.body_wrap_width
    }

    /// Footer tokens every message needs.
    pub fn required_footers(&self) -> &[FooterToken] {
        &self.required_footers
    }

    /// The converter for `case`, built once per case.
    pub fn letter_case_converter(&self, case: Option<LetterCase>) -> Arc<LetterCaseConverter> {
        let cached = self
            .letter_case_converters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&case)
            .cloned();
        if let Some(converter) = cached {
            return converter;
        }

        let mut converters = self
            .letter_case_converters
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            converters
                .entry(case)
                .or_insert_with(|| Arc::new(LetterCaseConverter::new(case))),
        )
    }

    /// The validator [`Message::validate`](crate::Message::validate) runs.
    ///
    /// Defaults to a [`DefaultMessageValidator`] for this configuration,
    /// built on first use.
    pub fn message_validator(&self) -> Arc<dyn MessageValidator> {
        Arc::clone(
            self.message_validator
                .get_or_init(|| Arc::new(DefaultMessageValidator::new(self))),
        )
    }

    /// Export the normalized options.
    pub fn to_options(&self) -> Options {
        Options {
            type_case: self.type_case.map(|case| case.as_str().to_owned()),
            types: self.types.iter().map(ToString::to_string).collect(),
            scope_case: self.scope_case.map(|case| case.as_str().to_owned()),
            scope_required: self.scope_required,
            scopes: self.scopes.iter().map(ToString::to_string).collect(),
            description_case: self.description_case.map(|case| case.as_str().to_owned()),
            description_end_mark: self.description_end_mark.clone(),
            body_required: self.body_required,
            body_wrap_width: self.body_wrap_width,
            required_footers: self.required_footers.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            type_case: None,
            types: Vec::new(),
            scope_case: None,
            scope_required: false,
            scopes: Vec::new(),
            description_case: None,
            description_end_mark: None,
            body_required: false,
            body_wrap_width: None,
            required_footers: Vec::new(),
            letter_case_converters: RwLock::default(),
            message_validator: OnceLock::new(),
        }
    }
}

impl TryFrom<Options> for Configuration {
    type Error = Error;

    fn try_from(options: Options) -> Result<Self, Self::Error> {
        Self::new(options)
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("type_case", &self.type_case)
            .field("types", &self.types)
            .field("scope_case", &self.scope_case)
            .field("scope_required", &self.scope_required)
            .field("scopes", &self.scopes)
            .field("description_case", &self.description_case)
            .field("description_end_mark", &self.description_end_mark)
            .field("body_required", &self.body_required)
            .field("body_wrap_width", &self.body_wrap_width)
            .field("required_footers", &self.required_footers)
            .finish_non_exhaustive()
    }
}

fn case_if_valid(value: Option<&str>, parameter: &str) -> Result<Option<LetterCase>, Error> {
    value
        .map(|name| {
            name.parse().map_err(|_| {
                Error::invalid_configuration(format!(
                    "'{name}' is not a valid case for {parameter}."
                ))
            })
        })
        .transpose()
}

fn end_mark_if_valid(end_mark: Option<String>) -> Result<Option<String>, Error> {
    let Some(end_mark) = end_mark else {
        return Ok(None);
    };

    let mut chars = end_mark.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(Some(end_mark)),
        (Some(c), None) if is_punctuation(c) => Ok(Some(end_mark)),
        _ => Err(Error::invalid_configuration(format!(
            "'{end_mark}' is not a valid punctuation character."
        ))),
    }
}
