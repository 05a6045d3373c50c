//! Parse, validate, and render [Conventional Commit] messages.
//!
//! [conventional commit]: https://www.conventionalcommits.org
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use conventional_message::{Configuration, FooterSeparator, Options, Parser, Type};
//! use indoc::indoc;
//!
//! let message = indoc!("
//!     docs(example)!: add tested usage example
//!
//!     This example is tested using Rust's doctest capabilities. Having this
//!     example helps people understand how to use the parser.
//!
//!     BREAKING CHANGE: Going from nothing to something, meaning anyone doing
//!     nothing before suddenly has something to do. That sounds like a change
//!     in your break.
//!
//!     Co-Authored-By: Lisa Simpson <lisa@simpsons.fam>
//!     Closes #12
//! ");
//!
//! let configuration = Configuration::new(Options {
//!     types: vec!["docs".to_owned()],
//!     required_footers: vec!["Closes".to_owned()],
//!     ..Options::default()
//! })
//! .unwrap();
//! let parser = Parser::with_configuration(Arc::new(configuration));
//!
//! let commit = parser.parse(message).unwrap();
//!
//! // You can access all components of the header.
//! assert_eq!(commit.type_(), &Type::DOCS);
//! assert_eq!(commit.scope().unwrap(), "example");
//! assert_eq!(commit.description(), "add tested usage example");
//!
//! // And the free-form commit body.
//! assert!(commit.body().unwrap().contains("helps people understand"));
//!
//! // If a commit is marked with a bang (`!`) OR has a footer with the key
//! // "BREAKING CHANGE", it is considered a "breaking" commit.
//! assert!(commit.has_breaking_changes());
//!
//! // You can access each footer individually.
//! assert!(commit.footers()[0].value().contains("That sounds like a change"));
//!
//! // Footers provide access to their token and value.
//! assert_eq!(commit.footers()[1].token(), "Co-Authored-By");
//! assert_eq!(commit.footers()[1].value(), "Lisa Simpson <lisa@simpsons.fam>");
//!
//! // Two types of separators are supported, regular ": ", and " #":
//! assert_eq!(commit.footers()[2].separator(), FooterSeparator::SpacePound);
//! assert_eq!(commit.footers()[2].value(), "12");
//!
//! // The configured rules are checked separately from the grammar.
//! assert!(commit.validate().is_ok());
//!
//! // Rendering produces the canonical text.
//! assert!(commit.to_string().starts_with("docs(example)!: add tested usage example\n\n"));
//! ```

#![warn(missing_docs)]

mod case;
mod component;
mod config;
mod error;
mod lines;
mod message;
mod parser;
mod validator;

pub use case::{LetterCase, LetterCaseConverter};
pub use component::{Body, Description, Footer, FooterSeparator, FooterToken, Scope, Type};
pub use config::{Configuration, Options};
pub use error::{Error, ErrorKind};
pub use lines::LineEnding;
pub use message::Message;
pub use parser::Parser;
pub use validator::{
    DefaultMessageValidator, EndMarkValidator, LetterCaseValidator, MessageValidator,
    RequiredFootersValidator, ScopeValidator, TypeValidator, Validator,
};
