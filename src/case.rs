//! Letter-case styles and the converter used to check them.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A named letter-case style.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum LetterCase {
    /// `My_Name_Is_Bond`
    Ada,
    /// `myNameIsBond`
    Camel,
    /// `MY-NAME-IS-BOND`
    Cobol,
    /// `my.name.is.bond`
    Dot,
    /// `my-name-is-bond`
    Kebab,
    /// `my name is bond`
    Lower,
    /// `MY_NAME_IS_BOND`
    Macro,
    /// `MyNameIsBond`
    Pascal,
    /// `My name is bond`
    Sentence,
    /// `my_name_is_bond`
    Snake,
    /// `My Name Is Bond`
    Title,
    /// `My-Name-Is-Bond`
    Train,
    /// `MY NAME IS BOND`
    Upper,
}

impl LetterCase {
    /// Every supported style.
    pub const ALL: [LetterCase; 13] = [
        LetterCase::Ada,
        LetterCase::Camel,
        LetterCase::Cobol,
        LetterCase::Dot,
        LetterCase::Kebab,
        LetterCase::Lower,
        LetterCase::Macro,
        LetterCase::Pascal,
        LetterCase::Sentence,
        LetterCase::Snake,
        LetterCase::Title,
        LetterCase::Train,
        LetterCase::Upper,
    ];

    /// Access `str` representation of the style name.
    pub fn as_str(self) -> &'static str {
        match self {
            LetterCase::Ada => "ada",
            LetterCase::Camel => "camel",
            LetterCase::Cobol => "cobol",
            LetterCase::Dot => "dot",
            LetterCase::Kebab => "kebab",
            LetterCase::Lower => "lower",
            LetterCase::Macro => "macro",
            LetterCase::Pascal => "pascal",
            LetterCase::Sentence => "sentence",
            LetterCase::Snake => "snake",
            LetterCase::Title => "title",
            LetterCase::Train => "train",
            LetterCase::Upper => "upper",
        }
    }
}

impl fmt::Display for LetterCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LetterCase {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        LetterCase::ALL
            .into_iter()
            .find(|case| case.as_str() == name)
            .ok_or_else(|| Error::invalid_configuration(format!("'{name}' is not a valid letter case.")))
    }
}

/// Converts text into a [`LetterCase`] style.
///
/// Without a style, conversion returns the text unchanged.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct LetterCaseConverter {
    case: Option<LetterCase>,
}

impl LetterCaseConverter {
    /// Create a converter for `case`.
    pub const fn new(case: Option<LetterCase>) -> Self {
        Self { case }
    }

    /// The style this converter produces.
    pub const fn case(&self) -> Option<LetterCase> {
        self.case
    }

    /// Convert `value` into this converter's style.
    pub fn convert(&self, value: &str) -> String {
        let Some(case) = self.case else {
            return value.to_owned();
        };

        let words = words(value);
        match case {
            LetterCase::Lower => value.to_lowercase(),
            LetterCase::Upper => value.to_uppercase(),
            LetterCase::Ada => join(&words, "_", capitalize),
            LetterCase::Cobol => join(&words, "-", str::to_uppercase),
            LetterCase::Dot => join(&words, ".", str::to_lowercase),
            LetterCase::Kebab => join(&words, "-", str::to_lowercase),
            LetterCase::Macro => join(&words, "_", str::to_uppercase),
            LetterCase::Pascal => join(&words, "", capitalize),
            LetterCase::Snake => join(&words, "_", str::to_lowercase),
            LetterCase::Title => join(&words, " ", capitalize),
            LetterCase::Train => join(&words, "-", capitalize),
            LetterCase::Camel => match words.split_first() {
                Some((first, rest)) => first.to_lowercase() + &join(rest, "", capitalize),
                None => String::new(),
            },
            LetterCase::Sentence => match words.split_first() {
                Some((first, rest)) if rest.is_empty() => capitalize(first),
                Some((first, rest)) => capitalize(first) + " " + &join(rest, " ", str::to_lowercase),
                None => String::new(),
            },
        }
    }
}

/// Split text into words on whitespace, underscores, dashes, or camel-case
/// humps, in that order of preference.
fn words(value: &str) -> Vec<&str> {
    if value.contains(char::is_whitespace) {
        value.split_whitespace().collect()
    } else if value.contains('_') {
        value.split('_').filter(|word| !word.is_empty()).collect()
    } else if value.contains('-') {
        value.split('-').filter(|word| !word.is_empty()).collect()
    } else {
        camel_humps(value)
    }
}

fn camel_humps(value: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (idx, c) in value.char_indices() {
        if c.is_uppercase() && prev.is_some_and(|p| p.is_lowercase() || p.is_numeric()) {
            words.push(&value[start..idx]);
            start = idx;
        }
        prev = Some(c);
    }
    if start < value.len() {
        words.push(&value[start..]);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn join(words: &[&str], glue: &str, style: impl Fn(&str) -> String) -> String {
    words
        .iter()
        .map(|word| style(word))
        .collect::<Vec<_>>()
        .join(glue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn parse_case_names() {
        for case in LetterCase::ALL {
            assert_eq!(case.as_str().parse::<LetterCase>().unwrap(), case);
        }

        let err = "foobar".parse::<LetterCase>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(err.to_string(), "'foobar' is not a valid letter case.");
    }

    #[test]
    fn convert_mixed_words() {
        let cases = [
            (LetterCase::Ada, "My_Name_Is_Bond"),
            (LetterCase::Camel, "myNameIsBond"),
            (LetterCase::Cobol, "MY-NAME-IS-BOND"),
            (LetterCase::Dot, "my.name.is.bond"),
            (LetterCase::Kebab, "my-name-is-bond"),
            (LetterCase::Lower, "my name is bond"),
            (LetterCase::Macro, "MY_NAME_IS_BOND"),
            (LetterCase::Pascal, "MyNameIsBond"),
            (LetterCase::Sentence, "My name is bond"),
            (LetterCase::Snake, "my_name_is_bond"),
            (LetterCase::Title, "My Name Is Bond"),
            (LetterCase::Train, "My-Name-Is-Bond"),
            (LetterCase::Upper, "MY NAME IS BOND"),
        ];

        for (case, expected) in cases {
            let converter = LetterCaseConverter::new(Some(case));
            assert_eq!(converter.convert("MY name IS bond"), expected, "{case}");
            // Converting something already in the style is a no-op.
            assert_eq!(converter.convert(expected), expected, "{case}");
        }
    }

    #[test]
    fn convert_without_case_is_identity() {
        let converter = LetterCaseConverter::new(None);
        assert_eq!(converter.case(), None);
        assert_eq!(converter.convert("MY name IS bond"), "MY name IS bond");
    }

    #[test]
    fn camel_humps_split_words() {
        assert_eq!(camel_humps("myNameIsBond"), ["my", "Name", "Is", "Bond"]);
        assert_eq!(camel_humps("HTTPServer"), ["HTTPServer"]);
        assert_eq!(camel_humps("v2Parser"), ["v2", "Parser"]);
        assert_eq!(
            LetterCaseConverter::new(Some(LetterCase::Kebab)).convert("parserV2"),
            "parser-v2"
        );
    }

    #[test]
    fn sentence_keeps_punctuation() {
        let converter = LetterCaseConverter::new(Some(LetterCase::Sentence));
        assert_eq!(converter.convert("add new feature."), "Add new feature.");
        assert_eq!(converter.convert("single"), "Single");
    }
}
