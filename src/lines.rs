//! Line handling shared by the parser and the renderer.

use std::fmt;

/// Iterate over the lines of a string, keeping each line's terminator.
///
/// `\n`, `\r\n`, and a lone `\r` all end a line.
#[derive(Clone, Debug)]
pub(crate) struct LinesWithTerminator<'a> {
    data: &'a str,
}

impl<'a> LinesWithTerminator<'a> {
    pub(crate) fn new(data: &'a str) -> Self {
        Self { data }
    }
}

impl<'a> Iterator for LinesWithTerminator<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.data.is_empty() {
            return None;
        }

        let end = match self.data.find(['\n', '\r']) {
            Some(idx) if self.data[idx..].starts_with("\r\n") => idx + 2,
            Some(idx) => idx + 1,
            None => self.data.len(),
        };
        let (line, rest) = self.data.split_at(end);
        self.data = rest;
        Some(line)
    }
}

/// Strip the line terminator from a line produced by [`LinesWithTerminator`].
pub(crate) fn trim_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Split off the first line, returning it without its terminator along with
/// everything from the terminator onwards.
pub(crate) fn split_first_line(data: &str) -> (&str, &str) {
    match data.find(['\n', '\r']) {
        Some(idx) => data.split_at(idx),
        None => (data, ""),
    }
}

/// Rewrite every line terminator in `data` as `\n`.
pub(crate) fn normalize(data: &str) -> String {
    data.replace("\r\n", "\n").replace('\r', "\n")
}

/// The line terminator used when rendering a message.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,

    /// `\r\n`
    CrLf,

    /// `\r`
    Cr,
}

impl LineEnding {
    /// Blank-line separators recognised between header, body, and footers.
    pub(crate) const BLANK_LINES: [&'static str; 3] = ["\r\n\r\n", "\n\n", "\r\r"];

    /// Access `str` representation of the terminator.
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Detect the terminator used by the first line break in `data`.
    ///
    /// Text without any line break is reported as [`LineEnding::Lf`].
    pub fn detect(data: &str) -> Self {
        match data.find(['\n', '\r']) {
            Some(idx) if data[idx..].starts_with("\r\n") => LineEnding::CrLf,
            Some(idx) if data[idx..].starts_with('\r') => LineEnding::Cr,
            _ => LineEnding::Lf,
        }
    }

    /// Convert `\n`-normalized text to this terminator.
    pub(crate) fn apply(self, data: &str) -> String {
        match self {
            LineEnding::Lf => data.to_owned(),
            _ => data.replace('\n', self.as_str()),
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_keep_terminators() {
        let lines: Vec<_> = LinesWithTerminator::new("a\nb\r\nc\rd").collect();
        assert_eq!(lines, ["a\n", "b\r\n", "c\r", "d"]);

        let lines: Vec<_> = LinesWithTerminator::new("a\n\n").collect();
        assert_eq!(lines, ["a\n", "\n"]);

        assert_eq!(LinesWithTerminator::new("").count(), 0);
    }

    #[test]
    fn first_line() {
        assert_eq!(split_first_line("feat: x\n\nbody"), ("feat: x", "\n\nbody"));
        assert_eq!(split_first_line("feat: x"), ("feat: x", ""));
        assert_eq!(split_first_line("feat: x\r\n"), ("feat: x", "\r\n"));
    }

    #[test]
    fn detect_line_ending() {
        assert_eq!(LineEnding::detect("a\r\nb"), LineEnding::CrLf);
        assert_eq!(LineEnding::detect("a\rb"), LineEnding::Cr);
        assert_eq!(LineEnding::detect("a\nb"), LineEnding::Lf);
        assert_eq!(LineEnding::detect("a"), LineEnding::Lf);
    }

    #[test]
    fn normalize_and_apply() {
        let text = normalize("a\r\nb\rc\nd");
        assert_eq!(text, "a\nb\nc\nd");
        assert_eq!(LineEnding::CrLf.apply(&text), "a\r\nb\r\nc\r\nd");
        assert_eq!(trim_terminator("a\r\n"), "a");
    }
}
