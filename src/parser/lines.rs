use std::borrow::Cow;

/// A trimmed input line and its 1-based position.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    pub number: usize,
    pub text:   Cow<'a, str>,
}

impl Line<'_> {
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }

    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// Single-pass iterator over the lines of raw iostat output.
///
/// Splits on `\n`, drops a trailing `\r`, decodes lossily so stray bytes in a
/// banner never abort the parse, and trims surrounding whitespace.
pub struct Lines<'a> {
    rest:   Option<&'a [u8]>,
    number: usize,
}

impl<'a> Lines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: Some(data), number: 0 }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Line<'a>> {
        let data = self.rest.take()?;
        if data.is_empty() {
            return None;
        }
        let (raw, rest) = match data.iter().position(|&b| b == b'\n') {
            Some(i) => (&data[..i], Some(&data[i + 1..])),
            None    => (data, None),
        };
        self.rest = rest;
        self.number += 1;

        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let text = match String::from_utf8_lossy(raw) {
            Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
            Cow::Owned(s)    => Cow::Owned(s.trim().to_string()),
        };
        Some(Line { number: self.number, text })
    }
}
