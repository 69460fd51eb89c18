//! Line cursor and tokenizer shared by the counting and materializing passes.
//!
//! Both passes walk the same buffer with the same classification rules, so
//! the cursor lives in one place and the passes cannot drift apart. The
//! cursor is a bounds-checked position into the input text; end of input is
//! the slice boundary, never a sentinel byte.

/// Classification of the line starting at the cursor.
///
/// Classification reads at most the first two bytes of the line, plus a full
/// keyword compare (terminated at the first blank) for `mtllib`/`usemtl`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineToken {
    /// End of input. The only token that terminates a parse loop.
    Eof,

    /// Unrecognized directive; the line is skipped.
    Unknown,

    /// `#` comment line
    Comment,

    /// Blank or indented region; skipped up to the next non-blank byte
    Whitespace,

    /// `v` vertex position
    Position,

    /// `vn` vertex normal
    Normal,

    /// `vt` texture coordinate
    TexCoord,

    /// `f` face
    Face,

    /// `o` named object marker
    Object,

    /// `g` group marker
    Group,

    /// `s` smoothing group (recognized, ignored)
    SmoothingGroup,

    /// `mtllib` material library reference
    MaterialLib,

    /// `usemtl` material assignment
    UseMaterial,
}

/// Bounds-checked cursor over the input text.
///
/// Tracks a byte position (always on a character boundary, since it only
/// advances past ASCII bytes) and a 1-based line number for diagnostics.
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0, line: 1 }
    }

    /// 1-based line number of the current position.
    pub fn line(&self) -> usize {
        self.line
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    fn blank_at(&self, offset: usize) -> bool {
        matches!(self.peek(offset), Some(b' ') | Some(b'\t'))
    }

    /// Classify the upcoming line.
    pub fn line_token(&self) -> LineToken {
        let Some(first) = self.peek(0) else {
            return LineToken::Eof;
        };

        match first {
            b'#' => LineToken::Comment,
            b' ' | b'\t' | b'\r' | b'\n' => LineToken::Whitespace,
            b'v' => match self.peek(1) {
                Some(b' ') | Some(b'\t') => LineToken::Position,
                Some(b'n') => LineToken::Normal,
                Some(b't') => LineToken::TexCoord,
                _ => LineToken::Unknown,
            },
            b'f' if self.blank_at(1) => LineToken::Face,
            b'g' if self.blank_at(1) => LineToken::Group,
            b'o' if self.blank_at(1) => LineToken::Object,
            b's' if self.blank_at(1) => LineToken::SmoothingGroup,
            _ => match self.keyword() {
                "mtllib" => LineToken::MaterialLib,
                "usemtl" => LineToken::UseMaterial,
                _ => LineToken::Unknown,
            },
        }
    }

    /// The directive keyword at the cursor, terminated at the first blank.
    fn keyword(&self) -> &'a str {
        let bytes = self.text.as_bytes();
        let mut end = self.pos;
        while end < bytes.len() && !bytes[end].is_ascii_whitespace() {
            end += 1;
        }
        &self.text[self.pos..end]
    }

    /// Text from the cursor to the end of the current line, with at most ONE
    /// trailing space removed. The single-space strip (rather than a full
    /// trim) keeps the interior-space count that quad detection relies on.
    pub fn rest_of_line(&self) -> &'a str {
        let bytes = self.text.as_bytes();
        let mut end = self.pos;
        while end < bytes.len() && bytes[end] != b'\n' && bytes[end] != b'\r' {
            end += 1;
        }

        let mut line = &self.text[self.pos..end];
        if let Some(stripped) = line.strip_suffix(' ') {
            line = stripped;
        }
        line
    }

    /// The current line with its leading directive keyword removed and
    /// leading blanks after the keyword skipped.
    pub fn line_payload(&self) -> &'a str {
        let line = self.rest_of_line();
        match line.find([' ', '\t']) {
            Some(split) => line[split..].trim_start_matches([' ', '\t']),
            None => "",
        }
    }

    /// Advance past the end of the current line, or park at end of input.
    pub fn next_line(&mut self) {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != b'\n' && bytes[self.pos] != b'\r' {
            self.pos += 1;
        }

        if self.pos < bytes.len() {
            if bytes[self.pos] == b'\r' && bytes.get(self.pos + 1) == Some(&b'\n') {
                self.pos += 1;
            }
            self.pos += 1;
            self.line += 1;
        }
    }

    /// Skip blanks and newlines up to the next non-whitespace byte. Handler
    /// for the `Whitespace` token; lines crossed here still advance the
    /// line counter.
    pub fn skip_whitespace(&mut self) {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
            if bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
    }
}

/// A face line is a quad when exactly 3 interior spaces separate 4 vertex
/// references. Anything else is treated as a triangle of the first three
/// references. Counted on the payload after the single-trailing-space strip,
/// so `f 1 2 3 ` stays a triangle.
pub fn is_quad_face(payload: &str) -> bool {
    payload.bytes().filter(|&b| b == b' ').count() == 3
}
