//! Source readers: buffered and incremental character input
//!
//! The lexer only needs bounded lookahead, so both readers expose the same
//! small capability set: `peek` without consuming, `pop`, and a literal
//! match probe. `BufferReader` indexes a fully resident string;
//! `StreamReader` wraps any character iterator and keeps not-yet-consumed
//! lookahead in a fixed ring buffer, so the document is never buffered twice.

/// Ring buffer capacity for incremental sources.
///
/// Must exceed the longest literal the lexer probes (`<!DOCTYPE` and
/// `<![CDATA[`, nine characters each).
pub const LOOKAHEAD_CAPACITY: usize = 12;

/// Character source with bounded lookahead.
pub trait CharSource {
    /// Look at the character `offset` positions ahead without consuming.
    fn peek(&mut self, offset: usize) -> Option<char>;

    /// Consume and return the next character.
    fn pop(&mut self) -> Option<char>;

    /// Check whether `literal` appears at `offset` positions ahead.
    ///
    /// Consumes the literal on success only when `offset` is zero.
    fn try_match(&mut self, offset: usize, literal: &str) -> bool {
        for (i, expected) in literal.chars().enumerate() {
            if self.peek(offset + i) != Some(expected) {
                return false;
            }
        }
        if offset == 0 {
            for _ in literal.chars() {
                self.pop();
            }
        }
        true
    }
}

/// Reader over a fully resident string
#[derive(Clone, Debug)]
pub struct BufferReader<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> BufferReader<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl CharSource for BufferReader<'_> {
    fn peek(&mut self, offset: usize) -> Option<char> {
        self.text.get(self.pos..)?.chars().nth(offset)
    }

    fn pop(&mut self) -> Option<char> {
        let c = self.text.get(self.pos..)?.chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

/// Reader over an incremental character source
///
/// Lookahead characters pulled from the source but not yet consumed live in
/// a fixed-capacity ring buffer. Requesting lookahead past
/// [`LOOKAHEAD_CAPACITY`] is a programming error and panics.
#[derive(Clone, Debug)]
pub struct StreamReader<I> {
    source: I,
    buf: [char; LOOKAHEAD_CAPACITY],
    head: usize,
    len: usize,
}

impl<I: Iterator<Item = char>> StreamReader<I> {
    pub fn new(source: I) -> Self {
        Self {
            source,
            buf: ['\0'; LOOKAHEAD_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    fn push_lookahead(&mut self, c: char) {
        assert!(
            self.len < LOOKAHEAD_CAPACITY,
            "lookahead ring buffer overflow"
        );
        self.buf[(self.head + self.len) % LOOKAHEAD_CAPACITY] = c;
        self.len += 1;
    }
}

impl<I: Iterator<Item = char>> CharSource for StreamReader<I> {
    fn peek(&mut self, offset: usize) -> Option<char> {
        while self.len <= offset {
            let c = self.source.next()?;
            self.push_lookahead(c);
        }
        Some(self.buf[(self.head + offset) % LOOKAHEAD_CAPACITY])
    }

    fn pop(&mut self) -> Option<char> {
        if self.len > 0 {
            let c = self.buf[self.head];
            self.head = (self.head + 1) % LOOKAHEAD_CAPACITY;
            self.len -= 1;
            Some(c)
        } else {
            self.source.next()
        }
    }
}
