//! Token vocabulary for the XML lexer

/// The closed set of tokens the lexer produces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// `<!--`
    OpenComment,
    /// `<?`
    OpenDeclaration,
    /// `?>`
    CloseDeclaration,
    /// `<`
    OpenBeginTag,
    /// `/>` (self-closing)
    CloseBeginTag,
    /// `</`
    OpenEndTag,
    /// `>`
    CloseEndTag,
    /// `<!DOCTYPE`
    OpenDocType,
    /// Decoded character data, trimmed at both ends
    Text(String),
    /// End of input
    Eof,
}

impl Token {
    /// Short name used in error messages and trace output.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::OpenComment => "<!--",
            Self::OpenDeclaration => "<?",
            Self::CloseDeclaration => "?>",
            Self::OpenBeginTag => "<",
            Self::CloseBeginTag => "/>",
            Self::OpenEndTag => "</",
            Self::CloseEndTag => ">",
            Self::OpenDocType => "<!DOCTYPE",
            Self::Text(_) => "text",
            Self::Eof => "end of input",
        }
    }
}
