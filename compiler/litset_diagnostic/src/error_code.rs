use std::fmt;

/// Error codes for all diagnostics.
///
/// The first digit is the phase:
/// - E0xxx: lexer
/// - E1xxx: parser
/// - E2xxx: set definition
/// - E3xxx: static resolution of set occurrences
/// - E9xxx: internal
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    // Lexer Errors (E0xxx)
    /// Unterminated string literal
    E0001,
    /// Invalid character in source
    E0002,
    /// Invalid number literal
    E0003,
    /// Dedent to a column that matches no enclosing block
    E0004,
    /// Invalid escape sequence
    E0005,

    // Parser Errors (E1xxx)
    /// Unexpected token
    E1001,
    /// Expected expression
    E1002,
    /// Unclosed delimiter
    E1003,
    /// Expected identifier
    E1004,
    /// Expected an indented block
    E1005,
    /// Forward-reference string is not a valid expression
    E1006,

    // Definition Errors (E2xxx)
    /// Subclassing a set that has members without `extend=True`
    E2001,
    /// Duplicate value under a new name while aliases are disallowed
    E2002,
    /// More than one non-empty literal-set base
    E2003,
    /// Unsupported literal kind (float) for a member
    E2004,
    /// Extension redeclares an inherited member name
    E2005,
    /// Member name bound twice in one body
    E2006,
    /// Definition could not be resolved (cyclic or missing base)
    E2007,
    /// Class option is not a boolean literal
    E2008,
    /// Malformed `_ignore_` directive
    E2009,

    // Resolution Errors (E3xxx)
    /// Value is not a member of the set
    E3001,
    /// Attribute is not a member of the set
    E3002,
    /// Set is not callable
    E3003,
    /// `isinstance`/`issubclass` against a literal set
    E3004,
    /// Constructor or validator called without exactly one argument
    E3005,
    /// Argument too broad to narrow under the reject policy
    E3006,
    /// Incompatible types
    E3007,

    // Internal Errors (E9xxx)
    /// Internal error
    E9001,
    /// Too many errors
    E9002,
}

impl ErrorCode {
    pub fn is_lexer_error(&self) -> bool {
        self.as_str().starts_with("E0")
    }

    /// Parser errors are deduplicated per line by `DiagnosticQueue`.
    pub fn is_parser_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_definition_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_resolution_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
            ErrorCode::E0005 => "E0005",
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E3005 => "E3005",
            ErrorCode::E3006 => "E3006",
            ErrorCode::E3007 => "E3007",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    /// One-line explanation, used by the JSON emitter.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "unterminated string literal",
            ErrorCode::E0002 => "invalid character",
            ErrorCode::E0003 => "invalid number literal",
            ErrorCode::E0004 => "inconsistent dedent",
            ErrorCode::E0005 => "invalid escape sequence",
            ErrorCode::E1001 => "unexpected token",
            ErrorCode::E1002 => "expected expression",
            ErrorCode::E1003 => "unclosed delimiter",
            ErrorCode::E1004 => "expected identifier",
            ErrorCode::E1005 => "expected an indented block",
            ErrorCode::E1006 => "invalid forward reference",
            ErrorCode::E2001 => "extension required",
            ErrorCode::E2002 => "duplicate value",
            ErrorCode::E2003 => "multiple literal-set bases",
            ErrorCode::E2004 => "unsupported literal kind",
            ErrorCode::E2005 => "conflicts with inherited member",
            ErrorCode::E2006 => "member redefined",
            ErrorCode::E2007 => "unresolved literal-set definition",
            ErrorCode::E2008 => "invalid class option",
            ErrorCode::E2009 => "invalid _ignore_ directive",
            ErrorCode::E3001 => "value is not a member",
            ErrorCode::E3002 => "unknown member",
            ErrorCode::E3003 => "literal set is not callable",
            ErrorCode::E3004 => "literal set used as a class",
            ErrorCode::E3005 => "wrong number of arguments",
            ErrorCode::E3006 => "argument too broad",
            ErrorCode::E3007 => "incompatible types",
            ErrorCode::E9001 => "internal error",
            ErrorCode::E9002 => "too many errors",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
