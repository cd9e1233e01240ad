//! Anchored regular expressions for string-valued sets.

use litset_ir::LiteralValue;
use regex::Regex;

use crate::error::{NotStringValued, PatternError};
use crate::namespace::LiteralNamespace;

impl LiteralNamespace {
    /// `^(?:GET|POST)$`, values escaped, in declaration order.
    ///
    /// A `None` member is allowed and contributes nothing; any other
    /// non-string member is an error.
    pub fn regex(&self) -> Result<String, NotStringValued> {
        let mut alternatives = Vec::with_capacity(self.len());
        for value in self.iter() {
            match value {
                LiteralValue::Str(s) => alternatives.push(regex::escape(s)),
                LiteralValue::None => {}
                other => {
                    return Err(NotStringValued {
                        set: self.name().to_owned(),
                        offending: other.clone(),
                    })
                }
            }
        }
        Ok(format!("^(?:{})$", alternatives.join("|")))
    }

    pub fn compiled_regex(&self) -> Result<Regex, PatternError> {
        Ok(Regex::new(&self.regex()?)?)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
