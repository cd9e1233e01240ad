//! Escape processing for string and byte-string literals.

use std::str::CharIndices;

/// An escape that could not be decoded, with its byte offset in the
/// literal's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct EscapeError {
    pub(crate) offset: usize,
    pub(crate) message: &'static str,
}

fn take_hex(chars: &mut CharIndices<'_>, digits: usize) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        let (_, c) = chars.next()?;
        value = value.checked_mul(16)?.checked_add(c.to_digit(16)?)?;
    }
    Some(value)
}

/// Decode one escape after a backslash. Returns `Ok(None)` for an escaped
/// newline, which contributes nothing.
fn simple_escape(c: char) -> Option<Option<u32>> {
    Some(Some(match c {
        '\n' => return Some(None),
        'n' => 0x0A,
        't' => 0x09,
        'r' => 0x0D,
        '0' => 0x00,
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0C,
        'v' => 0x0B,
        '\\' => 0x5C,
        '\'' => 0x27,
        '"' => 0x22,
        _ => return None,
    }))
}

/// Unescape a (non-raw) string literal's contents.
///
/// Unknown escapes keep their backslash, matching how the definition
/// language treats them.
pub(crate) fn unescape_str(content: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some((_, esc)) = chars.next() else {
            out.push('\\');
            break;
        };
        if let Some(decoded) = simple_escape(esc) {
            if let Some(cp) = decoded.and_then(char::from_u32) {
                out.push(cp);
            }
            continue;
        }
        let width = match esc {
            'x' => 2,
            'u' => 4,
            'U' => 8,
            _ => {
                out.push('\\');
                out.push(esc);
                continue;
            }
        };
        let cp = take_hex(&mut chars, width)
            .and_then(char::from_u32)
            .ok_or(EscapeError {
                offset,
                message: "invalid hexadecimal or unicode escape",
            })?;
        out.push(cp);
    }
    Ok(out)
}

/// Unescape a (non-raw) byte-string literal's contents.
pub(crate) fn unescape_bytes(content: &str) -> Result<Vec<u8>, EscapeError> {
    let mut out = Vec::with_capacity(content.len());
    let mut chars = content.char_indices();
    while let Some((offset, c)) = chars.next() {
        if c != '\\' {
            out.push(ascii_byte(c, offset)?);
            continue;
        }
        let Some((_, esc)) = chars.next() else {
            out.push(b'\\');
            break;
        };
        if let Some(decoded) = simple_escape(esc) {
            if let Some(b) = decoded.and_then(|v| u8::try_from(v).ok()) {
                out.push(b);
            }
            continue;
        }
        if esc == 'x' {
            let b = take_hex(&mut chars, 2)
                .and_then(|v| u8::try_from(v).ok())
                .ok_or(EscapeError {
                    offset,
                    message: "invalid \\x escape",
                })?;
            out.push(b);
        } else {
            out.push(b'\\');
            out.push(ascii_byte(esc, offset)?);
        }
    }
    Ok(out)
}

/// Raw byte strings still only admit ASCII.
pub(crate) fn raw_bytes(content: &str) -> Result<Vec<u8>, EscapeError> {
    content
        .char_indices()
        .map(|(offset, c)| ascii_byte(c, offset))
        .collect()
}

fn ascii_byte(c: char, offset: usize) -> Result<u8, EscapeError> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(EscapeError {
            offset,
            message: "byte strings may only contain ASCII characters",
        })
}
