//! Source line tokenizer.
//!
//! Splits one line of assembly into a mnemonic and typed operand tokens. The
//! lexer only recognises token syntax; deciding which instruction shape a
//! token sequence forms is the loader's job.

/// One operand of an instruction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand<'a> {
    /// A bare identifier: register name or label.
    Ident(&'a str),
    /// An immediate written `#n`; holds the text after `#`.
    Imm(&'a str),
    /// A memory reference written `offset(base)`.
    Mem {
        /// Offset literal.
        offset: &'a str,
        /// Base register name.
        base: &'a str,
    },
    /// Anything else.
    Invalid(&'a str),
}

/// Classified source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLine<'a> {
    /// Empty or comment-only line.
    Blank,
    /// `name:` label declaration; holds the text before the colon.
    Label(&'a str),
    /// Mnemonic followed by zero or more operands.
    Instruction {
        /// Mnemonic as written.
        mnemonic: &'a str,
        /// Operands in source order.
        operands: Vec<Operand<'a>>,
    },
}

/// Removes a trailing `;` or `//` comment and surrounding whitespace.
pub fn strip_comment(line: &str) -> &str {
    let cut = [line.find(';'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    line[..cut].trim()
}

/// Returns `true` if `s` is a non-empty run of `[A-Za-z0-9_.]`.
pub fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Tokenizes one source line, dropping any trailing comment.
pub fn tokenize(line: &str) -> SourceLine<'_> {
    let code = strip_comment(line);
    if code.is_empty() {
        return SourceLine::Blank;
    }
    if let Some(name) = code.strip_suffix(':') {
        return SourceLine::Label(name.trim());
    }

    let (mnemonic, rest) = code
        .split_once(char::is_whitespace)
        .map_or((code, ""), |(m, r)| (m, r.trim()));

    let operands = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(|s| operand(s.trim())).collect()
    };

    SourceLine::Instruction { mnemonic, operands }
}

fn operand(s: &str) -> Operand<'_> {
    if let Some(imm) = s.strip_prefix('#') {
        return Operand::Imm(imm.trim());
    }
    if let Some(inner) = s.strip_suffix(')') {
        if let Some((offset, base)) = inner.split_once('(') {
            let (offset, base) = (offset.trim(), base.trim());
            if !offset.is_empty() && is_ident(base) {
                return Operand::Mem { offset, base };
            }
        }
        return Operand::Invalid(s);
    }
    if is_ident(s) {
        Operand::Ident(s)
    } else {
        Operand::Invalid(s)
    }
}

/// Parses a signed integer literal: decimal or `0x` hexadecimal.
pub fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        i128::from_str_radix(hex, 16).ok()?
    } else if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse::<i128>().ok()?
    } else {
        return None;
    };
    let value = if neg { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}
