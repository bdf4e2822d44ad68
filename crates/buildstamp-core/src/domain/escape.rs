//! String literal escaping per target language.
//!
//! Every style is total: any input escapes to the body of a literal that the
//! target compiler reads back as the same string. The surrounding quotes come
//! from the skeleton, not from here.

use std::fmt::Write;

use crate::domain::value_objects::EscapeStyle;

/// Escape `value` for use between the quotes of a `style` literal.
pub fn escape(style: EscapeStyle, value: &str) -> String {
    match style {
        EscapeStyle::ShellSingle => value.replace('\'', r"'\''"),
        _ => escape_double_quoted(style, value),
    }
}

fn escape_double_quoted(style: EscapeStyle, value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev = None;

    for c in value.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\t' => out.push_str(r"\t"),
            // `??x` would otherwise be read as a trigraph.
            '?' if style == EscapeStyle::C && prev == Some('?') => out.push_str(r"\?"),
            '\u{2028}' | '\u{2029}' if style == EscapeStyle::JavaScript => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c if c.is_control() => push_control(style, c, &mut out),
            c => out.push(c),
        }
        prev = Some(c);
    }

    out
}

fn push_control(style: EscapeStyle, c: char, out: &mut String) {
    let code = c as u32;
    // Writing into a String cannot fail.
    let _ = match style {
        // Octal is bounded at three digits, unlike C's `\x`. C escapes are
        // bytes, so multi-byte controls are written as their UTF-8 encoding.
        EscapeStyle::C => {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                let _ = write!(out, "\\{:03o}", byte);
            }
            Ok(())
        }
        // `\u` is rewritten before lexing in Java, so stay with octal there.
        EscapeStyle::Java => write!(out, "\\{:03o}", code),
        EscapeStyle::Python | EscapeStyle::JavaScript => write!(out, "\\x{:02x}", code),
        EscapeStyle::Rust => write!(out, "\\u{{{:x}}}", code),
        EscapeStyle::Go | EscapeStyle::CSharp | EscapeStyle::Json => {
            write!(out, "\\u{:04x}", code)
        }
        EscapeStyle::ShellSingle => {
            out.push(c);
            Ok(())
        }
    };
}
