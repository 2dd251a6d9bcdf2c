//! Brace-depth block extraction.

use super::error::RewriteError;

/// Net brace balance of a single line.
pub fn brace_balance(line: &str) -> i32 {
    let opens = line.matches('{').count() as i32;
    let closes = line.matches('}').count() as i32;

    opens - closes
}

/// Collect `lines[start..]` up to and including the line at which the running
/// brace balance first returns to zero, returning the captured lines and the
/// index of that closing line.
///
/// The scanner counts braces only; it is blind to string literals and
/// comments, and nested blocks are transparent to it.
pub fn scan_block(lines: &[String], start: usize) -> Result<(Vec<String>, usize), RewriteError> {
    let mut captured = Vec::new();
    let mut balance = 0i32;

    for (i, line) in lines.iter().enumerate().skip(start) {
        captured.push(line.clone());
        balance += brace_balance(line);

        if balance == 0 {
            return Ok((captured, i));
        }
    }

    Err(RewriteError::UnclosedBlock {
        opening_line: lines.get(start).cloned().unwrap_or_default(),
    })
}
