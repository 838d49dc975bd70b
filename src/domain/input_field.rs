//! Scans a pane's captured lines for a 3-line boxed input-field region and
//! classifies its content.
//!
//! ```text
//! ╭─────────╮
//! │ >       │
//! ╰─────────╯
//! ```

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFieldStatus {
    Empty,
    HasInput,
    NoInputField,
    ParseError { reason: String },
}

/// Scans `lines` for the first matching boxed region and classifies it.
///
/// Requires at least 3 input lines (fewer is a caller-level validation
/// failure rather than a parse result).
pub fn parse_input_field(lines: &[String]) -> Result<InputFieldStatus> {
    if lines.len() < 3 {
        return Err(EngineError::ValidationFailed {
            input: format!("{} lines", lines.len()),
            constraint: "at least 3 lines required to scan for an input field".to_string(),
        });
    }

    for window in lines.windows(3) {
        match classify_window(window) {
            Some(status) => return Ok(status),
            None => continue,
        }
    }

    Ok(InputFieldStatus::NoInputField)
}

fn classify_window(window: &[String]) -> Option<InputFieldStatus> {
    let top = window[0].trim();
    let middle = window[1].trim();
    let bottom = window[2].trim();

    if !(top.starts_with('╭') && top.contains('─')) {
        return None;
    }
    if !(bottom.starts_with('╰') && bottom.contains('─')) {
        return None;
    }
    if !(middle.starts_with('│') && middle.ends_with('│')) {
        return None;
    }

    let interior = match extract_interior(middle) {
        Some(i) => i,
        None => {
            return Some(InputFieldStatus::ParseError {
                reason: "boxed line too short to contain an interior".to_string(),
            });
        }
    };
    let interior = interior.trim();

    if interior == ">" {
        Some(InputFieldStatus::Empty)
    } else {
        // Anything else within a matched box, including content starting
        // with '>', counts as HAS_INPUT.
        Some(InputFieldStatus::HasInput)
    }
}

fn extract_interior(middle: &str) -> Option<&str> {
    let start = middle.char_indices().next()?.0 + '│'.len_utf8();
    let end = middle.rfind('│')?;
    if end < start {
        return None;
    }
    Some(&middle[start..end])
}
