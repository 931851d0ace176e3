//! Tag-stream parser for the tool command grammar.
//!
//! The interpreter model emits zero or more `<command>` blocks:
//!
//! ```text
//! <command name="write">
//!     <arg name="text">content</arg>
//!     <arg name="filename">path</arg>
//! </command>
//! ```
//!
//! The producing model is not a reliable XML emitter, so this is a tolerant
//! tokenizer rather than a strict XML parser:
//!
//! - Command names are matched case-insensitively; argument payloads are
//!   case-sensitive with surrounding whitespace trimmed.
//! - Back-to-back commands with no separator between `</command>` and the
//!   next `<command` are recovered as separate commands.
//! - A truncated final `</command>` (or `</arg>`) is tolerated: end of text
//!   or the next command opener closes it implicitly.
//! - Only the four tag forms `<command`, `</command>`, `<arg`, `</arg>` are
//!   recognized; any other `<` inside a payload is taken verbatim.
//! - Text with no well-formed command yields an empty result, not an error.

use crate::command::model::Command;

/// Extracts every command block from a chunk of model output, in order.
pub fn extract_commands(text: &str) -> Vec<Command> {
    // Tags are ASCII, so matching against an ASCII-lowercased copy keeps
    // byte offsets valid in the original text.
    let lower = text.to_ascii_lowercase();
    let mut commands = Vec::new();
    let mut pos = 0;

    while let Some(rel) = lower[pos..].find("<command") {
        let open_start = pos + rel;
        let Some(head_end_rel) = lower[open_start..].find('>') else {
            // Truncated opening tag; nothing more to parse.
            break;
        };
        let head_end = open_start + head_end_rel;
        let head = &text[open_start..head_end];

        let body_start = head_end + 1;
        let (body_end, resume) = find_body_end(&lower, body_start);

        match parse_name_attr(head) {
            Some(name) => {
                let args = parse_args(&text[body_start..body_end], &lower[body_start..body_end]);
                commands.push(Command::new(name, args));
            }
            None => {
                tracing::debug!("skipping command block without a name attribute");
            }
        }

        pos = resume;
    }

    commands
}

/// Finds where a command body ends: at `</command>`, at the next `<command`
/// opener (recovery for a dropped closing tag), or at end of text.
/// Returns `(body_end, resume_position)`.
fn find_body_end(lower: &str, body_start: usize) -> (usize, usize) {
    let close = lower[body_start..].find("</command>");
    let next_open = lower[body_start..].find("<command");

    match (close, next_open) {
        (Some(c), Some(n)) if n < c => (body_start + n, body_start + n),
        (Some(c), _) => (body_start + c, body_start + c + "</command>".len()),
        (None, Some(n)) => (body_start + n, body_start + n),
        (None, None) => (lower.len(), lower.len()),
    }
}

/// Extracts the value of the `name="..."` attribute from an opening tag head.
/// The attribute keyword is matched case-insensitively, like the tag names.
fn parse_name_attr(head: &str) -> Option<&str> {
    let lower = head.to_ascii_lowercase();
    let attr_start = lower.find("name")?;
    let rest = &head[attr_start + "name".len()..];
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let rest = rest.strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

/// Parses the `<arg>` elements inside a command body, preserving order.
///
/// Attribute names on args are ignored; only payload position matters. A
/// missing `</arg>` on the last argument is closed by the end of the body.
fn parse_args(body: &str, lower_body: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut pos = 0;

    while let Some(rel) = lower_body[pos..].find("<arg") {
        let tag_start = pos + rel;
        // Guard against matching a longer tag name such as "<args>".
        let after = lower_body[tag_start + "<arg".len()..].chars().next();
        if !matches!(after, Some(c) if c.is_whitespace() || c == '>') {
            pos = tag_start + "<arg".len();
            continue;
        }
        let Some(open_end_rel) = lower_body[tag_start..].find('>') else {
            break;
        };
        let payload_start = tag_start + open_end_rel + 1;

        let (payload_end, resume) = match lower_body[payload_start..].find("</arg>") {
            Some(rel) => (
                payload_start + rel,
                payload_start + rel + "</arg>".len(),
            ),
            None => (lower_body.len(), lower_body.len()),
        };

        args.push(body[payload_start..payload_end].trim().to_string());
        pos = resume;
    }

    args
}
