//! Text helpers for building diagnostic messages.

use std::iter;

/// ANSI magenta, used to emphasize the offending span.
const HIGHLIGHT: &str = "\x1b[35m";
/// ANSI bright black, used for message stems.
const MUTED: &str = "\x1b[90m";
/// Resets the foreground color only.
const RESET_FOREGROUND: &str = "\x1b[39m";

/// Chars cssparser treats as line breaks; `\r\n` counts once.
const LINE_BREAKS: [char; 3] = ['\n', '\r', '\x0C'];

/// Split `text` into lines the way cssparser numbers them.
fn source_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    iter::from_fn(move || {
        let current = rest?;
        let Some(pos) = current.find(LINE_BREAKS) else {
            rest = None;
            return Some(current);
        };
        let (head, tail) = current.split_at(pos);
        let terminator = if tail.starts_with("\r\n") { 2 } else { 1 };
        rest = tail.get(terminator..);
        Some(head)
    })
}

/// Content of the 1-based `line` of `text`, without its line terminator.
/// Lines break on `\n`, `\r\n`, `\r` and form feed, matching the positions
/// reported by the syntax layer. Returns `None` for line 0 or a line past the
/// end of the text.
pub fn line_content(text: &str, line: u32) -> Option<&str> {
    let index = usize::try_from(line.checked_sub(1)?).ok()?;
    source_lines(text).nth(index)
}

/// Byte offset of the `index`-th char of `text`; the text length when
/// `index` is exactly one past the last char.
fn char_offset(text: &str, index: usize) -> Option<usize> {
    text.char_indices()
        .map(|(offset, _)| offset)
        .chain(iter::once(text.len()))
        .nth(index)
}

/// Wrap the span of `line` starting at char offset `start` and covering as
/// many chars as `match_text` has in the highlight color. A start past the end
/// leaves the line untouched; a span running past the end is clamped.
pub fn highlight_substring(line: &str, start: usize, match_text: &str) -> String {
    let Some(begin) = char_offset(line, start) else {
        return line.to_owned();
    };
    let span = match_text.chars().count();
    let end = start
        .checked_add(span)
        .and_then(|stop| char_offset(line, stop))
        .unwrap_or(line.len());
    let (head, rest) = line.split_at(begin);
    let (target, tail) = rest.split_at(end - begin);
    format!("{head}{HIGHLIGHT}{target}{RESET_FOREGROUND}{tail}")
}

/// Render `text` in a muted terminal color.
pub fn muted(text: &str) -> String {
    format!("{MUTED}{text}{RESET_FOREGROUND}")
}
