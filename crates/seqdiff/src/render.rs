//! Text renderings of diff results

use std::fmt::{self, Write};

use seqdiff_core::{ChangeKind, ContextChange, Hunk, SdiffChange};
use unicode_width::UnicodeWidthChar;

/// Strip the line terminator a line token carries.
fn text(token: &str) -> &str {
    token
        .strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(token)
}

/// A range of `changes` that will be printed as one `@@` hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    start: usize,
    end: usize,
}

/// Group changed steps whose unchanged gap is at most `2 * context`.
fn windows<T>(changes: &[ContextChange<T>], context: usize) -> Vec<Window> {
    let mut windows: Vec<Window> = Vec::new();
    let changed = changes
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.is_unchanged())
        .map(|(i, _)| i);

    for i in changed {
        let start = i.saturating_sub(context);
        let end = (i + context + 1).min(changes.len());
        match windows.last_mut() {
            Some(last) if start <= last.end => last.end = end,
            _ => windows.push(Window { start, end }),
        }
    }

    windows
}

/// `start,len` for one side of a hunk header. An empty side names the
/// line before it, as `diff -u` does.
fn header_range(before: usize, len: usize) -> String {
    if len == 0 {
        format!("{before},0")
    } else if len == 1 {
        format!("{}", before + 1)
    } else {
        format!("{},{}", before + 1, len)
    }
}

const NO_NEWLINE: &str = "\\ No newline at end of file";

/// Unified diff with `context` unchanged steps around every change.
///
/// A final line without a terminator is followed by a
/// `\ No newline at end of file` marker, as `diff -u` prints it.
pub fn unified<W: Write>(
    out: &mut W,
    old_name: &str,
    new_name: &str,
    changes: &[ContextChange<&str>],
    context: usize,
) -> fmt::Result {
    let windows = windows(changes, context);
    if windows.is_empty() {
        return Ok(());
    }

    writeln!(out, "--- {old_name}")?;
    writeln!(out, "+++ {new_name}")?;

    let old_total = changes.iter().filter(|c| c.old().is_some()).count();
    let new_total = changes.iter().filter(|c| c.new_side().is_some()).count();

    for window in windows {
        let before = &changes[..window.start];
        let body = &changes[window.start..window.end];

        let old_before = before.iter().filter(|c| c.old().is_some()).count();
        let new_before = before.iter().filter(|c| c.new_side().is_some()).count();
        let old_len = body.iter().filter(|c| c.old().is_some()).count();
        let new_len = body.iter().filter(|c| c.new_side().is_some()).count();

        writeln!(
            out,
            "@@ -{} +{} @@",
            header_range(old_before, old_len),
            header_range(new_before, new_len)
        )?;

        // Removed lines of a run print before its added lines.
        let mut removed: Vec<(&str, bool)> = Vec::new();
        let mut added: Vec<(&str, bool)> = Vec::new();
        for change in body {
            if change.is_unchanged() {
                flush(out, &mut removed, &mut added)?;
                if let Some((i, token)) = change.old() {
                    line(out, ' ', token, i + 1 == old_total)?;
                }
                continue;
            }
            if let Some((i, token)) = change.old() {
                removed.push((token, i + 1 == old_total));
            }
            if let Some((j, token)) = change.new_side() {
                added.push((token, j + 1 == new_total));
            }
        }
        flush(out, &mut removed, &mut added)?;
    }

    Ok(())
}

/// Print one unified line. `last` marks the final token of its file.
fn line<W: Write>(out: &mut W, prefix: char, token: &str, last: bool) -> fmt::Result {
    writeln!(out, "{prefix}{}", text(token))?;
    if last && !token.ends_with('\n') {
        writeln!(out, "{NO_NEWLINE}")?;
    }
    Ok(())
}

fn flush<W: Write>(
    out: &mut W,
    removed: &mut Vec<(&str, bool)>,
    added: &mut Vec<(&str, bool)>,
) -> fmt::Result {
    for (token, last) in removed.drain(..) {
        line(out, '-', token, last)?;
    }
    for (token, last) in added.drain(..) {
        line(out, '+', token, last)?;
    }
    Ok(())
}

/// Cut `s` to at most `width` columns, then pad it to exactly `width`.
fn fit(s: &str, width: usize) -> String {
    let mut fitted = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        fitted.push(c);
        used += w;
    }
    fitted.extend(std::iter::repeat(' ').take(width - used));
    fitted
}

/// Two columns, old on the left, with a marker gutter between them.
pub fn side_by_side<W: Write>(
    out: &mut W,
    changes: &[SdiffChange<&str>],
    width: usize,
) -> fmt::Result {
    for change in changes {
        let marker = match change.kind() {
            ChangeKind::Unchanged => ' ',
            ChangeKind::Changed => '|',
            ChangeKind::Delete => '<',
            ChangeKind::Add => '>',
        };
        let left = change.old_element().map_or("", |t| text(t));
        let right = change.new_element().map_or("", |t| text(t));
        let line = format!("{} {} {}", fit(left, width), marker, right);
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

/// One line per aligned step, prefixed by its change symbol.
pub fn inline<W: Write>(out: &mut W, changes: &[SdiffChange<&str>]) -> fmt::Result {
    for change in changes {
        match (change.kind(), change.old_element(), change.new_element()) {
            (ChangeKind::Changed, Some(old), Some(new)) => {
                writeln!(out, "-{}", text(old))?;
                writeln!(out, "+{}", text(new))?;
            }
            (ChangeKind::Add, _, Some(token)) => writeln!(out, "+{}", text(token))?,
            (kind, Some(token), _) => writeln!(out, "{}{}", kind.symbol(), text(token))?,
            (kind, None, None) => writeln!(out, "{}", kind.symbol())?,
            (kind, None, Some(token)) => writeln!(out, "{}{}", kind.symbol(), text(token))?,
        }
    }
    Ok(())
}

/// Hunks as JSON, each change encoded as a `[symbol, position, element]`
/// tuple.
pub fn json(hunks: &[Hunk<&str>]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(hunks)
}
