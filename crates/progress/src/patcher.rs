//! Splices a report into the marked section of a document.

use timebar_core::{END_SENTINEL, START_SENTINEL};

use crate::{ProgressError, Result};

/// Byte range of the first marked section, markers included.
///
/// The section starts at the first start marker and ends at the first end
/// marker after it.
pub fn find_region(document: &str) -> Option<(usize, usize)> {
    let start = document.find(START_SENTINEL)?;
    let after_start = start + START_SENTINEL.len();
    let end = after_start + document[after_start..].find(END_SENTINEL)?;
    Some((start, end + END_SENTINEL.len()))
}

/// Replace the marked section of `document` with `report`.
///
/// Everything outside the markers is kept byte for byte. Patching twice with
/// the same report gives the same document as patching once.
pub fn patch(document: &str, report: &str) -> Result<String> {
    let (start, end) = find_region(document).ok_or(ProgressError::MissingRegion)?;

    let mut out = String::with_capacity(document.len() + report.len());
    out.push_str(&document[..start]);
    out.push_str(START_SENTINEL);
    out.push('\n');
    out.push_str(report);
    out.push('\n');
    out.push_str(END_SENTINEL);
    out.push_str(&document[end..]);
    Ok(out)
}

/// Content of the marked section, without the newline [`patch`] adds on
/// each side.
pub fn extract(document: &str) -> Option<&str> {
    let (start, end) = find_region(document)?;
    let inner = &document[start + START_SENTINEL.len()..end - END_SENTINEL.len()];
    let inner = inner.strip_prefix('\n').unwrap_or(inner);
    Some(inner.strip_suffix('\n').unwrap_or(inner))
}
