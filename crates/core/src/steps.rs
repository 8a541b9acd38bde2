//! Numbered-step text parsing.
//!
//! Turns free-form text such as
//!
//! ```text
//! 1. Draft the outline
//! Keep it under a page.
//! 2. Write the introduction
//! ```
//!
//! into an ordered list of [`Step`] records. Lines that do not start a step
//! become detail lines of the step currently open.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum number of steps a single parse may produce once gap-filling
/// placeholders are included.
pub const MAX_STEPS_PER_FLOW: usize = 500;

/// `<optional whitespace><digits>.<optional whitespace><title>`
static STEP_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+)\.\s*(.+)$").expect("step line pattern is valid"));

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One ordered, user-editable unit of a task breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl Step {
    /// A gap-filling placeholder for step number `n`.
    pub fn placeholder(n: u64) -> Self {
        Self {
            id: n.to_string(),
            title: format!("Step {n}"),
            details: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse numbered-step text into an ordered step sequence.
///
/// When `fill_missing_numbers` is set and a step number jumps by more than
/// one, `"Step {n}"` placeholders are inserted for every skipped number
/// immediately before the step that caused the gap. Duplicate numbers are
/// kept as separate steps.
///
/// A numbered line always starts a step. Numbers too large for `u64` keep
/// their digits as the id and take no part in gap filling.
///
/// Fails only when gap filling would grow the sequence past
/// [`MAX_STEPS_PER_FLOW`].
pub fn parse_steps(raw: &str, fill_missing_numbers: bool) -> Result<Vec<Step>, CoreError> {
    let mut steps: Vec<Step> = Vec::new();
    let mut current: Option<Step> = None;
    let mut last_number: Option<u64> = None;

    for line in raw.lines() {
        let Some(caps) = STEP_LINE.captures(line) else {
            let content = line.trim();
            if let (false, Some(open)) = (content.is_empty(), current.as_mut()) {
                open.details.push(content.to_string());
            }
            continue;
        };

        if let Some(open) = current.take() {
            steps.push(open);
        }

        let digits = &caps[1];
        let number = digits.parse::<u64>().ok();

        if fill_missing_numbers {
            if let (Some(last), Some(number)) = (last_number, number) {
                fill_gap(&mut steps, last, number)?;
            }
        }

        current = Some(Step {
            id: number.map_or_else(
                || digits.trim_start_matches('0').to_string(),
                |n| n.to_string(),
            ),
            title: caps[2].trim().to_string(),
            details: Vec::new(),
        });
        last_number = number;
    }

    if let Some(open) = current {
        steps.push(open);
    }

    Ok(steps)
}

/// Append a placeholder for every number strictly between `last` and
/// `number`.
fn fill_gap(steps: &mut Vec<Step>, last: u64, number: u64) -> Result<(), CoreError> {
    let Some(missing) = number.checked_sub(last).filter(|d| *d > 1).map(|d| d - 1) else {
        return Ok(());
    };

    let within_cap = (steps.len() as u64)
        .checked_add(missing)
        .is_some_and(|total| total <= MAX_STEPS_PER_FLOW as u64);
    if !within_cap {
        return Err(CoreError::Validation(format!(
            "filling the gap between steps {last} and {number} would \
             exceed the maximum of {MAX_STEPS_PER_FLOW} steps"
        )));
    }

    steps.extend((last + 1..number).map(Step::placeholder));
    Ok(())
}

/// Return every step id that occurs more than once, in first-seen order.
pub fn duplicate_step_ids(steps: &[Step]) -> Vec<String> {
    duplicates(steps.iter().map(|s| s.id.as_str()))
}

/// Shared duplicate detection for step and node ids.
pub(crate) fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for (position, id) in ids.enumerate() {
        seen.entry(id).or_insert((position, 0)).1 += 1;
    }

    let mut repeated: Vec<(usize, &str)> = seen
        .into_iter()
        .filter(|(_, (_, count))| *count > 1)
        .map(|(id, (first, _))| (first, id))
        .collect();
    repeated.sort_unstable();
    repeated.into_iter().map(|(_, id)| id.to_string()).collect()
}

/// Split free-form detail text into trimmed, non-empty lines.
pub fn split_details(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
