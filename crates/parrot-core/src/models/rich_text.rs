//! Structured rich text for note bodies.
//!
//! A note body is a sequence of styled runs rather than an opaque markup
//! string. Formatting is a run-splitting operation over a character range,
//! so merging and concatenating notes stays well-defined: runs are simply
//! appended, never string-spliced.

use serde::{Deserialize, Serialize};

/// Inline font color applied to a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunColor {
    Red,
    Green,
    Blue,
    Yellow,
    Purple,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Relative size step; None = default size
    pub size: Option<u8>,
    pub color: Option<RunColor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

impl StyledRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RichText {
    runs: Vec<StyledRun>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plain(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            return Self::new();
        }
        Self {
            runs: vec![StyledRun::plain(text)],
        }
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(StyledRun::char_len).sum()
    }

    /// Concatenation of all run texts with styling stripped.
    pub fn plain(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Append another rich text, keeping both sides' styling.
    pub fn append(&mut self, other: &RichText) {
        self.runs.extend(other.runs.iter().cloned());
        self.coalesce();
    }

    /// Append unstyled text.
    pub fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.runs.push(StyledRun::plain(text));
        self.coalesce();
    }

    /// Replace the whole content with unstyled text.
    pub fn set_plain(&mut self, text: &str) {
        *self = Self::from_plain(text);
    }

    /// Apply a style mutation to the character range `start..end`.
    ///
    /// Runs straddling a boundary are split first, then the mutation is
    /// applied to every fully covered run. An out-of-bounds or inverted
    /// range leaves the content unchanged (logged, never an error - the
    /// selection the range came from may have gone stale).
    pub fn apply<F>(&mut self, start: usize, end: usize, mutate: F)
    where
        F: Fn(&mut RunStyle),
    {
        let len = self.char_len();
        if start >= end || end > len {
            tracing::warn!(start, end, len, "ignoring malformed formatting range");
            return;
        }

        self.split_at(start);
        self.split_at(end);

        let mut pos = 0;
        for run in &mut self.runs {
            let run_len = run.char_len();
            if pos >= start && pos + run_len <= end {
                mutate(&mut run.style);
            }
            pos += run_len;
            if pos >= end {
                break;
            }
        }

        self.coalesce();
    }

    /// Split the run containing the given char offset so that a run boundary
    /// falls exactly at `offset`. No-op when a boundary is already there.
    fn split_at(&mut self, offset: usize) {
        let mut pos = 0;
        for i in 0..self.runs.len() {
            let run_len = self.runs[i].char_len();
            if offset > pos && offset < pos + run_len {
                let split = offset - pos;
                let byte_idx = self.runs[i]
                    .text
                    .char_indices()
                    .nth(split)
                    .map(|(b, _)| b)
                    .unwrap_or(self.runs[i].text.len());
                let tail = self.runs[i].text.split_off(byte_idx);
                let style = self.runs[i].style;
                self.runs.insert(i + 1, StyledRun { text: tail, style });
                return;
            }
            pos += run_len;
        }
    }

    /// Merge adjacent runs with identical style and drop empty runs.
    fn coalesce(&mut self) {
        self.runs.retain(|r| !r.text.is_empty());
        let mut i = 0;
        while i + 1 < self.runs.len() {
            if self.runs[i].style == self.runs[i + 1].style {
                let next = self.runs.remove(i + 1);
                self.runs[i].text.push_str(&next.text);
            } else {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bolded(rt: &RichText) -> Vec<(String, bool)> {
        rt.runs()
            .iter()
            .map(|r| (r.text.clone(), r.style.bold))
            .collect()
    }

    #[test]
    fn test_apply_splits_runs_at_range_boundaries() {
        let mut rt = RichText::from_plain("hello world");
        rt.apply(6, 11, |s| s.bold = true);
        assert_eq!(
            bolded(&rt),
            vec![("hello ".to_string(), false), ("world".to_string(), true)]
        );
        assert_eq!(rt.plain(), "hello world");
    }

    #[test]
    fn test_apply_mid_run_creates_three_runs() {
        let mut rt = RichText::from_plain("abcdef");
        rt.apply(2, 4, |s| s.italic = true);
        assert_eq!(rt.runs().len(), 3);
        assert_eq!(rt.runs()[1].text, "cd");
        assert!(rt.runs()[1].style.italic);
        assert_eq!(rt.plain(), "abcdef");
    }

    #[test]
    fn test_malformed_range_is_a_noop() {
        let mut rt = RichText::from_plain("short");
        let before = rt.clone();
        rt.apply(3, 2, |s| s.bold = true);
        rt.apply(0, 99, |s| s.bold = true);
        assert_eq!(rt, before);
    }

    #[test]
    fn test_adjacent_equal_styles_coalesce() {
        let mut rt = RichText::from_plain("aabb");
        rt.apply(0, 2, |s| s.bold = true);
        rt.apply(2, 4, |s| s.bold = true);
        assert_eq!(rt.runs().len(), 1);
        assert!(rt.runs()[0].style.bold);
    }

    #[test]
    fn test_apply_respects_multibyte_chars() {
        let mut rt = RichText::from_plain("héllo");
        rt.apply(1, 3, |s| s.underline = true);
        assert_eq!(rt.plain(), "héllo");
        assert_eq!(rt.runs()[1].text, "él");
    }

    #[test]
    fn test_append_keeps_both_styles() {
        let mut a = RichText::from_plain("left");
        a.apply(0, 4, |s| s.bold = true);
        let b = RichText::from_plain("right");
        a.append(&b);
        assert_eq!(a.plain(), "leftright");
        assert!(a.runs()[0].style.bold);
        assert!(!a.runs()[1].style.bold);
    }
}
