// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summarization trigger policy.
//!
//! Pure decision over counts and the current high-water mark. The
//! at-most-one-in-flight guard lives in the manager; this module only
//! decides what a cycle would summarize.

use std::ops::Range;

use strum::Display;

/// Kind of summarization cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Threshold-gated; summarizes only turns not yet covered.
    Incremental,
    /// Recomputes long-term memory from the whole conversation.
    Force,
}

/// Why a cycle did not start. These are outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SkipReason {
    /// Another cycle is in flight for this memory.
    AlreadyRunning,
    /// Not more text turns than the threshold.
    BelowThreshold,
    /// Everything before the cutoff is already summarized.
    NoNewContent,
    /// Nothing to summarize at all.
    Empty,
}

/// What a cycle will summarize and where it moves the high-water mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub mode: Mode,
    /// Filtered-turn indices sent to the summarizer.
    pub range: Range<usize>,
    /// Value of `summarized_until` after a successful commit (before the
    /// `max` with the current value in incremental mode).
    pub target_until: usize,
    /// Whether the previous summary and facts go along as context.
    pub with_previous: bool,
}

/// Inputs of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyInput {
    pub total: usize,
    pub short_window_size: usize,
    pub summarize_threshold: usize,
    pub summarized_until: Option<usize>,
}

/// Decides whether a cycle of `mode` should run.
pub fn plan(input: PolicyInput, mode: Mode) -> Result<Plan, SkipReason> {
    match mode {
        Mode::Incremental => plan_incremental(input),
        Mode::Force => plan_force(input),
    }
}

fn plan_incremental(input: PolicyInput) -> Result<Plan, SkipReason> {
    if input.total == 0 {
        return Err(SkipReason::Empty);
    }
    if input.total <= input.summarize_threshold {
        return Err(SkipReason::BelowThreshold);
    }

    let cutoff = crate::window::cutoff_index(input.total, input.short_window_size);
    if cutoff == 0 {
        return Err(SkipReason::NoNewContent);
    }

    let last = cutoff - 1;
    let start = match input.summarized_until {
        Some(until) if last <= until => return Err(SkipReason::NoNewContent),
        Some(until) => until + 1,
        None => 0,
    };

    Ok(Plan {
        mode: Mode::Incremental,
        range: start..cutoff,
        target_until: last,
        with_previous: true,
    })
}

fn plan_force(input: PolicyInput) -> Result<Plan, SkipReason> {
    if input.total == 0 {
        return Err(SkipReason::Empty);
    }
    Ok(Plan {
        mode: Mode::Force,
        range: 0..input.total,
        target_until: input.total - 1,
        with_previous: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(total: usize, until: Option<usize>) -> PolicyInput {
        PolicyInput {
            total,
            short_window_size: 10,
            summarize_threshold: 16,
            summarized_until: until,
        }
    }

    #[test]
    fn below_threshold_is_skipped() {
        assert_eq!(
            plan(input(16, None), Mode::Incremental),
            Err(SkipReason::BelowThreshold)
        );
    }

    #[test]
    fn first_cycle_covers_prefix_before_cutoff() {
        let plan = plan(input(20, None), Mode::Incremental).unwrap();
        assert_eq!(plan.range, 0..10);
        assert_eq!(plan.target_until, 9);
        assert!(plan.with_previous);
    }

    #[test]
    fn next_cycle_only_covers_new_turns() {
        let plan = plan(input(23, Some(9)), Mode::Incremental).unwrap();
        assert_eq!(plan.range, 10..13);
        assert_eq!(plan.target_until, 12);
    }

    #[test]
    fn nothing_new_is_skipped() {
        assert_eq!(
            plan(input(20, Some(9)), Mode::Incremental),
            Err(SkipReason::NoNewContent)
        );
        // A forced run may have moved the mark past the cutoff.
        assert_eq!(
            plan(input(21, Some(19)), Mode::Incremental),
            Err(SkipReason::NoNewContent)
        );
    }

    #[test]
    fn zero_cutoff_is_skipped() {
        let input = PolicyInput {
            total: 5,
            short_window_size: 10,
            summarize_threshold: 2,
            summarized_until: None,
        };
        assert_eq!(plan(input, Mode::Incremental), Err(SkipReason::NoNewContent));
    }

    #[test]
    fn force_ignores_threshold() {
        let plan = plan(input(5, None), Mode::Force).unwrap();
        assert_eq!(plan.range, 0..5);
        assert_eq!(plan.target_until, 4);
        assert!(!plan.with_previous);
    }

    #[test]
    fn force_on_empty_is_skipped() {
        assert_eq!(plan(input(0, None), Mode::Force), Err(SkipReason::Empty));
        assert_eq!(plan(input(0, None), Mode::Incremental), Err(SkipReason::Empty));
    }

    #[test]
    fn skip_reasons_render_snake_case() {
        assert_eq!(SkipReason::AlreadyRunning.to_string(), "already_running");
        assert_eq!(Mode::Force.to_string(), "force");
    }
}
