//! Focus session timing with periodic check-ins.
//!
//! The client drives the session with one [`FocusSession::tick`] per
//! elapsed second. When the check-in interval is reached the session pauses
//! and waits for the user to either confirm progress or ask for help. The
//! server only stores the accumulated seconds and hands back a session
//! resumed from them.

use serde::{Deserialize, Serialize};

/// Default minutes between check-in prompts.
pub const DEFAULT_CHECK_IN_MINUTES: u32 = 1;

/// Outcome of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is paused or waiting on a check-in; nothing changed.
    Idle,
    /// One second was counted.
    Counted,
    /// One second was counted and a check-in is now due.
    CheckInDue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusSession {
    elapsed_secs: u64,
    active: bool,
    check_in_interval_secs: u64,
    since_check_in_secs: u64,
    check_in_pending: bool,
}

impl FocusSession {
    /// Resume a session from previously recorded focus time.
    ///
    /// A zero interval falls back to [`DEFAULT_CHECK_IN_MINUTES`].
    pub fn new(elapsed_secs: u64, check_in_minutes: u32) -> Self {
        let minutes = if check_in_minutes == 0 {
            DEFAULT_CHECK_IN_MINUTES
        } else {
            check_in_minutes
        };
        Self {
            elapsed_secs,
            active: false,
            check_in_interval_secs: u64::from(minutes) * 60,
            since_check_in_secs: 0,
            check_in_pending: false,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn check_in_pending(&self) -> bool {
        self.check_in_pending
    }

    /// Start (or resume) counting. Ignored while a check-in is pending.
    pub fn start(&mut self) {
        if !self.check_in_pending {
            self.active = true;
        }
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    /// Account for one elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.active {
            return TickOutcome::Idle;
        }

        self.elapsed_secs += 1;
        self.since_check_in_secs += 1;

        if self.since_check_in_secs >= self.check_in_interval_secs {
            self.active = false;
            self.check_in_pending = true;
            TickOutcome::CheckInDue
        } else {
            TickOutcome::Counted
        }
    }

    /// The user confirmed they are on track: restart the check-in clock
    /// and resume.
    pub fn acknowledge_check_in(&mut self) {
        self.check_in_pending = false;
        self.since_check_in_secs = 0;
        self.active = true;
    }

    /// The user asked for help: dismiss the prompt and stay paused.
    pub fn request_help(&mut self) {
        self.check_in_pending = false;
        self.since_check_in_secs = 0;
        self.active = false;
    }
}

/// Format seconds as `HH:MM:SS`.
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
