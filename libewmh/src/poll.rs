//! Requests are advisory so callers that need to know a request took effect poll for it. Every
//! poll is bounded by `PollOpts`; by default running out of attempts is silent and the caller
//! just carries on.
use std::{thread, time::Duration};

use crate::{Location, WindowManager, WindowManagerError, WindowManagerResult};
use tracing::{debug, trace};
use x11rb::protocol::xproto::Window;

/// Default number of polls before giving up
pub const MAX_TRIES: u32 = 500;

/// Default time to wait between polls
pub const POLL_INTERVAL: Duration = Duration::from_millis(30);

/// Distance from the requested location a moved window may land at to account for borders and
/// title bars added by the window manager.
pub const MOVE_TOLERANCE: (i32, i32) = (10, 50);

/// PollOpts provides an ergonomic way to configure how state changes are waited on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOpts {
    tries: u32,
    interval: Duration,
    strict: bool,
}

impl Default for PollOpts {
    fn default() -> Self {
        Self { tries: MAX_TRIES, interval: POLL_INTERVAL, strict: false }
    }
}

impl PollOpts {
    /// Create poll options with the default budget of 500 polls 30ms apart
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of polls to make before giving up
    pub fn tries(mut self, tries: u32) -> Self {
        self.tries = tries;
        self
    }

    /// Set the time to wait between polls
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Fail with `PollTimeout` when the budget is exhausted instead of returning quietly
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    // Run the check until it passes or the budget runs out
    fn run<F>(&self, win: Window, mut check: F) -> WindowManagerResult<()>
    where
        F: FnMut() -> WindowManagerResult<bool>,
    {
        for attempt in 0..self.tries {
            if check()? {
                trace!("poll: id: {}, done after {} attempts", win, attempt + 1);
                return Ok(());
            }
            thread::sleep(self.interval);
        }

        debug!("poll: id: {}, gave up after {} attempts", win, self.tries);
        if self.strict {
            Err(WindowManagerError::PollTimeout(win, self.tries).into())
        } else {
            Ok(())
        }
    }
}

impl WindowManager {
    /// Wait until the given window becomes active, or stops being active
    ///
    /// ### Arguments
    /// * `win` - id of the window to watch
    /// * `active` - wait for the window to be active when true else for it to be inactive
    /// * `opts` - poll budget
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// wm.activate_win(12345).unwrap();
    /// wm.wait_for_active(12345, true, &PollOpts::new()).unwrap();
    /// ```
    pub fn wait_for_active(&self, win: Window, active: bool, opts: &PollOpts) -> WindowManagerResult<()> {
        opts.run(win, || {
            let current = self.active_win()?;
            trace!("wait_for_active: id: {}, active: {}, current: {}", win, active, current);
            Ok((current == win) == active)
        })
    }

    /// Wait until the given window leaves its original location or lands close to the target
    ///
    /// ### Arguments
    /// * `win` - id of the window to watch
    /// * `orig` - location before the move was requested
    /// * `target` - location that was requested
    /// * `opts` - poll budget
    pub fn wait_for_move(
        &self, win: Window, orig: (i32, i32), target: (i32, i32), opts: &PollOpts,
    ) -> WindowManagerResult<()> {
        opts.run(win, || {
            let Location { x, y, .. } = self.win_location(win)?;
            trace!("wait_for_move: id: {}, x: {}, y: {}", win, x, y);
            let moved = (x, y) != orig;
            let close = target.0.abs_diff(x) <= MOVE_TOLERANCE.0.unsigned_abs()
                && target.1.abs_diff(y) <= MOVE_TOLERANCE.1.unsigned_abs();
            Ok(moved || close)
        })
    }
}
