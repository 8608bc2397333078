//! The window stack chains commands together. Commands that discover a window push it, commands
//! that need a window and weren't given one pop the most recent. It lives for a single run.
use std::{fmt, slice, vec};

use crate::{WindowManagerError, WindowManagerResult};
use x11rb::protocol::xproto::Window;

/// WindowStack is the ordered list of window ids shared by a chain of commands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowStack {
    windows: Vec<Window>,
}

impl WindowStack {
    /// Create a new empty window stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a window onto the top of the stack
    pub fn push(&mut self, win: Window) {
        self.windows.push(win);
    }

    /// Pop the most recently pushed window
    pub fn pop(&mut self) -> Option<Window> {
        self.windows.pop()
    }

    /// Use the explicit window if given else pop the most recently pushed window
    ///
    /// ### Arguments
    /// * `win` - explicit window id given by the caller
    ///
    /// ### Examples
    /// ```
    /// use libewmh::prelude::*;
    /// let mut stack = WindowStack::from(vec![100, 200]);
    /// assert_eq!(stack.pop_or(Some(5)).unwrap(), 5);
    /// assert_eq!(stack.pop_or(None).unwrap(), 200);
    /// ```
    pub fn pop_or(&mut self, win: Option<Window>) -> WindowManagerResult<Window> {
        match win {
            Some(win) => Ok(win),
            None => self.pop().ok_or_else(|| WindowManagerError::MissingWindowTarget.into()),
        }
    }

    /// Use the explicit window if given else take every window on the stack, bottom to top,
    /// leaving it empty.
    ///
    /// ### Arguments
    /// * `win` - explicit window id given by the caller
    pub fn take_targets(&mut self, win: Option<Window>) -> WindowManagerResult<Vec<Window>> {
        match win {
            Some(win) => Ok(vec![win]),
            None if self.windows.is_empty() => Err(WindowManagerError::MissingWindowTarget.into()),
            None => Ok(std::mem::take(&mut self.windows)),
        }
    }

    /// Iterate over the windows bottom to top
    pub fn iter(&self) -> slice::Iter<'_, Window> {
        self.windows.iter()
    }

    /// Number of windows on the stack
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// True when no windows are on the stack
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl From<Vec<Window>> for WindowStack {
    fn from(windows: Vec<Window>) -> Self {
        Self { windows }
    }
}

impl IntoIterator for WindowStack {
    type Item = Window;
    type IntoIter = vec::IntoIter<Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.into_iter()
    }
}

impl<'a> IntoIterator for &'a WindowStack {
    type Item = &'a Window;
    type IntoIter = slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}

// One window per line, bottom to top
impl fmt::Display for WindowStack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for win in &self.windows {
            writeln!(f, "{}", win)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifo() {
        let mut stack = WindowStack::new();
        stack.push(100);
        stack.push(200);
        assert_eq!(stack.pop(), Some(200));
        assert_eq!(stack.pop(), Some(100));
        assert_eq!(stack.pop(), None);
    }

    #[test]
    fn test_pop_or() {
        let mut stack = WindowStack::from(vec![100]);
        assert_eq!(stack.pop_or(Some(5)).unwrap(), 5);
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.pop_or(None).unwrap(), 100);
        assert_eq!(stack.pop_or(None).unwrap_err().wm(), Some(&WindowManagerError::MissingWindowTarget));
    }

    #[test]
    fn test_take_targets_consumes_all_in_order() {
        let mut stack = WindowStack::from(vec![100, 200]);
        let mut seen = vec![];
        for win in stack.take_targets(None).unwrap() {
            seen.push(win);
        }
        assert_eq!(seen, vec![100, 200]);
        assert!(stack.is_empty());
        assert_eq!(stack.take_targets(None).unwrap_err().wm(), Some(&WindowManagerError::MissingWindowTarget));
    }

    #[test]
    fn test_take_targets_explicit_leaves_stack() {
        let mut stack = WindowStack::from(vec![100, 200]);
        assert_eq!(stack.take_targets(Some(7)).unwrap(), vec![7]);
        assert_eq!(stack.iter().copied().collect::<Vec<_>>(), vec![100, 200]);
    }

    #[test]
    fn test_display() {
        assert_eq!(WindowStack::from(vec![100, 200]).to_string(), "100\n200\n");
        assert_eq!(WindowStack::new().to_string(), "");
    }
}
