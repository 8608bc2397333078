use crate::{SearchDirection, WindowManager, WindowManagerResult};
use tracing::trace;
use x11rb::protocol::xproto::Window;

/// Property the window manager sets on every client window it manages (ICCCM)
pub const WM_STATE: &str = "WM_STATE";

impl WindowManager {
    /// Find the nearest window carrying `WM_STATE` starting with the given window itself. Toolkits
    /// often give the input focus to an inner widget window, this finds the client window the
    /// window manager actually manages.
    ///
    /// ### Arguments
    /// * `win` - id of the window to start from
    /// * `direction` - walk up through the parents or depth first through the children
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// let client = wm.find_client(wm.focused_win().unwrap(), SearchDirection::Children).unwrap();
    /// ```
    pub fn find_client(&self, win: Window, direction: SearchDirection) -> WindowManagerResult<Option<Window>> {
        match direction {
            SearchDirection::Parents => {
                let mut cur = win;
                loop {
                    if self.has_wm_state(cur)? {
                        return Ok(Some(cur));
                    }
                    match self.server.query_tree(cur)?.parent {
                        Some(parent) => cur = parent,
                        None => return Ok(None),
                    }
                }
            },
            SearchDirection::Children => {
                if self.has_wm_state(win)? {
                    return Ok(Some(win));
                }
                for child in self.server.query_tree(win)?.children {
                    if let Some(found) = self.find_client(child, direction)? {
                        return Ok(Some(found));
                    }
                }
                Ok(None)
            },
        }
    }

    fn has_wm_state(&self, win: Window) -> WindowManagerResult<bool> {
        let found = self.get_optional_int(WM_STATE, Some(win))?.is_some();
        trace!("has_wm_state: id: {}, found: {}", win, found);
        Ok(found)
    }
}
