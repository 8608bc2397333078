//! Multi-monitor screen topology as reported by the Xinerama extension. Screen indices are
//! positional; they are only stable for as long as the server's layout doesn't change, so every
//! lookup here queries the server again.
use crate::{WindowManager, WindowManagerError, WindowManagerResult};
use tracing::debug;

/// ScreenInfo describes a single physical screen in root coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenInfo {
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenInfo {
    /// Create a new screen info
    pub fn new(index: usize, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { index, x, y, width, height }
    }

    /// Check if the point lies within the screen using half open bounds
    pub fn contains(&self, x: i32, y: i32) -> bool {
        let (x, y) = (x as i64, y as i64);
        self.x as i64 <= x
            && x < self.x as i64 + self.width as i64
            && self.y as i64 <= y
            && y < self.y as i64 + self.height as i64
    }

    /// Map a window from this screen onto the target screen keeping the window's centre at the
    /// same relative position.
    ///
    /// ### Arguments
    /// * `target` - screen to move the window to
    /// * `x`, `y` - current window location in root coordinates
    /// * `w`, `h` - current window size
    ///
    /// ### Examples
    /// ```
    /// use libewmh::prelude::*;
    /// let left = ScreenInfo::new(0, 0, 0, 1920, 1080);
    /// let right = ScreenInfo::new(1, 1920, 0, 1920, 1080);
    /// assert_eq!(left.translate(&right, 100, 100, 200, 200), (2020, 100));
    /// ```
    pub fn translate(&self, target: &ScreenInfo, x: i32, y: i32, w: u32, h: u32) -> (i32, i32) {
        let (w, h) = (w as f64, h as f64);
        let tx = target.x as f64 + target.width as f64 * (x as f64 + w / 2.0 - self.x as f64) / self.width as f64
            - w / 2.0;
        let ty = target.y as f64 + target.height as f64 * (y as f64 + h / 2.0 - self.y as f64) / self.height as f64
            - h / 2.0;
        (tx as i32, ty as i32)
    }
}

/// Find the screen owning the given window bounds. The window's origin decides first; only when
/// no screen contains the origin is the window's far corner tried.
///
/// ### Arguments
/// * `screens` - screens to search
/// * `x`, `y` - window location in root coordinates
/// * `w`, `h` - window size
pub fn find_screen(screens: &[ScreenInfo], x: i32, y: i32, w: u32, h: u32) -> Option<usize> {
    if let Some(screen) = screens.iter().find(|s| s.contains(x, y)) {
        return Some(screen.index);
    }

    let (fx, fy) = (x.saturating_add(w as i32), y.saturating_add(h as i32));
    screens.iter().find(|s| s.contains(fx, fy)).map(|s| s.index)
}

impl WindowManager {
    /// List the physical screens
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// for screen in wm.screens().unwrap() {
    ///     println!("{}: {}x{}", screen.index, screen.width, screen.height);
    /// }
    /// ```
    pub fn screens(&self) -> WindowManagerResult<Vec<ScreenInfo>> {
        let screens = self.server.query_screens()?;
        debug!("screens: {:?}", screens);
        Ok(screens)
    }

    /// Get the screen at the given index
    pub fn screen_at(&self, index: usize) -> WindowManagerResult<ScreenInfo> {
        self.screens()?.get(index).copied().ok_or_else(|| WindowManagerError::InvalidScreen(index).into())
    }

    /// Get the index of the screen owning the given window bounds
    pub fn screen_containing(&self, x: i32, y: i32, w: u32, h: u32) -> WindowManagerResult<Option<usize>> {
        let screen = find_screen(&self.screens()?, x, y, w, h);
        debug!("screen_containing: x: {}, y: {}, w: {}, h: {}, screen: {:?}", x, y, w, h, screen);
        Ok(screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeServer;

    fn dual() -> Vec<ScreenInfo> {
        vec![ScreenInfo::new(0, 0, 0, 1920, 1080), ScreenInfo::new(1, 1920, 0, 1920, 1080)]
    }

    #[test]
    fn test_contains_is_half_open() {
        let screen = ScreenInfo::new(0, 0, 0, 1920, 1080);
        assert!(screen.contains(0, 0));
        assert!(screen.contains(1919, 1079));
        assert!(!screen.contains(1920, 0));
        assert!(!screen.contains(0, 1080));
        assert!(!screen.contains(-1, 0));
    }

    #[test]
    fn test_find_screen_by_origin() {
        assert_eq!(find_screen(&dual(), 2000, 100, 200, 200), Some(1));
        assert_eq!(find_screen(&dual(), 1800, 100, 400, 200), Some(0));
    }

    #[test]
    fn test_find_screen_inside_every_screen() {
        let screens = dual();
        for screen in &screens {
            let (x, y) = (screen.x + 10, screen.y + 10);
            assert_eq!(find_screen(&screens, x, y, screen.width - 20, screen.height - 20), Some(screen.index));
        }
    }

    #[test]
    fn test_find_screen_falls_back_to_far_corner() {
        // Origin is above and left of everything but the window reaches into screen 0
        assert_eq!(find_screen(&dual(), -100, -100, 200, 200), Some(0));

        // Origin is off the left edge of screen 1's row but the far corner lands on screen 1
        let screens = vec![ScreenInfo::new(0, 1920, 0, 1920, 1080)];
        assert_eq!(find_screen(&screens, 1800, 100, 200, 200), Some(0));
    }

    #[test]
    fn test_find_screen_origin_wins_over_corner() {
        // The far corner lies in screen 1 but the origin decides
        assert_eq!(find_screen(&dual(), 1900, 100, 200, 200), Some(0));
    }

    #[test]
    fn test_find_screen_none() {
        assert_eq!(find_screen(&dual(), 5000, 5000, 10, 10), None);
        assert_eq!(find_screen(&[], 0, 0, 10, 10), None);
    }

    #[test]
    fn test_translate() {
        let screens = dual();
        assert_eq!(screens[0].translate(&screens[1], 100, 100, 200, 200), (2020, 100));
        assert_eq!(screens[1].translate(&screens[0], 2020, 100, 200, 200), (100, 100));

        // Scale into a smaller screen
        let small = ScreenInfo::new(2, 0, 1080, 960, 540);
        assert_eq!(screens[0].translate(&small, 860, 440, 200, 200), (380, 1250));
    }

    #[test]
    fn test_screen_at() {
        let fake = FakeServer::new();
        fake.set_screens(dual());
        let wm = fake.wm();
        assert_eq!(wm.screen_at(1).unwrap(), ScreenInfo::new(1, 1920, 0, 1920, 1080));
        assert_eq!(wm.screen_at(2).unwrap_err().wm(), Some(&WindowManagerError::InvalidScreen(2)));
        assert_eq!(wm.screen_containing(2000, 100, 200, 200).unwrap(), Some(1));
    }

    #[test]
    fn test_screens_are_well_formed() {
        let screens = dual();
        for (i, a) in screens.iter().enumerate() {
            assert_eq!(a.index, i);
            for b in screens.iter().skip(i + 1) {
                let overlap = a.x < b.x + b.width as i32
                    && b.x < a.x + a.width as i32
                    && a.y < b.y + b.height as i32
                    && b.y < a.y + a.height as i32;
                assert!(!overlap);
            }
        }
    }
}
