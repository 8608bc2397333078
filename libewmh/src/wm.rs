//! `WindowManager` uses the [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/)
//! as a way to integrate with EWMH compatible window managers. The EWHM spec builds on the lower
//! level Inter Client Communication Conventions Manual (ICCCM) to define interactions between
//! window managers, compositing managers and applications.
//!
//! [Root Window Properties](https://specifications.freedesktop.org/wm-spec/latest/ar01s03.html)
//! The EWMH spec defines a number of properties that EWHM compliant window managers will maintain
//! and return to clients requesting information. Changes are requested by sending client messages
//! to the root window which the window manager is free to honor, delay or ignore.
//!
//! Nothing is cached: the window manager and other clients can change any of this state at any
//! time, so every call goes back to the server.
use crate::{
    request::SOURCE_PAGER, Location, Request, SearchDirection, WindowManagerError, WindowManagerResult, X11Server,
    XServer,
};
use tracing::debug;
use x11rb::{protocol::xproto::Window, CURRENT_TIME};

pub const NET_ACTIVE_WINDOW: &str = "_NET_ACTIVE_WINDOW";
pub const NET_CURRENT_DESKTOP: &str = "_NET_CURRENT_DESKTOP";
pub const NET_NUMBER_OF_DESKTOPS: &str = "_NET_NUMBER_OF_DESKTOPS";
pub const NET_WM_DESKTOP: &str = "_NET_WM_DESKTOP";
pub const NET_WM_NAME: &str = "_NET_WM_NAME";
pub const NET_WM_PID: &str = "_NET_WM_PID";
pub const WM_NAME: &str = "WM_NAME";

/// Window Manager control implements the EWMH protocol on top of an `XServer` to provide a
/// simplified access layer to EWHM compatible window managers.
pub struct WindowManager {
    pub(crate) server: Box<dyn XServer>, // display server
}

impl WindowManager {
    /// Create the window manager control instance and connect to the X11 server
    ///
    /// ### Arguments
    /// * `display` - display name to connect to else `$DISPLAY` will be used
    pub fn connect(display: Option<&str>) -> WindowManagerResult<Self> {
        Ok(Self::new(X11Server::connect(display)?))
    }

    /// Create the window manager control instance on top of the given server
    pub fn new<S: XServer + 'static>(server: S) -> Self {
        Self { server: Box::new(server) }
    }

    /// Get the root window
    pub fn root(&self) -> Window {
        self.server.root()
    }

    /// Get the active window id
    pub fn active_win(&self) -> WindowManagerResult<Window> {
        // Defined as: _NET_ACTIVE_WINDOW, WINDOW/32
        self.assert_supported(NET_ACTIVE_WINDOW, "query the active window")?;
        self.get_required_int(NET_ACTIVE_WINDOW, None)
    }

    /// Activate the given window, switching to its desktop first when the window manager
    /// supports desktops.
    ///
    /// ### Arguments
    /// * `win` - id of the window to activate
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// wm.activate_win(12345).unwrap();
    /// ```
    pub fn activate_win(&self, win: Window) -> WindowManagerResult<()> {
        self.assert_supported(NET_ACTIVE_WINDOW, "activate the window")?;

        // If this window is on another desktop, let's go to that desktop first
        if self.supported(NET_WM_DESKTOP)? && self.supported(NET_CURRENT_DESKTOP)? {
            let desktop = self.win_desktop(win)?;
            self.set_current_desktop(desktop)?;
        }

        // Defined as: _NET_ACTIVE_WINDOW source indication, timestamp, requestor's active window
        self.send_request(Request::new(NET_ACTIVE_WINDOW, [SOURCE_PAGER, CURRENT_TIME]).window(win))?;
        debug!("activate_win: id: {}", win);
        Ok(())
    }

    /// Get the desktop currently in view
    pub fn current_desktop(&self) -> WindowManagerResult<u32> {
        // Defined as: _NET_CURRENT_DESKTOP desktop, CARDINAL/32
        self.assert_supported(NET_CURRENT_DESKTOP, "query for the current desktop")?;
        self.get_required_int(NET_CURRENT_DESKTOP, None)
    }

    /// Switch the view to the given desktop
    ///
    /// ### Arguments
    /// * `desktop` - index of the desktop to switch to
    pub fn set_current_desktop(&self, desktop: u32) -> WindowManagerResult<()> {
        // Defined as: _NET_CURRENT_DESKTOP new desktop, timestamp
        self.assert_supported(NET_CURRENT_DESKTOP, "change desktops")?;
        self.send_request(Request::new(NET_CURRENT_DESKTOP, [desktop, CURRENT_TIME]))?;
        debug!("set_current_desktop: desktop: {}", desktop);
        Ok(())
    }

    /// Get number of desktops
    pub fn desktops(&self) -> WindowManagerResult<u32> {
        // Defined as: _NET_NUMBER_OF_DESKTOPS, CARDINAL/32
        self.assert_supported(NET_NUMBER_OF_DESKTOPS, "query the number of desktops")?;
        self.get_required_int(NET_NUMBER_OF_DESKTOPS, None)
    }

    /// Ask the window manager to change the number of desktops
    ///
    /// ### Arguments
    /// * `desktops` - new number of desktops
    pub fn set_desktops(&self, desktops: u32) -> WindowManagerResult<()> {
        // Defined as: _NET_NUMBER_OF_DESKTOPS new number of desktops
        self.assert_supported(NET_NUMBER_OF_DESKTOPS, "change the number of desktops")?;
        self.send_request(Request::new(NET_NUMBER_OF_DESKTOPS, [desktops]))?;
        debug!("set_desktops: desktops: {}", desktops);
        Ok(())
    }

    /// Get the desktop the given window is on
    ///
    /// ### Arguments
    /// * `win` - id of the window to query
    pub fn win_desktop(&self, win: Window) -> WindowManagerResult<u32> {
        // Defined as: _NET_WM_DESKTOP desktop, CARDINAL/32
        self.assert_supported(NET_WM_DESKTOP, "query a window's desktop location")?;
        self.get_required_int(NET_WM_DESKTOP, Some(win))
    }

    /// Ask the window manager to move the given window to another desktop
    ///
    /// ### Arguments
    /// * `win` - id of the window to move
    /// * `desktop` - index of the desktop to move the window to
    pub fn set_win_desktop(&self, win: Window, desktop: u32) -> WindowManagerResult<()> {
        // Defined as: _NET_WM_DESKTOP new desktop, source indication
        // EWMH puts the desktop in data.l[0] and the source indication in data.l[1]
        self.assert_supported(NET_WM_DESKTOP, "change a window's desktop location")?;
        self.send_request(Request::new(NET_WM_DESKTOP, [desktop, SOURCE_PAGER]).window(win))?;
        debug!("set_win_desktop: id: {}, desktop: {}", win, desktop);
        Ok(())
    }

    /// Get the window holding the input focus, which may well be an inner widget window
    pub fn focused_win(&self) -> WindowManagerResult<Window> {
        let win = self.server.input_focus()?;
        debug!("focused_win: id: {}", win);
        Ok(win)
    }

    /// Get the client window owning the input focus
    pub fn focused_win_sane(&self) -> WindowManagerResult<Window> {
        let focus = self.focused_win()?;
        self.find_client(focus, SearchDirection::Children)?
            .ok_or_else(|| WindowManagerError::NoStateBearingWindow(focus).into())
    }

    /// Get window name preferring `_NET_WM_NAME` over `WM_NAME`
    ///
    /// ### Arguments
    /// * `win` - id of the window to query
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// let name = wm.win_name(12345).unwrap();
    /// ```
    pub fn win_name(&self, win: Window) -> WindowManagerResult<Option<String>> {
        // Defined as: _NET_WM_NAME, UTF8_STRING falling back on the ICCCM WM_NAME, STRING
        let name = match self.get_string(NET_WM_NAME, Some(win))? {
            Some(name) => Some(name),
            None => self.get_string(WM_NAME, Some(win))?,
        };
        debug!("win_name: id: {}, name: {:?}", win, name);
        Ok(name)
    }

    /// Get window pid
    ///
    /// ### Arguments
    /// * `win` - id of the window to query
    pub fn win_pid(&self, win: Window) -> WindowManagerResult<u32> {
        // Defined as: _NET_WM_PID, CARDINAL/32
        self.get_required_int(NET_WM_PID, Some(win))
    }

    /// Get window width and height
    ///
    /// ### Arguments
    /// * `win` - id of the window to query
    pub fn win_size(&self, win: Window) -> WindowManagerResult<(u32, u32)> {
        let g = self.server.geometry(win)?;
        Ok((g.width, g.height))
    }

    /// Get window location in root coordinates along with the screen it is on
    ///
    /// ### Arguments
    /// * `win` - id of the window to query
    pub fn win_location(&self, win: Window) -> WindowManagerResult<Location> {
        // The geometry location is relative to the parent which is only useful when the parent
        // is the root; reparented windows get translated into root coordinates.
        let g = self.server.geometry(win)?;
        let tree = self.server.query_tree(win)?;
        let (x, y) = if tree.parent == Some(tree.root) {
            (g.x, g.y)
        } else {
            self.server.translate_to_root(win, 0, 0)?
        };

        let screen = self.screen_containing(x, y, g.width, g.height)?;
        debug!("win_location: id: {}, x: {}, y: {}, screen: {:?}", win, x, y, screen);
        Ok(Location { x, y, screen })
    }

    /// Move the window to the given root coordinates
    ///
    /// ### Arguments
    /// * `win` - id of the window to move
    /// * `x` - x coordinate to move the window to
    /// * `y` - y coordinate to move the window to
    pub fn move_win(&self, win: Window, x: i32, y: i32) -> WindowManagerResult<()> {
        self.server.configure_position(win, x, y)?;
        debug!("move_win: id: {}, x: {}, y: {}", win, x, y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeServer, ROOT};
    use crate::{Geometry, ScreenInfo};

    const ALL: [&str; 4] = [NET_ACTIVE_WINDOW, NET_CURRENT_DESKTOP, NET_NUMBER_OF_DESKTOPS, NET_WM_DESKTOP];

    #[test]
    fn test_active_win() {
        let fake = FakeServer::new();
        fake.supports(&ALL);
        fake.set_prop(ROOT, NET_ACTIVE_WINDOW, vec![12345]);
        assert_eq!(fake.wm().active_win().unwrap(), 12345);
    }

    #[test]
    fn test_unsupported_aborts_before_reading() {
        let fake = FakeServer::new();
        fake.supports(&[NET_CURRENT_DESKTOP, NET_ACTIVE_WINDOW]);
        fake.add_window(7, ROOT, Geometry::default());
        fake.set_prop(7, NET_WM_DESKTOP, vec![1]);
        let wm = fake.wm();

        assert!(matches!(wm.win_desktop(7).unwrap_err().wm(), Some(WindowManagerError::UnsupportedFeature(..))));
        assert!(matches!(
            wm.set_win_desktop(7, 2).unwrap_err().wm(),
            Some(WindowManagerError::UnsupportedFeature(..))
        ));
        assert_eq!(fake.reads(7, NET_WM_DESKTOP), 0);
        assert!(fake.sent().is_empty());
    }

    #[test]
    fn test_desktops() {
        let fake = FakeServer::new();
        fake.supports(&ALL);
        fake.set_prop(ROOT, NET_NUMBER_OF_DESKTOPS, vec![4]);
        fake.set_prop(ROOT, NET_CURRENT_DESKTOP, vec![2]);
        let wm = fake.wm();
        assert_eq!(wm.desktops().unwrap(), 4);
        assert_eq!(wm.current_desktop().unwrap(), 2);

        wm.set_desktops(6).unwrap();
        wm.set_current_desktop(3).unwrap();
        let sent = fake.sent();
        assert_eq!(sent[0].2.type_, fake.atom(NET_NUMBER_OF_DESKTOPS));
        assert_eq!(sent[0].2.data.as_data32(), [6, 0, 0, 0, 0]);
        assert_eq!(sent[1].2.type_, fake.atom(NET_CURRENT_DESKTOP));
        assert_eq!(sent[1].2.data.as_data32(), [3, CURRENT_TIME, 0, 0, 0]);
    }

    #[test]
    fn test_set_win_desktop() {
        let fake = FakeServer::new();
        fake.supports(&ALL);
        fake.add_window(7, ROOT, Geometry::default());
        fake.wm().set_win_desktop(7, 5).unwrap();

        // Desktop first, then the source indication
        let sent = fake.sent();
        assert_eq!(sent[0].0, ROOT);
        assert_eq!(sent[0].2.window, 7);
        assert_eq!(sent[0].2.data.as_data32(), [5, SOURCE_PAGER, 0, 0, 0]);
    }

    #[test]
    fn test_activate_switches_desktop_first() {
        let fake = FakeServer::new();
        fake.supports(&ALL);
        fake.add_window(7, ROOT, Geometry::default());
        fake.set_prop(7, NET_WM_DESKTOP, vec![3]);
        fake.wm().activate_win(7).unwrap();

        let sent = fake.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].2.type_, fake.atom(NET_CURRENT_DESKTOP));
        assert_eq!(sent[0].2.data.as_data32(), [3, CURRENT_TIME, 0, 0, 0]);
        assert_eq!(sent[1].2.type_, fake.atom(NET_ACTIVE_WINDOW));
        assert_eq!(sent[1].2.window, 7);
        assert_eq!(sent[1].2.data.as_data32(), [SOURCE_PAGER, CURRENT_TIME, 0, 0, 0]);
    }

    #[test]
    fn test_activate_without_desktops() {
        let fake = FakeServer::new();
        fake.supports(&[NET_ACTIVE_WINDOW]);
        fake.add_window(7, ROOT, Geometry::default());
        fake.wm().activate_win(7).unwrap();

        let sent = fake.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].2.type_, fake.atom(NET_ACTIVE_WINDOW));
    }

    #[test]
    fn test_focused_win_sane() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry::default());
        fake.add_window(8, 7, Geometry::default());
        fake.set_prop(8, "WM_STATE", vec![1]);
        fake.set_focus(7);
        let wm = fake.wm();
        assert_eq!(wm.focused_win().unwrap(), 7);
        assert_eq!(wm.focused_win_sane().unwrap(), 8);

        fake.set_focus(8);
        assert_eq!(wm.focused_win_sane().unwrap(), 8);
    }

    #[test]
    fn test_focused_win_sane_not_found() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry::default());
        fake.set_focus(7);
        assert_eq!(fake.wm().focused_win_sane().unwrap_err().wm(), Some(&WindowManagerError::NoStateBearingWindow(7)));
    }

    #[test]
    fn test_win_name() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry::default());
        fake.add_window(8, ROOT, Geometry::default());
        fake.add_window(9, ROOT, Geometry::default());
        fake.set_text(7, NET_WM_NAME, "Firefox");
        fake.set_text(7, WM_NAME, "firefox");
        fake.set_text(8, WM_NAME, "xterm");
        fake.add_window(10, ROOT, Geometry::default());
        fake.set_latin1(10, WM_NAME, b"caf\xe9");
        let wm = fake.wm();
        assert_eq!(wm.win_name(7).unwrap().as_deref(), Some("Firefox"));
        assert_eq!(wm.win_name(8).unwrap().as_deref(), Some("xterm"));
        assert_eq!(wm.win_name(9).unwrap(), None);
        assert_eq!(wm.win_name(10).unwrap().as_deref(), Some("café"));
    }

    #[test]
    fn test_win_pid() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry::default());
        fake.set_prop(7, NET_WM_PID, vec![4242]);
        fake.add_window(8, ROOT, Geometry::default());
        let wm = fake.wm();
        assert_eq!(wm.win_pid(7).unwrap(), 4242);
        assert_eq!(
            wm.win_pid(8).unwrap_err().wm(),
            Some(&WindowManagerError::PropertyUnavailable(NET_WM_PID.into()))
        );
    }

    #[test]
    fn test_win_location() {
        let fake = FakeServer::new();
        fake.set_screens(vec![ScreenInfo::new(0, 0, 0, 1920, 1080), ScreenInfo::new(1, 1920, 0, 1920, 1080)]);

        // Top level window directly under the root
        fake.add_window(7, ROOT, Geometry { x: 2000, y: 100, width: 200, height: 200 });

        // Client reparented into a frame
        fake.add_window(8, ROOT, Geometry { x: 100, y: 50, width: 300, height: 300 });
        fake.add_window(9, 8, Geometry { x: 2, y: 20, width: 296, height: 278 });
        let wm = fake.wm();

        assert_eq!(wm.win_location(7).unwrap(), Location { x: 2000, y: 100, screen: Some(1) });
        assert_eq!(wm.win_size(7).unwrap(), (200, 200));
        assert_eq!(wm.win_location(9).unwrap(), Location { x: 102, y: 70, screen: Some(0) });
    }

    #[test]
    fn test_stale_window_fails() {
        let fake = FakeServer::new();
        let wm = fake.wm();
        assert_eq!(wm.win_size(404).unwrap_err().wm(), Some(&WindowManagerError::BadWindow(404)));
        assert!(wm.win_location(404).is_err());
        assert!(wm.move_win(404, 0, 0).is_err());
    }

    #[test]
    fn test_move_win() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry { x: 0, y: 0, width: 200, height: 200 });
        fake.wm().move_win(7, 300, -20).unwrap();
        assert_eq!(fake.moves(), vec![(7, 300, -20)]);
    }
}
