//! `XServer` is the seam between `libewmh` and the display server. Everything the library knows
//! about windows, properties and screens is fetched through it fresh on every call; nothing is
//! cached on this side of the connection.
//!
//! [`X11Server`] implements it on top of an `x11rb` connection.
use crate::{Geometry, Property, ScreenInfo, Tree, WindowManagerError, WindowManagerResult};
use tracing::{debug, trace};

use x11rb::{
    connection::Connection,
    errors::{ConnectionError, ReplyError},
    protocol::{
        xinerama::ConnectionExt as _,
        xproto::{Atom, AtomEnum, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, EventMask, Window},
        ErrorKind,
    },
    rust_connection::RustConnection,
};

/// Blocking request/reply access to the display server
pub trait XServer {
    /// Root window of the default screen
    fn root(&self) -> Window;

    /// Resolve the given name to an atom, creating it if it doesn't exist yet
    fn intern_atom(&self, name: &str) -> WindowManagerResult<Atom>;

    /// Fetch the full value of the given property of any type. `None` means the window doesn't
    /// have the property set.
    fn get_property(&self, win: Window, atom: Atom) -> WindowManagerResult<Option<Property>>;

    /// Send the message to the destination window with the given event mask and flush
    fn send_event(&self, destination: Window, mask: EventMask, msg: &ClientMessageEvent) -> WindowManagerResult<()>;

    /// Get the parent and children of the given window
    fn query_tree(&self, win: Window) -> WindowManagerResult<Tree>;

    /// Get the window that currently holds the input focus
    fn input_focus(&self) -> WindowManagerResult<Window>;

    /// Get the geometry of the window relative to its parent
    fn geometry(&self, win: Window) -> WindowManagerResult<Geometry>;

    /// Translate the given window relative coordinates to root coordinates
    fn translate_to_root(&self, win: Window, x: i32, y: i32) -> WindowManagerResult<(i32, i32)>;

    /// List the physical screens in the order the server reports them
    fn query_screens(&self) -> WindowManagerResult<Vec<ScreenInfo>>;

    /// Ask the server to move the window to the given location
    fn configure_position(&self, win: Window, x: i32, y: i32) -> WindowManagerResult<()>;
}

/// X11 implementation of the `XServer` seam
pub struct X11Server {
    conn: RustConnection, // x11 connection
    screen: usize,        // screen number
    root: Window,         // root window id
}

impl X11Server {
    /// Connect to the X11 server
    ///
    /// ### Arguments
    /// * `display` - display name to connect to else `$DISPLAY` will be used
    pub fn connect(display: Option<&str>) -> WindowManagerResult<Self> {
        let (conn, screen) = x11rb::connect(display)?;
        let root = conn.setup().roots[screen].root;
        let name = display;
        debug!("connect: display: {:?}, screen: {}, root: {}", name, screen, root);
        Ok(Self { conn, screen, root })
    }

    /// Get the default screen number
    pub fn screen(&self) -> usize {
        self.screen
    }
}

// Surface protocol errors about a missing window as `BadWindow` so callers can tell a stale
// window id apart from a broken connection.
fn on_window<T>(win: Window, res: Result<T, ReplyError>) -> WindowManagerResult<T> {
    match res {
        Err(ReplyError::X11Error(err)) if matches!(err.error_kind, ErrorKind::Window | ErrorKind::Drawable) => {
            debug!("x11 error: win: {}, kind: {:?}", win, err.error_kind);
            Err(WindowManagerError::BadWindow(win).into())
        },
        res => Ok(res?),
    }
}

impl XServer for X11Server {
    fn root(&self) -> Window {
        self.root
    }

    fn intern_atom(&self, name: &str) -> WindowManagerResult<Atom> {
        let atom = self.conn.intern_atom(false, name.as_bytes())?.reply()?.atom;
        trace!("intern_atom: {} => {}", name, atom);
        Ok(atom)
    }

    fn get_property(&self, win: Window, atom: Atom) -> WindowManagerResult<Option<Property>> {
        let reply = on_window(win, self.conn.get_property(false, win, atom, AtomEnum::ANY, 0, u32::MAX)?.reply())?;
        if reply.type_ == x11rb::NONE {
            return Ok(None);
        }

        // Widen everything to 32 bit so callers don't care about the wire format
        let value: Vec<u32> = match reply.format {
            8 => reply.value8().map(|x| x.map(u32::from).collect()),
            16 => reply.value16().map(|x| x.map(u32::from).collect()),
            _ => reply.value32().map(|x| x.collect()),
        }
        .unwrap_or_default();
        Ok(Some(Property { type_: reply.type_, format: reply.format, value }))
    }

    fn send_event(&self, destination: Window, mask: EventMask, msg: &ClientMessageEvent) -> WindowManagerResult<()> {
        self.conn.send_event(false, destination, mask, msg)?.check()?;
        self.conn.flush()?;
        Ok(())
    }

    fn query_tree(&self, win: Window) -> WindowManagerResult<Tree> {
        let reply = on_window(win, self.conn.query_tree(win)?.reply())?;
        let parent = if reply.parent == x11rb::NONE { None } else { Some(reply.parent) };
        Ok(Tree { root: reply.root, parent, children: reply.children })
    }

    fn input_focus(&self) -> WindowManagerResult<Window> {
        Ok(self.conn.get_input_focus()?.reply()?.focus)
    }

    fn geometry(&self, win: Window) -> WindowManagerResult<Geometry> {
        let g = on_window(win, self.conn.get_geometry(win)?.reply())?;
        Ok(Geometry { x: g.x as i32, y: g.y as i32, width: g.width as u32, height: g.height as u32 })
    }

    fn translate_to_root(&self, win: Window, x: i32, y: i32) -> WindowManagerResult<(i32, i32)> {
        let t = on_window(win, self.conn.translate_coordinates(win, self.root, x as i16, y as i16)?.reply())?;
        Ok((t.dst_x as i32, t.dst_y as i32))
    }

    fn query_screens(&self) -> WindowManagerResult<Vec<ScreenInfo>> {
        let infos = match self.conn.xinerama_query_screens() {
            Ok(cookie) => cookie.reply()?.screen_info,
            Err(ConnectionError::UnsupportedExtension) => vec![],
            Err(err) => return Err(err.into()),
        };

        // Without xinerama the whole root window is the only screen
        if infos.is_empty() {
            let screen = &self.conn.setup().roots[self.screen];
            debug!("query_screens: xinerama inactive, using root screen size");
            return Ok(vec![ScreenInfo::new(
                0,
                0,
                0,
                screen.width_in_pixels as u32,
                screen.height_in_pixels as u32,
            )]);
        }
        Ok(infos
            .iter()
            .enumerate()
            .map(|(i, s)| ScreenInfo::new(i, s.x_org as i32, s.y_org as i32, s.width as u32, s.height as u32))
            .collect())
    }

    fn configure_position(&self, win: Window, x: i32, y: i32) -> WindowManagerResult<()> {
        let aux = ConfigureWindowAux::new().x(x).y(y);
        on_window(win, self.conn.configure_window(win, &aux)?.check())?;
        self.conn.flush()?;
        Ok(())
    }
}
