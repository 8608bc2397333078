//! In memory display server for unit tests. Enabled for downstream crates with the `testing`
//! feature.
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, VecDeque},
    rc::Rc,
};

use x11rb::protocol::xproto::{Atom, AtomEnum, ClientMessageEvent, EventMask, Window};

use crate::{
    Geometry, Property, ScreenInfo, Tree, WindowManager, WindowManagerError, WindowManagerResult, XServer,
};

pub const ROOT: Window = 1;

struct FakeWindow {
    parent: Option<Window>,
    children: Vec<Window>,
    geometry: Geometry,
}

pub struct FakeServer {
    atoms: RefCell<HashMap<String, Atom>>,
    props: RefCell<HashMap<(Window, Atom), Property>>,
    scripted: RefCell<HashMap<(Window, Atom), VecDeque<u32>>>,
    reads: RefCell<HashMap<(Window, Atom), usize>>,
    windows: RefCell<HashMap<Window, FakeWindow>>,
    focus: Cell<Window>,
    screens: RefCell<Vec<ScreenInfo>>,
    sent: RefCell<Vec<(Window, EventMask, ClientMessageEvent)>>,
    moves: RefCell<Vec<(Window, i32, i32)>>,
    geometry_reads: Cell<usize>,
    fail_send: Cell<bool>,
    frozen: Cell<bool>,
}

impl FakeServer {
    pub fn new() -> Rc<Self> {
        let mut windows = HashMap::new();
        windows.insert(
            ROOT,
            FakeWindow { parent: None, children: vec![], geometry: Geometry { x: 0, y: 0, width: 3840, height: 1080 } },
        );
        Rc::new(Self {
            atoms: RefCell::new(HashMap::new()),
            props: RefCell::new(HashMap::new()),
            scripted: RefCell::new(HashMap::new()),
            reads: RefCell::new(HashMap::new()),
            windows: RefCell::new(windows),
            focus: Cell::new(ROOT),
            screens: RefCell::new(vec![]),
            sent: RefCell::new(vec![]),
            moves: RefCell::new(vec![]),
            geometry_reads: Cell::new(0),
            fail_send: Cell::new(false),
            frozen: Cell::new(false),
        })
    }

    pub fn wm(self: &Rc<Self>) -> WindowManager {
        WindowManager::new(Rc::clone(self))
    }

    pub fn atom(&self, name: &str) -> Atom {
        let mut atoms = self.atoms.borrow_mut();
        // Leave room for the predefined atoms
        let next = 100 + atoms.len() as Atom;
        *atoms.entry(name.to_string()).or_insert(next)
    }

    pub fn supports(&self, features: &[&str]) {
        let atoms = features.iter().map(|x| self.atom(x)).collect();
        let supported = self.atom("_NET_SUPPORTED");
        self.props.borrow_mut().insert((ROOT, supported), Property::new32(AtomEnum::ATOM.into(), atoms));
    }

    pub fn set_prop(&self, win: Window, name: &str, value: Vec<u32>) {
        let atom = self.atom(name);
        self.props.borrow_mut().insert((win, atom), Property::new32(AtomEnum::CARDINAL.into(), value));
    }

    pub fn set_text(&self, win: Window, name: &str, text: &str) {
        let (atom, utf8) = (self.atom(name), self.atom("UTF8_STRING"));
        self.props.borrow_mut().insert((win, atom), Property::new8(utf8, text));
    }

    /// Set an ICCCM `STRING` property from raw ISO-8859-1 bytes
    pub fn set_latin1(&self, win: Window, name: &str, bytes: &[u8]) {
        let atom = self.atom(name);
        let value = bytes.iter().map(|x| u32::from(*x)).collect();
        self.props.borrow_mut().insert((win, atom), Property { type_: AtomEnum::STRING.into(), format: 8, value });
    }

    /// Successive reads of the property return these values before falling back to the set value
    pub fn script(&self, win: Window, name: &str, values: &[u32]) {
        let atom = self.atom(name);
        self.scripted.borrow_mut().insert((win, atom), values.iter().copied().collect());
    }

    pub fn reads(&self, win: Window, name: &str) -> usize {
        let atom = self.atom(name);
        self.reads.borrow().get(&(win, atom)).copied().unwrap_or(0)
    }

    pub fn add_window(&self, win: Window, parent: Window, geometry: Geometry) {
        let mut windows = self.windows.borrow_mut();
        windows.insert(win, FakeWindow { parent: Some(parent), children: vec![], geometry });
        if let Some(parent) = windows.get_mut(&parent) {
            parent.children.push(win);
        }
    }

    pub fn set_focus(&self, win: Window) {
        self.focus.set(win);
    }

    pub fn set_screens(&self, screens: Vec<ScreenInfo>) {
        *self.screens.borrow_mut() = screens;
    }

    pub fn sent(&self) -> Vec<(Window, EventMask, ClientMessageEvent)> {
        self.sent.borrow().clone()
    }

    pub fn moves(&self) -> Vec<(Window, i32, i32)> {
        self.moves.borrow().clone()
    }

    /// Number of geometry requests made against any window
    pub fn geometry_reads(&self) -> usize {
        self.geometry_reads.get()
    }

    pub fn fail_send(&self) {
        self.fail_send.set(true);
    }

    /// Configure requests are recorded but ignored like a window manager vetoing them
    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    fn known(&self, win: Window) -> WindowManagerResult<()> {
        if self.windows.borrow().contains_key(&win) {
            Ok(())
        } else {
            Err(WindowManagerError::BadWindow(win).into())
        }
    }
}

impl XServer for Rc<FakeServer> {
    fn root(&self) -> Window {
        ROOT
    }

    fn intern_atom(&self, name: &str) -> WindowManagerResult<Atom> {
        Ok(self.atom(name))
    }

    fn get_property(&self, win: Window, atom: Atom) -> WindowManagerResult<Option<Property>> {
        self.known(win)?;
        *self.reads.borrow_mut().entry((win, atom)).or_insert(0) += 1;
        if let Some(value) = self.scripted.borrow_mut().get_mut(&(win, atom)).and_then(|x| x.pop_front()) {
            return Ok(Some(Property::new32(AtomEnum::CARDINAL.into(), vec![value])));
        }
        Ok(self.props.borrow().get(&(win, atom)).cloned())
    }

    fn send_event(&self, destination: Window, mask: EventMask, msg: &ClientMessageEvent) -> WindowManagerResult<()> {
        self.known(destination)?;
        if self.fail_send.get() {
            return Err(WindowManagerError::BadWindow(destination).into());
        }
        self.sent.borrow_mut().push((destination, mask, msg.clone()));
        Ok(())
    }

    fn query_tree(&self, win: Window) -> WindowManagerResult<Tree> {
        self.known(win)?;
        let windows = self.windows.borrow();
        let fake = &windows[&win];
        Ok(Tree { root: ROOT, parent: fake.parent, children: fake.children.clone() })
    }

    fn input_focus(&self) -> WindowManagerResult<Window> {
        Ok(self.focus.get())
    }

    fn geometry(&self, win: Window) -> WindowManagerResult<Geometry> {
        self.known(win)?;
        self.geometry_reads.set(self.geometry_reads.get() + 1);
        Ok(self.windows.borrow()[&win].geometry)
    }

    fn translate_to_root(&self, win: Window, x: i32, y: i32) -> WindowManagerResult<(i32, i32)> {
        self.known(win)?;
        let windows = self.windows.borrow();
        let (mut x, mut y, mut cur) = (x, y, win);
        while cur != ROOT {
            let fake = &windows[&cur];
            x += fake.geometry.x;
            y += fake.geometry.y;
            cur = fake.parent.unwrap_or(ROOT);
        }
        Ok((x, y))
    }

    fn query_screens(&self) -> WindowManagerResult<Vec<ScreenInfo>> {
        Ok(self.screens.borrow().clone())
    }

    fn configure_position(&self, win: Window, x: i32, y: i32) -> WindowManagerResult<()> {
        self.known(win)?;
        self.moves.borrow_mut().push((win, x, y));
        if !self.frozen.get() {
            let mut windows = self.windows.borrow_mut();
            if let Some(fake) = windows.get_mut(&win) {
                fake.geometry.x = x;
                fake.geometry.y = y;
            }
        }
        Ok(())
    }
}
