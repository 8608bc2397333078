use std::fmt;

use x11rb::protocol::xproto::{Atom, AtomEnum, Window};

use crate::WindowManagerError;

/// Property holds the raw value of a window property as returned by the server. Regardless of
/// the wire format (8, 16 or 32 bit) every element is widened to a `u32`.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub type_: Atom,
    pub format: u8,
    pub value: Vec<u32>,
}

impl Property {
    /// Create a new 32 bit property of the given type
    pub fn new32(type_: Atom, value: Vec<u32>) -> Self {
        Self { type_, format: 32, value }
    }

    /// Create a new 8 bit property from the given text
    pub fn new8(type_: Atom, text: &str) -> Self {
        Self { type_, format: 8, value: text.bytes().map(u32::from).collect() }
    }

    /// First element of the value array if there is one
    pub fn first(&self) -> Option<u32> {
        self.value.first().copied()
    }

    /// True when the server returned the property without any elements
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Decode the value array as text. 8 bit ICCCM `STRING` values are ISO-8859-1, any other 8 bit
    /// type e.g. `UTF8_STRING` is treated as UTF-8 bytes and wider values as individual code
    /// points. Trailing NUL terminators are dropped.
    pub fn text(&self) -> String {
        let text = if self.format == 8 && self.type_ == Atom::from(AtomEnum::STRING) {
            self.value.iter().map(|x| char::from(*x as u8)).collect()
        } else if self.format == 8 {
            let bytes = self.value.iter().map(|x| *x as u8).collect::<Vec<_>>();
            String::from_utf8_lossy(&bytes).into_owned()
        } else {
            self.value.iter().filter_map(|x| char::from_u32(*x)).collect()
        };
        text.trim_end_matches('\0').to_owned()
    }
}

/// Geometry of a window relative to its parent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Tree holds a window's position in the window hierarchy. The root window has no parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    pub root: Window,
    pub parent: Option<Window>,
    pub children: Vec<Window>,
}

/// Location of a window in root coordinates along with the screen that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub x: i32,
    pub y: i32,
    pub screen: Option<usize>,
}

/// SearchDirection selects which way the window tree is walked when looking for a window that
/// carries window manager state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Parents,
    Children,
}

// Implement format! support
impl fmt::Display for SearchDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

/// Coord is a single axis of a user supplied window move target
///
/// * the literal axis name (`x` or `y`) keeps the window's current value
/// * `N%` is a percentage of the screen the window is on
/// * anything else must be a signed pixel value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    Keep,
    Percent(f64),
    Absolute(i32),
}

impl Coord {
    /// Parse the given value for the named axis
    ///
    /// ### Arguments
    /// * `val` - value to parse
    /// * `axis` - axis name that means keep the current value
    ///
    /// ### Examples
    /// ```
    /// use libewmh::prelude::*;
    /// assert_eq!(Coord::parse("y", "y").unwrap(), Coord::Keep);
    /// assert_eq!(Coord::parse("25%", "x").unwrap(), Coord::Percent(25.0));
    /// assert_eq!(Coord::parse("-40", "x").unwrap(), Coord::Absolute(-40));
    /// ```
    pub fn parse(val: &str, axis: &str) -> Result<Coord, WindowManagerError> {
        if val == axis {
            return Ok(Coord::Keep);
        }
        if let Some(percent) = val.strip_suffix('%') {
            return percent
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Coord::Percent)
                .ok_or_else(|| WindowManagerError::InvalidCoord(val.to_string()));
        }
        val.parse::<i32>().map(Coord::Absolute).map_err(|_| WindowManagerError::InvalidCoord(val.to_string()))
    }

    /// Resolve the coordinate into an absolute root coordinate
    ///
    /// ### Arguments
    /// * `orig` - current window coordinate on this axis
    /// * `size` - current window size on this axis
    /// * `screen_origin` - origin of the window's screen on this axis
    /// * `screen_size` - size of the window's screen on this axis
    /// * `relative` - treat the value as an offset from `orig`
    pub fn resolve(&self, orig: i32, size: u32, screen_origin: i32, screen_size: u32, relative: bool) -> i32 {
        let target = match *self {
            Coord::Keep => return orig,
            Coord::Percent(p) if relative => (screen_size as f64 * p / 100.0) as i32,
            Coord::Percent(p) => screen_origin.saturating_add(((screen_size as f64 - size as f64) * p / 100.0) as i32),
            Coord::Absolute(v) => v,
        };
        if relative {
            orig.saturating_add(target)
        } else {
            target
        }
    }
}

// Implement format! support
impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Coord::Keep => write!(f, "keep"),
            Coord::Percent(p) => write!(f, "{}%", p),
            Coord::Absolute(v) => write!(f, "{}", v),
        }
    }
}
