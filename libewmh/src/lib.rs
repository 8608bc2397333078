//! `libewmh` implements the [Extended Window Manager Hints (EWMH) specification](https://specifications.freedesktop.org/wm-spec/latest/)
//! as a way to integrate with EWMH compatible window managers. The EWHM spec builds on the lower
//! level Inter Client Communication Conventions Manual (ICCCM) to define interactions between
//! window managers, compositing managers and applications.
//!
//! [Root Window Properties](https://specifications.freedesktop.org/wm-spec/latest/ar01s03.html)
//! The EWMH spec defines a number of properties that EWHM compliant window managers will maintain
//! and return to clients requesting information. `libewmh` reads those properties, sends requests
//! to the window manager as client messages and polls for the requested state to show up.
//!
//! `wmdo` uses `libewmh` to chain window commands together in the style of `xdotool`; however
//! `libewmh` could be used for a variety of reasons.
mod error;
mod model;
mod poll;
mod property;
mod request;
mod screen;
mod server;
mod stack;
mod supported;
mod tree;
mod wm;
pub use error::*;
pub use model::*;
pub use poll::*;
pub use request::*;
pub use screen::*;
pub use server::{X11Server, XServer};
pub use stack::*;
pub use tree::WM_STATE;
pub use wm::*;
pub use x11rb::protocol::xproto::Window;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// All essential symbols in a simple consumable form
///
/// ### Examples
/// ```
/// use libewmh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::*;
}
