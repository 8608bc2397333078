//! EWMH state changes are requested, not written. A client sends a `ClientMessage` to the root
//! window and the window manager decides whether to act on it, so sending a request never
//! confirms the change happened.
use crate::{WindowManager, WindowManagerError, WindowManagerResult};
use tracing::debug;
use x11rb::protocol::xproto::{Atom, ClientMessageData, ClientMessageEvent, EventMask, Window};

/// Source indication telling the window manager the request comes from a pager or task bar
pub const SOURCE_PAGER: u32 = 2;

/// Payload of a request message
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Up to five 32 bit values, zero padded. Values past the fifth are dropped.
    Data32(Vec<u32>),

    /// Up to twenty bytes of UTF-8 text, zero padded. A single client message can't carry more,
    /// so bytes past the twentieth are dropped even if that splits a character; longer text has
    /// to be sent as a sequence of messages.
    Text(String),
}

impl From<Vec<u32>> for Payload {
    fn from(val: Vec<u32>) -> Self {
        Payload::Data32(val)
    }
}

impl From<&[u32]> for Payload {
    fn from(val: &[u32]) -> Self {
        Payload::Data32(val.to_vec())
    }
}

impl<const N: usize> From<[u32; N]> for Payload {
    fn from(val: [u32; N]) -> Self {
        Payload::Data32(val.to_vec())
    }
}

impl From<&str> for Payload {
    fn from(val: &str) -> Self {
        Payload::Text(val.to_string())
    }
}

impl Payload {
    // Wire format and data for the client message
    fn data(&self) -> (u8, ClientMessageData) {
        match self {
            Payload::Data32(values) => {
                let mut data = [0u32; 5];
                for (slot, val) in data.iter_mut().zip(values) {
                    *slot = *val;
                }
                (32, data.into())
            },
            Payload::Text(text) => {
                let mut data = [0u8; 20];
                for (slot, val) in data.iter_mut().zip(text.bytes()) {
                    *slot = val;
                }
                (8, data.into())
            },
        }
    }
}

/// Request provides an ergonomic way to build a window manager request
///
/// ### Examples
/// ```
/// use libewmh::prelude::*;
/// let req = Request::new("_NET_ACTIVE_WINDOW", [SOURCE_PAGER, 0]).window(12345);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    name: String,
    payload: Payload,
    window: Option<Window>,
    target: Option<Window>,
    mask: Option<EventMask>,
}

impl Request {
    /// Create a new request for the named message type
    ///
    /// ### Arguments
    /// * `name` - name of the message type atom e.g. `_NET_CURRENT_DESKTOP`
    /// * `payload` - data to send with the message, at most five values or twenty bytes of text
    pub fn new<T: Into<Payload>>(name: &str, payload: T) -> Self {
        Self { name: name.to_string(), payload: payload.into(), window: None, target: None, mask: None }
    }

    /// Set the window the request is about, defaults to the root window
    pub fn window(mut self, win: Window) -> Self {
        self.window = Some(win);
        self
    }

    /// Set the window the message is delivered to, defaults to the root window
    pub fn target(mut self, win: Window) -> Self {
        self.target = Some(win);
        self
    }

    /// Set the delivery event mask, defaults to substructure redirect and notify
    pub fn mask(mut self, mask: EventMask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Name of the message type atom
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the client message
    ///
    /// ### Arguments
    /// * `atom` - resolved message type atom
    /// * `root` - root window used for any unset window
    pub fn event(&self, atom: Atom, root: Window) -> ClientMessageEvent {
        let (format, data) = self.payload.data();
        ClientMessageEvent::new(format, self.window.unwrap_or(root), atom, data)
    }
}

impl WindowManager {
    /// Send the request to the window manager. This is fire and forget, use the poll functions to
    /// wait for the window manager to act on it.
    ///
    /// ### Arguments
    /// * `req` - request to send
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// wm.send_request(Request::new("_NET_CURRENT_DESKTOP", [1, 0])).unwrap();
    /// ```
    pub fn send_request(&self, req: Request) -> WindowManagerResult<()> {
        let root = self.root();
        let atom = self.server.intern_atom(req.name())?;
        let msg = req.event(atom, root);
        let target = req.target.unwrap_or(root);
        let mask = req.mask.unwrap_or(EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY);

        self.server.send_event(target, mask, &msg).map_err(|err| {
            debug!("send_request: failed: name: {}, err: {}", req.name(), err);
            WindowManagerError::DeliveryFailed(req.name().to_string(), err.to_string())
        })?;
        debug!("send_request: name: {}, win: {}, target: {}, payload: {:?}", req.name(), msg.window, target, req.payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeServer, ROOT};
    use crate::Geometry;

    #[test]
    fn test_payload_is_padded() {
        let msg = Request::new("_NET_ACTIVE_WINDOW", [SOURCE_PAGER, 0]).window(42).event(300, ROOT);
        assert_eq!(msg.format, 32);
        assert_eq!(msg.window, 42);
        assert_eq!(msg.type_, 300);
        assert_eq!(msg.data.as_data32(), [2, 0, 0, 0, 0]);
    }

    #[test]
    fn test_payload_is_truncated() {
        let msg = Request::new("_NET_WM_DESKTOP", vec![1, 2, 3, 4, 5, 6]).event(300, ROOT);
        assert_eq!(msg.window, ROOT);
        assert_eq!(msg.data.as_data32(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_text_payload() {
        let msg = Request::new("_NET_STARTUP_INFO", "remove: ID=1").event(300, ROOT);
        assert_eq!(msg.format, 8);
        let data = msg.data.as_data8();
        assert_eq!(&data[..12], b"remove: ID=1");
        assert!(data[12..].iter().all(|x| *x == 0));
    }

    #[test]
    fn test_text_payload_is_truncated() {
        let msg = Request::new("_NET_STARTUP_INFO", "remove: ID=1234567890abcdef").event(300, ROOT);
        assert_eq!(msg.data.as_data8(), *b"remove: ID=123456789");
    }

    #[test]
    fn test_send_request_defaults() {
        let fake = FakeServer::new();
        let wm = fake.wm();
        wm.send_request(Request::new("_NET_NUMBER_OF_DESKTOPS", [4u32])).unwrap();

        let sent = fake.sent();
        assert_eq!(sent.len(), 1);
        let (target, mask, msg) = &sent[0];
        assert_eq!(*target, ROOT);
        assert_eq!(*mask, EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY);
        assert_eq!(msg.window, ROOT);
        assert_eq!(msg.type_, fake.atom("_NET_NUMBER_OF_DESKTOPS"));
        assert_eq!(msg.data.as_data32(), [4, 0, 0, 0, 0]);
    }

    #[test]
    fn test_send_request_overrides() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry::default());
        let wm = fake.wm();
        wm.send_request(Request::new("WM_CHANGE_STATE", [3u32]).window(7).target(7).mask(EventMask::NO_EVENT)).unwrap();

        let sent = fake.sent();
        let (target, mask, msg) = &sent[0];
        assert_eq!(*target, 7);
        assert_eq!(*mask, EventMask::NO_EVENT);
        assert_eq!(msg.window, 7);
    }

    #[test]
    fn test_send_request_failure() {
        let fake = FakeServer::new();
        fake.fail_send();
        let wm = fake.wm();
        let err = wm.send_request(Request::new("_NET_CURRENT_DESKTOP", [1u32, 0])).unwrap_err();
        assert!(matches!(err.wm(), Some(WindowManagerError::DeliveryFailed(name, _)) if name == "_NET_CURRENT_DESKTOP"));
        assert!(fake.sent().is_empty());
    }
}
