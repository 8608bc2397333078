use std::error::Error as StdError;
use std::fmt;

/// `WindowManagerResult<T>` provides a simplified result type with a common error type
pub type WindowManagerResult<T> = std::result::Result<T, ErrorWrapper>;

/// WindowManagerError defines all the internal errors that `libewmh` might return
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum WindowManagerError {
    BadWindow(u32),
    DeliveryFailed(String, String),
    InvalidCoord(String),
    InvalidScreen(usize),
    MissingWindowTarget,
    NoScreenForWindow(u32),
    NoStateBearingWindow(u32),
    PollTimeout(u32, u32),
    PropertyEmpty(String),
    PropertyUnavailable(String),
    UnsupportedFeature(String, String),
}
impl std::error::Error for WindowManagerError {}
impl fmt::Display for WindowManagerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WindowManagerError::BadWindow(ref win) => write!(f, "window {} does not exist", win),
            WindowManagerError::DeliveryFailed(ref atom, ref err) => {
                write!(f, "failed to send {} request: {}", atom, err)
            },
            WindowManagerError::InvalidCoord(ref val) => write!(f, "invalid coordinate was given: {}", val),
            WindowManagerError::InvalidScreen(ref screen) => write!(f, "invalid screen {}", screen),
            WindowManagerError::MissingWindowTarget => write!(f, "must specify window"),
            WindowManagerError::NoScreenForWindow(ref win) => write!(f, "window {} is not on any screen", win),
            WindowManagerError::NoStateBearingWindow(ref win) => {
                write!(f, "cannot determine a sane window starting from {}", win)
            },
            WindowManagerError::PollTimeout(ref win, ref tries) => {
                write!(f, "window {} did not reach the requested state after {} polls", win, tries)
            },
            WindowManagerError::PropertyEmpty(ref atom) => write!(f, "property {} is empty", atom),
            WindowManagerError::PropertyUnavailable(ref atom) => write!(f, "property {} is unavailable", atom),
            WindowManagerError::UnsupportedFeature(ref feature, ref intent) => write!(
                f,
                "your window manager claims not to support {}, so the attempt to {} was aborted",
                feature, intent
            ),
        }
    }
}

/// ErrorWrapper provides wrapper around all the underlying library dependencys that `libewmh` uses
/// such that we can easily surface all errors from `libewmh` in a single easy way.
#[derive(Debug)]
pub enum ErrorWrapper {
    WindowManager(WindowManagerError),

    // x11rb errors
    Connect(x11rb::errors::ConnectError),
    Connection(x11rb::errors::ConnectionError),
    Reply(x11rb::errors::ReplyError),
}
impl ErrorWrapper {
    /// Implemented directly on the `Error` type to reduce casting required
    pub fn is<T: StdError + 'static>(&self) -> bool {
        self.as_ref().is::<T>()
    }

    /// Implemented directly on the `Error` type to reduce casting required
    pub fn downcast_ref<T: StdError + 'static>(&self) -> Option<&T> {
        self.as_ref().downcast_ref::<T>()
    }

    /// Get the `libewmh` error if this wraps one
    pub fn wm(&self) -> Option<&WindowManagerError> {
        match *self {
            ErrorWrapper::WindowManager(ref err) => Some(err),
            _ => None,
        }
    }
}
impl StdError for ErrorWrapper {}

impl fmt::Display for ErrorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ErrorWrapper::WindowManager(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connect(ref err) => write!(f, "{}", err),
            ErrorWrapper::Connection(ref err) => write!(f, "{}", err),
            ErrorWrapper::Reply(ref err) => write!(f, "{}", err),
        }
    }
}

impl AsRef<dyn StdError> for ErrorWrapper {
    fn as_ref(&self) -> &(dyn StdError + 'static) {
        match *self {
            ErrorWrapper::WindowManager(ref err) => err,
            ErrorWrapper::Connect(ref err) => err,
            ErrorWrapper::Connection(ref err) => err,
            ErrorWrapper::Reply(ref err) => err,
        }
    }
}

impl From<WindowManagerError> for ErrorWrapper {
    fn from(err: WindowManagerError) -> ErrorWrapper {
        ErrorWrapper::WindowManager(err)
    }
}

// x11rb errors
//--------------------------------------------------------------------------------------------------
impl From<x11rb::errors::ConnectError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectError) -> ErrorWrapper {
        ErrorWrapper::Connect(err)
    }
}

impl From<x11rb::errors::ConnectionError> for ErrorWrapper {
    fn from(err: x11rb::errors::ConnectionError) -> ErrorWrapper {
        ErrorWrapper::Connection(err)
    }
}

impl From<x11rb::errors::ReplyError> for ErrorWrapper {
    fn from(err: x11rb::errors::ReplyError) -> ErrorWrapper {
        ErrorWrapper::Reply(err)
    }
}
