//! Typed property reads against a window or the root window. Atom names are resolved on every
//! call; the server already caches interned atoms.
use crate::{ErrorWrapper, Property, WindowManager, WindowManagerError, WindowManagerResult};
use tracing::trace;
use x11rb::protocol::xproto::Window;

impl WindowManager {
    // Fetch the property turning a missing window into an unavailable property
    fn fetch_property(&self, name: &str, win: Option<Window>) -> WindowManagerResult<Option<Property>> {
        let win = win.unwrap_or(self.root());
        let atom = self.server.intern_atom(name)?;
        match self.server.get_property(win, atom) {
            Ok(prop) => {
                trace!("get_property: win: {}, name: {}, value: {:?}", win, name, prop.as_ref().map(|x| &x.value));
                Ok(prop)
            },
            Err(ErrorWrapper::WindowManager(WindowManagerError::BadWindow(_))) => {
                Err(WindowManagerError::PropertyUnavailable(name.to_string()).into())
            },
            Err(err) => Err(err),
        }
    }

    /// Get the raw value of the named property
    ///
    /// ### Arguments
    /// * `name` - name of the property e.g. `_NET_ACTIVE_WINDOW`
    /// * `win` - id of the window to read from else the root window will be used
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// let supported = wm.get_property("_NET_SUPPORTED", None).unwrap();
    /// ```
    pub fn get_property(&self, name: &str, win: Option<Window>) -> WindowManagerResult<Property> {
        self.fetch_property(name, win)?.ok_or_else(|| WindowManagerError::PropertyUnavailable(name.to_string()).into())
    }

    /// Get the first element of the named property failing if it is missing or empty
    ///
    /// ### Arguments
    /// * `name` - name of the property e.g. `_NET_ACTIVE_WINDOW`
    /// * `win` - id of the window to read from else the root window will be used
    pub fn get_required_int(&self, name: &str, win: Option<Window>) -> WindowManagerResult<u32> {
        self.get_property(name, win)?.first().ok_or_else(|| WindowManagerError::PropertyEmpty(name.to_string()).into())
    }

    /// Get the first element of the named property if the window has it set
    ///
    /// ### Arguments
    /// * `name` - name of the property e.g. `WM_STATE`
    /// * `win` - id of the window to read from else the root window will be used
    pub fn get_optional_int(&self, name: &str, win: Option<Window>) -> WindowManagerResult<Option<u32>> {
        Ok(self.fetch_property(name, win)?.and_then(|x| x.first()))
    }

    /// Get the named property as text if the window has it set
    ///
    /// ### Arguments
    /// * `name` - name of the property e.g. `_NET_WM_NAME`
    /// * `win` - id of the window to read from else the root window will be used
    pub fn get_string(&self, name: &str, win: Option<Window>) -> WindowManagerResult<Option<String>> {
        Ok(self.fetch_property(name, win)?.filter(|x| !x.is_empty()).map(|x| x.text()))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{FakeServer, ROOT};
    use crate::{Geometry, WindowManagerError};

    #[test]
    fn test_required_int() {
        let fake = FakeServer::new();
        fake.set_prop(ROOT, "_NET_ACTIVE_WINDOW", vec![12345]);
        let wm = fake.wm();
        assert_eq!(wm.get_required_int("_NET_ACTIVE_WINDOW", None).unwrap(), 12345);
    }

    #[test]
    fn test_required_int_missing_or_empty() {
        let fake = FakeServer::new();
        fake.set_prop(ROOT, "_NET_CURRENT_DESKTOP", vec![]);
        let wm = fake.wm();
        assert_eq!(
            wm.get_required_int("_NET_ACTIVE_WINDOW", None).unwrap_err().wm(),
            Some(&WindowManagerError::PropertyUnavailable("_NET_ACTIVE_WINDOW".into()))
        );
        assert_eq!(
            wm.get_required_int("_NET_CURRENT_DESKTOP", None).unwrap_err().wm(),
            Some(&WindowManagerError::PropertyEmpty("_NET_CURRENT_DESKTOP".into()))
        );
    }

    #[test]
    fn test_optional_int() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry::default());
        fake.set_prop(7, "WM_STATE", vec![0, 0]);
        let wm = fake.wm();

        // A withdrawn state of zero is still present
        assert_eq!(wm.get_optional_int("WM_STATE", Some(7)).unwrap(), Some(0));
        assert_eq!(wm.get_optional_int("WM_STATE", None).unwrap(), None);
    }

    #[test]
    fn test_stale_window_is_unavailable() {
        let fake = FakeServer::new();
        let wm = fake.wm();
        assert_eq!(
            wm.get_optional_int("WM_STATE", Some(999)).unwrap_err().wm(),
            Some(&WindowManagerError::PropertyUnavailable("WM_STATE".into()))
        );
    }

    #[test]
    fn test_string() {
        let fake = FakeServer::new();
        fake.add_window(7, ROOT, Geometry::default());
        fake.set_text(7, "WM_NAME", "xterm");
        fake.set_text(7, "_NET_WM_NAME", "");
        let wm = fake.wm();
        assert_eq!(wm.get_string("WM_NAME", Some(7)).unwrap(), Some("xterm".to_string()));
        assert_eq!(wm.get_string("_NET_WM_NAME", Some(7)).unwrap(), None);
        assert_eq!(wm.get_string("WM_ICON_NAME", Some(7)).unwrap(), None);
    }
}
