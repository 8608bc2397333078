use crate::{WindowManager, WindowManagerError, WindowManagerResult};
use tracing::debug;

impl WindowManager {
    /// Determine if the given feature is advertised by the window manager in `_NET_SUPPORTED`
    ///
    /// ### Arguments
    /// * `feature` - name of the feature atom to lookup
    ///
    /// ### Examples
    /// ```ignore
    /// use libewmh::prelude::*;
    /// let wm = WindowManager::connect(None).unwrap();
    /// wm.supported("_NET_MOVERESIZE_WINDOW").unwrap();
    /// ```
    pub fn supported(&self, feature: &str) -> WindowManagerResult<bool> {
        let supported = self.get_property("_NET_SUPPORTED", None)?;
        if supported.is_empty() {
            return Err(WindowManagerError::PropertyEmpty("_NET_SUPPORTED".to_string()).into());
        }
        let atom = self.server.intern_atom(feature)?;
        Ok(supported.value.contains(&atom))
    }

    /// Fail with `UnsupportedFeature` unless the window manager advertises the feature
    ///
    /// ### Arguments
    /// * `feature` - name of the feature atom to lookup
    /// * `intent` - what the caller was trying to do, used in the error
    pub fn assert_supported(&self, feature: &str, intent: &str) -> WindowManagerResult<()> {
        if self.supported(feature)? {
            Ok(())
        } else {
            debug!("assert_supported: {} is not supported", feature);
            Err(WindowManagerError::UnsupportedFeature(feature.to_string(), intent.to_string()).into())
        }
    }
}
