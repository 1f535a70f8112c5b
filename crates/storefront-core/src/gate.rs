//! Access Gate
//!
//! Three-state guard in front of protected content. `Loading` wins over any
//! entitlement evaluation so a pending verification never flashes the denied
//! screen.

/// Path the default denial screen sends buyers back to
pub const PURCHASE_PATH: &str = "/";

/// Path of the protected download page
pub const DOWNLOAD_PATH: &str = "/download";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Verification in flight, or entitlement not yet hydrated
    Loading,
    /// Render protected content
    Granted,
    /// Render the fallback or the default restricted screen
    Denied,
}

impl GateState {
    pub const fn evaluate(is_loading: bool, hydrated: bool, is_verified: bool) -> Self {
        if is_loading || !hydrated {
            Self::Loading
        } else if is_verified {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Pick exactly one of the three renderings
    pub fn render<T>(
        self,
        loading: impl FnOnce() -> T,
        granted: impl FnOnce() -> T,
        denied: impl FnOnce() -> T,
    ) -> T {
        match self {
            Self::Loading => loading(),
            Self::Granted => granted(),
            Self::Denied => denied(),
        }
    }
}
