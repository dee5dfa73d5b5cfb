//! Browser location helpers.
//!
//! TRADE-OFFS
//! ==========
//! Reads are browser-only; SSR paths return empty strings so server rendering
//! stays deterministic and guards stay in their loading state.

use leptos_router::NavigateOptions;

/// Navigation options for guard redirects: replace the current history entry
/// so Back cannot return to the page just left.
#[must_use]
pub fn replace_options() -> NavigateOptions {
    NavigateOptions { replace: true, ..NavigateOptions::default() }
}

/// Current URL fragment including the leading `#`, or empty.
pub fn fragment() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}

/// Current query string including the leading `?`, or empty.
pub fn query() -> String {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        String::new()
    }
}

/// Absolute URL for an app path, for use as an OAuth `redirect_to`.
pub fn absolute_url(path: &str) -> String {
    #[cfg(feature = "hydrate")]
    {
        let origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        format!("{origin}{path}")
    }
    #[cfg(not(feature = "hydrate"))]
    {
        path.to_owned()
    }
}
