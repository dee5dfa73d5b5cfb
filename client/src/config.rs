//! Public (browser-visible) configuration.
//!
//! Values are captured from the build environment, the same way public
//! frontend variables are inlined at bundle time. Nothing secret belongs here:
//! the anon key is a publishable key by design of the hosted backend.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Hosted backend coordinates compiled into the client bundle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PublicConfig {
    /// Base URL of the hosted backend (auth + REST), without trailing slash.
    pub supabase_url: String,
    /// Publishable anon key sent as the `apikey` header.
    pub supabase_anon_key: String,
}

impl PublicConfig {
    #[must_use]
    pub fn new(url: &str, anon_key: &str) -> Self {
        Self { supabase_url: url.trim().trim_end_matches('/').to_owned(), supabase_anon_key: anon_key.trim().to_owned() }
    }

    /// Read `SUPABASE_URL` / `SUPABASE_ANON_KEY` as seen at compile time.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::new(option_env!("SUPABASE_URL").unwrap_or_default(), option_env!("SUPABASE_ANON_KEY").unwrap_or_default())
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty() && !self.supabase_anon_key.is_empty()
    }

    /// Join `path` onto the backend base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.supabase_url, path.trim_start_matches('/'))
    }
}
