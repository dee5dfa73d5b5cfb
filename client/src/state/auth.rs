//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `AuthState` is the read model pages use for identity-dependent rendering;
//! guards write it after each transition. The identity-provider client itself
//! is shared through context as an `AuthClient`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;

use crate::auth::guard::GuardView;
use crate::auth::session::Session;
use crate::auth::supabase::SupabaseAuth;
use crate::config::PublicConfig;

/// Session as last observed by the mounted guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub view: GuardView,
    /// Non-fatal notice, e.g. the provider could not be reached on a guest page.
    pub notice: Option<String>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { session: None, view: GuardView::Loading, notice: None }
    }
}

impl AuthState {
    #[must_use]
    pub fn user_label(&self) -> Option<String> {
        self.session.as_ref().map(Session::display_identity)
    }
}

/// Browser-local handle to the identity-provider client.
pub type AuthClient = StoredValue<SupabaseAuth, LocalStorage>;

/// Create the provider client and make it available to descendants.
pub fn provide_auth_client(config: PublicConfig) -> AuthClient {
    let client = StoredValue::new_local(SupabaseAuth::new(config));
    provide_context(client);
    client
}

/// Fetch the provider client provided by `App`.
pub fn use_auth_client() -> SupabaseAuth {
    use_auth_client_handle().get_value()
}

/// Handle to the provider client, for tasks that outlive the reactive scope
/// they were spawned from. Resolve it with `try_get_value` inside the task.
pub fn use_auth_client_handle() -> AuthClient {
    expect_context::<AuthClient>()
}
