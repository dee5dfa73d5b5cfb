//! Login page: third-party OAuth sign-in for festival participants.
//!
//! Guest-only: a caller who already has a session is sent to the dashboard.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::auth::guard::GuardPolicy;
use crate::components::auth_guard::AuthGuard;

/// OAuth provider offered on the login page.
pub const OAUTH_PROVIDER: &str = "google";
/// Where the provider sends the browser back to.
pub const CALLBACK_PATH: &str = "/auth/callback";

fn oauth_error_banner(query: &str) -> Option<&'static str> {
    crate::auth::callback::is_oauth_error_query(query)
        .then_some("Sign-in did not complete. Please try again.")
}

fn sign_in_failed_message(err: &str) -> String {
    format!("Could not start sign-in: {err}")
}

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <AuthGuard policy=GuardPolicy::guest_only()>
            <LoginCard/>
        </AuthGuard>
    }
}

#[component]
fn LoginCard() -> impl IntoView {
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    let client = crate::state::auth::use_auth_client_handle();
    // Children of the guard only render in the browser, so reading the
    // location here cannot disagree with the server render.
    let banner = oauth_error_banner(&crate::util::location::query());

    let on_sign_in = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        busy.set(true);
        info.set("Redirecting to sign-in...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use crate::auth::provider::IdentityProvider;

            let Some(client) = client.try_get_value() else {
                return;
            };
            let redirect_to = crate::util::location::absolute_url(CALLBACK_PATH);
            if let Err(e) = client
                .sign_in_with_provider(OAUTH_PROVIDER, &redirect_to)
                .await
            {
                info.set(sign_in_failed_message(&e.to_string()));
                busy.set(false);
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Informatics Festival"</h1>
                <p class="login-card__subtitle">"Sign in to manage your team"</p>
                {banner.map(|text| view! {
                    <p class="login-message login-message--error" role="alert">{text}</p>
                })}
                <button class="login-button" type="button" on:click=on_sign_in disabled=move || busy.get()>
                    "Continue with Google"
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <a class="login-link" href="/auth/forgot-password">"Forgot your password?"</a>
            </div>
        </div>
    }
}
