//! OAuth completion page.
//!
//! SYSTEM CONTEXT
//! ==============
//! The identity provider redirects here with tokens in the URL fragment.
//! The fragment never reaches the server, so completion runs in the browser:
//! tokens become a session, then the browser moves on with a
//! history-replacing navigation so the token-bearing URL is not kept.

use leptos::prelude::*;

#[component]
pub fn CallbackPage() -> impl IntoView {
    #[cfg(feature = "hydrate")]
    {
        use leptos_router::hooks::use_navigate;

        use crate::auth::callback::complete_oauth_callback;
        use crate::state::auth::use_auth_client;
        use crate::util::location::{fragment, replace_options};

        let navigate = use_navigate();
        let client = use_auth_client();
        leptos::task::spawn_local(async move {
            let target = complete_oauth_callback(&client, &fragment()).await;
            log::info!("oauth callback complete: target={target}");
            navigate(&target, replace_options());
        });
    }

    view! {
        <div class="guard-loading" aria-busy="true" aria-live="polite">
            <span class="guard-loading__spinner"></span>
            <span class="guard-loading__label">"Signing you in..."</span>
        </div>
    }
}
