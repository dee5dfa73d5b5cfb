//! Password-reset request page.

#[cfg(test)]
#[path = "forgot_password_test.rs"]
mod forgot_password_test;

use leptos::prelude::*;

use crate::auth::guard::GuardPolicy;
use crate::components::auth_guard::AuthGuard;

/// Where the reset email link lands.
pub const RESET_REDIRECT_PATH: &str = "/auth/login";

/// Trimmed email, or a message explaining why it cannot be sent.
fn validate_email(raw: &str) -> Result<String, &'static str> {
    let email = raw.trim();
    if email.is_empty() {
        return Err("Enter your email address.");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Enter a valid email address.");
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err("Enter a valid email address.");
    }
    Ok(email.to_owned())
}

fn sent_message(email: &str) -> String {
    format!("If an account exists for {email}, a reset link is on its way.")
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    view! {
        <AuthGuard policy=GuardPolicy::guest_only()>
            <ForgotPasswordCard/>
        </AuthGuard>
    }
}

#[component]
fn ForgotPasswordCard() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let error = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    let client = crate::state::auth::use_auth_client_handle();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        info.set(String::new());
        let address = match validate_email(&email.get()) {
            Ok(address) => address,
            Err(msg) => {
                error.set(msg.to_owned());
                return;
            }
        };
        error.set(String::new());
        busy.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use crate::auth::provider::IdentityProvider;

            let Some(client) = client.try_get_value() else {
                return;
            };
            let redirect_to = crate::util::location::absolute_url(RESET_REDIRECT_PATH);
            match client.send_password_reset(&address, &redirect_to).await {
                Ok(()) => info.set(sent_message(&address)),
                Err(e) => error.set(e.to_string()),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = address;
            busy.set(false);
        }
    };

    view! {
        <div class="login-page">
            <form class="login-card" on:submit=on_submit>
                <h1>"Reset your password"</h1>
                <label class="login-label" for="reset-email">"Email"</label>
                <input
                    id="reset-email"
                    class="login-input"
                    type="email"
                    autocomplete="email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <button class="login-button" type="submit" disabled=move || busy.get()>
                    "Send reset link"
                </button>
                <Show when=move || !error.get().is_empty()>
                    <p class="login-message login-message--error" role="alert">{move || error.get()}</p>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <a class="login-link" href="/auth/login">"Back to sign in"</a>
            </form>
        </div>
    }
}
