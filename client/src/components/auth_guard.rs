//! Route guard component shared by every protected and guest-only page.
//!
//! SYSTEM CONTEXT
//! ==============
//! One component, parameterized by `GuardPolicy`, replaces per-page copies of
//! the session check. It renders a loading indicator until the caller is
//! classified, the page content only when the policy allows it, and hands
//! redirects to the router as history-replacing navigations.
//!
//! The server render always produces the loading state: sessions live in the
//! browser, so nothing conclusive can be rendered before hydration.

use leptos::prelude::*;

use crate::auth::guard::{GuardPolicy, GuardView};
use crate::state::auth::AuthState;

/// Guard `children` according to `policy`.
#[component]
pub fn AuthGuard(policy: GuardPolicy, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let view_state = RwSignal::new(GuardView::Loading);
    let notice = RwSignal::new(None::<String>);

    #[cfg(feature = "hydrate")]
    {
        use std::rc::Rc;

        use leptos_router::hooks::use_navigate;

        use crate::auth::driver::{GuardDriver, GuardSnapshot, Navigator};
        use crate::state::auth::use_auth_client;
        use crate::util::location::replace_options;

        let navigate = use_navigate();
        let navigator: Rc<dyn Navigator> = Rc::new(move |path: &str| navigate(path, replace_options()));
        let observer: Rc<dyn Fn(GuardSnapshot)> = Rc::new(move |snapshot: GuardSnapshot| {
            view_state.set(snapshot.view);
            notice.set(snapshot.notice.clone());
            auth.set(AuthState { session: snapshot.session, view: snapshot.view, notice: snapshot.notice });
        });

        let (driver, resolve) = GuardDriver::mount(policy, use_auth_client(), navigator, observer);
        let driver = StoredValue::new_local(driver);
        leptos::task::spawn_local(resolve);
        on_cleanup(move || {
            driver.try_with_value(GuardDriver::unmount);
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (policy, auth);
    }

    view! {
        <Show when=move || notice.get().is_some()>
            <p class="guard-notice" role="status">{move || notice.get().unwrap_or_default()}</p>
        </Show>
        {move || match view_state.get() {
            GuardView::Content => children().into_any(),
            GuardView::Loading | GuardView::Redirecting => view! { <GuardLoading/> }.into_any(),
        }}
    }
}

/// Non-interactive placeholder shown while the caller is being classified.
#[component]
fn GuardLoading() -> impl IntoView {
    view! {
        <div class="guard-loading" aria-busy="true" aria-live="polite">
            <span class="guard-loading__spinner"></span>
            <span class="guard-loading__label">"Checking your session..."</span>
        </div>
    }
}
