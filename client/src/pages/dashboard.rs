//! Dashboard page for signed-in participants: team status, team create/join
//! dialogs, image upload and sign-out.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the protected landing route. `AuthGuard` decides whether the
//! content renders at all; the content reads the session from `AuthState`
//! and talks to the team procedures through `TeamsApi`. Every procedure call
//! first asks the provider client for a fresh session, so a page left open
//! past the token lifetime refreshes instead of failing.
//!
//! ERROR HANDLING
//! ==============
//! Remote procedure failures are shown verbatim. Blank form fields are
//! refused here, before any request is made; other values are forwarded
//! exactly as typed.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::auth::guard::GuardPolicy;
use crate::components::auth_guard::AuthGuard;
use crate::net::types::{Team, UploadedImage};
use crate::state::auth::{AuthClient, AuthState, use_auth_client_handle};

/// Form value as typed, or the message to show when it is blank.
fn require_field(value: &str, label: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required."));
    }
    Ok(value.to_owned())
}

/// Member count line for the team card, when the procedure reported one.
fn team_capacity(team: &Team) -> Option<String> {
    match (team.member_count, team.max_members) {
        (Some(count), Some(max)) => Some(format!("{count}/{max} members")),
        (Some(count), None) => Some(format!("{count} members")),
        _ => None,
    }
}

fn upload_summary(image: &UploadedImage) -> String {
    format!("{}x{} {} ({} KB)", image.width, image.height, image.format, image.bytes.div_ceil(1024))
}

/// Dashboard page. Anonymous callers are redirected to the login page.
#[component]
pub fn DashboardPage() -> impl IntoView {
    view! {
        <AuthGuard policy=GuardPolicy::protected()>
            <DashboardContent/>
        </AuthGuard>
    }
}

#[component]
fn DashboardContent() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let client = use_auth_client_handle();

    let team = RwSignal::new(None::<Team>);
    let team_loading = RwSignal::new(true);
    let team_error = RwSignal::new(None::<String>);
    let loaded_for = RwSignal::new(None::<uuid::Uuid>);

    // Load the current team once per signed-in user.
    Effect::new(move || {
        let Some(session) = auth.get().session else {
            return;
        };
        if loaded_for.get_untracked() == Some(session.user_id) {
            return;
        }
        loaded_for.set(Some(session.user_id));
        load_current_team(client, team, team_loading, team_error);
    });

    let show_create = RwSignal::new(false);
    let show_join = RwSignal::new(false);
    let on_create_cancel = Callback::new(move |()| show_create.set(false));
    let on_join_cancel = Callback::new(move |()| show_join.set(false));
    let on_team_changed = Callback::new(move |()| {
        show_create.set(false);
        show_join.set(false);
        load_current_team(client, team, team_loading, team_error);
    });

    let identity = move || auth.get().user_label().unwrap_or_else(|| "me".to_owned());

    let on_logout = move |_| {
        // The guard sees the SignedOut event and redirects to login.
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use crate::auth::provider::IdentityProvider;

            let Some(auth) = client.try_get_value() else {
                return;
            };
            if let Err(e) = auth.sign_out().await {
                log::warn!("sign out failed: {e}");
            }
        });
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header toolbar">
                <span class="toolbar__title">"Dashboard"</span>
                <span class="toolbar__divider" aria-hidden="true"></span>
                <Show when=move || !team_loading.get() && team.get().is_none()>
                    <button class="btn toolbar__new-team" on:click=move |_| show_create.set(true)>
                        "+ New Team"
                    </button>
                    <button class="btn toolbar__join-team" on:click=move |_| show_join.set(true)>
                        "Join Team"
                    </button>
                </Show>
                <span class="toolbar__spacer"></span>
                <span class="toolbar__self">{identity}</span>
                <button class="btn toolbar__logout" on:click=on_logout title="Sign out">
                    "Sign out"
                </button>
            </header>

            <section class="dashboard-page__team">
                <h2>"Your team"</h2>
                <Show when=move || team_error.get().is_some()>
                    <p class="dashboard-page__error" role="alert">{move || team_error.get().unwrap_or_default()}</p>
                </Show>
                {move || {
                    if team_loading.get() {
                        return view! { <p>"Loading team..."</p> }.into_any();
                    }
                    match team.get() {
                        Some(t) => {
                            let capacity = team_capacity(&t);
                            view! {
                                <div class="team-card">
                                    <h3 class="team-card__name">{t.name}</h3>
                                    {t.code.map(|code| view! {
                                        <p class="team-card__code">"Join code: " <code>{code}</code></p>
                                    })}
                                    {capacity.map(|line| view! { <p class="team-card__capacity">{line}</p> })}
                                </div>
                            }
                                .into_any()
                        }
                        None => view! { <p>"You are not on a team yet. Create one or join with a code."</p> }.into_any(),
                    }
                }}
            </section>

            <UploadPanel/>

            <Show when=move || show_create.get()>
                <CreateTeamDialog on_cancel=on_create_cancel on_done=on_team_changed/>
            </Show>
            <Show when=move || show_join.get()>
                <JoinTeamDialog on_cancel=on_join_cancel on_done=on_team_changed/>
            </Show>
        </div>
    }
}

/// Procedure client bound to a session that is valid right now.
#[cfg(feature = "hydrate")]
async fn teams_api(
    client: AuthClient,
) -> Result<(crate::net::rpc::TeamsApi, crate::auth::session::Session), String> {
    let auth = client
        .try_get_value()
        .ok_or_else(|| "The page is closing.".to_owned())?;
    let session = auth
        .fresh_session()
        .await
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "You are signed out.".to_owned())?;
    Ok((crate::net::rpc::TeamsApi::new(auth.config().clone(), &session), session))
}

fn load_current_team(
    client: AuthClient,
    team: RwSignal<Option<Team>>,
    loading: RwSignal<bool>,
    error: RwSignal<Option<String>>,
) {
    loading.set(true);
    error.set(None);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let current = match teams_api(client).await {
            Ok((api, session)) => api
                .get_user_current_team(session.user_id)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e),
        };
        match current {
            Ok(current) => team.set(current),
            Err(e) => error.set(Some(e)),
        }
        loading.set(false);
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (client, team);
        loading.set(false);
    }
}

/// Modal dialog for creating a team.
#[component]
fn CreateTeamDialog(on_cancel: Callback<()>, on_done: Callback<()>) -> impl IntoView {
    let client = use_auth_client_handle();
    let name = RwSignal::new(String::new());
    let code = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let submit = Callback::new(move |()| {
        if pending.get_untracked() {
            return;
        }
        let fields = require_field(&name.get_untracked(), "Team name")
            .and_then(|n| require_field(&code.get_untracked(), "Team code").map(|c| (n, c)));
        let (team_name, team_code) = match fields {
            Ok(fields) => fields,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        error.set(None);
        pending.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let created = match teams_api(client).await {
                Ok((api, session)) => api
                    .create_team(&team_name, &team_code, session.user_id)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e),
            };
            match created {
                Ok(team) => {
                    match team {
                        Some(team) => log::info!("team created: id={}", team.id),
                        None => log::info!("team created"),
                    }
                    on_done.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            pending.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (team_name, team_code, client, on_done);
            pending.set(false);
        }
    });

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Create Team"</h2>
                <label class="dialog__label">
                    "Team Name"
                    <input
                        class="dialog__input"
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label class="dialog__label">
                    "Team Code"
                    <input
                        class="dialog__input"
                        type="text"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(event_target_value(&ev))
                        on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                submit.run(());
                            }
                        }
                    />
                </label>
                <Show when=move || error.get().is_some()>
                    <p class="dialog__error" role="alert">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" disabled=move || pending.get() on:click=move |_| submit.run(())>
                        "Create"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Modal dialog for joining a team by its code.
#[component]
fn JoinTeamDialog(on_cancel: Callback<()>, on_done: Callback<()>) -> impl IntoView {
    let client = use_auth_client_handle();
    let code = RwSignal::new(String::new());
    let error = RwSignal::new(None::<String>);
    let pending = RwSignal::new(false);

    let submit = Callback::new(move |()| {
        if pending.get_untracked() {
            return;
        }
        let team_code = match require_field(&code.get_untracked(), "Team code") {
            Ok(value) => value,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        error.set(None);
        pending.set(true);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            let joined = match teams_api(client).await {
                Ok((api, session)) => api
                    .join_team_by_code(&team_code, session.user_id)
                    .await
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e),
            };
            match joined {
                // A confirmation without membership details still means joined.
                Ok(membership) => {
                    match membership {
                        Some(membership) => log::info!("joined team: id={}", membership.team_id),
                        None => log::info!("joined team"),
                    }
                    on_done.run(());
                }
                Err(e) => error.set(Some(e)),
            }
            pending.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (team_code, client, on_done);
            pending.set(false);
        }
    });

    view! {
        <div class="dialog-backdrop" on:click=move |_| on_cancel.run(())>
            <div class="dialog" on:click=move |ev| ev.stop_propagation()>
                <h2>"Join Team"</h2>
                <label class="dialog__label">
                    "Team Code"
                    <input
                        class="dialog__input"
                        type="text"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(event_target_value(&ev))
                        on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                            if ev.key() == "Enter" {
                                ev.prevent_default();
                                submit.run(());
                            }
                        }
                    />
                </label>
                <Show when=move || error.get().is_some()>
                    <p class="dialog__error" role="alert">{move || error.get().unwrap_or_default()}</p>
                </Show>
                <div class="dialog__actions">
                    <button class="btn" on:click=move |_| on_cancel.run(())>
                        "Cancel"
                    </button>
                    <button class="btn btn--primary" disabled=move || pending.get() on:click=move |_| submit.run(())>
                        "Join"
                    </button>
                </div>
            </div>
        </div>
    }
}

/// Image upload through the server proxy.
#[component]
fn UploadPanel() -> impl IntoView {
    let file_input = NodeRef::<leptos::html::Input>::new();
    let status = RwSignal::new(None::<Result<UploadedImage, String>>);
    let pending = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }

        #[cfg(feature = "hydrate")]
        {
            let Some(file) = file_input.get_untracked().and_then(|input| input.files()).and_then(|files| files.get(0)) else {
                status.set(Some(Err("Choose an image first.".to_owned())));
                return;
            };
            pending.set(true);
            leptos::task::spawn_local(async move {
                status.set(Some(crate::net::upload::upload_image(&file).await));
                pending.set(false);
            });
        }
    };

    view! {
        <section class="dashboard-page__upload">
            <h2>"Upload an image"</h2>
            <form class="upload-form" on:submit=on_submit>
                <input node_ref=file_input type="file" accept="image/jpeg,image/png,image/webp"/>
                <button class="btn btn--primary" type="submit" disabled=move || pending.get()>
                    {move || if pending.get() { "Uploading..." } else { "Upload" }}
                </button>
            </form>
            {move || match status.get() {
                Some(Ok(image)) => {
                    let summary = upload_summary(&image);
                    view! {
                        <figure class="upload-result">
                            <img src=image.secure_url.clone() alt="Uploaded image"/>
                            <figcaption>{summary}</figcaption>
                        </figure>
                    }
                        .into_any()
                }
                Some(Err(message)) => view! { <p class="dashboard-page__error" role="alert">{message}</p> }.into_any(),
                None => ().into_any(),
            }}
        </section>
    }
}
