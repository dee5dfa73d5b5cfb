//! Scrolling sponsor strip on the landing page.

#[cfg(test)]
#[path = "sponsor_marquee_test.rs"]
mod sponsor_marquee_test;

use leptos::prelude::*;

use crate::util::image_cache::ImageCache;

/// One logo in the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sponsor {
    pub name: &'static str,
    pub logo: &'static str,
}

/// Whether a logo may be shown: it loaded on an earlier render, or the
/// browser reports it `complete`. A complete logo is recorded in `cache`.
fn settle_logo(cache: &ImageCache, url: &str, complete: bool) -> bool {
    if cache.is_loaded(url) {
        return true;
    }
    if complete {
        cache.mark_loaded(url);
    }
    complete
}

/// Logos fade in on first load only; the `ImageCache` from context (or a
/// private one) remembers which URLs already loaded across re-renders.
///
/// The server renders logos hidden. A logo can finish loading before
/// hydration attaches `on:load`, so after mount each `<img>` is also asked
/// whether it is already complete.
#[component]
pub fn SponsorMarquee(sponsors: Vec<Sponsor>) -> impl IntoView {
    let cache = use_context::<ImageCache>().unwrap_or_default();

    // Rendered twice back to back so the CSS loop has no visible seam.
    let track = sponsors
        .iter()
        .chain(sponsors.iter())
        .copied()
        .map(|sponsor| {
            let loaded = RwSignal::new(settle_logo(&cache, sponsor.logo, false));
            let logo_ref = NodeRef::<leptos::html::Img>::new();

            #[cfg(feature = "hydrate")]
            {
                let cache = cache.clone();
                Effect::new(move || {
                    if let Some(img) = logo_ref.get() {
                        if settle_logo(&cache, sponsor.logo, img.complete()) {
                            loaded.set(true);
                        }
                    }
                });
            }

            let cache = cache.clone();
            view! {
                <img
                    node_ref=logo_ref
                    src=sponsor.logo
                    alt=sponsor.name
                    loading="lazy"
                    class=move || if loaded.get() { "marquee__logo marquee__logo--loaded" } else { "marquee__logo" }
                    on:load=move |_| {
                        cache.mark_loaded(sponsor.logo);
                        loaded.set(true);
                    }
                />
            }
        })
        .collect_view();

    view! {
        <section class="marquee" aria-label="Sponsors">
            <div class="marquee__track">{track}</div>
        </section>
    }
}
