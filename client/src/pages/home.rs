//! Public landing page.

use leptos::prelude::*;

use crate::components::sponsor_marquee::{Sponsor, SponsorMarquee};

const SPONSORS: &[Sponsor] = &[
    Sponsor { name: "Campus Cloud", logo: "/sponsors/campus-cloud.svg" },
    Sponsor { name: "Byte Foundry", logo: "/sponsors/byte-foundry.svg" },
    Sponsor { name: "Open Circuit", logo: "/sponsors/open-circuit.svg" },
    Sponsor { name: "Lambda Labs Student Fund", logo: "/sponsors/lambda-fund.svg" },
];

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <main class="home">
            <header class="home__hero">
                <h1>"Informatics Festival"</h1>
                <p class="home__tagline">"Competitions, talks and workshops for student builders."</p>
                <div class="home__actions">
                    <a class="btn btn--primary" href="/auth/login">"Register your team"</a>
                    <a class="btn" href="/dashboard">"Go to dashboard"</a>
                </div>
            </header>
            <h2 class="home__section-title">"Supported by"</h2>
            <SponsorMarquee sponsors=SPONSORS.to_vec()/>
        </main>
    }
}
