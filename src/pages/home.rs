use std::rc::Rc;

use log::{info, warn};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::config;
use crate::dom::BrowserPage;
use crate::error::Result;
use crate::hero::HeroIntro;
use crate::timers::BrowserTimers;
use crate::Route;

struct InfoCard {
    icon: &'static str,
    title: &'static str,
    body: &'static str,
}

const INFO_CARDS: &[InfoCard] = &[
    InfoCard {
        icon: "fa-shield-halved",
        title: "Prevención",
        body: "Herramientas para detectar riesgos antes de que se conviertan en problemas.",
    },
    InfoCard {
        icon: "fa-chart-line",
        title: "Datos reales",
        body: "Estadísticas actualizadas sobre seguridad digital en nuestra comunidad.",
    },
    InfoCard {
        icon: "fa-users",
        title: "Comunidad",
        body: "Familias y docentes que ya confían en PraevenSoft cada día.",
    },
];

type BrowserIntro = HeroIntro<BrowserPage, BrowserTimers>;

fn boot() -> Result<BrowserIntro> {
    let page = Rc::new(BrowserPage::new()?);
    let config = Rc::new(config::load(page.as_ref()));
    let intro = HeroIntro::new(page, Rc::new(BrowserTimers), config);
    if let Err(err) = intro.init(&mut rand::thread_rng()) {
        intro.teardown();
        return Err(err);
    }
    Ok(intro)
}

#[function_component(Home)]
pub fn home() -> Html {
    use_effect_with_deps(
        move |_| {
            let intro = match boot() {
                Ok(intro) => {
                    info!("Hero intro running");
                    Some(intro)
                }
                Err(err) => {
                    warn!("Hero intro did not start: {}", err);
                    None
                }
            };
            move || {
                if let Some(intro) = intro {
                    intro.teardown();
                }
            }
        },
        (),
    );

    html! {
        <main class="hero">
            <section class="hero-content">
                <div class="hero-stats">
                    <span class="number">{"+1000"}</span>
                    <span class="label">{"familias protegidas"}</span>
                </div>
                <h1 class="hero-title">{"PraevenSoft"}</h1>
                <h2 class="hero-subtitle">{"Seguridad digital para quien más quieres"}</h2>
                <p class="hero-description">
                    {"Conoce los riesgos, mide su impacto y actúa a tiempo con información clara."}
                </p>
                <Link<Route> to={Route::Stats} classes="hero-button">
                    {"Ver estadísticas"}
                </Link<Route>>
            </section>
            <section class="info-cards">
                { for INFO_CARDS.iter().map(|card| html! {
                    <article class="info-card">
                        <i class={classes!("fa-solid", card.icon)}></i>
                        <h3>{card.title}</h3>
                        <p>{card.body}</p>
                    </article>
                }) }
            </section>
            <style>
                {r#"
                    .hero {
                        min-height: 100vh;
                        padding: 4rem 2rem 4rem 100px;
                        color: #fff;
                        background: #0d0b1a;
                        font-family: 'Poppins', sans-serif;
                    }
                    .hero-stats .number {
                        display: inline-block;
                        font-size: 3rem;
                        font-weight: 700;
                        color: #8A2BE2;
                        transition: transform 0.3s ease;
                    }
                    .hero-button {
                        position: relative;
                        overflow: hidden;
                        display: inline-block;
                        padding: 1rem 2.5rem;
                        border-radius: 50px;
                        color: #fff;
                        text-decoration: none;
                        background: linear-gradient(135deg, #8A2BE2, #4B0082);
                        box-shadow: 0 10px 30px rgba(138, 43, 226, 0.4);
                    }
                    .info-cards {
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(240px, 1fr));
                        gap: 2rem;
                        margin-top: 4rem;
                    }
                    .info-card {
                        padding: 2rem;
                        border-radius: 20px;
                        background: rgba(255, 255, 255, 0.05);
                        border: 1px solid rgba(138, 43, 226, 0.3);
                    }
                "#}
            </style>
        </main>
    }
}
