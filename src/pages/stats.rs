use std::cell::Cell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use log::error;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::app::StatsApp;
use crate::config::{self, Config};
use crate::dom::BrowserPage;
use crate::error::Result;
use crate::expose;
use crate::timers::BrowserTimers;

type BrowserApp = StatsApp<BrowserPage, BrowserTimers>;

const BOOT_DELAY_MS: u32 = 100;

enum Figure {
    Count { value: u64, prefix: &'static str },
    Large { value: u64 },
    Circular(u32),
    Bar(u32),
    Radial(u32),
}

struct Stat {
    figure: Figure,
    caption: &'static str,
}

struct Category {
    title: &'static str,
    icon: &'static str,
    image: &'static str,
    stats: &'static [Stat],
}

const CATEGORIES: &[Category] = &[
    Category {
        title: "Ciberacoso",
        icon: "fa-user-shield",
        image: "/assets/ciberacoso.webp",
        stats: &[
            Stat {
                figure: Figure::Count { value: 15_000, prefix: "+" },
                caption: "casos denunciados el último año",
            },
            Stat { figure: Figure::Circular(37), caption: "de los menores lo ha sufrido" },
            Stat { figure: Figure::Bar(62), caption: "no se lo cuenta a un adulto" },
        ],
    },
    Category {
        title: "Fraude en línea",
        icon: "fa-credit-card",
        image: "/assets/fraude.webp",
        stats: &[
            Stat {
                figure: Figure::Large { value: 2_500_000 },
                caption: "intentos de phishing bloqueados",
            },
            Stat { figure: Figure::Radial(74), caption: "llegan por correo electrónico" },
            Stat { figure: Figure::Circular(100), caption: "evitables con formación básica" },
        ],
    },
    Category {
        title: "Privacidad",
        icon: "fa-eye-slash",
        image: "/assets/privacidad.webp",
        stats: &[
            Stat {
                figure: Figure::Count { value: 850, prefix: "" },
                caption: "aplicaciones analizadas",
            },
            Stat { figure: Figure::Bar(45), caption: "comparten datos con terceros" },
            Stat { figure: Figure::Radial(28), caption: "piden permisos innecesarios" },
        ],
    },
];

fn figure(stat: &Stat) -> Html {
    match stat.figure {
        Figure::Count { value, prefix } => html! {
            <div class="contador-animado" data-valor={value.to_string()}>
                <span class="prefijo">{prefix}</span>
                <span class="valor">{"0"}</span>
            </div>
        },
        Figure::Large { value } => html! {
            <div class="contador-grande" data-valor={value.to_string()}>{"0"}</div>
        },
        Figure::Circular(percent) => html! {
            <div class="grafico-circular" data-porcentaje={percent.to_string()}>
                <span class="porcentaje">{"0"}</span>
            </div>
        },
        Figure::Bar(percent) => html! {
            <>
                <div class="barra-contenedor">
                    <div class="barra-progreso" data-porcentaje={percent.to_string()}></div>
                </div>
                <span class="valor-barra">{"0%"}</span>
            </>
        },
        Figure::Radial(percent) => html! {
            <div class="grafico-radial">
                <svg viewBox="0 0 100 100">
                    <circle class="fondo" cx="50" cy="50" r="40" />
                    <circle class="progreso" cx="50" cy="50" r="40" />
                </svg>
                <span class="valor-radial">{format!("{}%", percent)}</span>
            </div>
        },
    }
}

fn category(config: &Config, index: usize, category: &Category) -> Html {
    let color = format!("--color-categoria: {};", config.category_color(index));
    html! {
        <section class="categoria-estadistica" style={color} data-aos="fade-up">
            <header class="categoria-cabecera">
                <div class="icono-categoria">
                    <i class={classes!("fa-solid", category.icon)}></i>
                </div>
                <h2>{category.title}</h2>
            </header>
            <div class="imagen-categoria">
                <img src={category.image} alt={category.title} />
            </div>
            <div class="tarjetas">
                { for category.stats.iter().enumerate().map(|(i, stat)| html! {
                    <div class="tarjeta-estadistica"
                         data-aos="fade-up"
                         data-aos-delay={(i * 100).to_string()}>
                        { figure(stat) }
                        <p class="descripcion">{stat.caption}</p>
                    </div>
                }) }
            </div>
        </section>
    }
}

fn boot(config: Config) -> Result<Rc<BrowserApp>> {
    let page = Rc::new(BrowserPage::new()?);
    let separator = config.thousands_separator;
    let app = StatsApp::new(page, Rc::new(BrowserTimers), config);
    expose::install(&app, separator)?;
    app.init();
    Ok(app)
}

#[function_component(Stats)]
pub fn stats() -> Html {
    let config = use_state(|| {
        BrowserPage::new()
            .map(|page| config::load(&page))
            .unwrap_or_default()
    });
    // the app only lives as long as this page is mounted
    let running = use_mut_ref(|| None::<Rc<BrowserApp>>);

    {
        let running = running.clone();
        let config = (*config).clone();
        use_effect_with_deps(
            move |_| {
                gloo_console::log!("DOM ready, starting statistics app");
                let cancelled = Rc::new(Cell::new(false));
                {
                    let (running, cancelled) = (running.clone(), cancelled.clone());
                    spawn_local(async move {
                        TimeoutFuture::new(BOOT_DELAY_MS).await;
                        if cancelled.get() {
                            return;
                        }
                        match boot(config) {
                            Ok(app) => *running.borrow_mut() = Some(app),
                            Err(err) => error!("Statistics app did not start: {}", err),
                        }
                    });
                }
                move || {
                    cancelled.set(true);
                    if let Some(app) = running.borrow_mut().take() {
                        app.teardown();
                        expose::uninstall();
                    }
                }
            },
            (),
        );
    }

    html! {
        <main class="estadisticas">
            <header class="estadisticas-cabecera" data-aos="fade-down">
                <h1>{"Estadísticas"}</h1>
                <p>{"Lo que dicen los datos sobre la seguridad digital de nuestras familias."}</p>
            </header>
            { for CATEGORIES.iter().enumerate().map(|(i, c)| category(&config, i, c)) }
            <section class="mision" data-aos="zoom-in">
                <h2>{"Nuestra misión"}</h2>
                <p>{"Convertir cada número en una conversación a tiempo."}</p>
                <button class="boton-mision">
                    {"Únete"}
                    <i class="fa-solid fa-arrow-right"></i>
                </button>
            </section>
            <style>
                {r#"
                    .estadisticas {
                        padding: 4rem 2rem 4rem 100px;
                        color: #fff;
                        background: #0d0b1a;
                        font-family: 'Poppins', sans-serif;
                    }
                    [data-aos] {
                        opacity: 0;
                        transform: translateY(30px);
                        transition: opacity 0.8s ease, transform 0.8s ease;
                    }
                    [data-aos].aos-animate {
                        opacity: 1;
                        transform: none;
                    }
                    .categoria-estadistica {
                        margin-bottom: 5rem;
                    }
                    .icono-categoria {
                        display: inline-flex;
                        color: var(--color-categoria);
                        transition: transform 0.3s ease;
                    }
                    .imagen-categoria {
                        position: relative;
                        overflow: hidden;
                        border-radius: 15px;
                    }
                    .imagen-categoria img {
                        width: 100%;
                        display: block;
                    }
                    .tarjetas {
                        display: grid;
                        grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
                        gap: 2rem;
                    }
                    .tarjeta-estadistica {
                        position: relative;
                        padding: 2rem;
                        border-radius: 15px;
                        background: rgba(255, 255, 255, 0.05);
                        transition: transform 0.3s ease, box-shadow 0.3s ease;
                    }
                    .contador-animado, .contador-grande {
                        font-size: 2.5rem;
                        font-weight: 700;
                        color: var(--color-categoria);
                        transition: transform 0.3s ease;
                    }
                    .grafico-circular {
                        width: 140px;
                        height: 140px;
                        border-radius: 50%;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        background: conic-gradient(
                            var(--color-categoria) var(--porcentaje, 0%),
                            rgba(255, 255, 255, 0.1) 0
                        );
                        transition: background 2s ease;
                    }
                    .barra-contenedor {
                        height: 12px;
                        border-radius: 6px;
                        background: rgba(255, 255, 255, 0.1);
                        overflow: hidden;
                    }
                    .barra-progreso {
                        height: 100%;
                        width: var(--porcentaje, 0%);
                        background: var(--color-categoria);
                        transition: width 2s ease;
                    }
                    .grafico-radial {
                        position: relative;
                        width: 140px;
                    }
                    .grafico-radial circle {
                        fill: none;
                        stroke-width: 8;
                    }
                    .grafico-radial .fondo {
                        stroke: rgba(255, 255, 255, 0.1);
                    }
                    .grafico-radial .progreso {
                        stroke: var(--color-categoria);
                        transform: rotate(-90deg);
                        transform-origin: center;
                        transition: stroke-dashoffset 2s ease;
                    }
                    .aos-animate .grafico-radial .progreso {
                        stroke-dashoffset: var(--offset-final) !important;
                    }
                    .valor-radial {
                        position: absolute;
                        inset: 0;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                    }
                    .boton-mision {
                        position: relative;
                        overflow: hidden;
                        padding: 1rem 2.5rem;
                        border: none;
                        border-radius: 50px;
                        color: #fff;
                        background: linear-gradient(135deg, #8A2BE2, #4B0082);
                        transition: transform 0.3s ease;
                    }
                    .boton-mision i {
                        margin-left: 0.5rem;
                        transition: transform 0.3s ease;
                    }
                "#}
            </style>
        </main>
    }
}
