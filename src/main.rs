use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

mod animations;
mod app;
mod config;
mod dom;
mod effects;
mod error;
mod expose;
mod format;
mod hero;
mod page;
mod perf;
mod sound;
mod timers;
mod pages {
    pub mod home;
    pub mod stats;
}
#[cfg(test)]
mod testing;

use pages::{home::Home, stats::Stats};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/estadisticas")]
    Stats,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        }
        Route::Stats => {
            info!("Rendering Stats page");
            html! { <Stats /> }
        }
        Route::NotFound => {
            info!("Unknown route, showing Home");
            html! { <Redirect<Route> to={Route::Home} /> }
        }
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if let Err(err) = console_log::init_with_level(config::log_level()) {
        gloo_console::error!(format!("error initializing log: {}", err));
    }

    gloo_console::log!("Landing motion module loaded");
    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
