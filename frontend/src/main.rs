use yew::prelude::*;
use yew_router::prelude::*;
use log::{info, Level};
use web_sys::MouseEvent;

mod config;
mod pages {
    pub mod landing;
    pub mod checkout;
    pub mod success;
}

use pages::{
    checkout::CheckoutPage,
    landing::Landing,
    success::Success,
};

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/checkout")]
    Checkout,
    #[at("/sucesso")]
    Success,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering landing page");
            html! { <Landing /> }
        },
        Route::Checkout => {
            info!("Rendering checkout page");
            html! { <CheckoutPage /> }
        },
        Route::Success => {
            info!("Rendering confirmation page");
            html! { <Success /> }
        },
        Route::NotFound => html! {
            <section class="not-found">
                <h1>{"Página não encontrada"}</h1>
                <Link<Route> to={Route::Home} classes="btn-primary">{"Voltar ao início"}</Link<Route>>
            </section>
        },
    }
}

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
        })
    };

    let menu_class = if *menu_open {
        "nav-menu active"
    } else {
        "nav-menu"
    };

    html! {
        <nav class="navbar">
            <div class="nav-container">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"MovAccess"}
                </Link<Route>>
                <button class={classes!("hamburger", (*menu_open).then(|| "active"))} onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <ul class={menu_class}>
                    <li onclick={close_menu.clone()}><a class="nav-link" href="/#inicio">{"Início"}</a></li>
                    <li onclick={close_menu.clone()}><a class="nav-link" href="/#planos">{"Planos"}</a></li>
                    <li onclick={close_menu.clone()}><a class="nav-link" href="/#comunicacoes">{"Comunicações"}</a></li>
                    <li onclick={close_menu}><a class="nav-link" href="/#contato">{"Contato"}</a></li>
                </ul>
            </div>
        </nav>
    }
}

#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
        </BrowserRouter>
    }
}

fn main() {
    console_error_panic_hook::set_once();

    console_log::init_with_level(Level::Info).expect("error initializing log");
    // checkout core reports its state transitions through tracing
    tracing_wasm::set_as_global_default();

    info!("Starting MovAccess");
    yew::Renderer::<App>::new().render();
}
