use yew::prelude::*;
use yew_router::prelude::*;

pub mod components;
pub mod hooks;
mod logs;
pub mod pages;

use pages::{NotFoundPage, ProductsPage};

pub const DEFAULT_PRODUCTS_URL: &str = "https://api.escuelajs.co/api/v1/products";

/// Url of one page of products.
///
/// The base can be overridden at build time with `PRODUCTS_URL`.
pub fn products_url(offset: u32, limit: u32) -> String {
    let base = option_env!("PRODUCTS_URL").unwrap_or(DEFAULT_PRODUCTS_URL);
    format!("{base}?offset={offset}&limit={limit}")
}

#[function_component]
pub fn App() -> Html {
    logs::init_logging();
    html! {
        <BrowserRouter>
            <div class="min-h-screen bg-white text-gray-900">
                <Switch<Route> render={switch} />
            </div>
        </BrowserRouter>
    }
}

#[derive(Clone, Routable, PartialEq)]
enum Route {
    #[at("/")]
    Home,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <ProductsPage /> },
        Route::NotFound => html! {
            <main class="max-w-7xl mx-auto px-4 py-8">
                <NotFoundPage />
            </main>
        },
    }
}
