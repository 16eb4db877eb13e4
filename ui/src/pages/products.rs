use fetch::RequestParams;
use serde::Deserialize;
use yew::prelude::*;

use crate::components::PaginationControls;
use crate::hooks::use_fetch;
use crate::products_url;

/// Products shown per page.
pub const PAGE_SIZE: u32 = 24;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
}

#[function_component]
pub fn ProductsPage() -> Html {
    let offset = use_state(|| 0u32);

    // Rebuilt every render; only a different offset triggers a new request.
    let products = use_fetch(RequestParams::new(products_url(*offset, PAGE_SIZE)));

    let on_reload = {
        let refetch = products.refetch.clone();
        Callback::from(move |_: MouseEvent| refetch.emit(()))
    };

    let on_offset_change = {
        let offset = offset.clone();
        Callback::from(move |new_offset: u32| offset.set(new_offset))
    };

    html! {
        <div class="min-h-screen">
            <header class="flex items-center justify-between px-6 py-4">
                <h1 class="text-2xl font-bold">{"Products"}</h1>
                <button onclick={on_reload} disabled={products.is_loading}>
                    {if products.is_initial_loading() { "Loading..." } else { "Reload" }}
                </button>
            </header>

            <main class="max-w-6xl mx-auto px-6 py-8">
                {products.render("products", |payload, is_loading| {
                    match payload.decode::<Vec<Product>>() {
                        Ok(items) => html! {
                            <>
                                <ProductList items={items.clone()} />
                                <PaginationControls
                                    offset={*offset}
                                    limit={PAGE_SIZE}
                                    shown={items.len()}
                                    on_offset_change={on_offset_change.clone()}
                                    is_loading={is_loading}
                                />
                            </>
                        },
                        Err(e) => {
                            tracing::warn!("unexpected products payload: {e}");
                            html! {
                                <p class="text-red-700">
                                    {"Unexpected response from the products API"}
                                </p>
                            }
                        }
                    }
                })}
            </main>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct ProductListProps {
    items: Vec<Product>,
}

#[function_component]
fn ProductList(props: &ProductListProps) -> Html {
    html! {
        <div>
            <p class="text-sm text-gray-500 mb-4">
                {format!("Showing {} items", props.items.len())}
            </p>
            <ul>
                {for props.items.iter().map(|product| html! {
                    <li key={product.id.to_string()}>
                        {format!("{} (${:.2})", product.title, product.price)}
                    </li>
                })}
            </ul>
        </div>
    }
}
