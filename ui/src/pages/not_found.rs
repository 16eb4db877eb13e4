use yew::prelude::*;

#[function_component]
pub fn NotFoundPage() -> Html {
    html! {
        <div class="text-center">
            <h1 class="text-4xl font-bold">{"404"}</h1>
            <p class="text-gray-600">{"Nothing here. "}<a href="/">{"Back to products"}</a></p>
        </div>
    }
}
