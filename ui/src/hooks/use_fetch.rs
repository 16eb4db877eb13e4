use fetch::{
    FetchError, HttpTransport, Payload, RequestController, RequestParams,
};
use std::cell::RefCell;
use yew::platform::spawn_local;
use yew::prelude::*;

/// Fetch hook return type
pub struct FetchHookReturn {
    pub data: Option<Payload>,
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub refetch: Callback<()>,
}

impl FetchHookReturn {
    /// Returns true if nothing has arrived yet and a request is in flight.
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && self.data.is_none() && self.error.is_none()
    }

    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// An error always wins over data. Otherwise the render function gets
    /// the data and whether a refetch is in progress.
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&Payload, bool) -> Html,
    {
        if let Some(error) = &self.error {
            return html! {
                <div class="p-4 rounded-md bg-red-50 border border-red-200">
                    <p class="font-semibold text-red-700">
                        {format!("Failed to load {}", context)}
                    </p>
                    <p class="text-sm text-red-700">{error.to_string()}</p>
                </div>
            };
        }

        match &self.data {
            Some(data) => render_fn(data, self.is_loading),
            None if self.is_loading => html! {
                <p class="text-center py-12 text-neutral-600">
                    {format!("Loading {}...", context)}
                </p>
            },
            None => html! {
                <p class="text-center py-12 text-neutral-600">
                    {format!("No {} found", context)}
                </p>
            },
        }
    }
}

/// Fetch `params` and keep the result in component state.
///
/// One controller lives as long as the component. It fetches on mount,
/// fetches again when `params` change (compared by their serialized form,
/// so rebuilding identical params each render is fine), and cancels the
/// in-flight request on unmount. Results of superseded requests are dropped.
///
/// # Example
///
/// ```ignore
/// #[function_component]
/// pub fn Greeting() -> Html {
///     let greeting = use_fetch(RequestParams::new("/api/greeting"));
///     greeting.render("greeting", |payload, _| html! {
///         <p>{payload.as_text().unwrap_or_default()}</p>
///     })
/// }
/// ```
#[hook]
pub fn use_fetch(params: RequestParams) -> FetchHookReturn {
    // The first operation is started with the controller and spawned once
    // the component is mounted.
    let setup = {
        let params = params.clone();
        use_memo((), move |_| {
            let (controller, initial) =
                RequestController::start(HttpTransport::default(), params);
            (controller, RefCell::new(Some(initial)))
        })
    };
    let controller = setup.0.clone();

    let state = {
        let controller = controller.clone();
        use_state(move || controller.state())
    };

    // Subscribe and run the first operation on mount, dispose on unmount
    {
        let controller = controller.clone();
        let setup = setup.clone();
        let state = state.clone();

        use_effect_with((), move |_| {
            let subscription = controller
                .subscribe(move |snapshot| state.set(snapshot.clone()));
            if let Some(initial) = setup.1.borrow_mut().take() {
                spawn_local(initial);
            }

            move || {
                controller.unsubscribe(subscription);
                controller.dispose();
            }
        });
    }

    // Refetch when params change
    {
        let controller = controller.clone();

        use_effect_with(params, move |params| {
            if let Some(operation) = controller.set_params(params.clone()) {
                spawn_local(operation);
            }
        });
    }

    let refetch = {
        let controller = controller.clone();
        Callback::from(move |()| spawn_local(controller.refetch()))
    };

    FetchHookReturn {
        data: state.data.clone(),
        is_loading: state.loading,
        error: state.error.clone(),
        refetch,
    }
}
