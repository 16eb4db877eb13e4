use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct Props {
    /// Index of the first item on the page
    pub offset: u32,
    pub limit: u32,
    /// Items on the current page, a short page means it is the last one
    pub shown: usize,
    pub on_offset_change: Callback<u32>,
    #[prop_or(false)]
    pub is_loading: bool,
}

#[function_component]
pub fn PaginationControls(props: &Props) -> Html {
    let Props {
        offset,
        limit,
        shown,
        is_loading,
        ..
    } = *props;

    if offset == 0 && shown == 0 {
        return html! {};
    }

    let prev_disabled = offset == 0 || is_loading;
    let next_disabled = shown < limit as usize || is_loading;

    let on_previous = {
        let on_offset_change = props.on_offset_change.clone();
        Callback::from(move |_: MouseEvent| {
            on_offset_change.emit(offset.saturating_sub(limit));
        })
    };

    let on_next = {
        let on_offset_change = props.on_offset_change.clone();
        Callback::from(move |_: MouseEvent| {
            on_offset_change.emit(offset + limit);
        })
    };

    html! {
        <div class="flex items-center justify-between mt-6">
            <button onclick={on_previous} disabled={prev_disabled}>
                {"Previous"}
            </button>
            <span class="text-sm text-gray-500">
                {format!("Showing {}-{}", offset + 1, offset as usize + shown)}
            </span>
            <button onclick={on_next} disabled={next_disabled}>
                {"Next"}
            </button>
        </div>
    }
}
