//! Chat Input Component
//!
//! Question box with an optional spreadsheet attachment.

use leptos::*;
use web_sys::File;

use crate::state::global::GlobalState;

#[component]
pub fn ChatInput() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let loading = state.is_loading();

    let (query, set_query) = create_signal(String::new());
    let file = create_rw_signal(None::<File>);
    let file_input = create_node_ref::<html::Input>();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let q = query.get_untracked();
        if q.trim().is_empty() || loading.get_untracked() {
            return;
        }

        state.send_query(q, file.get_untracked());

        set_query.set(String::new());
        file.set(None);
        if let Some(input) = file_input.get_untracked() {
            input.set_value("");
        }
    };

    let on_file_change = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        file.set(input.files().and_then(|files| files.get(0)));
    };

    view! {
        <form on:submit=on_submit class="sticky bottom-0 bg-white p-4 border-t border-gray-200">
            <div class="flex flex-col space-y-2">
                <div class="flex items-center space-x-2">
                    <input
                        type="file"
                        accept=".csv,.xlsx,.xls"
                        node_ref=file_input
                        on:change=on_file_change
                        class="text-sm text-gray-500 file:mr-4 file:py-2 file:px-4 file:rounded-full
                               file:border-0 file:text-sm file:font-semibold file:bg-primary-light
                               file:text-white hover:file:bg-primary"
                    />
                    {move || file.with(|f| f.as_ref().map(File::name)).map(|name| view! {
                        <span class="text-sm text-gray-600">{name}</span>
                    })}
                </div>

                <div class="flex space-x-2">
                    <input
                        type="text"
                        placeholder="Ask about real estate data (e.g., 'Analyze Wakad')"
                        prop:value=move || query.get()
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                        class="flex-grow px-4 py-2 border border-gray-300 rounded-full
                               focus:outline-none focus:ring-2 focus:ring-primary"
                    />
                    <button
                        type="submit"
                        disabled=move || loading.get()
                        class="px-6 py-2 bg-primary text-white rounded-full hover:bg-primary-dark
                               disabled:opacity-50 disabled:cursor-not-allowed
                               focus:outline-none focus:ring-2 focus:ring-primary"
                    >
                        "Send"
                    </button>
                </div>
            </div>
        </form>
    }
}
