//! App Root Component
//!
//! Page layout: header, chat transcript, result panel and input form.

use leptos::*;

use estate_chat::{ChatMessage, ChatState};

use crate::components::{ChatInput, Message, QueryResultPanel, TypingIndicator, Welcome};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    provide_global_state();
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let chat = state.chat;

    let messages = create_memo(move |_| chat.with(|c| c.messages().to_vec()));
    let result = create_memo(move |_| chat.with(|c| c.visible_result().cloned()));
    let error = create_memo(move |_| chat.with(|c| c.error().map(str::to_string)));

    // Keep the newest message in view
    let messages_end = create_node_ref::<html::Div>();
    create_effect(move |_| {
        messages.with(|m| m.len());
        if let Some(end) = messages_end.get() {
            end.scroll_into_view();
        }
    });

    view! {
        <div class="min-h-screen bg-gray-50 flex flex-col">
            <header class="bg-gray-600 text-white p-4 shadow">
                <div class="container mx-auto">
                    <h1 class="text-2xl font-bold">"Real Estate Analysis Chatbot"</h1>
                    <p class="text-sm opacity-80">"Ask questions about real estate data"</p>
                </div>
            </header>

            <main class="flex-grow container mx-auto p-4 flex flex-col">
                <div class="flex-grow flex flex-col overflow-y-auto mb-4">
                    {move || messages.with(Vec::is_empty).then(|| view! { <Welcome /> })}

                    <div class="flex flex-col space-y-4 mt-4">
                        <For
                            each=move || messages.get().into_iter().enumerate()
                            key=|(idx, _)| *idx
                            children=move |(_, message): (usize, ChatMessage)| {
                                view! { <Message message=message /> }
                            }
                        />

                        {move || chat.with(ChatState::is_loading).then(|| view! { <TypingIndicator /> })}

                        {move || error.get().map(|e| view! {
                            <div class="self-start bg-red-100 text-red-800 rounded-lg p-4 mb-4">{e}</div>
                        })}

                        {move || result.get().map(|result| view! {
                            <div class="self-start w-full max-w-4xl">
                                <QueryResultPanel result=result page_size=state.page_size />
                            </div>
                        })}

                        <div node_ref=messages_end />
                    </div>
                </div>

                <ChatInput />
            </main>

            <footer class="bg-gray-800 text-white p-2 text-center text-sm">
                "Real Estate Analysis Chatbot © 2025"
            </footer>
        </div>
    }
}
