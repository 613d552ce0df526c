//! Message Component
//!
//! A single chat bubble.

use leptos::*;

use estate_chat::ChatMessage;

#[component]
pub fn Message(message: ChatMessage) -> impl IntoView {
    let class = if message.is_user {
        "max-w-3xl rounded-lg p-4 mb-4 bg-primary-light text-white self-end"
    } else {
        "max-w-3xl rounded-lg p-4 mb-4 bg-gray-100 text-gray-800 self-start"
    };

    view! {
        <div class=class>
            <div class="text-sm font-semibold mb-1">{message.author()}</div>
            <div>{message.text}</div>
        </div>
    }
}
