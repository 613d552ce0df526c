//! Loading Component

use leptos::*;

/// Bouncing dots shown while the backend is working
#[component]
pub fn TypingIndicator() -> impl IntoView {
    view! {
        <div class="self-start bg-gray-100 text-gray-800 rounded-lg p-4 mb-4 flex items-center">
            <div class="w-3 h-3 bg-gray-500 rounded-full animate-bounce mr-1" />
            <div class="w-3 h-3 bg-gray-500 rounded-full animate-bounce animation-delay-200 mr-1" />
            <div class="w-3 h-3 bg-gray-500 rounded-full animate-bounce animation-delay-400" />
        </div>
    }
}
