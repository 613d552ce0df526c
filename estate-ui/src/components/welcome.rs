//! Welcome Component
//!
//! Shown until the first message is sent.

use leptos::*;

/// Example questions the backend understands
pub const EXAMPLE_QUERIES: [&str; 3] = [
    "Give me analysis of Wakad",
    "Compare Ambegaon Budruk and Aundh demand trends",
    "Show price growth for Akurdi over last 3 years",
];

#[component]
pub fn Welcome() -> impl IntoView {
    view! {
        <div class="bg-white p-4 rounded-lg shadow text-center">
            <h2 class="text-xl font-semibold mb-2">"Welcome to Real Estate Analysis Chatbot!"</h2>
            <p class="text-gray-600 mb-4">"Ask me questions about real estate data. For example:"</p>
            <div class="space-y-2 text-left max-w-md mx-auto">
                {EXAMPLE_QUERIES
                    .iter()
                    .map(|query| view! {
                        <div class="bg-gray-100 p-2 rounded">{format!("\"{}\"", query)}</div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
