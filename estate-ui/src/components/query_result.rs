//! Query Result Component
//!
//! Summary panel plus the chart and table derived from a result.

use leptos::*;

use estate_chat::{shape, QueryResult};

use super::{Chart, DataTable};

#[component]
pub fn QueryResultPanel(result: QueryResult, page_size: usize) -> impl IntoView {
    let shaped = shape(&result);
    let summary = shaped.summary_text().to_string();

    view! {
        <div class="w-full space-y-4">
            <div class="bg-white p-4 rounded-lg shadow">
                <h3 class="text-lg font-semibold mb-2">"Analysis Summary"</h3>
                <div class="text-gray-700 whitespace-pre-line">{summary}</div>
            </div>

            {shaped.chart.map(|chart| view! { <Chart chart=chart /> })}

            {shaped.table.map(|table| view! { <DataTable table=table page_size=page_size /> })}
        </div>
    }
}
