//! Data Table Component
//!
//! Paginated result table with a CSV download of every row.

use leptos::*;

use estate_chat::{Pager, TableData, CSV_FILENAME};

use crate::export;

#[component]
pub fn DataTable(table: TableData, page_size: usize) -> impl IntoView {
    let total = table.len();
    let columns = table.columns().to_vec();
    let table = store_value(table);

    let (page, set_page) = create_signal(0usize);
    let pager = move || Pager::new(total, page_size).with_page(page.get());

    let on_download = move |_| {
        let csv = table.with_value(TableData::to_csv);
        if let Err(e) = export::download_csv(&csv, CSV_FILENAME) {
            web_sys::console::error_1(&format!("CSV download failed: {}", e).into());
        }
    };

    let step = move |forward: bool| {
        set_page.update(|current| {
            let mut pager = Pager::new(total, page_size).with_page(*current);
            if forward {
                pager.next();
            } else {
                pager.previous();
            }
            *current = pager.page();
        });
    };

    let header_columns = columns.clone();

    view! {
        <div class="w-full bg-white rounded-lg shadow overflow-hidden mb-4">
            <div class="flex justify-between items-center p-4 border-b">
                <h3 class="text-lg font-semibold">"Data Table"</h3>
                <button
                    on:click=on_download
                    class="px-3 py-1 bg-gray-800 text-white rounded hover:bg-primary-dark"
                >
                    "Download CSV"
                </button>
            </div>

            <div class="overflow-x-auto">
                <table class="min-w-full divide-y divide-gray-200">
                    <thead class="bg-gray-50">
                        <tr>
                            {header_columns
                                .into_iter()
                                .map(|column| view! {
                                    <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 uppercase tracking-wider">
                                        {column}
                                    </th>
                                })
                                .collect_view()}
                        </tr>
                    </thead>
                    <tbody class="bg-white divide-y divide-gray-200">
                        {move || {
                            let pager = pager();
                            table.with_value(|table| {
                                table
                                    .page(&pager)
                                    .iter()
                                    .map(|row| view! {
                                        <tr>
                                            {columns
                                                .iter()
                                                .map(|column| view! {
                                                    <td class="px-6 py-4 whitespace-nowrap text-sm text-gray-500">
                                                        {TableData::cell(row, column)}
                                                    </td>
                                                })
                                                .collect_view()}
                                        </tr>
                                    })
                                    .collect_view()
                            })
                        }}
                    </tbody>
                </table>
            </div>

            <div class="bg-white px-4 py-3 flex items-center justify-between border-t border-gray-200 sm:px-6">
                <div class="flex-1 flex justify-between">
                    <button
                        on:click=move |_| step(false)
                        disabled=move || !pager().has_previous()
                        class="relative inline-flex items-center px-4 py-2 border border-gray-300 text-sm
                               font-medium rounded-md text-gray-700 bg-white hover:bg-gray-50 disabled:opacity-50"
                    >
                        "Previous"
                    </button>
                    <span class="text-sm text-gray-700">{move || pager().label()}</span>
                    <button
                        on:click=move |_| step(true)
                        disabled=move || !pager().has_next()
                        class="ml-3 relative inline-flex items-center px-4 py-2 border border-gray-300 text-sm
                               font-medium rounded-md text-gray-700 bg-white hover:bg-gray-50 disabled:opacity-50"
                    >
                        "Next"
                    </button>
                </div>
            </div>
        </div>
    }
}
