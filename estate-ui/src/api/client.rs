//! HTTP API Client
//!
//! Posts queries to the analysis backend as multipart form data.

use gloo_net::http::Request;
use web_sys::{File, FormData};

use estate_chat::config::{default_api_base, query_endpoint};
use estate_chat::QueryResult;

/// Query endpoint of the backend this build was configured for
pub fn query_url() -> String {
    query_endpoint(&default_api_base())
}

/// Submit a query, with an optional spreadsheet, and decode the answer.
///
/// Network errors, non-2xx responses and undecodable bodies are all errors.
pub async fn send_query(query: &str, file: Option<File>) -> Result<QueryResult, String> {
    let form = FormData::new().map_err(|e| format!("Form build error: {:?}", e))?;
    form.append_with_str("query", query)
        .map_err(|e| format!("Form build error: {:?}", e))?;
    if let Some(file) = &file {
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(|e| format!("Form build error: {:?}", e))?;
    }

    let url = query_url();

    let response = Request::post(&url)
        .body(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let body = response
        .text()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    QueryResult::from_json(&body).map_err(|e| format!("Parse error: {}", e))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_query_url_uses_build_time_base() {
        assert_eq!(query_url(), format!("{}/query/", default_api_base()));
    }
}
