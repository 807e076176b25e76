use agrochat::{ChatBackend, Endpoints, ReplyBody, RequestError, RequestResult};
use futures::FutureExt;
use futures::future::LocalBoxFuture;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, Response, Window};

use crate::dom::SelectedFile;
use crate::error::describe_js_error;

/// Backend calls through the page's `fetch`.
pub struct FetchBackend {
    window: Window,
    endpoints: Endpoints,
}

impl FetchBackend {
    pub fn new(window: Window, endpoints: Endpoints) -> Self {
        Self {
            window,
            endpoints: endpoints.normalized(),
        }
    }

    async fn post(&self, url: String, body: JsValue, json: bool) -> RequestResult<ReplyBody> {
        let init = RequestInit::new();
        init.set_method("POST");
        init.set_body(&body);

        let request = Request::new_with_str_and_init(&url, &init)
            .map_err(|error| transport("build-request", &url, &error))?;
        if json {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(|error| transport("set-headers", &url, &error))?;
        }

        let response = JsFuture::from(self.window.fetch_with_request(&request))
            .await
            .map_err(|error| transport("fetch", &url, &error))?;
        let response: Response = response
            .dyn_into()
            .map_err(|value| transport("fetch-response", &url, &value))?;

        // The body decides what is shown, an error status only gets logged.
        if !response.ok() {
            log::warn!(
                "backend '{}' answered with status {}",
                url,
                response.status()
            );
        }

        let text = response
            .text()
            .map_err(|error| transport("read-body", &url, &error))?;
        let text = JsFuture::from(text)
            .await
            .map_err(|error| transport("read-body", &url, &error))?;

        ReplyBody::decode(&url, &text.as_string().unwrap_or_default())
    }
}

impl ChatBackend for FetchBackend {
    type Attachment = SelectedFile;

    fn chat<'a>(&'a self, message: &'a str) -> LocalBoxFuture<'a, RequestResult<ReplyBody>> {
        async move {
            let payload = serde_json::json!({ "message": message }).to_string();
            self.post(self.endpoints.chat_url(), JsValue::from_str(&payload), true)
                .await
        }
        .boxed_local()
    }

    fn analyze_file<'a>(
        &'a self,
        attachment: &'a SelectedFile,
    ) -> LocalBoxFuture<'a, RequestResult<ReplyBody>> {
        async move {
            let url = self.endpoints.analyze_url();
            let form = FormData::new().map_err(|error| transport("build-form", &url, &error))?;
            let file = &attachment.0;
            form.append_with_blob_and_filename("file", file, &file.name())
                .map_err(|error| transport("build-form", &url, &error))?;

            self.post(url, form.into(), false).await
        }
        .boxed_local()
    }
}

fn transport(stage: &'static str, endpoint: &str, error: &JsValue) -> RequestError {
    RequestError::Transport {
        stage,
        endpoint: endpoint.to_string(),
        details: describe_js_error(error),
    }
}
