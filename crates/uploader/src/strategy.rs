//! Upload strategy runners.
//!
//! One async runner per strategy. All three settle locally: transport
//! failures land in the [`ErrorBag`]'s `endpoint` slot and never propagate
//! as `Err`. A runner may be re-invoked on the same file; each invocation
//! re-runs the full exchange from scratch.

use std::collections::HashMap;
use std::sync::Arc;

use airlift_protocol::{RawFile, UploadOptions, render};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::{ErrorBag, ErrorSlot};
use crate::file::{TrackedFile, percent};
use crate::transport::{
    ChunkedEvent, ChunkedOptions, ChunkedTransport, HttpTransport, RequestBody, TransportRequest,
};

pub(crate) const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Merges session headers with per-call extras. `content_type`, when given,
/// wins over both.
fn merge_headers(
    options: &UploadOptions,
    extra: Option<&HashMap<String, String>>,
    content_type: Option<&str>,
) -> HashMap<String, String> {
    let mut headers = options.headers.clone();
    if let Some(extra) = extra {
        headers.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    if let Some(ct) = content_type {
        headers.insert("content-type".to_string(), ct.to_string());
    }
    headers
}

fn progress_callback(file: &Arc<TrackedFile>) -> Box<dyn Fn(u64, u64) + Send + Sync> {
    let file = Arc::clone(file);
    Box::new(move |sent, total| file.set_progress(percent(sent, total)))
}

fn record_endpoint_error(options: &UploadOptions, errors: &ErrorBag, name: &str, detail: &str) {
    warn!(file = %name, error = %detail, "upload failed");
    errors.set(
        ErrorSlot::Endpoint,
        render(&options.endpoint_message, name, detail),
    );
}

/// Direct multipart POST of the whole file to the configured endpoint.
pub(crate) async fn run_direct(
    file: &Arc<TrackedFile>,
    options: &UploadOptions,
    transport: &dyn HttpTransport,
    errors: &ErrorBag,
    extra_headers: Option<&HashMap<String, String>>,
) {
    file.reset_progress();
    file.set_completed(false);
    file.set_processing(true);
    debug!(file = %file.name(), url = %options.url, "direct upload started");

    let request = TransportRequest {
        method: options.method.as_str().to_string(),
        url: options.url.clone(),
        body: RequestBody::Multipart(file.raw()),
        headers: merge_headers(options, extra_headers, Some(MULTIPART_CONTENT_TYPE)),
        on_progress: Some(progress_callback(file)),
    };

    match transport.request(request).await {
        Ok(response) => {
            file.set_response(response.data);
            info!(file = %file.name(), "direct upload completed");
        }
        Err(err) => {
            // The direct flow prefers the server's own error body when the
            // endpoint returned one; the other flows use the formatted error.
            let detail = err.server_message.clone().unwrap_or(err.message);
            record_endpoint_error(options, errors, file.name(), &detail);
        }
    }

    file.set_completed(true);
    file.set_processing(false);
}

/// Metadata the presign step sends to obtain an upload target.
fn presign_metadata(raw: &RawFile) -> serde_json::Value {
    json!({
        "name": raw.name,
        "size": raw.size,
        "type": raw.content_type,
        "extension": raw.extension(),
    })
}

/// Two-phase presigned flow: obtain an upload URL, then transfer the file.
pub(crate) async fn run_presigned(
    file: &Arc<TrackedFile>,
    options: &UploadOptions,
    transport: &dyn HttpTransport,
    errors: &ErrorBag,
    extra_headers: Option<&HashMap<String, String>>,
) {
    file.reset_progress();
    file.set_completed(false);
    debug!(file = %file.name(), url = %options.url, "presign requested");

    let raw = file.raw();
    let presign = TransportRequest {
        method: "post".to_string(),
        url: options.url.clone(),
        body: RequestBody::Json(presign_metadata(&raw)),
        headers: merge_headers(options, extra_headers, None),
        on_progress: None,
    };

    let response = match transport.request(presign).await {
        Ok(response) => response,
        Err(err) => {
            record_endpoint_error(options, errors, file.name(), &err.to_string());
            file.set_processing(false);
            return;
        }
    };

    file.set_processing(true);
    file.set_response(response.data.clone());

    let Some(target) = response.data.get("url").and_then(|v| v.as_str()) else {
        record_endpoint_error(
            options,
            errors,
            file.name(),
            "presign response has no upload url",
        );
        file.set_processing(false);
        return;
    };

    let transfer = TransportRequest {
        method: options.method.as_str().to_string(),
        url: target.to_string(),
        body: RequestBody::Raw(raw),
        headers: merge_headers(options, extra_headers, None),
        on_progress: Some(progress_callback(file)),
    };

    match transport.request(transfer).await {
        Ok(_) => {
            file.set_completed(true);
            info!(file = %file.name(), "presigned upload completed");
        }
        Err(err) => {
            record_endpoint_error(options, errors, file.name(), &err.to_string());
        }
    }

    file.set_processing(false);
}

/// Resumable flow delegated to the chunked transport. Progress, success and
/// error notifications are mirrored onto the record; pause/resume/cancel
/// are wired to the transport handle for the lifetime of the attempt.
pub(crate) async fn run_chunked(
    file: &Arc<TrackedFile>,
    options: &UploadOptions,
    transport: &dyn ChunkedTransport,
    errors: &ErrorBag,
    extra_headers: Option<&HashMap<String, String>>,
) {
    file.reset_progress();
    file.set_completed(false);
    file.set_processing(true);

    let Some(chunk_size) = options.chunk_size else {
        // Unreachable through mode dispatch; settle consistently anyway.
        record_endpoint_error(options, errors, file.name(), "no chunk size configured");
        file.set_completed(true);
        file.set_processing(false);
        return;
    };

    debug!(file = %file.name(), chunk_size, "chunked upload started");

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let chunked_options = ChunkedOptions {
        endpoint: options.url.clone(),
        method: options.method.as_upper().to_string(),
        file: file.raw(),
        chunk_size,
        headers: merge_headers(options, extra_headers, None),
    };

    let handle = match transport.create(chunked_options, events_tx) {
        Ok(handle) => handle,
        Err(err) => {
            record_endpoint_error(options, errors, file.name(), &err.to_string());
            file.set_completed(true);
            file.set_processing(false);
            return;
        }
    };
    file.attach_control(Arc::from(handle));

    let mut settled = false;
    while let Some(event) = events_rx.recv().await {
        match event {
            ChunkedEvent::Progress(pct) => file.set_progress(pct),
            ChunkedEvent::Success => {
                file.set_completed(true);
                info!(file = %file.name(), "chunked upload completed");
                settled = true;
                break;
            }
            ChunkedEvent::Error(detail) => {
                record_endpoint_error(options, errors, file.name(), &detail);
                file.set_completed(true);
                settled = true;
                break;
            }
        }
    }

    if !settled {
        record_endpoint_error(
            options,
            errors,
            file.name(),
            "transport closed without completing",
        );
        file.set_completed(true);
    }

    file.detach_control();
    file.set_processing(false);
}
