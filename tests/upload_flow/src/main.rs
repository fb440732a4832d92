fn main() {
    println!("Run `cargo test -p upload-flow` to execute upload flow scenarios.");
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::{Arc, Mutex};

    use airlift_protocol::{RawFile, Strategy, Timing, UploadOptions, classify};
    use airlift_uploader::{
        ChunkedEvent, ChunkedHandle, ChunkedOptions, ChunkedTransport, HttpTransport,
        RequestBody, TransportError, TransportRequest, TransportResponse, Uploader,
    };
    use serde_json::json;
    use tokio::sync::mpsc;

    /// HTTP transport scripted with a queue of responses, recording every
    /// request it served.
    struct ScriptedHttp {
        responses: Mutex<Vec<Result<TransportResponse, TransportError>>>,
        requests: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedHttp {
        fn new(responses: Vec<Result<TransportResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn always_ok() -> Arc<Self> {
            // An empty script falls through to a generic success.
            Self::new(Vec::new())
        }
    }

    impl HttpTransport for ScriptedHttp {
        fn request(
            &self,
            req: TransportRequest,
        ) -> Pin<Box<dyn Future<Output = Result<TransportResponse, TransportError>> + Send + '_>>
        {
            self.requests
                .lock()
                .unwrap()
                .push((req.method.clone(), req.url.clone()));
            if let Some(on_progress) = &req.on_progress {
                if let RequestBody::Multipart(f) | RequestBody::Raw(f) = &req.body {
                    on_progress(f.size / 2, f.size);
                    on_progress(f.size, f.size);
                }
            }
            Box::pin(async move {
                let mut responses = self.responses.lock().unwrap();
                if responses.is_empty() {
                    Ok(TransportResponse { data: json!({"ok": true}) })
                } else {
                    responses.remove(0)
                }
            })
        }
    }

    /// Chunked transport whose handle drives the event channel, so the
    /// pause/resume/cancel wiring is observable.
    struct ManualChunked {
        auto_complete: bool,
    }

    struct ManualHandle {
        events: mpsc::UnboundedSender<ChunkedEvent>,
        paused: Mutex<bool>,
    }

    impl ChunkedHandle for ManualHandle {
        fn pause(&self) {
            *self.paused.lock().unwrap() = true;
        }
        fn resume(&self) {
            let was_paused = {
                let mut paused = self.paused.lock().unwrap();
                std::mem::replace(&mut *paused, false)
            };
            if was_paused {
                let _ = self.events.send(ChunkedEvent::Progress(60));
                let _ = self.events.send(ChunkedEvent::Success);
            }
        }
        fn abort(&self) {
            let _ = self.events.send(ChunkedEvent::Error("aborted".into()));
        }
    }

    impl ChunkedTransport for ManualChunked {
        fn create(
            &self,
            _options: ChunkedOptions,
            events: mpsc::UnboundedSender<ChunkedEvent>,
        ) -> Result<Box<dyn ChunkedHandle>, TransportError> {
            let _ = events.send(ChunkedEvent::Progress(30));
            if self.auto_complete {
                let _ = events.send(ChunkedEvent::Success);
            }
            Ok(Box::new(ManualHandle {
                events,
                paused: Mutex::new(false),
            }))
        }
    }

    fn png(name: &str, size: usize) -> RawFile {
        RawFile::new(name, "image/png", vec![0u8; size])
    }

    fn uploader(options: UploadOptions) -> Uploader {
        Uploader::new(
            options,
            ScriptedHttp::always_ok(),
            Arc::new(ManualChunked { auto_complete: true }),
        )
        .unwrap()
    }

    // --- classification scenarios ---

    #[test]
    fn deferred_chunked_classification() {
        let options = UploadOptions {
            chunk_size: Some(512),
            presigned: false,
            immediate: false,
            ..Default::default()
        };
        let mode = classify(&options).unwrap();
        assert_eq!(mode.timing, Timing::Deferred);
        assert_eq!(mode.strategy, Some(Strategy::Chunked));
    }

    #[test]
    fn immediate_without_url_fails_classification() {
        let options = UploadOptions {
            immediate: true,
            ..Default::default()
        };
        assert!(classify(&options).is_err());
    }

    // --- validation scenarios ---

    #[test]
    fn oversized_file_message_matches_template() {
        let options = UploadOptions {
            size_limit: Some(1000),
            multiple: true,
            ..Default::default()
        };
        let up = uploader(options);
        assert!(!up.add_file(png("a.png", 2000)));
        assert_eq!(
            up.errors().size_limit.as_deref(),
            Some("a.png: Invalid file size, files must be smaller than 1000 B.")
        );
        assert_eq!(
            up.first_error().as_deref(),
            Some("a.png: Invalid file size, files must be smaller than 1000 B.")
        );
    }

    #[test]
    fn accept_pattern_gates_mime_types() {
        let options = UploadOptions {
            accepts: Some("image/*".into()),
            multiple: true,
            ..Default::default()
        };
        let up = uploader(options);
        assert!(up.add_file(png("photo.png", 10)));
        assert!(!up.add_file(RawFile::new("notes.txt", "text/plain", vec![0u8; 10])));
        assert!(up.errors().file_type.is_some());
        assert_eq!(up.len(), 1);
    }

    #[test]
    fn batch_over_limit_is_rejected_in_full() {
        let options = UploadOptions {
            file_limit: Some(2),
            multiple: true,
            ..Default::default()
        };
        let up = uploader(options);
        assert!(up.add_file(png("existing.png", 10)));

        let accepted = up.add_batch(vec![png("a.png", 10), png("b.png", 10)]);
        assert!(accepted.is_empty());
        assert_eq!(up.len(), 1);
        assert!(up.errors().file_limit.is_some());
    }

    #[test]
    fn add_then_remove_restores_collection() {
        let up = uploader(UploadOptions {
            multiple: true,
            ..Default::default()
        });
        up.add_file(png("keep.png", 10));
        let before: Vec<u64> = up.files().iter().map(|f| f.id()).collect();

        up.add_file(png("temp.png", 10));
        let temp_id = up.files()[0].id();
        assert!(up.remove_file(temp_id));

        let after: Vec<u64> = up.files().iter().map(|f| f.id()).collect();
        assert_eq!(before, after);
        assert!(!up.remove_file(temp_id));
    }

    // --- upload scenarios ---

    #[tokio::test]
    async fn immediate_batch_uploads_concurrently_and_settles() {
        let http = ScriptedHttp::always_ok();
        let options = UploadOptions {
            url: "https://upload.example/files".into(),
            immediate: true,
            multiple: true,
            ..Default::default()
        };
        let up = Uploader::new(
            options,
            http.clone(),
            Arc::new(ManualChunked { auto_complete: true }),
        )
        .unwrap();

        up.on_selection(vec![png("a.png", 100), png("b.png", 100), png("c.png", 100)])
            .await
            .unwrap();

        assert_eq!(up.len(), 3);
        for file in up.files() {
            assert!(file.completed());
            assert!(!file.processing());
            assert_eq!(file.progress(), 100);
        }
        assert_eq!(http.requests.lock().unwrap().len(), 3);
        assert!(!up.has_errors());
    }

    #[tokio::test]
    async fn presigned_flow_end_to_end() {
        let http = ScriptedHttp::new(vec![
            Ok(TransportResponse {
                data: json!({"url": "https://bucket.example/signed", "key": "object-1"}),
            }),
            Ok(TransportResponse { data: json!(null) }),
        ]);
        let options = UploadOptions {
            url: "https://upload.example/presign".into(),
            presigned: true,
            multiple: true,
            ..Default::default()
        };
        let up = Uploader::new(
            options,
            http.clone(),
            Arc::new(ManualChunked { auto_complete: true }),
        )
        .unwrap();

        up.add_file(png("a.png", 100));
        let id = up.files()[0].id();
        up.upload(id, None).await.unwrap();

        let file = up.file(id).unwrap();
        assert!(file.completed());
        assert_eq!(file.response().unwrap()["key"], "object-1");

        let requests = http.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], ("post".into(), "https://upload.example/presign".into()));
        assert_eq!(requests[1], ("post".into(), "https://bucket.example/signed".into()));
    }

    #[tokio::test]
    async fn failed_upload_populates_endpoint_error_only_for_that_file() {
        let http = ScriptedHttp::new(vec![
            Err(TransportError::new("HTTP 500").with_server_message("disk full")),
            Ok(TransportResponse { data: json!({"ok": true}) }),
        ]);
        let options = UploadOptions {
            url: "https://upload.example/files".into(),
            multiple: true,
            ..Default::default()
        };
        let up = Uploader::new(
            options,
            http,
            Arc::new(ManualChunked { auto_complete: true }),
        )
        .unwrap();

        up.add_file(png("bad.png", 10));
        up.add_file(png("good.png", 10));
        let bad_id = up.files()[1].id();
        let good_id = up.files()[0].id();

        up.upload(bad_id, None).await.unwrap();
        up.upload(good_id, None).await.unwrap();

        assert_eq!(
            up.errors().endpoint.as_deref(),
            Some("bad.png: Upload failed. disk full")
        );
        assert!(up.file(bad_id).unwrap().completed());
        assert!(up.file(good_id).unwrap().completed());
    }

    #[tokio::test]
    async fn chunked_cancel_goes_through_the_live_handle() {
        let options = UploadOptions {
            url: "https://upload.example/files".into(),
            chunk_size: Some(512),
            multiple: true,
            ..Default::default()
        };
        let up = Arc::new(
            Uploader::new(
                options,
                ScriptedHttp::always_ok(),
                Arc::new(ManualChunked { auto_complete: false }),
            )
            .unwrap(),
        );

        up.add_file(png("big.iso", 4096));
        let id = up.files()[0].id();
        let file = up.file(id).unwrap();

        let task = tokio::spawn({
            let up = Arc::clone(&up);
            async move { up.upload(id, None).await }
        });

        // The first mirrored progress event means the attempt is live and
        // the control handle is attached.
        while file.progress() < 30 {
            tokio::task::yield_now().await;
        }
        file.cancel();
        task.await.unwrap().unwrap();

        assert!(file.completed());
        assert!(!file.processing());
        assert_eq!(
            up.errors().endpoint.as_deref(),
            Some("big.iso: Upload failed. aborted")
        );
    }

    #[tokio::test]
    async fn chunked_pause_and_resume() {
        let options = UploadOptions {
            url: "https://upload.example/files".into(),
            chunk_size: Some(512),
            multiple: true,
            ..Default::default()
        };
        let up = Arc::new(
            Uploader::new(
                options,
                ScriptedHttp::always_ok(),
                Arc::new(ManualChunked { auto_complete: false }),
            )
            .unwrap(),
        );

        up.add_file(png("big.iso", 4096));
        let id = up.files()[0].id();
        let file = up.file(id).unwrap();

        let task = tokio::spawn({
            let up = Arc::clone(&up);
            async move { up.upload(id, None).await }
        });

        while file.progress() < 30 {
            tokio::task::yield_now().await;
        }
        file.pause();
        file.resume();
        task.await.unwrap().unwrap();

        assert!(file.completed());
        assert_eq!(file.progress(), 60);
        assert!(!up.has_errors());
    }
}
