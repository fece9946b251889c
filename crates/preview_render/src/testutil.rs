//! Test doubles shared across the renderer test modules.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use preview_host::{DownloadedFile, FileApi, FileApiFuture, FileBlob, MemoryFileApi, PreviewError};

/// File API wrapper that suspends once before answering, so tests can
/// interleave a `destroy()` with an in-flight fetch.
pub(crate) struct SlowApi(pub(crate) MemoryFileApi);

struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

impl FileApi for SlowApi {
    fn fetch_blob<'a>(&'a self, path: &'a str) -> FileApiFuture<'a, Result<FileBlob, PreviewError>> {
        Box::pin(async move {
            YieldOnce(false).await;
            self.0.fetch_blob(path).await
        })
    }

    fn fetch_json<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<serde_json::Value, PreviewError>> {
        Box::pin(async move {
            YieldOnce(false).await;
            self.0.fetch_json(path).await
        })
    }

    fn fetch_download<'a>(
        &'a self,
        path: &'a str,
    ) -> FileApiFuture<'a, Result<DownloadedFile, PreviewError>> {
        Box::pin(async move {
            YieldOnce(false).await;
            self.0.fetch_download(path).await
        })
    }
}
