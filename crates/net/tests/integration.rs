//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use arcade_errors::{Error, NetworkError};
    use arcade_events::channel;
    use arcade_net::*;
    use httpmock::prelude::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    fn quick_client() -> NetClient {
        NetClient::new(NetConfig {
            retry_count: 1,
            retry_delay: Duration::from_millis(10),
            ..NetConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_download_file() {
        let server = MockServer::start();
        let content = vec![7u8; 64 * 1024];
        let mock = server.mock(|when, then| {
            when.method(GET).path("/g1.zip");
            then.status(200)
                .header("content-length", content.len().to_string())
                .body(&content);
        });

        let temp = tempdir().unwrap();
        let dest = temp.path().join("Downloads").join("g1.zip");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = move |p: TransferProgress| sink.lock().unwrap().push(p);

        let downloader = Downloader::new(quick_client());
        let written = downloader
            .download(
                &server.url("/g1.zip"),
                &dest,
                &progress,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        mock.assert();
        assert_eq!(written, content.len() as u64);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), content);

        drop(progress);
        let seen = Arc::try_unwrap(seen).unwrap().into_inner().unwrap();
        assert!(!seen.is_empty());
        assert!(seen.windows(2).all(|w| w[0].received <= w[1].received));
        let last = seen.last().unwrap();
        assert_eq!(last.received, content.len() as u64);
        assert_eq!(last.total, content.len() as u64);
    }

    #[tokio::test]
    async fn test_download_replaces_stale_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/g1.zip");
            then.status(200).body("fresh");
        });

        let temp = tempdir().unwrap();
        let dest = temp.path().join("g1.zip");
        tokio::fs::write(&dest, "stale archive contents that are longer")
            .await
            .unwrap();

        let downloader = Downloader::new(quick_client());
        downloader
            .download(
                &server.url("/g1.zip"),
                &dest,
                &|_: TransferProgress| {},
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(tokio::fs::read_to_string(&dest).await.unwrap(), "fresh");
    }

    #[tokio::test]
    async fn test_download_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/missing.zip");
            then.status(404);
        });

        let temp = tempdir().unwrap();
        let error = Downloader::new(quick_client())
            .download(
                &server.url("/missing.zip"),
                &temp.path().join("missing.zip"),
                &|_: TransferProgress| {},
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::Network(NetworkError::HttpError { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_download_cancelled() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow.zip");
            then.status(200).delay(Duration::from_secs(10)).body("late");
        });

        let temp = tempdir().unwrap();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let error = Downloader::new(quick_client())
            .download(
                &server.url("/slow.zip"),
                &temp.path().join("slow.zip"),
                &|_: TransferProgress| {},
                &cancel,
            )
            .await
            .unwrap_err();

        assert!(error.is_cancelled());
    }

    #[tokio::test]
    async fn test_fetch_text() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        let content = r#"[{"id":"1"}]"#;
        server.mock(|when, then| {
            when.method(GET).path("/experiences.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(content);
        });

        let text = fetch_text(&quick_client(), &server.url("/experiences.json"), &tx)
            .await
            .unwrap();
        assert_eq!(text, content);
    }

    #[tokio::test]
    async fn test_http_error_handling() {
        let server = MockServer::start();
        let (tx, _rx) = channel();

        server.mock(|when, then| {
            when.method(GET).path("/404");
            then.status(404).body("Not Found");
        });

        let error = fetch_text(&quick_client(), &server.url("/404"), &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            Error::Network(NetworkError::HttpError { status: 404, .. })
        ));
    }
}
