use crate::core::engine::MorseEngine;
use crate::domain::model::{BeaconMessage, BeaconReport};
use crate::domain::ports::{ConfigProvider, MessageSource};
use crate::utils::error::{MorseError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Fetches beacon messages over HTTP GET.
pub struct HttpBeaconSource {
    url: String,
    client: Client,
}

impl HttpBeaconSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl MessageSource for HttpBeaconSource {
    async fn fetch(&self) -> Result<Option<BeaconMessage>> {
        tracing::debug!("Polling beacon: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        tracing::debug!("Beacon response status: {}", status);
        if status != StatusCode::OK {
            return Err(MorseError::BeaconStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let json_data: serde_json::Value = serde_json::from_slice(&body)?;

        match json_data.get("message") {
            Some(serde_json::Value::String(message)) => Ok(Some(BeaconMessage {
                message: message.clone(),
            })),
            Some(_) => Err(MorseError::ProcessingError {
                message: "beacon message is not a string".to_string(),
            }),
            None => {
                tracing::debug!("Beacon response carried no message");
                Ok(None)
            }
        }
    }

    fn describe(&self) -> &str {
        &self.url
    }
}

/// Whether the background poller was started.
#[derive(Debug)]
pub enum PollerState {
    /// No beacon configured; nothing was spawned.
    Idle,
    Polling(JoinHandle<()>),
}

impl PollerState {
    pub fn is_polling(&self) -> bool {
        matches!(self, PollerState::Polling(_))
    }

    /// Waits for the poller task to finish. Returns immediately when idle.
    pub async fn join(self) {
        if let PollerState::Polling(handle) = self {
            if let Err(e) = handle.await {
                tracing::error!("Beacon poller task failed: {}", e);
            }
        }
    }
}

/// Periodically fetches a message, decodes it and scans it for flags.
pub struct BeaconPoller<S: MessageSource> {
    source: S,
    engine: MorseEngine,
    interval: Duration,
}

impl BeaconPoller<HttpBeaconSource> {
    /// Builds an HTTP poller, or `None` when no beacon URL is configured.
    pub fn from_config<C: ConfigProvider>(config: &C, engine: MorseEngine) -> Result<Option<Self>> {
        let Some(url) = config.beacon_url() else {
            return Ok(None);
        };

        let source = HttpBeaconSource::new(url, config.request_timeout())?;
        Ok(Some(Self::new(source, engine, config.poll_interval())))
    }
}

impl<S: MessageSource + 'static> BeaconPoller<S> {
    pub fn new(source: S, engine: MorseEngine, interval: Duration) -> Self {
        Self {
            source,
            engine,
            interval,
        }
    }

    pub async fn poll_once(&self) -> Result<Option<BeaconReport>> {
        let Some(message) = self.source.fetch().await? else {
            return Ok(None);
        };

        let result = self.engine.process(&message.message);
        tracing::info!("Beacon morse: {}", result.original);
        tracing::info!("Beacon decoded: {}", result.decoded);
        if result.flag_found {
            tracing::warn!("🚩 FLAG INDICATOR FOUND in beacon message: {}", result.decoded);
        }

        Ok(Some(BeaconReport {
            raw: result.original,
            decoded: result.decoded,
            flag_found: result.flag_found,
            received_at: chrono::Utc::now(),
        }))
    }

    /// Polls until `shutdown` changes or its sender is dropped.
    ///
    /// Failed iterations are logged and never end the loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Beacon poller started for {} (interval {:?})",
            self.source.describe(),
            self.interval
        );

        loop {
            let stopped = *shutdown.borrow();
            if stopped {
                break;
            }

            tokio::select! {
                result = self.poll_once() => {
                    if let Err(e) = result {
                        tracing::error!("Error polling beacon: {}", e);
                    }
                }
                _ = shutdown.changed() => break,
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!("Beacon poller stopped");
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}

/// Starts the beacon poller on its own task when a beacon URL is configured.
pub fn start<C: ConfigProvider>(
    config: &C,
    engine: MorseEngine,
    shutdown: watch::Receiver<bool>,
) -> Result<PollerState> {
    match BeaconPoller::<HttpBeaconSource>::from_config(config, engine)? {
        Some(poller) => Ok(PollerState::Polling(poller.spawn(shutdown))),
        None => {
            tracing::info!("No beacon URL configured, beacon polling disabled");
            Ok(PollerState::Idle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::symbol_table::SymbolTable;
    use httpmock::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Instant;

    struct MockConfig {
        beacon_url: Option<String>,
        poll_interval: Duration,
    }

    impl MockConfig {
        fn new(beacon_url: Option<String>) -> Self {
            Self {
                beacon_url,
                poll_interval: Duration::from_millis(20),
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn bind_address(&self) -> String {
            "127.0.0.1:0".to_string()
        }

        fn beacon_url(&self) -> Option<&str> {
            self.beacon_url.as_deref()
        }

        fn morse_table_path(&self) -> &str {
            "morse-code.csv"
        }

        fn poll_interval(&self) -> Duration {
            self.poll_interval
        }

        fn request_timeout(&self) -> Duration {
            Duration::from_secs(2)
        }
    }

    /// Counts fetches and always fails.
    struct FailingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl MessageSource for FailingSource {
        async fn fetch(&self) -> Result<Option<BeaconMessage>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MorseError::BeaconStatus { status: 503 })
        }

        fn describe(&self) -> &str {
            "failing"
        }
    }

    fn engine() -> MorseEngine {
        let table: SymbolTable = [
            ("-.-.", "C"),
            ("-..", "D"),
            (".", "E"),
            ("..-.", "F"),
            ("--.", "G"),
            (".-", "A"),
            (".-..", "L"),
            ("---", "O"),
            ("...", "S"),
        ]
        .into_iter()
        .collect();
        MorseEngine::new(Arc::new(table))
    }

    #[tokio::test]
    async fn test_poll_once_decodes_message() {
        let server = MockServer::start();
        let beacon_mock = server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"message": "... --- ..."}));
        });

        let source = HttpBeaconSource::new(server.url("/beacon"), Duration::from_secs(2)).unwrap();
        let poller = BeaconPoller::new(source, engine(), Duration::from_secs(5));

        let report = poller.poll_once().await.unwrap().unwrap();

        beacon_mock.assert();
        assert_eq!(report.raw, "... --- ...");
        assert_eq!(report.decoded, "SOS");
        assert!(!report.flag_found);
    }

    #[tokio::test]
    async fn test_poll_once_detects_flag() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(200)
                .json_body(serde_json::json!({"message": "..-. .-.. .- --."}));
        });

        let source = HttpBeaconSource::new(server.url("/beacon"), Duration::from_secs(2)).unwrap();
        let poller = BeaconPoller::new(source, engine(), Duration::from_secs(5));

        let report = poller.poll_once().await.unwrap().unwrap();
        assert_eq!(report.decoded, "FLAG");
        assert!(report.flag_found);
    }

    #[tokio::test]
    async fn test_poll_once_without_message_field() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(200).json_body(serde_json::json!({"status": "idle"}));
        });

        let source = HttpBeaconSource::new(server.url("/beacon"), Duration::from_secs(2)).unwrap();
        let poller = BeaconPoller::new(source, engine(), Duration::from_secs(5));

        assert!(poller.poll_once().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_poll_once_non_200_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(500);
        });

        let source = HttpBeaconSource::new(server.url("/beacon"), Duration::from_secs(2)).unwrap();
        let poller = BeaconPoller::new(source, engine(), Duration::from_secs(5));

        match poller.poll_once().await {
            Err(MorseError::BeaconStatus { status }) => assert_eq!(status, 500),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_poll_once_malformed_body_is_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(200).body("<html>not json</html>");
        });

        let source = HttpBeaconSource::new(server.url("/beacon"), Duration::from_secs(2)).unwrap();
        let poller = BeaconPoller::new(source, engine(), Duration::from_secs(5));

        assert!(matches!(
            poller.poll_once().await,
            Err(MorseError::SerializationError(_))
        ));
    }

    #[tokio::test]
    async fn test_poll_once_slow_beacon_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(200)
                .json_body(serde_json::json!({"message": "... --- ..."}))
                .delay(Duration::from_secs(3));
        });

        let source =
            HttpBeaconSource::new(server.url("/beacon"), Duration::from_millis(300)).unwrap();
        let poller = BeaconPoller::new(source, engine(), Duration::from_secs(5));

        let started = Instant::now();
        let result = poller.poll_once().await;
        let elapsed = started.elapsed();

        match result {
            Err(MorseError::ApiError(e)) => assert!(e.is_timeout(), "not a timeout: {}", e),
            other => panic!("expected a request timeout, got {:?}", other),
        }
        assert!(elapsed < Duration::from_secs(2), "took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_timeouts_do_not_stop_the_loop() {
        let server = MockServer::start();
        let beacon_mock = server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(200)
                .json_body(serde_json::json!({"message": "... --- ..."}))
                .delay(Duration::from_secs(3));
        });

        let source =
            HttpBeaconSource::new(server.url("/beacon"), Duration::from_millis(100)).unwrap();
        let (tx, rx) = watch::channel(false);
        let handle = BeaconPoller::new(source, engine(), Duration::from_millis(20)).spawn(rx);

        tokio::time::sleep(Duration::from_millis(700)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller did not stop")
            .unwrap();

        // every request timed out, yet the loop kept polling
        assert!(beacon_mock.hits_async().await >= 2);
    }

    #[tokio::test]
    async fn test_start_without_url_is_idle() {
        let (_tx, rx) = watch::channel(false);
        let state = start(&MockConfig::new(None), engine(), rx).unwrap();
        assert!(!state.is_polling());
        state.join().await;
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FailingSource {
            calls: calls.clone(),
        };
        let (tx, rx) = watch::channel(false);
        let handle = BeaconPoller::new(source, engine(), Duration::from_millis(10)).spawn(rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller did not stop")
            .unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn test_started_poller_hits_beacon_until_shutdown() {
        let server = MockServer::start();
        let beacon_mock = server.mock(|when, then| {
            when.method(GET).path("/beacon");
            then.status(200)
                .json_body(serde_json::json!({"message": "-.-. --- -.. ."}));
        });

        let (tx, rx) = watch::channel(false);
        let config = MockConfig::new(Some(server.url("/beacon")));
        let state = start(&config, engine(), rx).unwrap();
        assert!(state.is_polling());

        tokio::time::sleep(Duration::from_millis(200)).await;
        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(3), state.join())
            .await
            .expect("poller did not stop");

        assert!(beacon_mock.hits_async().await >= 1);
    }

    #[tokio::test]
    async fn test_dropped_sender_stops_poller() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = FailingSource {
            calls: calls.clone(),
        };
        let (tx, rx) = watch::channel(false);
        let handle = BeaconPoller::new(source, engine(), Duration::from_secs(60)).spawn(rx);

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(tx);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("poller did not stop")
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
