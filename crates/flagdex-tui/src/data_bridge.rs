//! Background tasks feeding the action channel.
//!
//! The loader fetches the directory once for an activation. The flag probe
//! checks flag URLs one at a time and reports the ones that do not load.
//! Both stop on cancellation; a cancelled loader sends nothing.

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use flagdex_api::CountryClient;
use flagdex_core::{ActivationId, DirectorySource, load_directory};

use crate::action::Action;

/// Fetch the directory for `activation` and report the result.
pub async fn run_loader<S: DirectorySource>(
    source: S,
    activation: ActivationId,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    tokio::select! {
        biased;

        () = cancel.cancelled() => {
            debug!(%activation, "loader cancelled before the fetch completed");
        }
        result = load_directory(&source) => {
            let _ = action_tx.send(Action::DirectoryLoaded { activation, result });
        }
    }
}

/// A flag URL to check for the card `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub key: String,
    pub url: String,
}

/// Check queued flag URLs sequentially.
///
/// Each distinct URL is requested at most once; later requests for the
/// same URL reuse the first outcome.
pub async fn run_flag_probe(
    client: CountryClient,
    mut requests: mpsc::UnboundedReceiver<ProbeRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut outcomes: HashMap<String, bool> = HashMap::new();

    loop {
        let next = tokio::select! {
            biased;

            () = cancel.cancelled() => None,
            request = requests.recv() => request,
        };
        let Some(request) = next else {
            break;
        };

        let loaded = if let Some(loaded) = outcomes.get(&request.url) {
            *loaded
        } else {
            let result = tokio::select! {
                biased;

                () = cancel.cancelled() => break,
                result = client.probe_image(&request.url) => result,
            };
            if let Err(ref e) = result {
                debug!(url = %request.url, error = %e, "flag did not load");
            }
            outcomes.insert(request.url.clone(), result.is_ok());
            result.is_ok()
        };

        if !loaded
            && action_tx
                .send(Action::FlagFailed {
                    key: request.key,
                    url: request.url,
                })
                .is_err()
        {
            break;
        }
    }

    let failed = outcomes.values().filter(|ok| !**ok).count();
    info!(probed = outcomes.len(), failed, "flag probe stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;
    use std::time::Duration;

    use flagdex_api::{FetchFailureKind, RawCountry, TransportConfig};
    use flagdex_core::{CoreError, DirectoryState, FilterMode};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    /// Returns the records, or a 503 when there are none.
    struct Canned(Option<Vec<RawCountry>>);

    impl DirectorySource for Canned {
        fn fetch_all(
            &self,
        ) -> impl Future<Output = Result<Vec<RawCountry>, flagdex_api::Error>> + Send {
            let result = self.0.clone().ok_or(flagdex_api::Error::HttpStatus {
                status: 503,
                body_preview: String::new(),
            });
            std::future::ready(result)
        }
    }

    /// Never completes.
    struct Stalled;

    impl DirectorySource for Stalled {
        fn fetch_all(
            &self,
        ) -> impl Future<Output = Result<Vec<RawCountry>, flagdex_api::Error>> + Send {
            std::future::pending()
        }
    }

    #[tokio::test]
    async fn loader_reports_records_for_its_activation() {
        let state = DirectoryState::activate(FilterMode::Literal);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let records = vec![RawCountry::from(json!({"common": "Chad", "png": "td.png"}))];

        run_loader(
            Canned(Some(records.clone())),
            state.activation(),
            tx,
            CancellationToken::new(),
        )
        .await;

        match rx.recv().await.unwrap() {
            Action::DirectoryLoaded { activation, result } => {
                assert_eq!(activation, state.activation());
                assert_eq!(result.unwrap(), records);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[tokio::test]
    async fn loader_reports_failures() {
        let state = DirectoryState::activate(FilterMode::Literal);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let failing = Canned(None);

        run_loader(failing, state.activation(), tx, CancellationToken::new()).await;

        let Some(Action::DirectoryLoaded { result, .. }) = rx.recv().await else {
            panic!("expected DirectoryLoaded");
        };
        assert!(matches!(
            result,
            Err(CoreError::Fetch {
                kind: FetchFailureKind::HttpStatus,
                status: Some(503),
                ..
            })
        ));
    }

    #[tokio::test]
    async fn cancelled_loader_sends_nothing() {
        let state = DirectoryState::activate(FilterMode::Literal);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_loader(Stalled, state.activation(), tx, cancel.clone()));
        cancel.cancel();
        task.await.unwrap();

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn only_failed_flags_are_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/td.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 8]))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let endpoint = format!("{}/countries", server.uri()).parse().unwrap();
        let client = CountryClient::new(endpoint, &TransportConfig::default()).unwrap();
        let (probe_tx, probe_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let ok = format!("{}/td.png", server.uri());
        let missing = format!("{}/missing.png", server.uri());
        for (key, url) in [("Chad", &ok), ("Atlantis", &missing), ("Lemuria", &missing)] {
            probe_tx
                .send(ProbeRequest {
                    key: key.into(),
                    url: url.clone(),
                })
                .unwrap();
        }
        drop(probe_tx);

        run_flag_probe(client, probe_rx, action_tx, CancellationToken::new()).await;

        let mut failed = Vec::new();
        while let Ok(action) = action_rx.try_recv() {
            if let Action::FlagFailed { key, url } = action {
                failed.push((key, url));
            }
        }
        assert_eq!(
            failed,
            vec![
                ("Atlantis".to_owned(), missing.clone()),
                ("Lemuria".to_owned(), missing.clone()),
            ]
        );
    }

    #[tokio::test]
    async fn stalled_flag_host_does_not_hold_up_later_cards() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow.png"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let endpoint = format!("{}/countries", server.uri()).parse().unwrap();
        let transport = TransportConfig::default().with_timeout(Duration::from_millis(200));
        let client = CountryClient::new(endpoint, &transport).unwrap();
        let (probe_tx, probe_rx) = mpsc::unbounded_channel();
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let slow = format!("{}/slow.png", server.uri());
        let gone = format!("{}/gone.png", server.uri());
        for (key, url) in [("Chad", &slow), ("Peru", &gone)] {
            probe_tx
                .send(ProbeRequest {
                    key: key.into(),
                    url: url.clone(),
                })
                .unwrap();
        }
        drop(probe_tx);

        tokio::time::timeout(
            Duration::from_secs(5),
            run_flag_probe(client, probe_rx, action_tx, CancellationToken::new()),
        )
        .await
        .unwrap();

        let mut failed = Vec::new();
        while let Ok(Action::FlagFailed { key, .. }) = action_rx.try_recv() {
            failed.push(key);
        }
        assert_eq!(failed, ["Chad", "Peru"]);
    }

    #[tokio::test]
    async fn flag_checks_stop_on_cancel() {
        let client = CountryClient::new(
            "http://127.0.0.1:9/countries".parse().unwrap(),
            &TransportConfig::default().with_timeout(Duration::from_secs(1)),
        )
        .unwrap();
        let (_probe_tx, probe_rx) = mpsc::unbounded_channel::<ProbeRequest>();
        let (action_tx, _action_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = tokio::spawn(run_flag_probe(client, probe_rx, action_tx, cancel.clone()));
        cancel.cancel();

        tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
    }
}
