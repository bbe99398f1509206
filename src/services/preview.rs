use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::models::location::PreviewState;
use crate::services::geocode::Geocoder;

pub const SEARCHING_STATUS: &str = "Finding locations…";
pub const NOT_FOUND_STATUS: &str = "Couldn’t find locations. Try adding city + state.";
pub const FAILED_STATUS: &str = "Map lookup failed. Check your connection.";

#[derive(Clone, Debug, Default)]
struct Inputs {
    /// Bumped on every change; a finished lookup may only publish if it
    /// still matches.
    generation: u64,
    start: String,
    end: String,
}

impl Inputs {
    fn is_empty(&self) -> bool {
        self.start.trim().is_empty() && self.end.trim().is_empty()
    }
}

/// Drives the map preview: debounces input changes, geocodes both
/// endpoints in parallel, and cancels superseded lookups so only the
/// latest input ever reaches the published state.
#[derive(Clone)]
pub struct PreviewService {
    input_tx: Arc<watch::Sender<Inputs>>,
    state_rx: watch::Receiver<PreviewState>,
}

impl PreviewService {
    pub fn spawn(geocoder: Arc<dyn Geocoder>, debounce: Duration) -> Self {
        let (input_tx, input_rx) = watch::channel(Inputs::default());
        let (state_tx, state_rx) = watch::channel(PreviewState::idle());
        tokio::spawn(run(geocoder, debounce, input_rx, state_tx));
        Self {
            input_tx: Arc::new(input_tx),
            state_rx,
        }
    }

    /// Feeds the latest raw values of both inputs. Each call supersedes
    /// whatever cycle is pending or in flight.
    pub fn update(&self, start: &str, end: &str) {
        self.input_tx.send_modify(|inputs| {
            inputs.generation += 1;
            inputs.start = start.to_string();
            inputs.end = end.to_string();
        });
    }

    pub fn state(&self) -> PreviewState {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewState> {
        self.state_rx.clone()
    }
}

async fn run(
    geocoder: Arc<dyn Geocoder>,
    debounce: Duration,
    mut input_rx: watch::Receiver<Inputs>,
    state_tx: watch::Sender<PreviewState>,
) {
    while input_rx.changed().await.is_ok() {
        loop {
            let inputs = input_rx.borrow_and_update().clone();

            tokio::select! {
                changed = input_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    continue;
                }
                () = sleep(debounce) => {}
            }

            if inputs.is_empty() {
                let _ = state_tx.send(PreviewState::idle());
                break;
            }

            let _ = state_tx.send(PreviewState::new(SEARCHING_STATUS.into(), None, None));

            let lookups = async {
                tokio::join!(
                    geocoder.geocode(&inputs.start),
                    geocoder.geocode(&inputs.end)
                )
            };
            let (start, end) = tokio::select! {
                changed = input_rx.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    // Dropping the join aborts both requests.
                    debug!("superseding in-flight lookup");
                    continue;
                }
                results = lookups => results,
            };

            // Staleness guard on top of the cancellation above.
            if input_rx.borrow().generation != inputs.generation {
                continue;
            }

            let state = match (start, end) {
                (Ok(start), Ok(end)) => {
                    let status = if start.is_none() && end.is_none() {
                        NOT_FOUND_STATUS.into()
                    } else {
                        String::new()
                    };
                    PreviewState::new(status, start, end)
                }
                (start, end) => {
                    warn!("map lookup failed");
                    PreviewState::new(
                        FAILED_STATUS.into(),
                        start.ok().flatten(),
                        end.ok().flatten(),
                    )
                }
            };
            let _ = state_tx.send(state);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::location::{GeoLocation, DEFAULT_CENTER, DEFAULT_ZOOM};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::timeout;

    const DEBOUNCE: Duration = Duration::from_millis(50);
    const WAIT: Duration = Duration::from_secs(5);

    /// Scripted geocoder: records every query and answers from a fixed
    /// table. Unknown queries resolve to absent; "boom" fails; "slow:*"
    /// stalls long enough to be cancelled.
    #[derive(Default)]
    struct ScriptedGeocoder {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Geocoder for ScriptedGeocoder {
        async fn geocode(&self, place: &str) -> anyhow::Result<Option<GeoLocation>> {
            let query = place.trim();
            if query.is_empty() {
                return Ok(None);
            }
            self.calls.lock().unwrap().push(query.to_string());
            if query == "boom" {
                return Err(anyhow!("socket closed"));
            }
            if let Some(rest) = query.strip_prefix("slow:") {
                sleep(Duration::from_secs(60)).await;
                return Ok(Some(known(rest)));
            }
            match query {
                "Seattle, WA" => Ok(Some(known("Seattle"))),
                "Portland, OR" => Ok(Some(known("Portland"))),
                "Denver, C" | "Denver, CO" => Ok(Some(known("Denver"))),
                _ => Ok(None),
            }
        }
    }

    fn known(label: &str) -> GeoLocation {
        GeoLocation {
            lat: 40.0,
            lon: -100.0,
            label: label.to_string(),
        }
    }

    fn service() -> (Arc<ScriptedGeocoder>, PreviewService) {
        let geocoder = Arc::new(ScriptedGeocoder::default());
        let service = PreviewService::spawn(geocoder.clone(), DEBOUNCE);
        (geocoder, service)
    }

    async fn wait_for<F>(service: &PreviewService, mut pred: F) -> PreviewState
    where
        F: FnMut(&PreviewState) -> bool,
    {
        let mut rx = service.subscribe();
        timeout(WAIT, async {
            loop {
                {
                    let state = rx.borrow_and_update();
                    if pred(&state) {
                        return state.clone();
                    }
                }
                rx.changed().await.expect("preview worker alive");
            }
        })
        .await
        .expect("preview state should settle")
    }

    #[tokio::test]
    async fn resolves_both_endpoints() {
        let (_geocoder, service) = service();
        service.update("Seattle, WA", "Portland, OR");

        let state = wait_for(&service, |s| s.start.is_some() && s.end.is_some()).await;
        assert!(state.status.is_empty());
        assert_eq!(state.start.unwrap().label, "Seattle");
        assert_eq!(state.end.unwrap().label, "Portland");
    }

    #[tokio::test]
    async fn rapid_edits_coalesce_to_the_latest_value() {
        let (geocoder, service) = service();
        service.update("Denver, CO", "");
        // Second edit lands well inside the debounce window.
        sleep(Duration::from_millis(5)).await;
        service.update("Denver, C", "");

        let state = wait_for(&service, |s| s.start.is_some()).await;
        assert_eq!(state.start.unwrap().label, "Denver");

        let calls = geocoder.calls.lock().unwrap().clone();
        assert_eq!(calls, vec!["Denver, C".to_string()]);
    }

    #[tokio::test]
    async fn clearing_both_inputs_returns_to_idle() {
        let (_geocoder, service) = service();
        service.update("Seattle, WA", "");
        wait_for(&service, |s| s.start.is_some()).await;

        service.update("", "");
        let state = wait_for(&service, |s| s.start.is_none() && s.status.is_empty()).await;
        assert_eq!(state.center, DEFAULT_CENTER);
        assert_eq!(state.zoom, DEFAULT_ZOOM);
    }

    #[tokio::test]
    async fn unresolvable_endpoints_report_not_found() {
        let (_geocoder, service) = service();
        service.update("nowhere at all", "nothing either");

        let state = wait_for(&service, |s| s.status == NOT_FOUND_STATUS).await;
        assert!(state.start.is_none());
        assert!(state.end.is_none());
        assert_eq!(state.zoom, DEFAULT_ZOOM);
    }

    #[tokio::test]
    async fn lookup_errors_report_failure() {
        let (_geocoder, service) = service();
        service.update("boom", "Seattle, WA");

        let state = wait_for(&service, |s| s.status == FAILED_STATUS).await;
        assert_eq!(state.end.unwrap().label, "Seattle");
    }

    #[tokio::test]
    async fn in_flight_lookup_is_superseded_by_new_input() {
        let (_geocoder, service) = service();
        service.update("slow:Nowhere", "");
        wait_for(&service, |s| s.status == SEARCHING_STATUS).await;

        service.update("Seattle, WA", "");
        let state = wait_for(&service, |s| s.start.is_some()).await;
        // The stalled cycle's result never lands.
        assert_eq!(state.start.unwrap().label, "Seattle");
    }
}
