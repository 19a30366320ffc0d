use crate::api::{ExploreBackend, ExploreResult};
use crate::config::ApiKeys;
use crate::error::ExploreError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Fixed pool the random-destination action draws from.
pub const DESTINATIONS: [&str; 15] = [
    "Kyoto, Japan",
    "Santorini, Greece",
    "Reykjavik, Iceland",
    "Cape Town, South Africa",
    "Machu Picchu, Peru",
    "Paris, France",
    "New York, USA",
    "Sydney, Australia",
    "Rome, Italy",
    "Banff, Canada",
    "Dubai, UAE",
    "Istanbul, Turkey",
    "Petra, Jordan",
    "Barcelona, Spain",
    "Amsterdam, Netherlands",
];

pub fn random_destination(rng: &mut impl rand::Rng) -> &'static str {
    use rand::RngExt;
    DESTINATIONS[rng.random_range(0..DESTINATIONS.len())]
}

/// Completions flowing back into the event loop. Every variant carries the
/// generation of the search that produced it so stale results can be dropped.
#[derive(Debug)]
pub enum AppEvent {
    SearchDone(u64, Result<ExploreResult, ExploreError>),
    BackdropReady(u64, String),
}

/// Dispatches explore requests and image preloads as detached tasks. There is
/// no cancellation; superseded responses are filtered by generation on
/// arrival instead.
pub struct SearchController {
    backend: Arc<dyn ExploreBackend>,
    events: mpsc::Sender<AppEvent>,
}

impl SearchController {
    pub fn new(backend: Arc<dyn ExploreBackend>, events: mpsc::Sender<AppEvent>) -> Self {
        Self { backend, events }
    }

    pub fn dispatch(&self, generation: u64, city: String, keys: ApiKeys) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = backend.explore(&city, &keys).await;
            let _ = events.send(AppEvent::SearchDone(generation, result)).await;
        });
    }

    /// Fetches the backdrop image; the swap event is only sent once the fetch
    /// succeeds, so a broken URL never replaces the current backdrop.
    pub fn preload_backdrop(&self, generation: u64, url: String) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            if backend.preload_image(&url).await.is_ok() {
                let _ = events.send(AppEvent::BackdropReady(generation, url)).await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WeatherSnapshot;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeBackend {
        cities: Mutex<Vec<String>>,
        preloads: Mutex<Vec<String>>,
    }

    impl FakeBackend {
        fn new() -> Self {
            Self {
                cities: Mutex::new(Vec::new()),
                preloads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ExploreBackend for FakeBackend {
        async fn explore(
            &self,
            city: &str,
            _keys: &ApiKeys,
        ) -> Result<ExploreResult, ExploreError> {
            self.cities.lock().unwrap().push(city.to_string());
            Ok(ExploreResult {
                city: city.to_string(),
                weather: WeatherSnapshot {
                    temperature: 20.0,
                    description: "clear sky".to_string(),
                    humidity: 50.0,
                    wind_speed: 2.0,
                    icon: None,
                    timezone_offset: 0,
                },
                image_url: None,
                tourism: Vec::new(),
            })
        }

        async fn preload_image(&self, url: &str) -> Result<(), ExploreError> {
            self.preloads.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_destination_pool_size() {
        assert_eq!(DESTINATIONS.len(), 15);
    }

    #[test]
    fn test_random_destination_comes_from_pool() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let city = random_destination(&mut rng);
            assert!(DESTINATIONS.contains(&city));
        }
    }

    #[tokio::test]
    async fn test_dispatch_issues_one_request_per_search() {
        let backend = Arc::new(FakeBackend::new());
        let (tx, mut rx) = mpsc::channel(4);
        let controller = SearchController::new(backend.clone(), tx);

        controller.dispatch(1, "Petra, Jordan".to_string(), ApiKeys::default());
        let event = rx.recv().await.unwrap();
        match event {
            AppEvent::SearchDone(generation, result) => {
                assert_eq!(generation, 1);
                assert_eq!(result.unwrap().city, "Petra, Jordan");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(*backend.cities.lock().unwrap(), vec!["Petra, Jordan"]);
    }

    #[tokio::test]
    async fn test_preload_sends_event_after_fetch() {
        let backend = Arc::new(FakeBackend::new());
        let (tx, mut rx) = mpsc::channel(4);
        let controller = SearchController::new(backend.clone(), tx);

        controller.preload_backdrop(3, "https://img.example.com/a.jpg".to_string());
        match rx.recv().await.unwrap() {
            AppEvent::BackdropReady(generation, url) => {
                assert_eq!(generation, 3);
                assert_eq!(url, "https://img.example.com/a.jpg");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(
            *backend.preloads.lock().unwrap(),
            vec!["https://img.example.com/a.jpg"]
        );
    }
}
