use crate::api::ExploreResult;
use crate::error::ExploreError;
use crate::view::{RenderPlan, build_plan};
use chrono::{DateTime, Utc};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    OpenWeather,
    Unsplash,
}

/// Editing state of the settings modal. Holds working copies of the two
/// provider keys until the user saves or cancels.
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    pub openweather: String,
    pub unsplash: String,
    pub focus: KeyField,
}

impl SettingsPanel {
    pub fn new(openweather: &str, unsplash: &str) -> Self {
        Self {
            openweather: openweather.to_string(),
            unsplash: unsplash.to_string(),
            focus: KeyField::OpenWeather,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            KeyField::OpenWeather => KeyField::Unsplash,
            KeyField::Unsplash => KeyField::OpenWeather,
        };
    }

    pub fn insert(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            KeyField::OpenWeather => &mut self.openweather,
            KeyField::Unsplash => &mut self.unsplash,
        }
    }
}

pub struct AppState {
    pub input: String,
    pub phase: Phase,
    pub plan: Option<RenderPlan>,
    pub error: Option<String>,
    /// Photo URL currently shown, swapped only after a successful preload.
    pub backdrop: Option<String>,
    pub settings: Option<SettingsPanel>,
    pub loading_state: LoadingState,
    generation: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            phase: Phase::Idle,
            plan: None,
            error: None,
            backdrop: None,
            settings: None,
            loading_state: LoadingState::new(),
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Accepts the current input as a search. Returns the generation and the
    /// trimmed city, or None when the input is blank (no state changes then).
    pub fn begin_search(&mut self) -> Option<(u64, String)> {
        let city = self.input.trim().to_string();
        if city.is_empty() {
            return None;
        }
        self.phase = Phase::Loading;
        self.error = None;
        self.generation += 1;
        Some((self.generation, city))
    }

    /// Applies a settled search. A response from a superseded generation is
    /// dropped without touching the UI state. Returns true when applied.
    pub fn apply_search(
        &mut self,
        generation: u64,
        result: Result<ExploreResult, ExploreError>,
        now_utc: DateTime<Utc>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        // Loading ends on both paths.
        match result {
            Ok(data) => {
                self.plan = Some(build_plan(&data, now_utc));
                self.phase = Phase::Ready;
            }
            Err(err) => {
                self.error = Some(err.user_friendly_message());
                self.phase = Phase::Idle;
            }
        }
        true
    }

    /// Swaps the backdrop once its image has preloaded, unless a newer search
    /// has started since. An absent image_url never clears the old backdrop.
    pub fn apply_backdrop(&mut self, generation: u64, url: String) {
        if generation == self.generation {
            self.backdrop = Some(url);
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn open_settings(&mut self, openweather: &str, unsplash: &str) {
        self.settings = Some(SettingsPanel::new(openweather, unsplash));
    }

    pub fn close_settings(&mut self) {
        self.settings = None;
    }

    pub fn update_loading_animation(&mut self) {
        if self.phase == Phase::Loading && self.loading_state.should_update() {
            self.loading_state.next_frame();
        }
    }
}

pub struct LoadingState {
    pub frame: usize,
    pub last_update: Instant,
    pub loading_chars: [char; 4],
}

impl LoadingState {
    pub fn new() -> Self {
        Self {
            frame: 0,
            last_update: Instant::now(),
            loading_chars: ['|', '/', '-', '\\'],
        }
    }

    pub fn should_update(&self) -> bool {
        self.last_update.elapsed() >= std::time::Duration::from_millis(100)
    }

    pub fn next_frame(&mut self) {
        self.frame = (self.frame + 1) % self.loading_chars.len();
        self.last_update = Instant::now();
    }

    pub fn current_char(&self) -> char {
        self.loading_chars[self.frame]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::WeatherSnapshot;

    fn sample_result(city: &str) -> ExploreResult {
        ExploreResult {
            city: city.to_string(),
            weather: WeatherSnapshot {
                temperature: 21.3,
                description: "clear sky".to_string(),
                humidity: 40.0,
                wind_speed: 3.0,
                icon: None,
                timezone_offset: 0,
            },
            image_url: None,
            tourism: Vec::new(),
        }
    }

    #[test]
    fn test_blank_input_is_a_noop() {
        let mut state = AppState::new();
        state.input = "   ".to_string();
        assert!(state.begin_search().is_none());
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.generation(), 0);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_begin_search_trims_and_increments_generation() {
        let mut state = AppState::new();
        state.input = "  Rome, Italy  ".to_string();
        state.error = Some("old error".to_string());

        let (generation, city) = state.begin_search().unwrap();
        assert_eq!(generation, 1);
        assert_eq!(city, "Rome, Italy");
        assert_eq!(state.phase, Phase::Loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = AppState::new();
        state.input = "Paris, France".to_string();
        state.begin_search().unwrap();
        state.input = "Rome, Italy".to_string();
        state.begin_search().unwrap();

        let applied = state.apply_search(1, Ok(sample_result("Paris, France")), Utc::now());
        assert!(!applied);
        assert!(state.plan.is_none());
        assert_eq!(state.phase, Phase::Loading);

        let applied = state.apply_search(2, Ok(sample_result("Rome, Italy")), Utc::now());
        assert!(applied);
        assert_eq!(state.phase, Phase::Ready);
        let plan = state.plan.as_ref().unwrap();
        assert_eq!(plan.fields[0].value, "Rome, Italy");
    }

    #[test]
    fn test_failed_search_shows_banner_and_ends_loading() {
        let mut state = AppState::new();
        state.input = "Atlantis".to_string();
        let (generation, _) = state.begin_search().unwrap();

        let err = ExploreError::Api {
            status: 404,
            message: "city not found".to_string(),
        };
        assert!(state.apply_search(generation, Err(err), Utc::now()));
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.error.as_deref(), Some("city not found"));

        state.dismiss_error();
        assert!(state.error.is_none());
    }

    #[test]
    fn test_backdrop_only_applies_for_current_generation() {
        let mut state = AppState::new();
        state.input = "Kyoto, Japan".to_string();
        state.begin_search().unwrap();

        state.apply_backdrop(0, "https://img.example.com/stale.jpg".to_string());
        assert!(state.backdrop.is_none());

        state.apply_backdrop(1, "https://img.example.com/kyoto.jpg".to_string());
        assert_eq!(
            state.backdrop.as_deref(),
            Some("https://img.example.com/kyoto.jpg")
        );
    }

    #[test]
    fn test_settings_panel_editing() {
        let mut panel = SettingsPanel::new("abc", "");
        assert_eq!(panel.focus, KeyField::OpenWeather);
        panel.insert('d');
        assert_eq!(panel.openweather, "abcd");
        panel.toggle_focus();
        panel.insert('x');
        panel.insert('y');
        panel.backspace();
        assert_eq!(panel.unsplash, "x");
        panel.toggle_focus();
        assert_eq!(panel.focus, KeyField::OpenWeather);
    }
}
