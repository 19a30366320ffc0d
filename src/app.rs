use crate::api::ExploreBackend;
use crate::app_state::AppState;
use crate::config::{ApiKeys, Config};
use crate::render::TerminalRenderer;
use crate::search::{AppEvent, SearchController, random_destination};
use crate::ui;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const INPUT_POLL_FPS: u64 = 30;
const FRAME_DURATION: Duration = Duration::from_millis(1000 / INPUT_POLL_FPS);

pub struct App {
    state: AppState,
    controller: SearchController,
    events: mpsc::Receiver<AppEvent>,
    config: Config,
    config_path: PathBuf,
}

impl App {
    pub fn new(config: Config, config_path: PathBuf, backend: Arc<dyn ExploreBackend>) -> Self {
        let (tx, rx) = mpsc::channel(8);
        Self {
            state: AppState::new(),
            controller: SearchController::new(backend, tx),
            events: rx,
            config,
            config_path,
        }
    }

    /// Fills the input with `city` and searches, as the CLI flags do.
    pub fn search_city(&mut self, city: &str) {
        self.state.input = city.to_string();
        self.submit();
    }

    fn submit(&mut self) {
        if let Some((generation, city)) = self.state.begin_search() {
            self.controller
                .dispatch(generation, city, self.config.keys.clone());
        }
    }

    fn pump_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SearchDone(generation, result) => {
                if self.state.apply_search(generation, result, Utc::now()) {
                    // Preload before swapping the backdrop; an absent
                    // image_url leaves the previous one in place.
                    let image_url = self
                        .state
                        .plan
                        .as_ref()
                        .and_then(|plan| plan.image_url.clone());
                    if let Some(url) = image_url {
                        self.controller.preload_backdrop(generation, url);
                    }
                }
            }
            AppEvent::BackdropReady(generation, url) => {
                self.state.apply_backdrop(generation, url);
            }
        }
    }

    pub async fn run(&mut self, renderer: &mut TerminalRenderer) -> io::Result<()> {
        let mut rng = rand::rng();
        loop {
            self.pump_events();
            self.state.update_loading_animation();

            let cursor = ui::draw(&self.state, renderer);
            renderer.flush()?;
            match cursor {
                Some((x, y)) => renderer.show_cursor_at(x, y)?,
                None => renderer.hide_cursor()?,
            }

            if event::poll(FRAME_DURATION)? {
                match event::read()? {
                    Event::Resize(width, height) => renderer.resize(width, height)?,
                    Event::Key(key) => {
                        if self.handle_key(key, &mut rng) {
                            break;
                        }
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent, rng: &mut impl rand::Rng) -> bool {
        if self.state.settings.is_some() {
            self.handle_settings_key(key);
            return false;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('c') if ctrl => return true,
            KeyCode::Char('r') if ctrl => {
                self.search_city(random_destination(rng));
            }
            KeyCode::Char('k') if ctrl => {
                self.state
                    .open_settings(&self.config.keys.openweather, &self.config.keys.unsplash);
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => self.state.dismiss_error(),
            KeyCode::Backspace => {
                self.state.input.pop();
            }
            KeyCode::Char(c) if !ctrl => self.state.input.push(c),
            _ => {}
        }
        false
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        let Some(panel) = self.state.settings.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Esc => self.state.close_settings(),
            KeyCode::Tab => panel.toggle_focus(),
            KeyCode::Backspace => panel.backspace(),
            KeyCode::Enter => {
                let keys = ApiKeys {
                    openweather: panel.openweather.clone(),
                    unsplash: panel.unsplash.clone(),
                };
                match self.config.clone().save_keys(keys, &self.config_path) {
                    Ok(updated) => self.config = updated,
                    Err(e) => self.state.error = Some(e.user_friendly_message()),
                }
                self.state.close_settings();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                panel.insert(c);
            }
            _ => {}
        }
    }
}
