//! Draws the application state onto the terminal. All display rules live in
//! `view`; this module only places the prepared values on screen.

use crate::app_state::{AppState, KeyField, Phase, SettingsPanel};
use crate::render::TerminalRenderer;
use crate::view::{NO_SITES_PLACEHOLDER, SiteRow};
use crossterm::style::Color;

const TITLE: &str = "Global Explorer";
const HINTS: &str = "Enter: search  Ctrl-R: random  Ctrl-K: api keys  Ctrl-Q: quit";
const PROMPT: &str = "Search: ";

const INPUT_ROW: u16 = 2;
const BANNER_ROW: u16 = 4;
const RESULTS_ROW: u16 = 6;

/// Renders one frame. Returns the cell where the text cursor should sit, so
/// the caller can show it after flushing.
pub fn draw(state: &AppState, renderer: &mut TerminalRenderer) -> Option<(u16, u16)> {
    renderer.clear();
    let (width, _) = renderer.get_size();

    renderer.write_str(2, 0, TITLE, Color::Cyan);
    if width as usize > TITLE.len() + HINTS.len() + 6 {
        renderer.write_str(width - HINTS.len() as u16 - 2, 0, HINTS, Color::DarkGrey);
    }

    let input_line = format!("{}{}", PROMPT, state.input);
    renderer.write_str(2, INPUT_ROW, &input_line, Color::White);
    let mut cursor = Some((
        cursor_col(2, input_line.chars().count(), width),
        INPUT_ROW,
    ));

    if state.phase == Phase::Loading {
        let spinner = format!("{} fetching...", state.loading_state.current_char());
        renderer.write_str(
            cursor_col(4, input_line.chars().count(), width),
            INPUT_ROW,
            &spinner,
            Color::Yellow,
        );
    }

    if let Some(ref message) = state.error {
        let banner = format!(" {}  (Esc to dismiss) ", message);
        renderer.write_str_on(2, BANNER_ROW, &banner, Color::White, Color::DarkRed);
    }

    // Results region stays hidden while a new search is in flight.
    if state.phase == Phase::Ready {
        if let Some(ref plan) = state.plan {
            let mut row = RESULTS_ROW;

            for field in &plan.fields {
                let line = format!("{:<12} {}", format!("{}:", field.label), field.value);
                renderer.write_str(2, row, &line, Color::White);
                row += 1;
            }

            if let Some(ref icon_url) = plan.icon_url {
                renderer.write_str(2, row, &format!("{:<12} {}", "Icon:", icon_url), Color::DarkGrey);
                row += 1;
            }

            if let Some(ref backdrop) = state.backdrop {
                let line = format!("{:<12} {} (view original)", "Photo:", backdrop);
                renderer.write_str(2, row, &line, Color::DarkGrey);
                row += 1;
            }

            row += 1;
            renderer.write_str(2, row, "Famous sites nearby", Color::Cyan);
            row += 1;

            for site in &plan.sites {
                match site {
                    SiteRow::Placeholder => {
                        renderer.write_str(4, row, NO_SITES_PLACEHOLDER, Color::DarkGrey);
                        row += 1;
                    }
                    SiteRow::Entry(entry) => {
                        renderer.write_str(4, row, &format!("* {}", entry.title), Color::White);
                        row += 1;
                        if let Some(ref description) = entry.description {
                            renderer.write_str(6, row, description, Color::DarkGrey);
                            row += 1;
                        }
                        if let Some(ref thumbnail) = entry.thumbnail {
                            renderer.write_str(6, row, &format!("img: {}", thumbnail), Color::DarkGrey);
                            row += 1;
                        }
                        renderer.write_str(6, row, &entry.url, Color::Blue);
                        row += 1;
                    }
                }
            }
        }
    }

    if let Some(ref panel) = state.settings {
        cursor = Some(draw_settings(panel, renderer));
    }

    cursor
}

/// The settings modal, drawn over whatever is behind it. Returns the cursor
/// cell inside the focused field.
fn draw_settings(panel: &SettingsPanel, renderer: &mut TerminalRenderer) -> (u16, u16) {
    let (width, height) = renderer.get_size();
    let box_width: u16 = 56.min(width.saturating_sub(4));
    let box_height: u16 = 8;
    let x = width.saturating_sub(box_width) / 2;
    let y = height.saturating_sub(box_height) / 3;

    renderer.fill_rect(x, y, box_width, box_height, Color::DarkBlue);
    renderer.write_str_on(x + 2, y + 1, "API Keys", Color::White, Color::DarkBlue);

    let owm_label_color = if panel.focus == KeyField::OpenWeather {
        Color::Yellow
    } else {
        Color::Grey
    };
    let unsplash_label_color = if panel.focus == KeyField::Unsplash {
        Color::Yellow
    } else {
        Color::Grey
    };

    let owm_line = format!("OpenWeatherMap: {}", panel.openweather);
    let unsplash_line = format!("Unsplash:       {}", panel.unsplash);
    renderer.write_str_on(x + 2, y + 3, &owm_line, owm_label_color, Color::DarkBlue);
    renderer.write_str_on(x + 2, y + 4, &unsplash_line, unsplash_label_color, Color::DarkBlue);

    renderer.write_str_on(
        x + 2,
        y + 6,
        "Tab: switch  Enter: save  Esc: cancel",
        Color::DarkGrey,
        Color::DarkBlue,
    );

    match panel.focus {
        KeyField::OpenWeather => (cursor_col(x + 2, owm_line.chars().count(), width), y + 3),
        KeyField::Unsplash => (cursor_col(x + 2, unsplash_line.chars().count(), width), y + 4),
    }
}

/// Column after `len` characters from `base`, kept on screen. Text drawn
/// past the right edge is clipped, so the cursor must stay inside too.
fn cursor_col(base: u16, len: usize, width: u16) -> u16 {
    base.saturating_add(len.min(u16::MAX as usize) as u16)
        .min(width.saturating_sub(1))
}
