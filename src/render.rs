use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Stdout, Write};

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    character: char,
    fg: Color,
    bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            character: ' ',
            fg: Color::Reset,
            bg: Color::Reset,
        }
    }
}

/// Double-buffered terminal output. Only cells that changed since the last
/// flush are written, which keeps redraws cheap at the input poll rate.
pub struct TerminalRenderer {
    stdout: Stdout,
    width: u16,
    height: u16,
    buffer: Vec<Cell>,
    last_buffer: Vec<Cell>,
}

impl TerminalRenderer {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = io::stdout();
        let buffer_size = (width as usize) * (height as usize);

        Ok(Self {
            stdout,
            width,
            height,
            buffer: vec![Cell::default(); buffer_size],
            last_buffer: vec![Cell::default(); buffer_size],
        })
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide)?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.stdout, LeaveAlternateScreen, cursor::Show, ResetColor)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) -> io::Result<()> {
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            let buffer_size = (width as usize) * (height as usize);
            self.buffer = vec![Cell::default(); buffer_size];
            self.last_buffer = vec![Cell::default(); buffer_size];
            execute!(self.stdout, Clear(ClearType::All))?;
        }
        Ok(())
    }

    pub fn get_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.buffer.fill(Cell::default());
    }

    fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            let idx = (y as usize) * (self.width as usize) + (x as usize);
            if idx < self.buffer.len() {
                self.buffer[idx] = cell;
            }
        }
    }

    /// Writes text at (x, y), clipped at the right edge.
    pub fn write_str(&mut self, x: u16, y: u16, text: &str, fg: Color) {
        self.write_str_on(x, y, text, fg, Color::Reset);
    }

    pub fn write_str_on(&mut self, x: u16, y: u16, text: &str, fg: Color, bg: Color) {
        if y >= self.height {
            return;
        }
        for (idx, ch) in text.chars().enumerate() {
            let col = x.saturating_add(idx as u16);
            if col >= self.width {
                break;
            }
            self.set_cell(
                col,
                y,
                Cell {
                    character: ch,
                    fg,
                    bg,
                },
            );
        }
    }

    /// Paints a solid rectangle, used for the modal background.
    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, bg: Color) {
        for row in y..y.saturating_add(h) {
            for col in x..x.saturating_add(w) {
                self.set_cell(
                    col,
                    row,
                    Cell {
                        character: ' ',
                        fg: Color::Reset,
                        bg,
                    },
                );
            }
        }
    }

    pub fn show_cursor_at(&mut self, x: u16, y: u16) -> io::Result<()> {
        execute!(self.stdout, cursor::MoveTo(x, y), cursor::Show)
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        execute!(self.stdout, cursor::Hide)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        let mut current_fg = Color::Reset;
        let mut current_bg = Color::Reset;
        let mut last_pos: Option<(u16, u16)> = None;

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = (y as usize) * (self.width as usize) + (x as usize);

                if idx >= self.buffer.len() || idx >= self.last_buffer.len() {
                    continue;
                }

                let cell = self.buffer[idx];
                if cell == self.last_buffer[idx] {
                    continue;
                }

                let expected_pos = last_pos.map(|(lx, ly)| (lx + 1, ly));
                if expected_pos != Some((x, y)) {
                    queue!(self.stdout, cursor::MoveTo(x, y))?;
                }

                if cell.fg != current_fg {
                    queue!(self.stdout, SetForegroundColor(cell.fg))?;
                    current_fg = cell.fg;
                }
                if cell.bg != current_bg {
                    queue!(self.stdout, SetBackgroundColor(cell.bg))?;
                    current_bg = cell.bg;
                }

                queue!(self.stdout, Print(cell.character))?;
                last_pos = Some((x, y));
            }
        }

        if current_fg != Color::Reset || current_bg != Color::Reset {
            queue!(self.stdout, ResetColor)?;
        }

        self.stdout.flush()?;
        self.last_buffer.copy_from_slice(&self.buffer);
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
