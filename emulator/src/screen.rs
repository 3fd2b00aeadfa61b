use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

use crossterm::{
    cursor::{MoveTo, MoveToNextLine},
    queue,
    style::Print,
};
use device::hal::Display;
use shared::game_state::{SCREEN_HEIGHT, SCREEN_WIDTH};

const CHAR_WIDTH: i16 = 6;
const LINE_HEIGHT: i16 = 8;
pub const COLUMNS: usize = SCREEN_WIDTH as usize / 2;
pub const ROWS: usize = SCREEN_HEIGHT as usize / 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<bool>,
    /// single lines of text with the pixel position they start at.
    text: Vec<(i16, i16, String)>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![false; SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize],
            text: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.pixels.fill(false);
        self.text.clear();
    }

    /// sets every pixel of the rect that is on screen.
    fn fill_rect(&mut self, x: i16, y: i16, width: i16, height: i16) {
        let (left, right) = (x.max(0), (x + width).min(SCREEN_WIDTH));
        let (top, bottom) = (y.max(0), (y + height).min(SCREEN_HEIGHT));
        for row in top..bottom {
            for column in left..right {
                self.pixels[row as usize * SCREEN_WIDTH as usize + column as usize] = true;
            }
        }
    }

    pub fn pixel(&self, x: i16, y: i16) -> bool {
        (0..SCREEN_WIDTH).contains(&x)
            && (0..SCREEN_HEIGHT).contains(&y)
            && self.pixels[y as usize * SCREEN_WIDTH as usize + x as usize]
    }

    /// the terminal rows showing this frame, text drawn over the pixels. every cell is a
    /// half-block character covering two by two pixels.
    pub fn rows(&self) -> Vec<String> {
        let mut cells = (0..ROWS)
            .map(|row| {
                (0..COLUMNS)
                    .map(|column| {
                        let (x, y) = (column as i16 * 2, row as i16 * 2);
                        let top = self.pixel(x, y) || self.pixel(x + 1, y);
                        let bottom = self.pixel(x, y + 1) || self.pixel(x + 1, y + 1);
                        match (top, bottom) {
                            (true, true) => '█',
                            (true, false) => '▀',
                            (false, true) => '▄',
                            (false, false) => ' ',
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        for (x, y, line) in &self.text {
            let Some(row) = cells.get_mut((*y / 2) as usize) else {
                continue;
            };
            let start = (*x / 2) as usize;
            for (cell, c) in row.iter_mut().skip(start).zip(line.chars()) {
                *cell = c;
            }
        }
        cells
            .into_iter()
            .map(|row| row.into_iter().collect())
            .collect()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// draws into a back buffer and publishes it to the terminal thread on [`Display::display`].
pub struct Lcd {
    back: FrameBuffer,
    cursor: (i16, i16),
    front: Arc<Mutex<FrameBuffer>>,
}

impl Lcd {
    pub fn new() -> (Self, Arc<Mutex<FrameBuffer>>) {
        let front = Arc::new(Mutex::new(FrameBuffer::new()));
        let lcd = Self {
            back: FrameBuffer::new(),
            cursor: (0, 0),
            front: front.clone(),
        };
        (lcd, front)
    }
}

impl Display for Lcd {
    fn clear(&mut self) {
        self.back.clear();
    }

    fn fill_rect(&mut self, x: i16, y: i16, width: i16, height: i16) {
        self.back.fill_rect(x, y, width, height);
    }

    fn set_cursor(&mut self, x: i16, y: i16) {
        self.cursor = (x, y);
    }

    fn print(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.cursor = (0, self.cursor.1 + LINE_HEIGHT);
            }
            if line.is_empty() {
                continue;
            }
            self.back
                .text
                .push((self.cursor.0, self.cursor.1, line.to_owned()));
            self.cursor.0 += CHAR_WIDTH * line.chars().count() as i16;
        }
    }

    fn display(&mut self) {
        if let Ok(mut front) = self.front.lock() {
            front.clone_from(&self.back);
        }
    }
}

/// draws the screens next to each other, each framed and titled.
pub fn draw<W: Write>(w: &mut W, screens: &[(String, FrameBuffer)]) -> io::Result<()> {
    let rows = screens
        .iter()
        .map(|(_, frame)| frame.rows())
        .collect::<Vec<_>>();
    queue!(w, MoveTo(0, 0))?;

    let mut line = String::new();
    for (title, _) in screens {
        line.push_str(&format!("┌{:─^COLUMNS$}┐ ", format!(" {title} ")));
    }
    queue!(w, Print(&line), MoveToNextLine(1))?;
    for row in 0..ROWS {
        line.clear();
        for screen in &rows {
            line.push('│');
            line.push_str(&screen[row]);
            line.push_str("│ ");
        }
        queue!(w, Print(&line), MoveToNextLine(1))?;
    }
    line = format!("└{}┘ ", "─".repeat(COLUMNS)).repeat(screens.len());
    queue!(w, Print(&line), MoveToNextLine(1))?;
    w.flush()
}
