use std::collections::HashSet;

use crate::hal::{Button, Buttons, Display};

/// stands in for a handheld's screen and keeps what the last committed frame drew.
#[derive(Default)]
pub struct RecordingDisplay {
    pub rects: Vec<(i16, i16, i16, i16)>,
    pub text: Vec<(i16, i16, String)>,
    pub frames: usize,
    cursor: (i16, i16),
    pending_rects: Vec<(i16, i16, i16, i16)>,
    pending_text: Vec<(i16, i16, String)>,
}

impl Display for RecordingDisplay {
    fn clear(&mut self) {
        self.pending_rects.clear();
        self.pending_text.clear();
    }

    fn fill_rect(&mut self, x: i16, y: i16, width: i16, height: i16) {
        self.pending_rects.push((x, y, width, height));
    }

    fn set_cursor(&mut self, x: i16, y: i16) {
        self.cursor = (x, y);
    }

    fn print(&mut self, text: &str) {
        self.pending_text
            .push((self.cursor.0, self.cursor.1, text.to_owned()));
    }

    fn display(&mut self) {
        self.rects = self.pending_rects.clone();
        self.text = self.pending_text.clone();
        self.frames += 1;
    }
}

#[derive(Default)]
pub struct HeldButtons {
    pub held: HashSet<Button>,
    latched: HashSet<Button>,
}

impl Buttons for HeldButtons {
    fn poll(&mut self) {
        self.latched = self.held.clone();
    }

    fn pressed(&self, button: Button) -> bool {
        self.latched.contains(&button)
    }
}
