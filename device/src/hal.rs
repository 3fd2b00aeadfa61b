#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    A,
}

pub trait Buttons {
    /// latches the current state of every button. [`Buttons::pressed`] reports the latched state.
    fn poll(&mut self);

    fn pressed(&self, button: Button) -> bool;
}

/// a monochrome frame buffer that is only shown once committed.
pub trait Display {
    fn clear(&mut self);

    fn fill_rect(&mut self, x: i16, y: i16, width: i16, height: i16);

    fn set_cursor(&mut self, x: i16, y: i16);

    /// prints at the cursor and advances it. `\n` moves to the start of the next line.
    fn print(&mut self, text: &str);

    /// commits the frame buffer to the screen.
    fn display(&mut self);
}
