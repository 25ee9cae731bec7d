use crate::emulator::display::Screen;
use std::io::{self, Write};

/// Represents somewhere the emulator state can be shown: a screen and a buzzer.
pub trait EmulatorOutput {
    fn present(&mut self, screen: Screen<'_>) -> io::Result<()>;
    fn set_sound(&mut self, active: bool) -> io::Result<()>;
}

/// An output device that only remembers what it was given last.
pub struct DummyOutput {
    frame: Vec<Vec<u8>>,
    sound: bool,
}

impl DummyOutput {
    pub fn new() -> DummyOutput {
        DummyOutput {
            frame: Vec::new(),
            sound: false,
        }
    }

    pub fn frame(&self) -> &[Vec<u8>] {
        &self.frame
    }

    pub fn sound(&self) -> bool {
        self.sound
    }
}

impl Default for DummyOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatorOutput for DummyOutput {
    fn present(&mut self, screen: Screen<'_>) -> io::Result<()> {
        self.frame = screen.rows().map(|row| row.to_vec()).collect();
        Ok(())
    }
    fn set_sound(&mut self, active: bool) -> io::Result<()> {
        self.sound = active;
        Ok(())
    }
}

/// Writes each presented frame as text, `#` for lit pixels.
pub struct TextOutput<W: Write> {
    writer: W,
}

impl<W: Write> TextOutput<W> {
    pub fn new(writer: W) -> TextOutput<W> {
        TextOutput { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EmulatorOutput for TextOutput<W> {
    fn present(&mut self, screen: Screen<'_>) -> io::Result<()> {
        write!(self.writer, "{}", screen)?;
        self.writer.flush()
    }
    fn set_sound(&mut self, _: bool) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::emulator::display::{Display, STANDARD_HEIGHT, STANDARD_WIDTH};

    #[test]
    fn dummy_output_keeps_last_frame() {
        let mut display = Display::new();
        display.draw(0, 0, &[0b1000_0000]);

        let mut output = DummyOutput::new();
        output.present(display.screen()).unwrap();

        assert_eq!(output.frame().len(), STANDARD_HEIGHT);
        assert_eq!(output.frame()[0].len(), STANDARD_WIDTH);
        assert_eq!(output.frame()[0][0], 1);
    }

    #[test]
    fn text_output_writes_one_line_per_row() {
        let display = Display::new();
        let mut output = TextOutput::new(Vec::new());
        output.present(display.screen()).unwrap();

        let text = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(text.lines().count(), STANDARD_HEIGHT);
    }
}
