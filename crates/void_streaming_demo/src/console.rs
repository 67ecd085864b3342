//! Console status line
//!
//! Prints the streamer's status messages as `[status]` lines. Hiding an
//! already hidden status prints nothing.

use parking_lot::Mutex;
use std::io::Write;
use void_streaming::StatusSink;

struct Line<W> {
    out: W,
    visible: bool,
}

/// Status sink writing to a terminal (or any writer)
pub struct ConsoleStatus<W: Write + Send> {
    line: Mutex<Line<W>>,
}

impl ConsoleStatus<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleStatus<W> {
    pub fn new(out: W) -> Self {
        Self {
            line: Mutex::new(Line {
                out,
                visible: false,
            }),
        }
    }

    /// Give back the writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.line.into_inner().out
    }

    fn write(line: &mut Line<W>, text: &str) {
        // The sink never fails; write errors are only logged
        if writeln!(line.out, "[status] {}", text).and_then(|_| line.out.flush()).is_err() {
            log::debug!("ConsoleStatus: write failed");
        }
    }
}

impl<W: Write + Send> StatusSink for ConsoleStatus<W> {
    fn show(&self, message: &str) {
        let mut line = self.line.lock();
        line.visible = true;
        Self::write(&mut line, message);
    }

    fn hide(&self) {
        let mut line = self.line.lock();
        if line.visible {
            line.visible = false;
            Self::write(&mut line, "-");
        }
    }
}
