//! Consumer loop: drains the frame channel and paints the bar line.
//!
//! On an interactive terminal the line is repainted in place with a carriage
//! return and the bar body is colored; when standard output is redirected,
//! each frame prints as a plain line with no escape codes so logs stay
//! readable.

use std::io::{self, Write};

use crossbeam_channel::{Receiver, Sender};
use owo_colors::{AnsiColors, OwoColorize};
use tracing::trace;

use crate::bar::ProgressBar;
use crate::frame::Frame;
use crate::options::BarStyle;

/// Immutable rendering inputs, captured before the thread starts.
pub(crate) struct Sink {
    name: String,
    bar_length: usize,
    precision: usize,
    color: AnsiColors,
    style: BarStyle,
    ansi: bool,
}

impl Sink {
    pub(crate) fn new(bar: &ProgressBar) -> Self {
        Self {
            name: if bar.name.is_empty() {
                "Progress".to_string()
            } else {
                bar.name.clone()
            },
            bar_length: bar.bar_length,
            precision: bar.options.precision,
            color: bar.options.color,
            style: bar.options.style,
            ansi: is_terminal::is_terminal(io::stdout()),
        }
    }

    fn line(&self, frame: &Frame) -> String {
        let cells = format!(
            "{}{}",
            self.style.filled_cell().repeat(frame.filled),
            self.style
                .empty_cell()
                .repeat(self.bar_length - frame.filled.min(self.bar_length)),
        );
        let body = format!(
            "[{cells}] {:.prec$}%",
            frame.percentage,
            prec = self.precision,
        );
        if self.ansi {
            format!("{}: {}", self.name, body.color(self.color))
        } else {
            format!("{}: {}", self.name, body)
        }
    }
}

/// Drain the frame channel, painting each snapshot over the previous line.
///
/// Exits when the channel is closed and empty, then fires `done` exactly
/// once.
pub(crate) fn run(sink: Sink, frames: Receiver<Frame>, done: Sender<()>) {
    let stdout = io::stdout();
    for frame in frames.iter() {
        let mut out = stdout.lock();
        if sink.ansi {
            write!(out, "\r{}", sink.line(&frame)).unwrap();
        } else {
            writeln!(out, "{}", sink.line(&frame)).unwrap();
        }
        out.flush().unwrap();
    }
    trace!("renderer drained, signalling completion");
    let _ = done.send(());
}

/// Terminate the in-place bar line once rendering is done. In non-ANSI mode
/// frames already end with newlines, so there is nothing to close.
pub(crate) fn finish_line() {
    if is_terminal::is_terminal(io::stdout()) {
        let mut out = io::stdout().lock();
        writeln!(out).unwrap();
    }
}
