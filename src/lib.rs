//! Throttled, thread-safe progress reporting for terminal tasks.
//!
//! Any number of producer threads advance a shared counter with
//! [`ProgressBar::inc`] or [`ProgressBar::add`]; a single renderer thread
//! repaints the bar line at a bounded refresh rate. Frames travel through one
//! bounded channel, so they arrive in order and the terminal never sees a
//! stale repaint. Completion is a one-shot transition: it emits the final
//! 100% frame past the throttle gate, closes the channel, and lets the
//! renderer drain and exit.
//!
//! ```no_run
//! use steadybar::{BarOptions, ProgressBar};
//!
//! fn main() -> steadybar::BarResult<()> {
//!     let bar = ProgressBar::with_options(
//!         "index",
//!         100,
//!         40,
//!         BarOptions::default().with_time_zone("UTC"),
//!     )?;
//!     bar.start_renderer();
//!     for _ in 0..100 {
//!         bar.inc();
//!     }
//!     bar.wait_for_render_done().recv().ok();
//!     bar.report(32)?;
//!     Ok(())
//! }
//! ```

pub mod bar;
pub mod error;
pub mod frame;
pub mod options;
mod render;
mod report;
pub mod zone;

pub use bar::ProgressBar;
pub use error::{BarError, BarResult};
pub use frame::Frame;
pub use options::{BarOptions, BarStyle};
