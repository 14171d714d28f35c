//! Progress state, update operations, throttle gate, and completion.
//!
//! The counter is an [`AtomicU64`] so producers advance it wait-free; the
//! throttle state (deadline, last rendered fill, frame sender, end time,
//! completion flag) lives behind a single mutex because those fields must be
//! read and updated together. The renderer never touches this state; it
//! only sees the [`Frame`]s delivered through the bounded channel.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use chrono::DateTime;
use chrono_tz::Tz;
use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;
use tracing::debug;

use crate::error::BarResult;
use crate::frame::Frame;
use crate::options::BarOptions;
use crate::render;
use crate::zone;

/// Throttle state read and updated as one unit.
///
/// The deadline and `last_filled` must be checked and rearmed under the same
/// guard; splitting them races concurrent producers between "check deadline"
/// and "rearm deadline".
#[derive(Debug)]
struct Gate {
    /// Next instant a throttled frame may be emitted. `None` once complete,
    /// or from the start when the update interval is zero.
    deadline: Option<Instant>,
    /// Fill column count of the last emitted frame.
    last_filled: usize,
    /// Frame sender. Taken on completion, which closes the channel exactly
    /// once and makes a send-after-close unrepresentable.
    tx: Option<Sender<Frame>>,
    /// Set on the single false-to-true completion transition.
    end_time: Option<DateTime<Tz>>,
    complete: bool,
}

/// A shared, throttled progress bar.
///
/// Share it across producer threads with an `Arc`; call
/// [`start_renderer`](ProgressBar::start_renderer) before producing so frames
/// are drained, since the hand-off channel holds a single frame.
#[derive(Debug)]
pub struct ProgressBar {
    pub(crate) name: String,
    total: u64,
    pub(crate) bar_length: usize,
    current: AtomicU64,
    gate: Mutex<Gate>,
    rx: Receiver<Frame>,
    done_tx: Sender<()>,
    done_rx: Receiver<()>,
    renderer_started: AtomicBool,
    tz: Tz,
    pub(crate) start_time: DateTime<Tz>,
    pub(crate) options: BarOptions,
}

impl ProgressBar {
    /// Create a bar with default options.
    pub fn new(name: impl Into<String>, total: u64, bar_length: usize) -> BarResult<Self> {
        Self::with_options(name, total, bar_length, BarOptions::default())
    }

    /// Create a bar with custom options.
    ///
    /// Fails with [`BarError::UnknownTimeZone`](crate::BarError::UnknownTimeZone)
    /// when the configured zone name does not resolve; no bar is created.
    pub fn with_options(
        name: impl Into<String>,
        total: u64,
        bar_length: usize,
        options: BarOptions,
    ) -> BarResult<Self> {
        let name = name.into();
        let tz = zone::resolve(&options.time_zone)?;
        let start_time = zone::now_in(tz);

        let (tx, rx) = bounded(1);
        let (done_tx, done_rx) = bounded(1);

        let update_interval = options.update_interval;
        let deadline = (!update_interval.is_zero()).then(|| Instant::now() + update_interval);

        debug!(
            "progress bar '{name}' created: total={total}, interval={}ms, zone={}",
            update_interval.as_millis(),
            options.time_zone,
        );

        Ok(Self {
            name,
            total: total.max(1),
            bar_length: bar_length.max(1),
            current: AtomicU64::new(0),
            gate: Mutex::new(Gate {
                deadline,
                last_filled: 0,
                tx: Some(tx),
                end_time: None,
                complete: false,
            }),
            rx,
            done_tx,
            done_rx,
            renderer_started: AtomicBool::new(false),
            tz,
            start_time,
            options,
        })
    }

    /// Advance the counter by one step.
    pub fn inc(&self) {
        self.add(1);
    }

    /// Advance the counter by `steps`, clamped at the total.
    ///
    /// Safe from any number of producer threads; the counter update is a
    /// single atomic read-modify-write, so no increments are lost under
    /// contention. Further calls at the ceiling are no-ops. Reaching the
    /// total triggers the same one-shot completion as
    /// [`complete`](ProgressBar::complete).
    pub fn add(&self, steps: u64) {
        let updated = self.current.fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| {
            if c >= self.total {
                None
            } else {
                Some(c.saturating_add(steps).min(self.total))
            }
        });
        let Ok(prev) = updated else {
            return;
        };
        if prev.saturating_add(steps) >= self.total {
            self.complete();
            return;
        }
        self.emit_throttled();
    }

    /// Emit a frame if the fill advanced and the throttle deadline elapsed.
    fn emit_throttled(&self) {
        let mut gate = self.gate.lock();
        if gate.complete {
            return;
        }
        let Some(deadline) = gate.deadline else {
            return;
        };

        // Read the counter after taking the gate: emissions are serialized
        // here, so each frame reflects a counter value no older than the
        // previous frame's and fills stay non-decreasing.
        let current = self.current.load(Ordering::Acquire);
        let ratio = current as f64 / self.total as f64;
        let filled = ((ratio * self.bar_length as f64) as usize).min(self.bar_length);
        if filled == gate.last_filled || filled >= self.bar_length {
            // The full-width frame is the completion path's to emit.
            return;
        }
        if Instant::now() < deadline {
            return;
        }

        if let Some(tx) = &gate.tx {
            let percentage = (ratio * 100.0).min(100.0);
            // Single slot; the renderer keeps this wait short.
            let _ = tx.send(Frame { filled, percentage });
            gate.last_filled = filled;
            gate.deadline = Some(Instant::now() + self.options.update_interval);
        }
    }

    /// Mark the bar complete.
    ///
    /// Idempotent. The first call records the end time, forces the counter
    /// to the total (an explicit completion wins even if the counter
    /// undercounted), emits the final 100% frame past the throttle gate, and
    /// closes the frame channel so the renderer drains and exits. Later
    /// calls are no-ops.
    pub fn complete(&self) {
        let mut gate = self.gate.lock();
        if gate.complete {
            return;
        }
        gate.end_time = Some(zone::now_in(self.tz));
        self.current.store(self.total, Ordering::Release);
        if let Some(tx) = gate.tx.take() {
            let _ = tx.send(Frame {
                filled: self.bar_length,
                percentage: 100.0,
            });
        }
        gate.last_filled = self.bar_length;
        gate.deadline = None;
        gate.complete = true;
        debug!("progress bar '{}' complete: {} units", self.name, self.total);
    }

    /// Launch the consumer loop on its own thread.
    ///
    /// Only the first call spawns a renderer; the thread exits once the
    /// frame channel is closed and drained.
    pub fn start_renderer(&self) {
        if self.renderer_started.swap(true, Ordering::AcqRel) {
            return;
        }
        let sink = render::Sink::new(self);
        let frames = self.rx.clone();
        let done = self.done_tx.clone();
        thread::spawn(move || render::run(sink, frames, done));
    }

    /// Readiness signal fired once after the renderer has fully drained and
    /// the bar line has been terminated.
    ///
    /// Blocks a waiter thread, not the caller: receive on the returned
    /// channel to sequence final output after the last frame. Intended for
    /// a single waiter; the underlying signal fires once.
    pub fn wait_for_render_done(&self) -> Receiver<()> {
        let renderer_done = self.done_rx.clone();
        let (tx, rx) = bounded(1);
        thread::spawn(move || {
            if renderer_done.recv().is_ok() {
                render::finish_line();
                let _ = tx.send(());
            }
        });
        rx
    }

    /// Current progress value.
    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    /// Fixed upper bound set at construction.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// True once the completion transition has happened.
    pub fn is_complete(&self) -> bool {
        self.gate.lock().complete
    }

    /// End timestamp, present exactly when the bar is complete.
    pub(crate) fn end_time(&self) -> Option<DateTime<Tz>> {
        self.gate.lock().end_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn quiet_bar(total: u64, bar_length: usize, interval_ms: u64) -> ProgressBar {
        ProgressBar::with_options(
            "test",
            total,
            bar_length,
            BarOptions::default()
                .with_time_zone("UTC")
                .with_update_interval(Duration::from_millis(interval_ms)),
        )
        .unwrap()
    }

    /// Drain frames on a side thread so sends never block the test body.
    fn drain(bar: &ProgressBar) -> thread::JoinHandle<Vec<Frame>> {
        let rx = bar.rx.clone();
        thread::spawn(move || rx.iter().collect())
    }

    #[test]
    fn add_clamps_at_total() {
        let bar = quiet_bar(10, 20, 0);
        let frames = drain(&bar);
        bar.add(7);
        bar.add(7);
        assert_eq!(bar.current(), 10);
        assert!(bar.is_complete());
        bar.add(3);
        assert_eq!(bar.current(), 10);
        frames.join().unwrap();
    }

    #[test]
    fn complete_is_one_shot() {
        let bar = quiet_bar(10, 20, 0);
        let frames = drain(&bar);
        bar.add(3);
        bar.complete();
        let first_end = bar.end_time().unwrap();
        bar.complete();
        assert_eq!(bar.end_time().unwrap(), first_end);
        assert_eq!(bar.current(), 10);
        assert_eq!(
            frames.join().unwrap(),
            vec![Frame {
                filled: 20,
                percentage: 100.0
            }],
        );
    }

    #[test]
    fn zero_interval_emits_only_the_final_frame() {
        let bar = quiet_bar(100, 10, 0);
        let frames = drain(&bar);
        for _ in 0..100 {
            bar.inc();
        }
        assert!(bar.is_complete());
        assert_eq!(
            frames.join().unwrap(),
            vec![Frame {
                filled: 10,
                percentage: 100.0
            }],
        );
    }

    #[test]
    fn frames_are_monotonic_and_end_full() {
        let bar = quiet_bar(1000, 50, 1);
        let frames = drain(&bar);
        for _ in 0..1000 {
            bar.inc();
            thread::sleep(Duration::from_micros(200));
        }
        let frames = frames.join().unwrap();
        assert!(
            frames.windows(2).all(|w| w[0].filled <= w[1].filled),
            "fills regressed: {frames:?}",
        );
        assert_eq!(
            frames.last(),
            Some(&Frame {
                filled: 50,
                percentage: 100.0
            }),
        );
    }

    #[test]
    fn concurrent_producers_lose_no_updates() {
        const PRODUCERS: u64 = 8;
        const STEPS: u64 = 1_000;

        let bar = Arc::new(quiet_bar(PRODUCERS * STEPS, 40, 5));
        let frames = drain(&bar);
        let mut handles = Vec::new();
        for _ in 0..PRODUCERS {
            let bar = Arc::clone(&bar);
            handles.push(thread::spawn(move || {
                for _ in 0..STEPS {
                    bar.inc();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(bar.current(), PRODUCERS * STEPS);
        assert!(bar.is_complete());
        assert_eq!(
            frames.join().unwrap().last(),
            Some(&Frame {
                filled: 40,
                percentage: 100.0
            }),
        );
    }

    #[test]
    fn throttle_bounds_the_frame_rate() {
        // Every update changes the fill, so emission is limited only by the
        // 100ms deadline: one second of 1ms updates must land near 10
        // frames, nowhere near 1000.
        let bar = quiet_bar(10_000, 10_000, 100);
        let frames = drain(&bar);
        let stop = Instant::now() + Duration::from_secs(1);
        while Instant::now() < stop {
            bar.inc();
            thread::sleep(Duration::from_millis(1));
        }
        bar.complete();
        let frames = frames.join().unwrap();
        let throttled = frames.len() - 1;
        assert!(throttled >= 2, "expected a few throttled frames, got {throttled}");
        assert!(throttled <= 15, "throttle failed to bound frames: {throttled}");
    }

    #[test]
    fn percentage_uses_float_division() {
        let bar = quiet_bar(3, 3, 1);
        let frames = drain(&bar);
        bar.inc();
        thread::sleep(Duration::from_millis(5));
        bar.inc();
        thread::sleep(Duration::from_millis(5));
        bar.inc();
        let frames = frames.join().unwrap();
        assert!(
            frames
                .iter()
                .any(|f| f.percentage > 30.0 && f.percentage < 100.0),
            "partial progress truncated to whole numbers: {frames:?}",
        );
    }

    #[test]
    fn explicit_complete_overrides_an_undercount() {
        let bar = quiet_bar(10, 10, 0);
        let frames = drain(&bar);
        bar.add(3);
        bar.complete();
        assert_eq!(bar.current(), 10);
        assert!(bar.end_time().is_some());
        frames.join().unwrap();
    }
}
