//! Render snapshots handed from producers to the renderer.

/// One immutable snapshot queued for rendering.
///
/// Ownership transfers to the renderer on send; nothing reads a frame after
/// it is constructed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Number of filled display columns.
    pub filled: usize,
    /// Progress percentage, 0 to 100 inclusive.
    pub percentage: f64,
}
