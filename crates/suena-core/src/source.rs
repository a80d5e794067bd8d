//! The trait rendered sources implement.

/// A mono audio producer owned by the render graph.
///
/// The graph calls [`render()`](Source::render) once per block. The source
/// must fill the entire slice; inactive sources write silence. Control values
/// arrive through shared atomic cells, so `render` never blocks.
pub trait Source: Send {
    /// Fill `out` with the next block of samples.
    fn render(&mut self, out: &mut [f32]);

    /// Whether the source is currently producing signal.
    ///
    /// Inactive sources still get rendered (they write silence); this exists
    /// for introspection and tests.
    fn is_active(&self) -> bool;
}
