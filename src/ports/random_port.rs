//! Random source port for the synthetic market feed and chart series.

/// Uniform random draws. Injected so price derivation can be made
/// deterministic in tests.
pub trait JitterSource {
    /// A draw from `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}
