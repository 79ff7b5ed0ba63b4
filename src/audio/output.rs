use super::types::{OutputSignal, RequestId};
use crate::error::OutputError;

/// The single audio output primitive.
///
/// Commands may complete later: results are reported through `poll`, each
/// tagged with the id of the request that caused it.
pub trait AudioOutput {
    /// Replace the current source. An `Err` means the source could not even
    /// be opened; decode problems found later arrive as `LoadFailed`.
    fn set_source(&mut self, uri: &str, load: RequestId) -> Result<(), OutputError>;
    /// Drop the current source, silencing the output.
    fn clear(&mut self);
    fn start(&mut self, play: RequestId);
    fn pause(&mut self);
    fn seek(&mut self, secs: f64) -> Result<(), OutputError>;
    fn set_volume(&mut self, volume: f32);
    /// Position of the current source in seconds.
    fn position(&self) -> f64;
    fn poll(&mut self) -> Vec<OutputSignal>;
}
