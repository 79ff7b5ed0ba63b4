//! Playlist ownership and next/previous selection.

mod controller;

pub use controller::*;

#[cfg(test)]
mod tests;
