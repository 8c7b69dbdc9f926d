//! External lookup providers for remotify

pub mod lyrics;

pub use lyrics::LyricsProvider;
