//! Speech-bubble dialog, choice and popup windows for tile-based RPGs.
//!
//! The crate is headless: it decides where windows go, what they contain and
//! how they react to input, and leaves drawing and sound playback to the
//! host through small traits (`TextMeasure`, `SpriteCatalog`,
//! `AnchorResolver`, `FeedbackSink`).

pub mod anchor;
pub mod assets;
pub mod audio;
pub mod choice;
pub mod command;
pub mod dialog;
pub mod expr;
pub mod geometry;
pub mod host;
pub mod input;
pub mod placement;
pub mod popup;
pub mod session;
pub mod text;
pub mod theme;
pub mod window;
