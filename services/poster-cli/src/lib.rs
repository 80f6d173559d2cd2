//! City map poster generator.
//!
//! Library half of the `city-poster` binary: the poster pipeline, runtime
//! configuration, command-line text and the interactive editor.

pub mod cli;
pub mod composer;
pub mod config;
pub mod editor;

pub use composer::{output_filename, PosterComposer, PosterRequest};
pub use config::PosterConfig;
pub use editor::{Editor, GenerationSlot};
