#![allow(non_snake_case)]

mod batch;
mod engine;
mod error;
mod midi_exporter;
mod model;
mod util;

pub use batch::*;
pub use engine::*;
pub use error::*;
pub use midi_exporter::*;
pub use model::config::*;
pub use model::melody::*;
pub use util::*;
