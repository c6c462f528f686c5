pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod escape;
pub mod features;
pub mod ir;
pub mod job;
pub mod number;
pub mod render;
pub mod sink;
pub mod style;

#[cfg(feature = "cli")]
pub mod cli;

pub use color::{KNOWN_COLORS, encode_color, is_known_color};
pub use engine::{RenderEngine, SvgRenderEngine};
pub use error::{Error, Result};
pub use features::{OutputFormat, RENDER_FEATURES, installed_formats};
pub use job::{Job, JobOptions, ProductInfo};
pub use render::{Event, Renderer, render_events, render_to_string};
pub use style::{encode_font, encode_paint};

#[cfg(feature = "cli")]
pub use cli::run;
