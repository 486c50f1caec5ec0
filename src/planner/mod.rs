pub mod constants;
pub mod parser;
pub mod reconcile;
pub mod segmenter;
pub mod units;

pub use constants::*;
pub use parser::DayBlockParser;
pub use reconcile::{ReconcileConfig, reconcile, reconcile_day, reconcile_meal, render_day};
pub use segmenter::{Segmenter, SegmenterState, StreamConfig, reconcile_stream};
pub use units::{Normalized, canonical_unit, normalize};
