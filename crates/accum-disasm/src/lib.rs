pub mod analyze;
pub mod model;

// Re-export commonly used types/functions for consumers
pub use analyze::{analyze, listing, render_text, Edge, EdgeKind, ListingLine, Report};
pub use model::{load_bin, load_labels, parse_labels, LabelKV};
