//! Reader-side rendering: locating classifier excerpts inside stored page
//! text and producing highlight-annotated markup.

pub mod highlight;

pub use highlight::{diff_key, page_highlights, render_highlighted, ExcerptHighlight};
