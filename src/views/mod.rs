//! JSON views
//!
//! Pure projections of models; no filtering happens here.

mod articles;

pub use articles::{article_url, render_article_index, ArticleJson};
