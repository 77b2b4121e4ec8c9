//! Local text analysis (no network dependencies)

pub mod polarity;

pub use polarity::PolarityLexicon;
