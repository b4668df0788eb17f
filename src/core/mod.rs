//! Core text processing
//!
//! Normalization applied to recognized speech before command matching.

pub mod text_normalizer;
