//! Core library for laying out CAD dimension annotations.
//!
//! The pipeline runs label state through scale derivation, text
//! measurement, pure-geometry layout and primitive emission; each stage
//! lives in its own module and is usable on its own.

pub mod emit;
pub mod geometry;
pub mod label;
pub mod layout;
pub mod render;
pub mod scale;
pub mod styles;
pub mod svg;
pub mod text;
