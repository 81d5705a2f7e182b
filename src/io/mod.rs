//! File-format export for reconstructed surfaces

#[cfg(feature = "stl-io")]
pub mod stl;
