//! Surface reconstruction from stacked contour slices, with rigid-body mass
//! properties and anatomical reference frames.
//!
//! Digitized cross-sections (e.g. anatomical contours in millimeters) go in;
//! out come a consistently wound triangulated surface, its volume, centroid
//! and inertia tensors, and an orthonormal coordinate frame built from the
//! principal inertia axes plus a robustly fitted ridge line.
//!
//! # Features
//! #### Default
//! - **f64**: use f64 as Real
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` export of reconstructed surfaces
//!
//! #### Optional
//! - **f32**: use f32 as Real, this conflicts with f64
//!
//! # Pipeline
//! [`slice::SliceStack`] → [`slice::build_surface`] (parameterize, stitch,
//! cap, orient) → [`mesh::mass_properties`] → [`frame::FramePipeline`]
//! (principal axis, ridge fit, composed rotation).

#![forbid(unsafe_code)]
#![deny(unused)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod diagnostics;
pub mod errors;
pub mod fit;
pub mod float_types;
pub mod frame;
pub mod intersect;
pub mod io;
pub mod mesh;
pub mod slice;

#[cfg(any(all(feature = "f64", feature = "f32"), not(any(feature = "f64", feature = "f32"))))]
compile_error!("Either 'f64' or 'f32' feature must be specified, but not both");

pub use errors::{Error, Result, Warning};
pub use frame::{FrameConfig, FramePipeline, FrameResult, Side};
pub use mesh::TriMesh;
pub use slice::{SliceStack, StitchConfig};
