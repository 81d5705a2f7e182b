//! Rotation construction helpers
//!
//! The two building blocks of the coordinate-frame pipeline: the minimal
//! rotation between two directions, and an orthonormal frame grown from a
//! single axis by Gram–Schmidt.

use crate::errors::{Error, Result};
use crate::float_types::{PI, Real, tolerance};
use nalgebra::{Matrix3, Rotation3, Unit, Vector3};

/// The minimal rotation taking `from` onto `to`.
///
/// The rotation axis is the normalized cross product and the angle the arc
/// cosine of the dot product. Already-aligned vectors give the identity;
/// anti-parallel vectors rotate 180° about an arbitrary perpendicular axis.
/// Either input collapsing to zero length is [`Error::ZeroVector`].
pub fn minimal_rotation(from: &Vector3<Real>, to: &Vector3<Real>) -> Result<Rotation3<Real>> {
    let tol = tolerance();
    let from = Unit::try_new(*from, tol).ok_or(Error::ZeroVector {
        what: "rotation source",
    })?;
    let to = Unit::try_new(*to, tol).ok_or(Error::ZeroVector {
        what: "rotation target",
    })?;

    let dot = from.dot(&to).clamp(-1.0, 1.0);
    if dot >= 1.0 - tol {
        return Ok(Rotation3::identity());
    }
    if dot <= -1.0 + tol {
        return Ok(Rotation3::from_axis_angle(&perpendicular(&from), PI));
    }

    let axis = Unit::try_new(from.cross(&to), tol).ok_or(Error::ZeroVector {
        what: "rotation axis",
    })?;
    Ok(Rotation3::from_axis_angle(&axis, dot.acos()))
}

/// Some unit vector perpendicular to `v`: cross with the least-aligned basis axis.
fn perpendicular(v: &Unit<Vector3<Real>>) -> Unit<Vector3<Real>> {
    let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
    let basis = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };
    Unit::new_normalize(v.cross(&basis))
}

/// Orthonormal frame grown from `primary` by Gram–Schmidt.
///
/// Returns the rotation taking world coordinates into the frame whose +Z is
/// `primary` and whose +X is seeded from `reference × primary`; +Y completes
/// the right-handed triad. `primary` parallel to `reference` leaves no seed
/// and is [`Error::ZeroVector`].
pub fn frame_from_axis(
    primary: &Vector3<Real>,
    reference: &Vector3<Real>,
) -> Result<Rotation3<Real>> {
    let tol = tolerance();
    let z = Unit::try_new(*primary, tol).ok_or(Error::ZeroVector { what: "frame axis" })?;
    let x = Unit::try_new(reference.cross(&z), tol).ok_or(Error::ZeroVector {
        what: "frame seed",
    })?;
    let y = Unit::new_normalize(z.cross(&x));

    let basis =
        Matrix3::from_columns(&[x.into_inner(), y.into_inner(), z.into_inner()]).transpose();
    Ok(Rotation3::from_matrix_unchecked(basis))
}
