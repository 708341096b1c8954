//! Math utilities and types
//!
//! nalgebra aliases plus [`Pose`], the translation/rotation/scale triple the
//! scene stores per Transform. Matrices use nalgebra's column-vector
//! convention, so a child's world matrix is `parent_world * child_local`.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix3, Matrix4, Quaternion, Rotation3, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Column norms below this are treated as a collapsed axis during decomposition
const SCALE_EPSILON: f32 = 1.0e-8;

/// Tolerance for accepting a normalised basis as a rotation as-is
const ORTHONORMAL_EPSILON: f32 = 1.0e-4;

/// Position, rotation and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Per-axis scale, not necessarily uniform
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Pose {
    /// Identity pose
    pub fn identity() -> Self {
        Self::default()
    }

    /// Pose with only a translation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Pose from all three parts
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Compose into a `T * R * S` matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Decompose an affine matrix into translation, rotation and scale.
    ///
    /// Scale comes from the basis column lengths. A negative determinant is
    /// folded into the X scale. Collapsed axes get zero scale and an identity
    /// basis column, and the rotation is the nearest proper rotation to the
    /// normalised basis, so sheared or degenerate input never yields NaN.
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let position = Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);
        let linear: Mat3 = matrix.fixed_view::<3, 3>(0, 0).into_owned();

        let mut scale = Vec3::new(
            linear.column(0).norm(),
            linear.column(1).norm(),
            linear.column(2).norm(),
        );
        if linear.determinant() < 0.0 {
            scale.x = -scale.x;
        }

        let mut basis = Mat3::identity();
        for axis in 0..3 {
            if scale[axis].abs() > SCALE_EPSILON {
                basis.set_column(axis, &(linear.column(axis) / scale[axis]));
            } else {
                scale[axis] = 0.0;
            }
        }

        let rotation = nearest_rotation(&basis);

        Self {
            position,
            rotation: Quat::from_rotation_matrix(&rotation),
            scale,
        }
    }

    /// Rotation as Euler angles in degrees (x = roll, y = pitch, z = yaw)
    pub fn euler_degrees(&self) -> Vec3 {
        let (roll, pitch, yaw) = self.rotation.euler_angles();
        Vec3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
    }

    /// Replace the rotation from Euler angles in degrees
    pub fn set_euler_degrees(&mut self, degrees: Vec3) {
        self.rotation = quat_from_euler_degrees(degrees);
    }
}

/// Closest proper rotation to `basis`; exact when it is already orthonormal
fn nearest_rotation(basis: &Mat3) -> Rotation3<f32> {
    if (basis.transpose() * basis - Mat3::identity()).norm() < ORTHONORMAL_EPSILON
        && basis.determinant() > 0.0
    {
        return Rotation3::from_matrix_unchecked(*basis);
    }

    let svd = basis.svd(true, true);
    match (svd.u, svd.v_t) {
        (Some(mut u), Some(v_t)) => {
            if (u * v_t).determinant() < 0.0 {
                let weakest = svd.singular_values.imin();
                u.column_mut(weakest).neg_mut();
            }
            Rotation3::from_matrix_unchecked(u * v_t)
        }
        _ => Rotation3::identity(),
    }
}

/// Build a rotation from Euler angles in degrees (x = roll, y = pitch, z = yaw)
pub fn quat_from_euler_degrees(degrees: Vec3) -> Quat {
    Quat::from_euler_angles(
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Translation column of an affine matrix
pub fn position_of(matrix: &Mat4) -> Vec3 {
    Vec3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)])
}

/// Normalised +Z basis of an affine matrix
pub fn forward_of(matrix: &Mat4) -> Vec3 {
    basis_axis(matrix, 2)
}

/// Normalised +Y basis of an affine matrix
pub fn up_of(matrix: &Mat4) -> Vec3 {
    basis_axis(matrix, 1)
}

/// Normalised +X basis of an affine matrix
pub fn right_of(matrix: &Mat4) -> Vec3 {
    basis_axis(matrix, 0)
}

fn basis_axis(matrix: &Mat4, axis: usize) -> Vec3 {
    let column = Vec3::new(matrix[(0, axis)], matrix[(1, axis)], matrix[(2, axis)]);
    column
        .try_normalize(SCALE_EPSILON)
        .unwrap_or_else(|| {
            let mut unit = Vec3::zeros();
            unit[axis] = 1.0;
            unit
        })
}

/// RGBA color with float channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    /// Opaque color from three channels
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_pose_identity_matrix() {
        assert_relative_eq!(Pose::identity().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_matrix_roundtrip_nonuniform_scale() {
        let original = Pose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_axis_angle(&Unit::new_normalize(Vec3::new(1.0, 1.0, 1.0)), 0.5),
            Vec3::new(2.0, 1.5, 0.8),
        );

        let rebuilt = Pose::from_matrix(&original.to_matrix());

        assert_relative_eq!(rebuilt.position, original.position, epsilon = 1e-5);
        assert_relative_eq!(rebuilt.scale, original.scale, epsilon = 1e-5);
        assert_relative_eq!(rebuilt.to_matrix(), original.to_matrix(), epsilon = 1e-5);
    }

    #[test]
    fn test_mirrored_matrix_keeps_rotation_proper() {
        let original = Pose::new(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
            Vec3::new(-1.0, 2.0, 1.0),
        );

        let rebuilt = Pose::from_matrix(&original.to_matrix());

        assert!(rebuilt.scale.x < 0.0);
        assert_relative_eq!(rebuilt.to_matrix(), original.to_matrix(), epsilon = 1e-5);
    }

    #[test]
    fn test_collapsed_axis_does_not_produce_nan() {
        let flattened = Pose::new(Vec3::new(0.0, 1.0, 0.0), Quat::identity(), Vec3::new(1.0, 0.0, 1.0));

        let rebuilt = Pose::from_matrix(&flattened.to_matrix());

        assert!(rebuilt.position.iter().all(|v| v.is_finite()));
        assert!(rebuilt.scale.iter().all(|v| v.is_finite()));
        assert!(rebuilt.rotation.coords.iter().all(|v| v.is_finite()));
        assert_eq!(rebuilt.scale.y, 0.0);
    }

    #[test]
    fn test_euler_degrees_roundtrip() {
        let mut pose = Pose::identity();
        pose.set_euler_degrees(Vec3::new(20.0, 35.0, 0.0));

        assert_relative_eq!(pose.euler_degrees(), Vec3::new(20.0, 35.0, 0.0), epsilon = 1e-3);
    }

    #[test]
    fn test_basis_helpers_follow_rotation() {
        // 90 degrees about Y maps +Z onto +X
        let matrix = Pose::new(
            Vec3::new(4.0, 5.0, 6.0),
            Quat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2),
            Vec3::new(3.0, 3.0, 3.0),
        )
        .to_matrix();

        assert_relative_eq!(position_of(&matrix), Vec3::new(4.0, 5.0, 6.0));
        assert_relative_eq!(forward_of(&matrix), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(up_of(&matrix), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(right_of(&matrix), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }
}
