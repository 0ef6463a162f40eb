//! Data-space to display-space axis convention.
//!
//! Display space is right-handed with +y pointing up on screen and +z pointing
//! toward the viewer. The user names which data axis is "up" and which is
//! "anterior"; the lateral axis follows as `up x anterior` and lands on +x.

use crate::error::PlayerError;
use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Signed data-space axis label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Axis {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

impl Axis {
    pub const ALL: [Axis; 6] = [Axis::X, Axis::Y, Axis::Z, Axis::NegX, Axis::NegY, Axis::NegZ];

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            Axis::NegX => Vec3::NEG_X,
            Axis::NegY => Vec3::NEG_Y,
            Axis::NegZ => Vec3::NEG_Z,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::NegX => "-x",
            Axis::NegY => "-y",
            Axis::NegZ => "-z",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Axis {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "x" | "+x" => Ok(Axis::X),
            "y" | "+y" => Ok(Axis::Y),
            "z" | "+z" => Ok(Axis::Z),
            "-x" => Ok(Axis::NegX),
            "-y" => Ok(Axis::NegY),
            "-z" => Ok(Axis::NegZ),
            _ => Err(PlayerError::InvalidAxisLabel(s.to_string())),
        }
    }
}

impl TryFrom<String> for Axis {
    type Error = PlayerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Axis> for String {
    fn from(axis: Axis) -> Self {
        axis.label().to_string()
    }
}

/// Fixed rotation from data space to display space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisConvention {
    up: Axis,
    anterior: Axis,
    rotation: Mat3,
}

impl AxisConvention {
    pub fn new(up: Axis, anterior: Axis) -> Result<Self, PlayerError> {
        let u = up.unit();
        let a = anterior.unit();
        if u.dot(a) != 0.0 {
            return Err(PlayerError::InvalidAxisConvention {
                up: up.to_string(),
                anterior: anterior.to_string(),
            });
        }
        let lateral = u.cross(a);
        // Rows are the data-space directions that land on display x, y, z.
        let rotation = Mat3::from_cols(lateral, u, a).transpose();
        Ok(Self {
            up,
            anterior,
            rotation,
        })
    }

    pub fn from_labels(up: &str, anterior: &str) -> Result<Self, PlayerError> {
        Self::new(up.parse()?, anterior.parse()?)
    }

    pub fn up(&self) -> Axis {
        self.up
    }

    pub fn anterior(&self) -> Axis {
        self.anterior
    }

    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    #[inline]
    pub fn to_display(&self, p: Vec3) -> Vec3 {
        self.rotation * p
    }

    #[inline]
    pub fn to_data(&self, p: Vec3) -> Vec3 {
        self.rotation.transpose() * p
    }
}

impl Default for AxisConvention {
    /// Up `y`, anterior `x`.
    fn default() -> Self {
        let lateral = Vec3::Y.cross(Vec3::X);
        Self {
            up: Axis::Y,
            anterior: Axis::X,
            rotation: Mat3::from_cols(lateral, Vec3::Y, Vec3::X).transpose(),
        }
    }
}
