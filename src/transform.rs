use crate::{Error, Result};
use num_traits::cast;
use std::fmt;

/// The scale factor a zero scale is replaced with.
pub const DEFAULT_SCALE: f64 = 0.01;

/// A scale and an offset that transforms xyz coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// The scale.
    pub scale: f64,

    /// The offset.
    pub offset: f64,
}

impl Transform {
    /// Applies this transform to an i32, returning a float.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Transform;
    /// let transform = Transform { scale: 2., offset: 1. };
    /// assert_eq!(3., transform.direct(1));
    /// ```
    pub fn direct(&self, n: i32) -> f64 {
        self.scale * f64::from(n) + self.offset
    }

    /// Applies the inverse transform, and rounds the result.
    ///
    /// Returns an error if the resultant value can't be represented as an i32.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Transform;
    /// let transform = Transform { scale: 2., offset: 1. };
    /// assert_eq!(1, transform.inverse(2.9).unwrap());
    /// assert!(transform.inverse(f64::MAX).is_err());
    /// ```
    pub fn inverse(&self, n: f64) -> Result<i32> {
        let value = ((n - self.offset) / self.scale).round();
        cast::<f64, i32>(value).ok_or(Error::InverseTransform {
            n,
            transform: *self,
        })
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform {
            scale: DEFAULT_SCALE,
            offset: 0.,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{} * x + {}`", self.scale, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large() {
        let transform = Transform::default();
        let n = i32::MAX as f64 * transform.scale + 1.;
        assert!(transform.inverse(n).is_err());
    }

    #[test]
    fn too_small() {
        let transform = Transform::default();
        let n = i32::MIN as f64 * transform.scale - 1.;
        assert!(transform.inverse(n).is_err());
    }

    #[test]
    fn nan() {
        assert!(Transform::default().inverse(f64::NAN).is_err());
    }
}
