use crate::{Point, Vector};

/// Minimum and maximum bounds in three dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// The minimum values.
    pub min: Vector<f64>,

    /// The maximum values.
    pub max: Vector<f64>,
}

impl Bounds {
    /// Creates bounds from the minimum and maximum corners.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Bounds, Vector};
    /// let bounds = Bounds::new(
    ///     Vector { x: 0., y: 0., z: 0. },
    ///     Vector { x: 1., y: 1., z: 1. },
    /// );
    /// ```
    pub fn new(min: Vector<f64>, max: Vector<f64>) -> Bounds {
        Bounds { min, max }
    }

    /// Grows the bounds to encompass this point in xyz space.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Bounds, Point};
    /// let point = Point { x: 1., y: 2., z: 3., ..Default::default() };
    /// let mut bounds = Bounds::default();
    /// bounds.grow(&point);
    /// assert_eq!(1., bounds.min.x);
    /// ```
    pub fn grow(&mut self, point: &Point) {
        if point.x < self.min.x {
            self.min.x = point.x;
        }
        if point.y < self.min.y {
            self.min.y = point.y;
        }
        if point.z < self.min.z {
            self.min.z = point.z;
        }
        if point.x > self.max.x {
            self.max.x = point.x;
        }
        if point.y > self.max.y {
            self.max.y = point.y;
        }
        if point.z > self.max.z {
            self.max.z = point.z;
        }
    }

    /// Returns true if these bounds have never been grown.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Bounds, Point};
    /// let mut bounds = Bounds::default();
    /// assert!(bounds.is_empty());
    /// bounds.grow(&Point::default());
    /// assert!(!bounds.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns true if the point lies inside these bounds, edges included.
    ///
    /// When `include_z` is false only x and y are checked.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Bounds, Point, Vector};
    /// let bounds = Bounds::new(Vector::splat(0.), Vector::splat(1.));
    /// let point = Point { x: 1., y: 0.5, z: 2., ..Default::default() };
    /// assert!(bounds.contains(&point, false));
    /// assert!(!bounds.contains(&point, true));
    /// ```
    pub fn contains(&self, point: &Point, include_z: bool) -> bool {
        let xy = point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y;
        if include_z {
            xy && point.z >= self.min.z && point.z <= self.max.z
        } else {
            xy
        }
    }
}

impl Default for Bounds {
    fn default() -> Bounds {
        Bounds {
            min: Vector::splat(f64::INFINITY),
            max: Vector::splat(f64::NEG_INFINITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow() {
        let mut bounds = Bounds::default();
        bounds.grow(&Point {
            x: 1.,
            y: 2.,
            z: 3.,
            ..Default::default()
        });
        assert_eq!(1., bounds.min.x);
        assert_eq!(1., bounds.max.x);
        assert_eq!(2., bounds.min.y);
        assert_eq!(2., bounds.max.y);
        assert_eq!(3., bounds.min.z);
        assert_eq!(3., bounds.max.z);
        bounds.grow(&Point {
            x: 0.,
            y: 1.,
            z: 2.,
            ..Default::default()
        });
        assert_eq!(0., bounds.min.x);
        assert_eq!(1., bounds.max.x);
        assert_eq!(1., bounds.min.y);
        assert_eq!(2., bounds.max.y);
        assert_eq!(2., bounds.min.z);
        assert_eq!(3., bounds.max.z);
        bounds.grow(&Point {
            x: 2.,
            y: 3.,
            z: 4.,
            ..Default::default()
        });
        assert_eq!(0., bounds.min.x);
        assert_eq!(2., bounds.max.x);
        assert_eq!(1., bounds.min.y);
        assert_eq!(3., bounds.max.y);
        assert_eq!(2., bounds.min.z);
        assert_eq!(4., bounds.max.z);
    }
}
