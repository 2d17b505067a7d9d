//! Point filters.
//!
//! A [Reader](crate::Reader) runs every point it reads sequentially through its filters, and skips
//! the points that any filter rejects:
//!
//! ```
//! use lasindex::{Reader, Writer, Point};
//! use lasindex::filter::ClassificationFilter;
//!
//! let mut writer = Writer::default();
//! writer.write_point(Point { classification: 2.into(), ..Default::default() }).unwrap();
//! writer.write_point(Point { classification: 1.into(), ..Default::default() }).unwrap();
//! let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
//! reader.add_filter(ClassificationFilter::new([2]));
//! let points = reader.points().collect::<Result<Vec<_>, _>>().unwrap();
//! assert_eq!(1, points.len());
//! ```
//!
//! Any `FnMut(&Point) -> bool` closure is an inclusion filter.

use crate::{Bounds, Point};

/// Whether a filter keeps or rejects the points that meet its criteria.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterType {
    /// Keep the points that meet the criteria.
    #[default]
    Inclusion,
    /// Reject the points that meet the criteria.
    Exclusion,
}

/// A criterion applied to each point.
pub trait Filter: Send {
    /// Returns true if the point meets this filter's criteria.
    fn matches(&mut self, point: &Point) -> bool;

    /// Returns whether matching points are kept or rejected.
    fn filter_type(&self) -> FilterType {
        FilterType::Inclusion
    }

    /// Returns true if the point should be kept.
    fn keep(&mut self, point: &Point) -> bool {
        match self.filter_type() {
            FilterType::Inclusion => self.matches(point),
            FilterType::Exclusion => !self.matches(point),
        }
    }
}

impl<F: FnMut(&Point) -> bool + Send> Filter for F {
    fn matches(&mut self, point: &Point) -> bool {
        self(point)
    }
}

/// Matches points inside the bounds, inclusive.
#[derive(Clone, Copy, Debug)]
pub struct BoundsFilter {
    bounds: Bounds,
    include_z: bool,
    filter_type: FilterType,
}

impl BoundsFilter {
    /// Matches points whose x and y are inside the bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::{Bounds, Point, Vector};
    /// use lasindex::filter::{BoundsFilter, Filter};
    ///
    /// let bounds = Bounds::new(Vector::splat(0.), Vector::splat(1.));
    /// let mut filter = BoundsFilter::new_2d(bounds);
    /// assert!(filter.keep(&Point { x: 1., y: 0.5, z: 42., ..Default::default() }));
    /// ```
    pub fn new_2d(bounds: Bounds) -> BoundsFilter {
        BoundsFilter {
            bounds,
            include_z: false,
            filter_type: FilterType::Inclusion,
        }
    }

    /// Matches points whose x, y, and z are inside the bounds.
    pub fn new_3d(bounds: Bounds) -> BoundsFilter {
        BoundsFilter {
            include_z: true,
            ..BoundsFilter::new_2d(bounds)
        }
    }

    /// Sets whether matching points are kept or rejected.
    pub fn with_type(mut self, filter_type: FilterType) -> BoundsFilter {
        self.filter_type = filter_type;
        self
    }
}

impl Filter for BoundsFilter {
    fn matches(&mut self, point: &Point) -> bool {
        self.bounds.contains(point, self.include_z)
    }

    fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

/// Matches points whose class is in a list.
#[derive(Clone, Debug)]
pub struct ClassificationFilter {
    classes: Vec<u8>,
    filter_type: FilterType,
}

impl ClassificationFilter {
    /// Creates a filter matching any of the classes.
    ///
    /// The synthetic, key-point, and withheld flags don't take part in the comparison.
    pub fn new<I: IntoIterator<Item = u8>>(classes: I) -> ClassificationFilter {
        ClassificationFilter {
            classes: classes.into_iter().collect(),
            filter_type: FilterType::Inclusion,
        }
    }

    /// Sets whether matching points are kept or rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// use lasindex::filter::{ClassificationFilter, Filter, FilterType};
    ///
    /// let mut no_noise = ClassificationFilter::new([7]).with_type(FilterType::Exclusion);
    /// assert!(!no_noise.keep(&Point { classification: 7.into(), ..Default::default() }));
    /// assert!(no_noise.keep(&Point::default()));
    /// ```
    pub fn with_type(mut self, filter_type: FilterType) -> ClassificationFilter {
        self.filter_type = filter_type;
        self
    }
}

impl Filter for ClassificationFilter {
    fn matches(&mut self, point: &Point) -> bool {
        self.classes.contains(&point.classification.class())
    }

    fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

/// Matches every nth point it sees, starting with the first.
#[derive(Clone, Copy, Debug)]
pub struct ThinFilter {
    every: u32,
    count: u32,
    filter_type: FilterType,
}

impl ThinFilter {
    /// Creates a filter that matches one point out of every `every`.
    ///
    /// Zero behaves like one.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// use lasindex::filter::{Filter, ThinFilter};
    ///
    /// let mut filter = ThinFilter::new(3);
    /// let kept = (0..9).filter(|_| filter.keep(&Point::default())).count();
    /// assert_eq!(3, kept);
    /// ```
    pub fn new(every: u32) -> ThinFilter {
        ThinFilter {
            every: every.max(1),
            count: 0,
            filter_type: FilterType::Inclusion,
        }
    }

    /// Sets whether matching points are kept or rejected.
    pub fn with_type(mut self, filter_type: FilterType) -> ThinFilter {
        self.filter_type = filter_type;
        self
    }
}

impl Filter for ThinFilter {
    fn matches(&mut self, _: &Point) -> bool {
        let matches = self.count % self.every == 0;
        self.count = self.count.wrapping_add(1);
        matches
    }

    fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

/// Matches points by return number.
#[derive(Clone, Debug)]
pub struct ReturnFilter {
    returns: Vec<u8>,
    last_only: bool,
    filter_type: FilterType,
}

impl ReturnFilter {
    /// Creates a filter matching any of the return numbers.
    ///
    /// If `last_only` is true, the list is ignored and only last returns match.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// use lasindex::filter::{Filter, ReturnFilter};
    ///
    /// let last = Point { return_number: 2, number_of_returns: 2, ..Default::default() };
    /// assert!(ReturnFilter::new([2], false).keep(&last));
    /// assert!(!ReturnFilter::new([1], false).keep(&last));
    /// assert!(ReturnFilter::new([], true).keep(&last));
    /// ```
    pub fn new<I: IntoIterator<Item = u8>>(returns: I, last_only: bool) -> ReturnFilter {
        ReturnFilter {
            returns: returns.into_iter().collect(),
            last_only,
            filter_type: FilterType::Inclusion,
        }
    }

    /// Sets whether matching points are kept or rejected.
    pub fn with_type(mut self, filter_type: FilterType) -> ReturnFilter {
        self.filter_type = filter_type;
        self
    }
}

impl Filter for ReturnFilter {
    fn matches(&mut self, point: &Point) -> bool {
        if self.last_only {
            point.return_number == point.number_of_returns
        } else {
            self.returns.contains(&point.return_number)
        }
    }

    fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

/// Matches points that fail [Point::validate].
///
/// The default type is exclusion, so the filter drops invalid points.
#[derive(Clone, Copy, Debug)]
pub struct ValidationFilter {
    filter_type: FilterType,
}

impl ValidationFilter {
    /// Creates a filter that drops invalid points.
    pub fn new() -> ValidationFilter {
        ValidationFilter {
            filter_type: FilterType::Exclusion,
        }
    }

    /// Sets whether matching points are kept or rejected.
    pub fn with_type(mut self, filter_type: FilterType) -> ValidationFilter {
        self.filter_type = filter_type;
        self
    }
}

impl Default for ValidationFilter {
    fn default() -> ValidationFilter {
        ValidationFilter::new()
    }
}

impl Filter for ValidationFilter {
    fn matches(&mut self, point: &Point) -> bool {
        point.validate().is_err()
    }

    fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;

    fn point(x: f64, y: f64, z: f64) -> Point {
        Point {
            x,
            y,
            z,
            ..Default::default()
        }
    }

    #[test]
    fn bounds_2d_ignores_z() {
        let bounds = Bounds::new(Vector::splat(0.), Vector::splat(1.));
        let mut filter = BoundsFilter::new_2d(bounds);
        assert!(filter.keep(&point(0., 1., 5.)));
        assert!(!filter.keep(&point(1.5, 0., 0.)));
        let mut filter = BoundsFilter::new_3d(bounds);
        assert!(!filter.keep(&point(0., 1., 5.)));
        assert!(filter.keep(&point(0., 1., 1.)));
    }

    #[test]
    fn bounds_exclusion() {
        let bounds = Bounds::new(Vector::splat(0.), Vector::splat(1.));
        let mut filter = BoundsFilter::new_2d(bounds).with_type(FilterType::Exclusion);
        assert!(!filter.keep(&point(0.5, 0.5, 0.)));
        assert!(filter.keep(&point(2., 0.5, 0.)));
    }

    #[test]
    fn classification_ignores_flags() {
        let mut filter = ClassificationFilter::new([2]);
        let mut p = Point::default();
        p.classification.set_class(2).unwrap();
        p.classification.set_withheld(true);
        assert!(filter.keep(&p));
    }

    #[test]
    fn thin_zero() {
        let mut filter = ThinFilter::new(0);
        assert!((0..5).all(|_| filter.keep(&Point::default())));
    }

    #[test]
    fn validation() {
        let mut filter = ValidationFilter::default();
        assert!(filter.keep(&Point::default()));
        assert!(!filter.keep(&Point {
            scan_angle_rank: 100,
            ..Default::default()
        }));
    }

    #[test]
    fn closure() {
        let mut filter = |point: &Point| point.intensity > 10;
        assert!(!filter.keep(&Point::default()));
        assert!(filter.keep(&Point {
            intensity: 11,
            ..Default::default()
        }));
    }
}
