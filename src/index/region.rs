use crate::{Bounds, Error, Point, Result};

/// The largest number of dimensions a region can have.
pub const MAX_DIMENSION: usize = 3;

/// An axis-aligned box in two or three dimensions.
///
/// Points are regions with zero extent. All comparisons treat the box as closed, so touching
/// regions intersect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    min: [f64; MAX_DIMENSION],
    max: [f64; MAX_DIMENSION],
    dimension: u32,
}

impl Region {
    /// Creates a two dimensional region.
    ///
    /// The corners may be given in any order.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::Region;
    /// let region = Region::new_2d([1., 0.], [0., 1.]);
    /// assert_eq!(&[0., 0.], region.min());
    /// assert_eq!(&[1., 1.], region.max());
    /// ```
    pub fn new_2d(a: [f64; 2], b: [f64; 2]) -> Region {
        Region::from_corners(&a, &b)
    }

    /// Creates a three dimensional region.
    ///
    /// The corners may be given in any order.
    pub fn new_3d(a: [f64; 3], b: [f64; 3]) -> Region {
        Region::from_corners(&a, &b)
    }

    /// Creates a zero-extent region at the coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::Region;
    /// let region = Region::point(&[1., 2., 3.]).unwrap();
    /// assert_eq!(3, region.dimension());
    /// assert_eq!(0., region.area());
    /// assert!(Region::point(&[1.]).is_err());
    /// ```
    pub fn point(coordinates: &[f64]) -> Result<Region> {
        check_dimension(coordinates.len())?;
        Ok(Region::from_corners(coordinates, coordinates))
    }

    /// Creates a zero-extent region at a las point, using x and y, and z if `dimension` is three.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Point;
    /// use lasindex::index::Region;
    /// let point = Point { x: 1., y: 2., z: 3., ..Default::default() };
    /// let region = Region::from_point(&point, 2).unwrap();
    /// assert_eq!(&[1., 2.], region.min());
    /// ```
    pub fn from_point(point: &Point, dimension: u32) -> Result<Region> {
        let coordinates = [point.x, point.y, point.z];
        let n = usize::try_from(dimension)?;
        check_dimension(n)?;
        Region::point(&coordinates[..n])
    }

    /// Creates a region from las bounds, using x and y, and z if `dimension` is three.
    pub fn from_bounds(bounds: &Bounds, dimension: u32) -> Result<Region> {
        let min = [bounds.min.x, bounds.min.y, bounds.min.z];
        let max = [bounds.max.x, bounds.max.y, bounds.max.z];
        let n = usize::try_from(dimension)?;
        check_dimension(n)?;
        Ok(Region::from_corners(&min[..n], &max[..n]))
    }

    pub(crate) fn empty(dimension: u32) -> Region {
        Region {
            min: [f64::INFINITY; MAX_DIMENSION],
            max: [f64::NEG_INFINITY; MAX_DIMENSION],
            dimension,
        }
    }

    fn from_corners(a: &[f64], b: &[f64]) -> Region {
        let mut region = Region::empty(a.len() as u32);
        for (axis, (a, b)) in a.iter().zip(b).enumerate() {
            region.min[axis] = a.min(*b);
            region.max[axis] = a.max(*b);
        }
        region
    }

    /// Returns the number of dimensions.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Returns the minimum corner.
    pub fn min(&self) -> &[f64] {
        &self.min[..self.axes()]
    }

    /// Returns the maximum corner.
    pub fn max(&self) -> &[f64] {
        &self.max[..self.axes()]
    }

    /// Returns the center along an axis.
    pub fn center(&self, axis: usize) -> f64 {
        (self.min[axis] + self.max[axis]) / 2.
    }

    /// Returns true if the regions share at least one point.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::Region;
    /// let a = Region::new_2d([0., 0.], [1., 1.]);
    /// assert!(a.intersects(&Region::new_2d([1., 1.], [2., 2.])));
    /// assert!(!a.intersects(&Region::new_2d([1.5, 0.], [2., 1.])));
    /// ```
    pub fn intersects(&self, other: &Region) -> bool {
        (0..self.axes()).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// Returns true if `other` lies entirely inside this region.
    pub fn contains(&self, other: &Region) -> bool {
        (0..self.axes()).all(|i| self.min[i] <= other.min[i] && other.max[i] <= self.max[i])
    }

    /// Returns true if the coordinates lie inside this region.
    pub fn contains_point(&self, coordinates: &[f64]) -> bool {
        coordinates.len() == self.axes()
            && coordinates
                .iter()
                .enumerate()
                .all(|(i, &c)| self.min[i] <= c && c <= self.max[i])
    }

    /// Returns the smallest region holding both regions.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::Region;
    /// let a = Region::new_2d([0., 0.], [1., 1.]);
    /// let b = Region::new_2d([2., -1.], [3., 0.]);
    /// assert_eq!(Region::new_2d([0., -1.], [3., 1.]), a.combine(&b));
    /// ```
    pub fn combine(&self, other: &Region) -> Region {
        let mut region = *self;
        for i in 0..self.axes() {
            region.min[i] = self.min[i].min(other.min[i]);
            region.max[i] = self.max[i].max(other.max[i]);
        }
        region
    }

    /// Returns the area, or the volume of a three dimensional region.
    pub fn area(&self) -> f64 {
        if self.is_empty() {
            return 0.;
        }
        (0..self.axes())
            .map(|i| self.max[i] - self.min[i])
            .product()
    }

    /// Returns the sum of the edge lengths along each axis.
    pub fn margin(&self) -> f64 {
        if self.is_empty() {
            return 0.;
        }
        (0..self.axes()).map(|i| self.max[i] - self.min[i]).sum()
    }

    /// Returns the area of the intersection of the two regions.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::Region;
    /// let a = Region::new_2d([0., 0.], [2., 2.]);
    /// let b = Region::new_2d([1., 1.], [3., 3.]);
    /// assert_eq!(1., a.overlap(&b));
    /// ```
    pub fn overlap(&self, other: &Region) -> f64 {
        let mut area = 1.;
        for i in 0..self.axes() {
            let extent = self.max[i].min(other.max[i]) - self.min[i].max(other.min[i]);
            if extent <= 0. {
                return 0.;
            }
            area *= extent;
        }
        area
    }

    /// Returns the euclidean distance from the coordinates to the nearest point of this region.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::index::Region;
    /// let region = Region::new_2d([0., 0.], [1., 1.]);
    /// assert_eq!(0., region.min_distance(&[0.5, 0.5]));
    /// assert_eq!(5., region.min_distance(&[4., 5.]));
    /// ```
    pub fn min_distance(&self, coordinates: &[f64]) -> f64 {
        coordinates
            .iter()
            .take(self.axes())
            .enumerate()
            .map(|(i, &c)| {
                let d = c - c.clamp(self.min[i], self.max[i]);
                d * d
            })
            .sum::<f64>()
            .sqrt()
    }

    pub(crate) fn is_empty(&self) -> bool {
        (0..self.axes()).any(|i| self.min[i] > self.max[i])
    }

    pub(crate) fn check_dimension(&self, expected: u32) -> Result<()> {
        if self.dimension == expected {
            Ok(())
        } else {
            Err(Error::DimensionMismatch {
                expected,
                found: self.dimension,
            })
        }
    }

    pub(crate) fn axes(&self) -> usize {
        self.dimension as usize
    }
}

pub(crate) fn check_dimension(n: usize) -> Result<()> {
    if n == 2 || n == MAX_DIMENSION {
        Ok(())
    } else {
        Err(Error::InvalidIndexOptions(format!(
            "regions have two or three dimensions, not {}",
            n
        )))
    }
}
