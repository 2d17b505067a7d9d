/// An xyz collection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector<T> {
    /// X
    pub x: T,
    /// Y
    pub y: T,
    /// Z
    pub z: T,
}

impl<T: Copy> Vector<T> {
    /// Creates a vector with the same value on every axis.
    ///
    /// # Examples
    ///
    /// ```
    /// use lasindex::Vector;
    /// let vector = Vector::splat(0.01);
    /// assert_eq!(0.01, vector.z);
    /// ```
    pub fn splat(value: T) -> Vector<T> {
        Vector {
            x: value,
            y: value,
            z: value,
        }
    }
}
