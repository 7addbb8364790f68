/// A point in the host's world space where an instance is placed.
///
/// The pool never interprets positions. It only forwards them to the host when spawning or
/// repositioning instances.
///
/// # Example
///
/// ```rust
/// use prototype_pool::Position;
///
/// let position = Position::new(1.0, 0.0, -2.5);
///
/// assert_eq!(position.x(), 1.0);
/// assert_eq!(Position::default(), Position::ORIGIN);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    x: f32,
    y: f32,
    z: f32,
}

impl Position {
    /// The world origin, `(0, 0, 0)`.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    /// Creates a position from its three coordinates.
    #[must_use]
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// The X coordinate.
    #[must_use]
    #[inline]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// The Y coordinate.
    #[must_use]
    #[inline]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// The Z coordinate.
    #[must_use]
    #[inline]
    pub const fn z(&self) -> f32 {
        self.z
    }
}

impl From<[f32; 3]> for Position {
    #[inline]
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// A rotation in the host's world space, stored as a quaternion.
///
/// Like [`Position`], the pool only forwards orientations to the host. Instances created by
/// [`refill()`][crate::PrototypePool::refill] use [`Orientation::IDENTITY`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Orientation {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl Orientation {
    /// No rotation.
    pub const IDENTITY: Self = Self::from_quaternion(0.0, 0.0, 0.0, 1.0);

    /// Creates an orientation from raw quaternion components.
    ///
    /// The components are not normalized; the host decides how to treat them.
    #[must_use]
    #[inline]
    pub const fn from_quaternion(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// The quaternion components in `[x, y, z, w]` order.
    #[must_use]
    #[inline]
    pub const fn to_quaternion(&self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Default for Orientation {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}
