use std::fmt;

/// Which child slot of a parent a node occupies (or should occupy).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Side {
    /// The left child slot. Insertion sends keys less than the parent's here.
    Left,
    /// The right child slot. Insertion sends keys greater than or equal to the
    /// parent's here.
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

impl Side {
    /// The other side.
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// The side a new key descends to when compared with an existing key.
    /// Ties go right.
    pub(crate) fn of<K: Ord>(new: &K, existing: &K) -> Side {
        if new < existing {
            Side::Left
        } else {
            Side::Right
        }
    }
}
