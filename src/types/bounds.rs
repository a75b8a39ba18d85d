use glam::Vec3;

/// Axis-aligned bounding box in 3-D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Box collapsed onto the origin, used for assets without vertices.
    pub const ZERO: BoundingBox = BoundingBox {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn from_points(points: &[Vec3]) -> Option<BoundingBox> {
        let (first, rest) = points.split_first()?;
        let mut bb = BoundingBox {
            min: *first,
            max: *first,
        };
        for p in rest {
            bb.min = bb.min.min(*p);
            bb.max = bb.max.max(*p);
        }
        Some(bb)
    }

    /// Return the smallest box that contains both `self` and `other`.
    pub fn merge(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The `[min, max]` pair as written into an `extent` attribute.
    pub fn extent(&self) -> [Vec3; 2] {
        [self.min, self.max]
    }
}
