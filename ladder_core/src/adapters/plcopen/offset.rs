//! Vertical stacking of rungs.
//! Every rung is drawn in its own editor viewport starting at y = 0; in the LD body the
//! rungs are laid out one under the other, so each rung's y values get the summed height
//! of the rungs before it.

use crate::domain::graph::{Node, Point, Rung};
use crate::domain::plcopen::Geometry;

/// Running y-offset of one rung band.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset(f64);

impl Offset {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Offset of the band following `rung`.
    /// Negative or non-finite viewport heights count as 0 so the offset never decreases.
    pub fn advance(self, rung: &Rung) -> Self {
        let height = if rung.viewport_height.is_finite() {
            rung.viewport_height.max(0.0)
        } else {
            0.0
        };
        Self(self.0 + height)
    }

    /// Absolute point moved into this band.
    pub fn apply(self, point: Point) -> Point {
        point.shifted(self.0)
    }

    /// Geometry of `node` moved into this band.
    pub fn place(self, node: &Node) -> Geometry {
        Geometry {
            position: self.apply(node.position),
            width: node.width,
            height: node.height,
        }
    }
}

/// Offset applied to each rung, in rung order.
pub fn rung_offsets(rungs: &[Rung]) -> Vec<Offset> {
    rungs
        .iter()
        .scan(Offset::zero(), |offset, rung| {
            let current = *offset;
            *offset = offset.advance(rung);
            Some(current)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::plcopen::fixtures::{contact, rung};

    fn band(height: f64) -> Rung {
        rung("r", Vec::new(), Vec::new(), height)
    }

    #[test]
    fn first_rung_is_not_shifted() {
        let offsets = rung_offsets(&[band(120.0), band(80.0), band(40.0)]);
        let values: Vec<f64> = offsets.iter().map(|o| o.value()).collect();
        assert_eq!(values, vec![0.0, 120.0, 200.0]);
    }

    #[test]
    fn offsets_never_decrease() {
        let rungs = [band(50.0), band(-30.0), band(f64::NAN), band(10.0), band(0.0)];
        let values: Vec<f64> = rung_offsets(&rungs).iter().map(|o| o.value()).collect();
        assert_eq!(values, vec![0.0, 50.0, 50.0, 50.0, 60.0]);
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn empty_program_has_no_offsets() {
        assert!(rung_offsets(&[]).is_empty());
    }

    #[test]
    fn place_shifts_position_only() {
        let node = contact("a", 1, 50.0, 20.0);
        let geometry = Offset::zero().advance(&band(100.0)).place(&node);

        assert_eq!(geometry.position, Point::new(50.0, 120.0));
        assert_eq!(geometry.width, 20.0);
        assert_eq!(geometry.height, 20.0);
    }
}
