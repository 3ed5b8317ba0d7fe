use serde::{Deserialize, Serialize};

use crate::config::DiagramConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `distance` away from `self` in the direction `angle`.
    pub fn polar(self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    /// 1-based position in enumeration order.
    pub number: u32,
    pub start_angle: f64,
    pub mid_angle: f64,
}

/// Angular partition of the circle described by a [`DiagramConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorLayout {
    pub center: Point,
    pub radius: f64,
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

impl SectorLayout {
    pub fn from_config(config: &DiagramConfig) -> Self {
        Self {
            center: config.center(),
            radius: config.radius(),
            start: config.start_angle(),
            end: config.end_angle(),
            count: config.sectors(),
        }
    }

    pub fn span(&self) -> f64 {
        (self.end - self.start) / self.count as f64
    }

    pub fn half_span(&self) -> f64 {
        self.span() / 2.0
    }

    /// Boundaries are `start + k * span` for `k in 0..count`: exactly `count`
    /// sectors, every boundary in `[start, end)`.
    pub fn sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        let span = self.span();
        let half = self.half_span();
        (0..self.count).map(move |idx| {
            let start_angle = self.start + idx as f64 * span;
            Sector {
                number: idx + 1,
                start_angle,
                mid_angle: start_angle + half,
            }
        })
    }

    pub fn boundary_angles(&self) -> Vec<f64> {
        self.sectors().map(|sector| sector.start_angle).collect()
    }

    pub fn mid_angles(&self) -> Vec<f64> {
        self.sectors().map(|sector| sector.mid_angle).collect()
    }

    pub fn rim_point(&self, angle: f64) -> Point {
        self.center.polar(angle, self.radius)
    }

    pub fn spoke(&self, angle: f64) -> Segment {
        Segment {
            from: self.center,
            to: self.rim_point(angle),
        }
    }

    /// Label anchor: half way out along the sector midpoint.
    pub fn label_anchor(&self, sector: &Sector) -> Point {
        self.center.polar(sector.mid_angle, self.radius / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn layout(count: u32, start: f64, end: f64) -> SectorLayout {
        SectorLayout {
            center: Point::new(400.0, 400.0),
            radius: 300.0,
            start,
            end,
            count,
        }
    }

    #[test]
    fn boundary_count_matches_sector_count() {
        for count in [1, 2, 3, 7, 12, 13, 360, 1000] {
            assert_eq!(layout(count, 0.0, TAU).boundary_angles().len(), count as usize);
            assert_eq!(layout(count, 0.1, 2.9).boundary_angles().len(), count as usize);
        }
    }

    #[test]
    fn boundaries_stay_inside_half_open_sweep() {
        let layout = layout(7, 0.3, 0.3 + TAU);
        for angle in layout.boundary_angles() {
            assert!(angle >= layout.start && angle < layout.end);
        }
    }

    #[test]
    fn single_sector_starts_at_start_angle() {
        let layout = layout(1, FRAC_PI_2, FRAC_PI_2 + TAU);
        assert_eq!(layout.boundary_angles(), vec![FRAC_PI_2]);
        assert!((layout.mid_angles()[0] - (FRAC_PI_2 + PI)).abs() < 1e-12);
    }

    #[test]
    fn span_uses_sweep_not_end_angle() {
        let layout = layout(4, PI, TAU);
        assert!((layout.span() - PI / 4.0).abs() < 1e-12);
        assert!((layout.mid_angles()[0] - (PI + PI / 8.0)).abs() < 1e-12);
        for sector in layout.sectors() {
            assert!((sector.mid_angle - sector.start_angle - layout.half_span()).abs() < 1e-12);
        }
    }

    #[test]
    fn sectors_are_numbered_from_one() {
        let numbers: Vec<u32> = layout(5, 0.0, TAU).sectors().map(|s| s.number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn label_anchor_sits_at_half_radius() {
        let layout = layout(4, 0.0, TAU);
        let first = layout.sectors().next().unwrap();
        let anchor = layout.label_anchor(&first);
        let dx = anchor.x - 400.0;
        let dy = anchor.y - 400.0;
        assert!(((dx * dx + dy * dy).sqrt() - 150.0).abs() < 1e-9);
        assert!((dy.atan2(dx) - PI / 4.0).abs() < 1e-12);
    }

    #[test]
    fn spoke_runs_from_center_to_rim() {
        let spoke = layout(12, 0.0, TAU).spoke(0.0);
        assert_eq!(spoke.from, Point::new(400.0, 400.0));
        assert!((spoke.to.x - 700.0).abs() < 1e-9);
        assert!((spoke.to.y - 400.0).abs() < 1e-9);
    }
}
