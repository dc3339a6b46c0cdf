use super::{Point, Vector};

/// Number of samples used to approximate arc length along a curve. High
/// enough that equal-arc-length placement is stable within the 2-decimal
/// coordinate grid.
const ARC_SAMPLES: usize = 256;

/// A quadratic Bézier helper path used to curve rows of chairs.
///
/// Chairs are placed at equal *arc-length* spacing, not equal parameter
/// spacing, so a strongly bulged row keeps its chairs evenly spread.
#[derive(Debug, Clone)]
pub struct CurvePath {
    start: Point,
    control: Point,
    end: Point,
    /// Cumulative arc length at each sampled parameter.
    lengths: Vec<f64>,
}

impl CurvePath {
    /// Builds the helper path for a chord from `start` to `end` bulged by
    /// `amount`. The control point sits on the chord's perpendicular
    /// bisector; `amount` is signed, so the bulge direction follows its
    /// sign. A zero-length chord yields a degenerate path that places
    /// everything at `start`.
    pub fn for_chord(start: Point, end: Point, amount: f64) -> Self {
        let mid = start.midpoint(end);
        let chord = Vector::between(start, end);
        let control = if chord.length() == 0.0 || amount == 0.0 {
            mid
        } else {
            // Bulge height scales with both the amount and the chord, so
            // the same curve slider value looks alike on short and long
            // rows.
            let offset = chord.length() * amount / 50.0;
            mid.translate(chord.normalize().perpendicular().scale(offset))
        };
        let mut path = Self {
            start,
            control,
            end,
            lengths: Vec::with_capacity(ARC_SAMPLES + 1),
        };
        path.build_length_table();
        path
    }

    fn build_length_table(&mut self) {
        self.lengths.clear();
        self.lengths.push(0.0);
        let mut prev = self.point_at(0.0);
        let mut total = 0.0;
        for i in 1..=ARC_SAMPLES {
            let t = i as f64 / ARC_SAMPLES as f64;
            let p = self.point_at(t);
            total += prev.distance_to(p);
            self.lengths.push(total);
            prev = p;
        }
    }

    /// Total arc length of the path.
    pub fn length(&self) -> f64 {
        *self.lengths.last().unwrap_or(&0.0)
    }

    /// Point at Bézier parameter `t` in `[0, 1]`.
    pub fn point_at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        Point::new(
            u * u * self.start.x + 2.0 * u * t * self.control.x + t * t * self.end.x,
            u * u * self.start.y + 2.0 * u * t * self.control.y + t * t * self.end.y,
        )
    }

    /// Point at arc length `s` from the start, clamped to the path.
    pub fn point_at_length(&self, s: f64) -> Point {
        let total = self.length();
        if total == 0.0 {
            return self.start;
        }
        let s = s.clamp(0.0, total);
        // Binary search the cumulative table, then interpolate.
        let idx = match self
            .lengths
            .binary_search_by(|len| len.partial_cmp(&s).unwrap_or(std::cmp::Ordering::Less))
        {
            Ok(i) => i,
            Err(i) => i,
        };
        if idx == 0 {
            return self.start;
        }
        let (l0, l1) = (self.lengths[idx - 1], self.lengths[idx]);
        let seg = l1 - l0;
        let frac = if seg == 0.0 { 0.0 } else { (s - l0) / seg };
        let t = ((idx - 1) as f64 + frac) / ARC_SAMPLES as f64;
        self.point_at(t)
    }

    /// `n` points spread at equal arc-length spacing from start to end
    /// inclusive.
    pub fn equally_spaced(&self, n: usize) -> Vec<Point> {
        match n {
            0 => Vec::new(),
            1 => vec![self.start],
            _ => {
                let step = self.length() / (n - 1) as f64;
                (0..n).map(|i| self.point_at_length(step * i as f64)).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amount_is_a_straight_line() {
        let path = CurvePath::for_chord(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 0.0);
        let pts = path.equally_spaced(5);
        assert_eq!(pts.len(), 5);
        for (i, p) in pts.iter().enumerate() {
            assert!((p.x - 25.0 * i as f64).abs() < 0.5);
            assert!(p.y.abs() < 1e-9);
        }
    }

    #[test]
    fn bulge_side_follows_amount_sign() {
        let up = CurvePath::for_chord(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 5.0);
        let down = CurvePath::for_chord(Point::new(0.0, 0.0), Point::new(100.0, 0.0), -5.0);
        assert!(up.point_at(0.5).y > 0.0);
        assert!(down.point_at(0.5).y < 0.0);
    }

    #[test]
    fn equal_arc_length_spacing() {
        let path = CurvePath::for_chord(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 20.0);
        let pts = path.equally_spaced(9);
        let gaps: Vec<f64> = pts.windows(2).map(|w| w[0].distance_to(w[1])).collect();
        let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
        for gap in gaps {
            // Chord lengths of equal arcs differ only by curvature, which
            // stays tiny at these bulge heights.
            assert!((gap - mean).abs() < mean * 0.05, "uneven gap {gap} vs {mean}");
        }
    }

    #[test]
    fn endpoints_are_exact() {
        let path = CurvePath::for_chord(Point::new(10.0, 20.0), Point::new(90.0, 40.0), 7.0);
        let pts = path.equally_spaced(4);
        assert_eq!(pts[0], Point::new(10.0, 20.0));
        assert!(pts[3].distance_to(Point::new(90.0, 40.0)) < 0.5);
    }

    #[test]
    fn degenerate_chord_collapses_to_start() {
        let path = CurvePath::for_chord(Point::new(5.0, 5.0), Point::new(5.0, 5.0), 3.0);
        assert_eq!(path.length(), 0.0);
        assert_eq!(path.point_at_length(10.0), Point::new(5.0, 5.0));
    }
}
