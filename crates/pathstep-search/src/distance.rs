use pathstep_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Euclidean (L2) distance between two points, the A*/GBFS heuristic.
///
/// Never larger than [`manhattan`], so it is admissible on a 4-connected
/// unit-cost grid.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_never_exceeds_manhattan() {
        let goal = Point::new(4, 4);
        for y in 0..5 {
            for x in 0..5 {
                let p = Point::new(x, y);
                assert!(euclidean(p, goal) <= f64::from(manhattan(p, goal)) + 1e-9);
            }
        }
        assert_eq!(euclidean(Point::new(0, 0), Point::new(3, 4)), 5.0);
    }
}
