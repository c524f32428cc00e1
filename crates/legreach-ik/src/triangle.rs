//! Triangle inequality test used to decide whether the femur/tibia pair can
//! span the distance from the coxa tip to the foot.

/// `true` iff side lengths `a`, `b`, `c` form a non-degenerate triangle.
///
/// Signs are ignored. Collinear (degenerate) triples and any triple
/// containing NaN return `false`.
pub fn can_form_triangle(a: f64, b: f64, c: f64) -> bool {
    let (a, b, c) = (a.abs(), b.abs(), c.abs());
    a + b > c && b + c > a && c + a > b
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
