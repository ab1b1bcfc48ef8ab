//! Edge-edge intersection constructions.
//!
//! Intersection points are constructed in floating point under every
//! kernel; the kernel's sign primitives decide coincidence of carriers and
//! the kernel tolerance filters arc membership. Arc endpoints count as
//! intersections; the caller discards re-detected entry points.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;
use sphere_types::{EdgeKind, Node};

use crate::kernel::{EdgeCrossings, SphericalKernel};

/// z-component of the 2D cross product of the xy-projections.
#[inline]
pub(crate) fn cross2(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Normalize, or return the zero vector when the input is too short.
#[inline]
pub(crate) fn normalize_or_zero(v: Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    if norm <= f64::EPSILON {
        Vector3::zeros()
    } else {
        v / norm
    }
}

/// Unit tangent at `at` of the arc of the given kind heading toward
/// `toward`. Returns the zero vector when the direction is degenerate
/// (`toward` at or antipodal to `at`, or a constant-latitude tangent at a
/// pole).
pub(crate) fn edge_tangent(at: &Node, toward: &Node, kind: EdgeKind) -> Vector3<f64> {
    let p = at.coords();
    match kind {
        EdgeKind::GreatCircle => {
            let q = toward.coords();
            normalize_or_zero(q - p * p.dot(&q))
        }
        EdgeKind::ConstantLatitude => {
            let east = Vector3::new(-p.y, p.x, 0.0);
            if cross2(&p, &toward.coords()) >= 0.0 {
                normalize_or_zero(east)
            } else {
                normalize_or_zero(-east)
            }
        }
    }
}

/// Membership of `q` in the arc from `p0` to `p1`, assuming `q` lies on
/// the arc's carrier circle. `strict` excludes the endpoints (within
/// tolerance); otherwise the arc is closed.
pub(crate) fn within_arc<K: SphericalKernel>(
    kernel: &K,
    p0: &Node,
    p1: &Node,
    kind: EdgeKind,
    q: &Node,
    strict: bool,
) -> bool {
    let tol = kernel.tolerance();
    match kind {
        EdgeKind::GreatCircle => {
            let n = p0.coords().cross(&p1.coords());
            let s0 = p0.coords().cross(&q.coords()).dot(&n);
            let s1 = q.coords().cross(&p1.coords()).dot(&n);
            if strict {
                s0 > tol && s1 > tol
            } else {
                s0 >= -tol && s1 >= -tol
            }
        }
        EdgeKind::ConstantLatitude => {
            let (a, b, c) = (p0.coords(), p1.coords(), q.coords());
            let s0 = cross2(&a, &c);
            let s1 = cross2(&c, &b);
            let eastward = cross2(&a, &b) >= 0.0;
            match (eastward, strict) {
                (true, false) => s0 >= -tol && s1 >= -tol,
                (true, true) => s0 > tol && s1 > tol,
                (false, false) => s0 <= tol && s1 <= tol,
                (false, true) => s0 < -tol && s1 < -tol,
            }
        }
    }
}

/// All intersections of two edges; see the trait documentation.
pub(crate) fn edge_crossings<K: SphericalKernel>(
    kernel: &K,
    a0: &Node,
    a1: &Node,
    kind_a: EdgeKind,
    b0: &Node,
    b1: &Node,
    kind_b: EdgeKind,
) -> EdgeCrossings {
    match (kind_a, kind_b) {
        (EdgeKind::GreatCircle, EdgeKind::GreatCircle) => great_great(kernel, a0, a1, b0, b1),
        (EdgeKind::GreatCircle, EdgeKind::ConstantLatitude) => {
            great_latitude(kernel, a0, a1, b0, b1, kind_a, kind_b)
        }
        (EdgeKind::ConstantLatitude, EdgeKind::GreatCircle) => {
            great_latitude(kernel, b0, b1, a0, a1, kind_b, kind_a)
        }
        (EdgeKind::ConstantLatitude, EdgeKind::ConstantLatitude) => {
            latitude_latitude(kernel, a0, a1, b0, b1)
        }
    }
}

fn great_great<K: SphericalKernel>(
    kernel: &K,
    a0: &Node,
    a1: &Node,
    b0: &Node,
    b1: &Node,
) -> EdgeCrossings {
    let va0 = a0.coords();
    let va1 = a1.coords();

    // Both endpoints of b on the carrier plane of a: one great circle.
    if kernel.triple_sign(&va0, &va1, &b0.coords()).is_zero()
        && kernel.triple_sign(&va0, &va1, &b1.coords()).is_zero()
    {
        return same_circle(
            kernel,
            a0,
            a1,
            EdgeKind::GreatCircle,
            b0,
            b1,
            EdgeKind::GreatCircle,
        );
    }

    let n = va0.cross(&va1);
    let m = b0.coords().cross(&b1.coords());
    let dir = n.cross(&m);
    let len = dir.norm();
    if len < kernel.tolerance() {
        // Nearly parallel carriers that the signs still separate: the true
        // crossings lie far from both arcs.
        return EdgeCrossings::default();
    }

    let p = Node::new(Point3::from(dir / len));
    let antipode = Node::new(Point3::from(-dir / len));

    let mut points = SmallVec::new();
    for candidate in [p, antipode] {
        if within_arc(kernel, a0, a1, EdgeKind::GreatCircle, &candidate, false)
            && within_arc(kernel, b0, b1, EdgeKind::GreatCircle, &candidate, false)
        {
            points.push(candidate);
        }
    }

    EdgeCrossings {
        coincident: false,
        points,
    }
}

fn great_latitude<K: SphericalKernel>(
    kernel: &K,
    g0: &Node,
    g1: &Node,
    c0: &Node,
    c1: &Node,
    kind_g: EdgeKind,
    kind_c: EdgeKind,
) -> EdgeCrossings {
    let n = g0.coords().cross(&g1.coords());
    let z0 = c0.position.z;
    let nxy2 = n.x * n.x + n.y * n.y;

    if nxy2.sqrt() < kernel.tolerance() {
        // The great circle is the equator.
        if kernel.scalar_sign(z0).is_zero() {
            return same_circle(kernel, g0, g1, kind_g, c0, c1, kind_c);
        }
        return EdgeCrossings::default();
    }

    let r2 = 1.0 - z0 * z0;
    if r2 <= 0.0 {
        return EdgeCrossings::default();
    }

    // The carrier plane cuts the latitude plane in the 2D line
    // n.x * x + n.y * y = -n.z * z0; intersect it with the latitude circle.
    let rhs = -n.z * z0;
    let foot = rhs / nxy2;
    let disc = r2 - rhs * rhs / nxy2;
    if disc < -kernel.tolerance() {
        return EdgeCrossings::default();
    }

    let half = if disc > 0.0 { disc.sqrt() } else { 0.0 };
    let along = Vector3::new(-n.y, n.x, 0.0) / nxy2.sqrt();
    let base = Vector3::new(foot * n.x, foot * n.y, z0);

    let mut points: SmallVec<[Node; 2]> = SmallVec::new();
    for side in [half, -half] {
        let candidate = Node::new(Point3::from(base + along * side)).normalized();
        let duplicate = points.iter().any(|p| kernel.nodes_equal(p, &candidate));
        if !duplicate
            && within_arc(kernel, g0, g1, EdgeKind::GreatCircle, &candidate, false)
            && within_arc(kernel, c0, c1, EdgeKind::ConstantLatitude, &candidate, false)
        {
            points.push(candidate);
        }
    }

    EdgeCrossings {
        coincident: false,
        points,
    }
}

fn latitude_latitude<K: SphericalKernel>(
    kernel: &K,
    a0: &Node,
    a1: &Node,
    b0: &Node,
    b1: &Node,
) -> EdgeCrossings {
    if !kernel.scalar_sign(a0.position.z - b0.position.z).is_zero() {
        // Distinct parallels never meet.
        return EdgeCrossings::default();
    }
    same_circle(
        kernel,
        a0,
        a1,
        EdgeKind::ConstantLatitude,
        b0,
        b1,
        EdgeKind::ConstantLatitude,
    )
}

/// Two arcs on one carrier circle: coincident when they share an interval,
/// otherwise they can meet only at shared endpoints.
fn same_circle<K: SphericalKernel>(
    kernel: &K,
    a0: &Node,
    a1: &Node,
    kind_a: EdgeKind,
    b0: &Node,
    b1: &Node,
    kind_b: EdgeKind,
) -> EdgeCrossings {
    let strict_in_a = |q: &Node| within_arc(kernel, a0, a1, kind_a, q, true);
    let strict_in_b = |q: &Node| within_arc(kernel, b0, b1, kind_b, q, true);

    let mut overlap =
        strict_in_a(b0) || strict_in_a(b1) || strict_in_b(a0) || strict_in_b(a1);

    if !overlap {
        if let Some(mid) = arc_midpoint(a0, a1) {
            overlap |= within_arc(kernel, b0, b1, kind_b, &mid, false);
        }
        if let Some(mid) = arc_midpoint(b0, b1) {
            overlap |= within_arc(kernel, a0, a1, kind_a, &mid, false);
        }
    }

    if overlap {
        return EdgeCrossings {
            coincident: true,
            points: SmallVec::new(),
        };
    }

    let mut points: SmallVec<[Node; 2]> = SmallVec::new();
    for shared in [a0, a1] {
        let touches = kernel.nodes_equal(shared, b0) || kernel.nodes_equal(shared, b1);
        let duplicate = points.iter().any(|p| kernel.nodes_equal(p, shared));
        if touches && !duplicate {
            points.push(*shared);
        }
    }

    EdgeCrossings {
        coincident: false,
        points,
    }
}

/// Midpoint of the shorter arc; `None` for (near-)antipodal endpoints.
fn arc_midpoint(p0: &Node, p1: &Node) -> Option<Node> {
    let sum = p0.coords() + p1.coords();
    if sum.norm() <= f64::EPSILON {
        return None;
    }
    Some(Node::new(Point3::from(sum.normalize())))
}
