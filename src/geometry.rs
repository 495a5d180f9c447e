use crate::types::{DrawPoint, Landmark};

/// Euclidean distance between two landmarks in normalized 3D space.
pub fn distance_3d(a: &Landmark, b: &Landmark) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Planar distance between two surface points. Same metric as
/// `distance_3d` with z forced to zero; used for jump detection
/// between consecutive trail points.
pub fn planar_distance(a: &DrawPoint, b: &DrawPoint) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}
