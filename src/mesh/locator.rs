use super::{ActionMesh, Checkpoint};

/// Nearest checkpoint to `time`, or None if it is more than `tolerance`
/// seconds away. A distance of exactly `tolerance` is accepted. On a tie the
/// earlier checkpoint wins.
pub fn locate(mesh: &ActionMesh, time: f64, tolerance: f64) -> Option<&Checkpoint> {
    if !time.is_finite() {
        return None;
    }
    let cps = mesh.checkpoints();
    // First index with cp.time >= time
    let idx = cps.partition_point(|c| c.time < time);

    let before = idx.checked_sub(1).and_then(|i| cps.get(i));
    let after = cps.get(idx);

    let best = match (before, after) {
        (Some(b), Some(a)) => {
            if (time - b.time) <= (a.time - time) {
                b
            } else {
                a
            }
        }
        (Some(b), None) => b,
        (None, Some(a)) => a,
        (None, None) => return None,
    };

    if (best.time - time).abs() <= tolerance {
        Some(best)
    } else {
        None
    }
}

/// Linear scan with the same semantics as [`locate`].
pub fn locate_linear(mesh: &ActionMesh, time: f64, tolerance: f64) -> Option<&Checkpoint> {
    if !time.is_finite() {
        return None;
    }
    let mut best: Option<(&Checkpoint, f64)> = None;
    for c in mesh.checkpoints() {
        let diff = (c.time - time).abs();
        match best {
            Some((_, d)) if diff >= d => {}
            _ => best = Some((c, diff)),
        }
    }
    best.filter(|(_, d)| *d <= tolerance).map(|(c, _)| c)
}
