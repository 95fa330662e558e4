//! Fragmentation correction of the non-contact region
//!
//! Only the non-contact component that reaches farthest from the reference
//! mesh is kept as genuine non-contact surface; every other component is folded
//! into the contact set. This is a heuristic: small non-contact islands near
//! the threshold are treated as classification noise. A non-contact region that
//! is naturally split into several far-away parts loses all but one of them.

use crate::contact::types::{ConnectivityComponent, ContactFaceSet, DistanceField};
use std::collections::BTreeSet;

/// Tag each component with the largest distance among its faces
pub fn tag_components(
    components: Vec<BTreeSet<usize>>,
    distances: &DistanceField,
) -> Vec<ConnectivityComponent> {
    components
        .into_iter()
        .map(|faces| {
            let max_distance = distances.max_over(&faces);
            ConnectivityComponent {
                faces,
                max_distance,
            }
        })
        .collect()
}

/// Index of the component with the largest max-distance
///
/// Ties go to the first component.
pub fn farthest_component(components: &[ConnectivityComponent]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, component) in components.iter().enumerate() {
        match best {
            Some((_, max)) if component.max_distance <= max => {}
            _ => best = Some((idx, component.max_distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Fold every component except the farthest one into the contact set
///
/// With zero or one component the contact set is returned unchanged.
pub fn correct_fragmentation(
    contact: &ContactFaceSet,
    components: &[ConnectivityComponent],
) -> ContactFaceSet {
    if components.len() <= 1 {
        return contact.clone();
    }

    let Some(retained) = farthest_component(components) else {
        return contact.clone();
    };

    let folded = components
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != retained)
        .flat_map(|(_, component)| component.faces.iter());
    let corrected = contact.with_faces(folded);

    log::info!(
        "Fragmentation correction kept component {} (max distance {:.6}), folded {} faces from {} component(s)",
        retained,
        components[retained].max_distance,
        corrected.len() - contact.len(),
        components.len() - 1
    );

    corrected
}
