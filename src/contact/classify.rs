//! Threshold classification of probe faces

use crate::contact::types::{ContactFaceSet, DistanceField};

/// Faces whose distance is strictly below `threshold`
pub fn classify_contact_faces(distances: &DistanceField, threshold: f64) -> ContactFaceSet {
    let contact = ContactFaceSet::from_faces(
        distances
            .values()
            .iter()
            .enumerate()
            .filter(|(_, &d)| d < threshold)
            .map(|(idx, _)| idx),
    );

    log::info!(
        "Classified {} of {} faces as contact (threshold {:.6})",
        contact.len(),
        distances.len(),
        threshold
    );

    contact
}
