//! Traceability signatures for certificates.
//!
//! The signature is an audit hash, not a security primitive: it ties a
//! certificate to the entity, selection, constraint spec and run that
//! produced it so downstream analysis can detect mixed-up records. It is
//! computed field by field rather than over a serialized rendering, so the
//! digest cannot drift with serializer settings.

use blake3::Hasher;

use accord_slate::{ConstraintSpec, ItemId};

/// Compute the traceability signature for a selection.
#[must_use]
pub fn trace_signature(
    entity_id: u64,
    selection: &[ItemId],
    spec: &ConstraintSpec,
    run_id: &str,
) -> String {
    let mut hasher = Hasher::new();
    hasher.update(&entity_id.to_le_bytes());
    hasher.update(&(selection.len() as u64).to_le_bytes());
    for id in selection {
        hasher.update(&id.as_u64().to_le_bytes());
    }
    update_limit(&mut hasher, spec.popularity.max_head_in_slate);
    update_limit(&mut hasher, spec.popularity.min_tail_in_slate);
    update_limit(&mut hasher, spec.diversity.min_unique_genres_in_slate);
    hasher.update(&[u8::from(spec.safety.no_duplicates)]);
    hasher.update(run_id.as_bytes());
    hex::encode(hasher.finalize().as_bytes())
}

fn update_limit(hasher: &mut Hasher, limit: Option<usize>) {
    match limit {
        Some(value) => {
            hasher.update(&[1]);
            hasher.update(&(value as u64).to_le_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
}
