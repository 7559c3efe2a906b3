//! Identity matching between two API surfaces.

use std::collections::HashMap;

use crate::types::{ApiSurface, Entity};

/// Entities partitioned by whether their identity exists on each side.
#[derive(Debug, Default)]
pub struct MatchSet<'a> {
    pub matched: Vec<(&'a Entity, &'a Entity)>,
    pub only_old: Vec<&'a Entity>,
    pub only_new: Vec<&'a Entity>,
}

/// Pair entities by exact identity. Every entity lands in exactly one
/// bucket, and each bucket is in identity order.
pub fn match_entities<'a>(old: &'a ApiSurface, new: &'a ApiSurface) -> MatchSet<'a> {
    let mut unmatched: HashMap<&'a str, &'a Entity> = new
        .entities()
        .map(|e| (e.identity.as_str(), e))
        .collect();

    let mut set = MatchSet::default();
    for entity in old.entities() {
        match unmatched.remove(entity.identity.as_str()) {
            Some(n) => set.matched.push((entity, n)),
            None => set.only_old.push(entity),
        }
    }
    set.only_new = unmatched.into_values().collect();

    set.matched.sort_by(|a, b| a.0.identity.cmp(&b.0.identity));
    set.only_old.sort_by(|a, b| a.identity.cmp(&b.identity));
    set.only_new.sort_by(|a, b| a.identity.cmp(&b.identity));
    set
}
