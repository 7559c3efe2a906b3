//! Parameter-list comparison.
//!
//! Each difference between two parameter lists is recorded as a reason
//! under one of three headings. Ambiguous reasons count as narrowing when
//! the overall impact is decided.

use crate::types::{ParamKind, Parameter};

use super::changes::Impact;

/// Reasons found when comparing two parameter lists.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignatureDelta {
    pub narrowing: Vec<String>,
    pub extending: Vec<String>,
    pub ambiguous: Vec<String>,
}

impl SignatureDelta {
    pub fn is_unchanged(&self) -> bool {
        self.narrowing.is_empty() && self.extending.is_empty() && self.ambiguous.is_empty()
    }

    /// Overall direction, `None` when nothing changed.
    pub fn impact(&self) -> Option<Impact> {
        if self.is_unchanged() {
            None
        } else if !self.narrowing.is_empty() || !self.ambiguous.is_empty() {
            Some(Impact::Narrowing)
        } else {
            Some(Impact::Extending)
        }
    }

    /// All reasons, narrowing first.
    pub fn summary(&self) -> String {
        self.narrowing
            .iter()
            .chain(self.ambiguous.iter())
            .chain(self.extending.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn by_kind(params: &[Parameter], kind: ParamKind) -> Vec<&Parameter> {
    params.iter().filter(|p| p.kind == kind).collect()
}

fn find<'a>(params: &[&'a Parameter], name: &str) -> Option<(usize, &'a Parameter)> {
    params
        .iter()
        .enumerate()
        .find(|(_, p)| p.name == name)
        .map(|(i, p)| (i, *p))
}

/// Compare two parameter lists.
pub fn compare_parameters(old: &[Parameter], new: &[Parameter]) -> SignatureDelta {
    let mut delta = SignatureDelta::default();

    let old_pos = by_kind(old, ParamKind::Positional);
    let new_pos = by_kind(new, ParamKind::Positional);
    let old_kw = by_kind(old, ParamKind::KeywordOnly);
    let new_kw = by_kind(new, ParamKind::KeywordOnly);

    for (i, o) in old_pos.iter().enumerate() {
        if let Some((j, n)) = find(&new_pos, &o.name) {
            if i != j {
                delta.narrowing.push(format!(
                    "parameter '{}' moved from position {} to {}",
                    o.name,
                    i + 1,
                    j + 1
                ));
            }
            compare_matched(o, n, &mut delta);
        } else if let Some((_, n)) = find(&new_kw, &o.name) {
            // Keyword callers still bind; positional callers break.
            delta
                .ambiguous
                .push(format!("parameter '{}' became keyword-only", o.name));
            compare_matched(o, n, &mut delta);
        } else {
            delta
                .narrowing
                .push(format!("parameter '{}' removed", o.name));
        }
    }

    for n in &new_pos {
        if find(&old_pos, &n.name).is_some() {
            continue;
        }
        if let Some((_, o)) = find(&old_kw, &n.name) {
            // Keyword callers still bind; positional callers may shift.
            delta
                .ambiguous
                .push(format!("keyword-only parameter '{}' became positional", n.name));
            compare_matched(o, n, &mut delta);
        } else if n.has_default {
            delta
                .extending
                .push(format!("optional parameter '{}' added", n.name));
        } else {
            delta
                .narrowing
                .push(format!("required parameter '{}' added", n.name));
        }
    }

    for o in &old_kw {
        if let Some((_, n)) = find(&new_kw, &o.name) {
            compare_matched(o, n, &mut delta);
        } else if find(&new_pos, &o.name).is_none() {
            delta
                .narrowing
                .push(format!("keyword-only parameter '{}' removed", o.name));
        }
    }

    for n in &new_kw {
        if find(&old_kw, &n.name).is_some() || find(&old_pos, &n.name).is_some() {
            continue;
        }
        if n.has_default {
            delta
                .extending
                .push(format!("optional keyword-only parameter '{}' added", n.name));
        } else {
            delta
                .narrowing
                .push(format!("required keyword-only parameter '{}' added", n.name));
        }
    }

    compare_variadic(old, new, ParamKind::VarPositional, "extra positional arguments", &mut delta);
    compare_variadic(old, new, ParamKind::VarKeyword, "extra keyword arguments", &mut delta);

    delta
}

/// Default and annotation changes on a parameter present in both lists.
fn compare_matched(old: &Parameter, new: &Parameter, delta: &mut SignatureDelta) {
    match (old.has_default, new.has_default) {
        (true, false) => delta
            .narrowing
            .push(format!("default removed from parameter '{}'", old.name)),
        (false, true) => delta
            .extending
            .push(format!("default added to parameter '{}'", old.name)),
        _ => {}
    }

    match (&old.annotation, &new.annotation) {
        (Some(before), Some(after)) if before != after => delta.ambiguous.push(format!(
            "annotation of parameter '{}' changed from {} to {}",
            old.name, before, after
        )),
        (Some(before), None) => delta.ambiguous.push(format!(
            "annotation {} dropped from parameter '{}'",
            before, old.name
        )),
        (None, Some(after)) => delta.ambiguous.push(format!(
            "annotation {} added to parameter '{}'",
            after, old.name
        )),
        _ => {}
    }
}

fn compare_variadic(
    old: &[Parameter],
    new: &[Parameter],
    kind: ParamKind,
    what: &str,
    delta: &mut SignatureDelta,
) {
    let had = old.iter().any(|p| p.kind == kind);
    let has = new.iter().any(|p| p.kind == kind);
    match (had, has) {
        (true, false) => delta.narrowing.push(format!("no longer accepts {}", what)),
        (false, true) => delta.extending.push(format!("now accepts {}", what)),
        _ => {}
    }
}
