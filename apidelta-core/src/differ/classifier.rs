//! Turns matched entities into classified changes.

use crate::diagnostic::Diagnostic;
use crate::types::{Entity, Signature};

use super::changes::{Change, Impact, ModifiedKind};
use super::matcher::MatchSet;
use super::signature::compare_parameters;

/// Changes for one source unit, plus notes on conservative calls.
#[derive(Clone, Debug, Default)]
pub struct Classification {
    pub changes: Vec<Change>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Classify every bucket of a match set.
pub fn classify(matches: &MatchSet<'_>) -> Classification {
    let mut result = Classification::default();

    for entity in &matches.only_old {
        result.changes.push(Change::removed(entity));
    }
    for entity in &matches.only_new {
        result.changes.push(Change::added(entity));
    }
    for (old, new) in &matches.matched {
        classify_pair(old, new, &mut result);
    }

    result
}

fn classify_pair(old: &Entity, new: &Entity, out: &mut Classification) {
    // A function that became a class is a different entity, not an edit.
    if old.kind != new.kind {
        out.changes.push(Change::removed(old));
        out.changes.push(Change::added(new));
        return;
    }

    if old.visibility != new.visibility {
        let (impact, details) = if old.visibility.is_public() {
            (Impact::Narrowing, "is no longer public")
        } else {
            (Impact::Extending, "became public")
        };
        out.changes.push(Change::modified(
            ModifiedKind::VisibilityChanged(impact),
            old,
            new,
            details,
        ));
    }

    if old.kind.is_callable() {
        classify_signature(old, new, out);
    }

    classify_bases(old, new, out);

    if old.decorators != new.decorators {
        let details = format!(
            "decorators changed from [{}] to [{}]",
            old.decorators.join(", "),
            new.decorators.join(", ")
        );
        out.changes.push(Change::modified(
            ModifiedKind::DecoratorsChanged,
            old,
            new,
            &details,
        ));
    }
}

fn classify_signature(old: &Entity, new: &Entity, out: &mut Classification) {
    let old_forms = old.call_signatures();
    let new_forms = new.call_signatures();
    if old_forms.len() > 1 || new_forms.len() > 1 {
        classify_overloads(old, new, &old_forms, &new_forms, out);
        return;
    }

    let empty = Signature::default();
    let old_sig = old_forms.first().copied().unwrap_or(&empty);
    let new_sig = new_forms.first().copied().unwrap_or(&empty);

    let delta = compare_parameters(&old_sig.parameters, &new_sig.parameters);
    if let Some(impact) = delta.impact() {
        let details = format!("signature changed: {}", delta.summary());
        out.changes.push(Change::modified(
            ModifiedKind::SignatureChanged(impact),
            old,
            new,
            &details,
        ));
        for reason in &delta.ambiguous {
            out.diagnostics.push(ambiguity(new, reason));
        }
    }

    let details = match (&old_sig.return_type, &new_sig.return_type) {
        (Some(before), Some(after)) if before != after => {
            format!("return type changed from {} to {}", before, after)
        }
        (Some(before), None) => {
            let details = format!("return type {} dropped", before);
            out.diagnostics.push(ambiguity(new, &details));
            details
        }
        (None, Some(after)) => {
            let details = format!("return type {} added", after);
            out.diagnostics.push(ambiguity(new, &details));
            details
        }
        _ => return,
    };
    out.changes.push(Change::modified(
        ModifiedKind::ReturnTypeChanged,
        old,
        new,
        &details,
    ));
}

/// Overloaded callables compare as sets of call forms. A form that is no
/// longer offered narrows the API; a new form extends it.
fn classify_overloads(
    old: &Entity,
    new: &Entity,
    old_forms: &[&Signature],
    new_forms: &[&Signature],
    out: &mut Classification,
) {
    let removed: Vec<String> = old_forms
        .iter()
        .filter(|s| !new_forms.contains(*s))
        .map(|s| s.display())
        .collect();
    let added: Vec<String> = new_forms
        .iter()
        .filter(|s| !old_forms.contains(*s))
        .map(|s| s.display())
        .collect();

    let (impact, details) = if removed.is_empty() && added.is_empty() {
        if old_forms == new_forms {
            return;
        }
        // Same forms, different order: overload resolution may pick another.
        let details = "overload order changed".to_string();
        out.diagnostics.push(ambiguity(new, &details));
        (Impact::Narrowing, details)
    } else {
        let reasons: Vec<String> = removed
            .iter()
            .map(|s| format!("overload {} removed", s))
            .chain(added.iter().map(|s| format!("overload {} added", s)))
            .collect();
        let impact = if removed.is_empty() {
            Impact::Extending
        } else {
            Impact::Narrowing
        };
        (impact, reasons.join("; "))
    };

    out.changes.push(Change::modified(
        ModifiedKind::SignatureChanged(impact),
        old,
        new,
        &format!("signature changed: {}", details),
    ));
}

fn classify_bases(old: &Entity, new: &Entity, out: &mut Classification) {
    if old.bases == new.bases {
        return;
    }

    let removed: Vec<&str> = old
        .bases
        .iter()
        .filter(|b| !new.bases.contains(*b))
        .map(String::as_str)
        .collect();
    let added: Vec<&str> = new
        .bases
        .iter()
        .filter(|b| !old.bases.contains(*b))
        .map(String::as_str)
        .collect();

    let (impact, details) = if !removed.is_empty() {
        let mut details = format!("no longer derives from {}", removed.join(", "));
        if !added.is_empty() {
            details.push_str(&format!("; now derives from {}", added.join(", ")));
        }
        (Impact::Narrowing, details)
    } else if !added.is_empty() {
        (Impact::Extending, format!("now derives from {}", added.join(", ")))
    } else {
        // Same set, different order: method resolution may differ.
        let details = format!(
            "base order changed from ({}) to ({})",
            old.bases.join(", "),
            new.bases.join(", ")
        );
        out.diagnostics.push(ambiguity(new, &details));
        (Impact::Narrowing, details)
    };

    out.changes.push(Change::modified(
        ModifiedKind::BasesChanged(impact),
        old,
        new,
        &details,
    ));
}

fn ambiguity(entity: &Entity, reason: &str) -> Diagnostic {
    Diagnostic::ambiguous(
        &entity.identity,
        format!("{}; treated as breaking", reason),
    )
    .with_path(&entity.location.file)
    .at_line(entity.location.line)
}
