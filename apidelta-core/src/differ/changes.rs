//! Change types and severity rules.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Entity, EntityKind, Location, Visibility};

/// Direction of a contract change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Every caller of the old contract still works.
    Extending,
    /// Some caller of the old contract may break.
    Narrowing,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Extending => "extending",
            Impact::Narrowing => "narrowing",
        }
    }
}

/// What changed on an entity present in both versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifiedKind {
    SignatureChanged(Impact),
    ReturnTypeChanged,
    BasesChanged(Impact),
    DecoratorsChanged,
    VisibilityChanged(Impact),
}

impl ModifiedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModifiedKind::SignatureChanged(_) => "signature_changed",
            ModifiedKind::ReturnTypeChanged => "return_type_changed",
            ModifiedKind::BasesChanged(_) => "bases_changed",
            ModifiedKind::DecoratorsChanged => "decorators_changed",
            ModifiedKind::VisibilityChanged(_) => "visibility_changed",
        }
    }

    pub fn impact(&self) -> Option<Impact> {
        match self {
            ModifiedKind::SignatureChanged(i)
            | ModifiedKind::BasesChanged(i)
            | ModifiedKind::VisibilityChanged(i) => Some(*i),
            _ => None,
        }
    }
}

/// Kind of change detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified(ModifiedKind),
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::Modified(_) => "modified",
        }
    }
}

/// Compatibility impact of a change, ordered from least to most severe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Internal,
    Patch,
    Compatible,
    Breaking,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Internal => "internal",
            Severity::Patch => "patch",
            Severity::Compatible => "compatible",
            Severity::Breaking => "breaking",
        }
    }

    /// Uppercase label used as a report heading.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Internal => "INTERNAL",
            Severity::Patch => "PATCH",
            Severity::Compatible => "COMPATIBLE",
            Severity::Breaking => "BREAKING",
        }
    }

    /// All levels, most severe first.
    pub fn descending() -> [Severity; 4] {
        [
            Severity::Breaking,
            Severity::Compatible,
            Severity::Patch,
            Severity::Internal,
        ]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a change to an entity with the given visibility.
///
/// Changes to internal entities are downgraded one step below where a
/// public change would land, so they never reach `Compatible` or
/// `Breaking`. Visibility changes themselves are judged as public: going
/// internal removes a public name, going public adds one.
pub fn severity_of(kind: ChangeKind, visibility: Visibility) -> Severity {
    let public = match kind {
        ChangeKind::Removed => Severity::Breaking,
        ChangeKind::Added => Severity::Compatible,
        ChangeKind::Modified(modified) => match modified {
            ModifiedKind::SignatureChanged(Impact::Narrowing) => Severity::Breaking,
            ModifiedKind::SignatureChanged(Impact::Extending) => Severity::Compatible,
            ModifiedKind::ReturnTypeChanged => Severity::Breaking,
            ModifiedKind::BasesChanged(Impact::Narrowing) => Severity::Breaking,
            ModifiedKind::BasesChanged(Impact::Extending) => Severity::Compatible,
            ModifiedKind::DecoratorsChanged => Severity::Patch,
            ModifiedKind::VisibilityChanged(Impact::Narrowing) => return Severity::Breaking,
            ModifiedKind::VisibilityChanged(Impact::Extending) => return Severity::Compatible,
        },
    };

    match visibility {
        Visibility::Public => public,
        Visibility::Internal => match public {
            Severity::Breaking | Severity::Compatible => Severity::Patch,
            Severity::Patch | Severity::Internal => Severity::Internal,
        },
    }
}

/// A single classified change to an API entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub kind: ChangeKind,
    pub entity_kind: EntityKind,

    /// Identity in the old version, absent for additions.
    pub old_identity: Option<String>,
    /// Identity in the new version, absent for removals.
    pub new_identity: Option<String>,

    pub old_location: Option<Location>,
    pub new_location: Option<Location>,

    /// Rendered call forms of a callable on each side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_signature: Option<String>,

    /// Human-readable explanation.
    pub description: String,

    pub severity: Severity,

    /// Visibility the severity was computed against.
    pub visibility: Visibility,
}

impl Change {
    fn build(
        kind: ChangeKind,
        entity_kind: EntityKind,
        visibility: Visibility,
        old: Option<&Entity>,
        new: Option<&Entity>,
        description: String,
    ) -> Self {
        Self {
            kind,
            entity_kind,
            old_identity: old.map(|e| e.identity.clone()),
            new_identity: new.map(|e| e.identity.clone()),
            old_location: old.map(|e| e.location.clone()),
            new_location: new.map(|e| e.location.clone()),
            old_signature: old.and_then(Entity::signature_text),
            new_signature: new.and_then(Entity::signature_text),
            description,
            severity: severity_of(kind, visibility),
            visibility,
        }
    }

    /// Entity present only in the new version.
    pub fn added(entity: &Entity) -> Self {
        let description = format!("{} '{}' was added", entity.kind.label(), entity.identity);
        Self::build(
            ChangeKind::Added,
            entity.kind,
            entity.visibility,
            None,
            Some(entity),
            description,
        )
    }

    /// Entity present only in the old version.
    pub fn removed(entity: &Entity) -> Self {
        let description = format!("{} '{}' was removed", entity.kind.label(), entity.identity);
        Self::build(
            ChangeKind::Removed,
            entity.kind,
            entity.visibility,
            Some(entity),
            None,
            description,
        )
    }

    /// Entity present in both versions. Severity uses the old visibility
    /// except for visibility changes, which are always judged as public.
    pub fn modified(modified: ModifiedKind, old: &Entity, new: &Entity, details: &str) -> Self {
        let visibility = match modified {
            ModifiedKind::VisibilityChanged(_) => Visibility::Public,
            _ => old.visibility,
        };
        let description = format!("{} '{}' {}", old.kind.label(), old.identity, details);
        Self::build(
            ChangeKind::Modified(modified),
            old.kind,
            visibility,
            Some(old),
            Some(new),
            description,
        )
    }

    /// Identity to report: the new one when present.
    pub fn identity(&self) -> &str {
        self.new_identity
            .as_deref()
            .or(self.old_identity.as_deref())
            .unwrap_or_default()
    }

    pub fn is_breaking(&self) -> bool {
        self.severity == Severity::Breaking
    }

    /// Report order: severity descending, then identity, kind, description.
    pub fn report_order(&self, other: &Self) -> Ordering {
        other
            .severity
            .cmp(&self.severity)
            .then_with(|| self.identity().cmp(other.identity()))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.description.cmp(&other.description))
    }
}

/// Sort changes into report order.
pub fn sort_changes(changes: &mut [Change]) {
    changes.sort_by(|a, b| a.report_order(b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Parameter, Signature};

    fn make_entity(identity: &str, kind: EntityKind, visibility: Visibility) -> Entity {
        Entity::new(identity, kind, Location::new("m.py", 1)).with_visibility(visibility)
    }

    #[test]
    fn test_severity_table_public() {
        use Visibility::Public;
        assert_eq!(severity_of(ChangeKind::Removed, Public), Severity::Breaking);
        assert_eq!(severity_of(ChangeKind::Added, Public), Severity::Compatible);
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::SignatureChanged(Impact::Narrowing)), Public),
            Severity::Breaking
        );
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::SignatureChanged(Impact::Extending)), Public),
            Severity::Compatible
        );
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::ReturnTypeChanged), Public),
            Severity::Breaking
        );
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::BasesChanged(Impact::Narrowing)), Public),
            Severity::Breaking
        );
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::BasesChanged(Impact::Extending)), Public),
            Severity::Compatible
        );
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::DecoratorsChanged), Public),
            Severity::Patch
        );
    }

    #[test]
    fn test_internal_changes_never_reach_compatible() {
        use Visibility::Internal;
        assert_eq!(severity_of(ChangeKind::Removed, Internal), Severity::Patch);
        assert_eq!(severity_of(ChangeKind::Added, Internal), Severity::Patch);
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::ReturnTypeChanged), Internal),
            Severity::Patch
        );
        assert_eq!(
            severity_of(ChangeKind::Modified(ModifiedKind::DecoratorsChanged), Internal),
            Severity::Internal
        );
    }

    #[test]
    fn test_visibility_changes_are_not_downgraded() {
        assert_eq!(
            severity_of(
                ChangeKind::Modified(ModifiedKind::VisibilityChanged(Impact::Narrowing)),
                Visibility::Internal
            ),
            Severity::Breaking
        );
        assert_eq!(
            severity_of(
                ChangeKind::Modified(ModifiedKind::VisibilityChanged(Impact::Extending)),
                Visibility::Internal
            ),
            Severity::Compatible
        );
    }

    #[test]
    fn test_change_constructors() {
        let f = make_entity("m.f", EntityKind::Function, Visibility::Public);
        let removed = Change::removed(&f);
        assert_eq!(removed.description, "Function 'm.f' was removed");
        assert_eq!(removed.old_identity.as_deref(), Some("m.f"));
        assert!(removed.new_identity.is_none());
        assert!(removed.is_breaking());
        assert_eq!(removed.identity(), "m.f");

        let added = Change::added(&make_entity("m.g", EntityKind::Class, Visibility::Internal));
        assert_eq!(added.severity, Severity::Patch);
        assert_eq!(added.visibility, Visibility::Internal);
        assert!(added.old_location.is_none());
        assert!(added.new_signature.is_none());
    }

    #[test]
    fn test_modified_callable_carries_signatures() {
        let old = make_entity("m.f", EntityKind::Function, Visibility::Public)
            .with_signature(Signature::new(vec![Parameter::positional("a")], None));
        let new = make_entity("m.f", EntityKind::Function, Visibility::Public).with_signature(
            Signature::new(vec![Parameter::positional("a"), Parameter::positional("b")], Some("int".into())),
        );
        let change = Change::modified(
            ModifiedKind::SignatureChanged(Impact::Narrowing),
            &old,
            &new,
            "signature changed: required parameter 'b' added",
        );
        assert_eq!(change.old_signature.as_deref(), Some("(a)"));
        assert_eq!(change.new_signature.as_deref(), Some("(a, b) -> int"));

        let removed = Change::removed(&old);
        assert_eq!(removed.old_signature.as_deref(), Some("(a)"));
        assert!(removed.new_signature.is_none());

        let json = serde_json::to_value(&removed).unwrap();
        assert!(json.get("new_signature").is_none());
    }

    #[test]
    fn test_modified_uses_old_visibility() {
        let old = make_entity("m._f", EntityKind::Function, Visibility::Internal);
        let new = make_entity("m._f", EntityKind::Function, Visibility::Internal);
        let change = Change::modified(
            ModifiedKind::SignatureChanged(Impact::Narrowing),
            &old,
            &new,
            "signature changed: parameter 'x' removed",
        );
        assert_eq!(change.severity, Severity::Patch);
        assert_eq!(
            change.description,
            "Function 'm._f' signature changed: parameter 'x' removed"
        );
    }

    #[test]
    fn test_sort_changes() {
        let a = make_entity("m.a", EntityKind::Function, Visibility::Public);
        let b = make_entity("m.b", EntityKind::Function, Visibility::Public);
        let mut changes = vec![Change::added(&a), Change::removed(&b), Change::removed(&a)];
        sort_changes(&mut changes);

        let order: Vec<(&str, Severity)> = changes.iter().map(|c| (c.identity(), c.severity)).collect();
        assert_eq!(
            order,
            vec![
                ("m.a", Severity::Breaking),
                ("m.b", Severity::Breaking),
                ("m.a", Severity::Compatible),
            ]
        );
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Breaking > Severity::Compatible);
        assert!(Severity::Compatible > Severity::Patch);
        assert!(Severity::Patch > Severity::Internal);
        assert_eq!(Severity::descending()[0], Severity::Breaking);
    }
}
