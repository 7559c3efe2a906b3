//! Data model for extracted API surfaces.
//!
//! These types are the language-agnostic representation every analyzer
//! produces: a flat, identity-keyed collection of entities per source unit.
//! Two surfaces are compared by identity only, so nothing here carries a
//! reference to the parse tree it came from.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a top-level or nested API entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Module,
    Function,
    Method,
    Class,
    Variable,
    Import,
    /// Reserved for analyzers that expose decorators as standalone entities.
    Decorator,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Module => "module",
            EntityKind::Function => "function",
            EntityKind::Method => "method",
            EntityKind::Class => "class",
            EntityKind::Variable => "variable",
            EntityKind::Import => "import",
            EntityKind::Decorator => "decorator",
        }
    }

    /// Capitalized label used in change descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Module => "Module",
            EntityKind::Function => "Function",
            EntityKind::Method => "Method",
            EntityKind::Class => "Class",
            EntityKind::Variable => "Variable",
            EntityKind::Import => "Import",
            EntityKind::Decorator => "Decorator",
        }
    }

    /// Function-like entities carry a signature.
    pub fn is_callable(&self) -> bool {
        matches!(self, EntityKind::Function | EntityKind::Method)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an entity is part of the public contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Internal,
}

impl Visibility {
    pub fn is_public(&self) -> bool {
        matches!(self, Visibility::Public)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
        }
    }
}

/// How a parameter binds at a call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Bindable by position (and usually by name).
    Positional,
    /// Bindable by name only.
    KeywordOnly,
    /// Catch-all for extra positional arguments (`*args`, `...rest`).
    VarPositional,
    /// Catch-all for extra keyword arguments (`**kwargs`).
    VarKeyword,
}

/// A function/method parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParamKind,
    pub has_default: bool,
    pub annotation: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            has_default: false,
            annotation: None,
        }
    }

    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Positional)
    }

    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::KeywordOnly)
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    /// Variadic catch-alls never require an argument.
    pub fn is_required(&self) -> bool {
        !self.has_default && matches!(self.kind, ParamKind::Positional | ParamKind::KeywordOnly)
    }
}

/// Ordered parameter list plus declared return type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

impl Signature {
    pub fn new(parameters: Vec<Parameter>, return_type: Option<String>) -> Self {
        Self {
            parameters,
            return_type,
        }
    }

    /// Compact rendering used in change descriptions, e.g. `(a, b=..., *args) -> int`.
    pub fn display(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| {
                let mut out = match p.kind {
                    ParamKind::VarPositional => format!("*{}", p.name),
                    ParamKind::VarKeyword => format!("**{}", p.name),
                    _ => p.name.clone(),
                };
                if let Some(ann) = &p.annotation {
                    out.push_str(": ");
                    out.push_str(ann);
                }
                if p.has_default {
                    out.push_str("=...");
                }
                out
            })
            .collect();
        match &self.return_type {
            Some(ret) => format!("({}) -> {}", params.join(", "), ret),
            None => format!("({})", params.join(", ")),
        }
    }
}

/// Source location of an entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A named API element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Dotted path from the module root, e.g. `pkg.mod.Class.method`.
    pub identity: String,
    pub kind: EntityKind,
    pub location: Location,
    pub signature: Option<Signature>,
    /// Declared overloads, in source order. When present, `signature` is
    /// `None`: only the overloads are callable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overloads: Vec<Signature>,
    /// Base types, in declaration order. Classes only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bases: Vec<String>,
    pub visibility: Visibility,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub decorators: Vec<String>,
    /// Identity of the enclosing entity, `None` only for the module itself.
    pub parent: Option<String>,
}

impl Entity {
    pub fn new(identity: impl Into<String>, kind: EntityKind, location: Location) -> Self {
        Self {
            identity: identity.into(),
            kind,
            location,
            signature: None,
            overloads: Vec::new(),
            bases: Vec::new(),
            visibility: Visibility::Public,
            decorators: Vec::new(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// A single declared form is an ordinary signature.
    pub fn with_overloads(mut self, mut overloads: Vec<Signature>) -> Self {
        if overloads.len() == 1 {
            self.signature = overloads.pop();
            self.overloads.clear();
        } else {
            self.signature = None;
            self.overloads = overloads;
        }
        self
    }

    /// Every form a caller may use.
    pub fn call_signatures(&self) -> Vec<&Signature> {
        if self.overloads.is_empty() {
            self.signature.iter().collect()
        } else {
            self.overloads.iter().collect()
        }
    }

    /// Call forms rendered for reports, overloads separated by ` | `.
    pub fn signature_text(&self) -> Option<String> {
        let forms = self.call_signatures();
        if forms.is_empty() {
            return None;
        }
        Some(
            forms
                .iter()
                .map(|s| s.display())
                .collect::<Vec<_>>()
                .join(" | "),
        )
    }

    pub fn with_bases(mut self, bases: Vec<String>) -> Self {
        self.bases = bases;
        self
    }

    pub fn with_decorators(mut self, decorators: Vec<String>) -> Self {
        self.decorators = decorators;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Last segment of the identity.
    pub fn name(&self) -> &str {
        self.identity
            .rsplit('.')
            .next()
            .unwrap_or(self.identity.as_str())
    }
}

/// Join a parent identity and a local name.
pub fn join_identity(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

/// The extracted API of one source unit.
///
/// Entities are keyed by identity; construction goes through
/// [`SurfaceBuilder`] so uniqueness holds by construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSurface {
    pub module: String,
    pub language: String,
    pub path: String,
    entities: BTreeMap<String, Entity>,
}

impl ApiSurface {
    /// A surface with no entities, standing in for an absent file.
    pub fn empty(module: impl Into<String>, language: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            language: language.into(),
            path: path.into(),
            entities: BTreeMap::new(),
        }
    }

    pub fn get(&self, identity: &str) -> Option<&Entity> {
        self.entities.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entities.contains_key(identity)
    }

    /// Entities in identity order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Incremental constructor for an [`ApiSurface`].
///
/// Inserting an identity that already exists replaces the earlier entity,
/// which matches "last binding wins" in every supported language.
#[derive(Debug)]
pub struct SurfaceBuilder {
    surface: ApiSurface,
}

impl SurfaceBuilder {
    pub fn new(module: impl Into<String>, language: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            surface: ApiSurface::empty(module, language, path),
        }
    }

    /// Insert an entity, returning the one it replaced.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        let replaced = self.surface.entities.insert(entity.identity.clone(), entity);
        if let Some(old) = &replaced {
            tracing::trace!(identity = %old.identity, "rebinding replaces earlier definition");
        }
        replaced
    }

    pub fn get(&self, identity: &str) -> Option<&Entity> {
        self.surface.entities.get(identity)
    }

    /// Copies of an entity and every entity nested under it.
    pub fn subtree(&self, identity: &str) -> Vec<Entity> {
        let prefix = format!("{}.", identity);
        self.surface
            .entities
            .values()
            .filter(|e| e.identity == identity || e.identity.starts_with(&prefix))
            .cloned()
            .collect()
    }

    /// Remove an entity and every entity nested under it.
    pub fn remove_subtree(&mut self, identity: &str) {
        let prefix = format!("{}.", identity);
        self.surface
            .entities
            .retain(|key, _| key != identity && !key.starts_with(&prefix));
    }

    pub fn build(self) -> ApiSurface {
        self.surface
    }
}
