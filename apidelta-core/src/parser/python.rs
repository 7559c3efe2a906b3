//! Python API surface extractor using tree-sitter.
//!
//! Visibility follows the usual Python conventions: a leading underscore
//! marks a name internal, dunders are public, and a literal `__all__` at
//! module level overrides both for top-level names. Imports only become
//! public when `__all__` re-exports them.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tree_sitter::Node;

use super::helpers::{
    decorator_name, find_child_by_type, get_node_text, get_start_line, named_children,
    normalize_type_text, parse_with, strip_string_quotes,
};
use super::{LanguageAnalyzer, ModuleContext, ParseTree};
use crate::error::Result;
use crate::types::{
    join_identity, ApiSurface, Entity, EntityKind, Location, ParamKind, Parameter, Signature,
    SurfaceBuilder, Visibility,
};

/// Python visibility rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonConvention {
    /// Let a literal `__all__` decide which top-level names are public.
    pub honor_dunder_all: bool,
    /// Treat `__name__` style names as public.
    pub public_dunders: bool,
}

impl Default for PythonConvention {
    fn default() -> Self {
        Self {
            honor_dunder_all: true,
            public_dunders: true,
        }
    }
}

impl PythonConvention {
    /// Name-based visibility, ignoring `__all__`.
    pub fn name_is_public(&self, name: &str) -> bool {
        if is_dunder(name) {
            self.public_dunders
        } else {
            !name.starts_with('_')
        }
    }
}

fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Analyzer for `.py` and `.pyi` sources.
#[derive(Clone, Debug, Default)]
pub struct PythonAnalyzer {
    convention: PythonConvention,
}

impl PythonAnalyzer {
    pub fn new(convention: PythonConvention) -> Self {
        Self { convention }
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language(&self) -> &'static str {
        "python"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi"]
    }

    fn package_stem(&self) -> Option<&'static str> {
        Some("__init__")
    }

    fn parse<'src>(&self, source: &'src str, path: &str) -> Result<ParseTree<'src>> {
        let tree = parse_with(tree_sitter_python::LANGUAGE.into(), "python", source, path)?;
        Ok(ParseTree {
            tree,
            source,
            language: "python",
        })
    }

    fn extract_public_api(&self, tree: &ParseTree<'_>, context: &ModuleContext) -> ApiSurface {
        let root = tree.tree.root_node();
        let mut extractor = Extractor::new(&self.convention, context, tree.source);
        extractor.exports = if self.convention.honor_dunder_all {
            collect_dunder_all(&root, tree.source)
        } else {
            None
        };
        extractor.run(&root);
        extractor.builder.build()
    }
}

/// Literal `__all__` contents, if the module declares one we can read.
fn collect_dunder_all(root: &Node, source: &str) -> Option<HashSet<String>> {
    let mut exports: Option<HashSet<String>> = None;

    for stmt in named_children(root) {
        if stmt.kind() != "expression_statement" {
            continue;
        }
        for expr in named_children(&stmt) {
            let is_augmented = match expr.kind() {
                "assignment" => false,
                "augmented_assignment" => true,
                _ => continue,
            };
            let Some(left) = expr.child_by_field_name("left") else {
                continue;
            };
            if get_node_text(&left, source) != "__all__" {
                continue;
            }
            let Some(right) = expr.child_by_field_name("right") else {
                continue;
            };
            match string_sequence(&right, source) {
                Some(names) => {
                    let set = exports.get_or_insert_with(HashSet::new);
                    if !is_augmented {
                        set.clear();
                    }
                    set.extend(names);
                }
                None => {
                    tracing::debug!(
                        line = get_start_line(&expr),
                        "__all__ is not a literal sequence, falling back to name rules"
                    );
                    return None;
                }
            }
        }
    }

    exports
}

fn string_sequence(node: &Node, source: &str) -> Option<Vec<String>> {
    if !matches!(node.kind(), "list" | "tuple") {
        return None;
    }
    let mut names = Vec::new();
    for item in named_children(node) {
        match item.kind() {
            "string" => names.push(strip_string_quotes(get_node_text(&item, source))),
            "comment" => {}
            _ => return None,
        }
    }
    Some(names)
}

/// Single-walk extractor state.
struct Extractor<'a> {
    convention: &'a PythonConvention,
    context: &'a ModuleContext,
    source: &'a str,
    builder: SurfaceBuilder,
    exports: Option<HashSet<String>>,
    module_visibility: Visibility,
}

impl<'a> Extractor<'a> {
    fn new(convention: &'a PythonConvention, context: &'a ModuleContext, source: &'a str) -> Self {
        let module_public = context
            .module
            .split('.')
            .all(|segment| convention.name_is_public(segment));
        let module_visibility = if module_public {
            Visibility::Public
        } else {
            Visibility::Internal
        };

        Self {
            convention,
            context,
            source,
            builder: SurfaceBuilder::new(&context.module, "python", &context.path),
            exports: None,
            module_visibility,
        }
    }

    fn run(&mut self, root: &Node) {
        self.builder.insert(
            Entity::new(&self.context.module, EntityKind::Module, self.location(1))
                .with_visibility(self.module_visibility),
        );
        self.visit_module_block(root);
    }

    fn location(&self, line: u32) -> Location {
        Location::new(&self.context.path, line)
    }

    fn text(&self, node: &Node) -> &'a str {
        get_node_text(node, self.source)
    }

    /// Visibility of a module-level binding.
    fn top_level_visibility(&self, name: &str, is_import: bool) -> Visibility {
        if !self.module_visibility.is_public() {
            return Visibility::Internal;
        }
        let public = match &self.exports {
            Some(exports) => exports.contains(name),
            None => !is_import && self.convention.name_is_public(name),
        };
        if public {
            Visibility::Public
        } else {
            Visibility::Internal
        }
    }

    fn member_visibility(&self, parent: Visibility, name: &str) -> Visibility {
        if parent.is_public() && self.convention.name_is_public(name) {
            Visibility::Public
        } else {
            Visibility::Internal
        }
    }

    fn visit_module_block(&mut self, block: &Node) {
        for stmt in named_children(block) {
            self.visit_module_statement(&stmt);
        }
    }

    fn visit_module_statement(&mut self, stmt: &Node) {
        let module = self.context.module.clone();
        match stmt.kind() {
            "import_statement" => self.extract_import(stmt),
            "import_from_statement" => self.extract_from_import(stmt),
            "class_definition" => self.extract_class(stmt, &module, None, Vec::new()),
            "function_definition" => self.extract_function(stmt, &module, None, Vec::new()),
            "decorated_definition" => self.extract_decorated(stmt, &module, None),
            "expression_statement" => self.extract_assignments(stmt, &module, None),
            // Conditional definitions (`if TYPE_CHECKING:`, `try: import x`) still bind names.
            "if_statement" | "try_statement" => self.visit_compound(stmt),
            _ => {}
        }
    }

    fn visit_compound(&mut self, node: &Node) {
        for child in named_children(node) {
            match child.kind() {
                "block" => self.visit_module_block(&child),
                kind if kind.ends_with("_clause") => self.visit_compound(&child),
                _ => {}
            }
        }
    }

    fn insert_import(&mut self, binding: &str, line: u32) {
        let visibility = self.top_level_visibility(binding, true);
        self.builder.insert(
            Entity::new(
                join_identity(&self.context.module, binding),
                EntityKind::Import,
                self.location(line),
            )
            .with_parent(&self.context.module)
            .with_visibility(visibility),
        );
    }

    /// `import a.b` binds `a`; `import a.b as c` binds `c`.
    fn extract_import(&mut self, node: &Node) {
        let line = get_start_line(node);
        for child in named_children(node) {
            let binding = match child.kind() {
                "dotted_name" => self
                    .text(&child)
                    .split('.')
                    .next()
                    .unwrap_or_default()
                    .to_string(),
                "aliased_import" => match child.child_by_field_name("alias") {
                    Some(alias) => self.text(&alias).to_string(),
                    None => continue,
                },
                _ => continue,
            };
            if !binding.is_empty() {
                self.insert_import(&binding, line);
            }
        }
    }

    fn extract_from_import(&mut self, node: &Node) {
        let line = get_start_line(node);
        let mut source_module = String::new();
        let mut seen_import_keyword = false;

        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "import" => seen_import_keyword = true,
                "dotted_name" | "relative_import" if !seen_import_keyword => {
                    source_module = self.text(&child).to_string();
                }
                "dotted_name" | "identifier" => {
                    let binding = self.text(&child).to_string();
                    self.insert_import(&binding, line);
                }
                "aliased_import" => {
                    if let Some(alias) = child.child_by_field_name("alias") {
                        let binding = self.text(&alias).to_string();
                        self.insert_import(&binding, line);
                    }
                }
                "wildcard_import" => {
                    self.insert_import(&format!("*{}", source_module), line);
                }
                _ => {}
            }
        }
    }

    fn extract_decorated(&mut self, node: &Node, parent: &str, parent_visibility: Option<Visibility>) {
        let decorators: Vec<String> = named_children(node)
            .iter()
            .filter(|c| c.kind() == "decorator")
            .map(|c| decorator_name(self.text(c)))
            .collect();

        let Some(definition) = node.child_by_field_name("definition") else {
            return;
        };
        match definition.kind() {
            "class_definition" => self.extract_class(&definition, parent, parent_visibility, decorators),
            "function_definition" => {
                self.extract_function(&definition, parent, parent_visibility, decorators)
            }
            _ => {}
        }
    }

    /// `parent_visibility` is `None` at module level.
    fn extract_class(
        &mut self,
        node: &Node,
        parent: &str,
        parent_visibility: Option<Visibility>,
        decorators: Vec<String>,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(&name_node).to_string();
        let identity = join_identity(parent, &name);
        let visibility = match parent_visibility {
            Some(pv) => self.member_visibility(pv, &name),
            None => self.top_level_visibility(&name, false),
        };

        let bases = node
            .child_by_field_name("superclasses")
            .map(|args| self.extract_bases(&args))
            .unwrap_or_default();

        // A rebinding replaces the whole class, members included.
        self.builder.remove_subtree(&identity);
        self.builder.insert(
            Entity::new(&identity, EntityKind::Class, self.location(get_start_line(node)))
                .with_parent(parent)
                .with_bases(bases)
                .with_decorators(decorators)
                .with_visibility(visibility),
        );

        if let Some(body) = node.child_by_field_name("body") {
            self.extract_class_body(&body, &identity, visibility);
        }
    }

    /// Positional base expressions; keyword arguments such as `metaclass=` are skipped.
    fn extract_bases(&self, args: &Node) -> Vec<String> {
        named_children(args)
            .iter()
            .filter(|arg| {
                !matches!(
                    arg.kind(),
                    "keyword_argument" | "comment" | "list_splat" | "dictionary_splat"
                )
            })
            .map(|arg| normalize_type_text(self.text(arg)))
            .collect()
    }

    fn extract_class_body(&mut self, block: &Node, class_identity: &str, class_visibility: Visibility) {
        for stmt in named_children(block) {
            match stmt.kind() {
                "function_definition" => {
                    self.extract_function(&stmt, class_identity, Some(class_visibility), Vec::new())
                }
                "decorated_definition" => {
                    self.extract_decorated(&stmt, class_identity, Some(class_visibility))
                }
                "class_definition" => {
                    self.extract_class(&stmt, class_identity, Some(class_visibility), Vec::new())
                }
                "expression_statement" => {
                    self.extract_assignments(&stmt, class_identity, Some(class_visibility))
                }
                _ => {}
            }
        }
    }

    fn extract_function(
        &mut self,
        node: &Node,
        parent: &str,
        parent_visibility: Option<Visibility>,
        decorators: Vec<String>,
    ) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(&name_node).to_string();
        let identity = join_identity(parent, &name);

        // `@x.setter` / `@x.deleter` extend the property `x` rather than rebinding it.
        let folds_into_property = decorators.iter().any(|d| {
            d == &format!("{}.setter", name) || d == &format!("{}.deleter", name)
        });
        if folds_into_property && self.builder.get(&identity).is_some() {
            tracing::trace!(identity = %identity, "property accessor folded");
            return;
        }

        let (kind, visibility) = match parent_visibility {
            Some(pv) => (EntityKind::Method, self.member_visibility(pv, &name)),
            None => (EntityKind::Function, self.top_level_visibility(&name, false)),
        };

        let parameters = node
            .child_by_field_name("parameters")
            .map(|p| self.extract_parameters(&p))
            .unwrap_or_default();
        let return_type = node
            .child_by_field_name("return_type")
            .map(|t| normalize_type_text(self.text(&t)));

        self.builder.remove_subtree(&identity);
        self.builder.insert(
            Entity::new(&identity, kind, self.location(get_start_line(node)))
                .with_parent(parent)
                .with_signature(Signature::new(parameters, return_type))
                .with_decorators(decorators)
                .with_visibility(visibility),
        );
    }

    fn extract_parameters(&self, node: &Node) -> Vec<Parameter> {
        let mut params = Vec::new();
        // Everything after a bare `*` or `*args` is keyword-only.
        let mut keyword_only = false;

        for child in named_children(node) {
            let named_kind = if keyword_only {
                ParamKind::KeywordOnly
            } else {
                ParamKind::Positional
            };
            match child.kind() {
                "identifier" => {
                    params.push(Parameter::new(self.text(&child), named_kind));
                }
                "typed_parameter" => {
                    let annotation = child
                        .child_by_field_name("type")
                        .map(|t| normalize_type_text(self.text(&t)));
                    let Some(inner) = child.named_child(0) else {
                        continue;
                    };
                    let mut param = match inner.kind() {
                        "list_splat_pattern" => {
                            keyword_only = true;
                            Parameter::new(self.splat_name(&inner), ParamKind::VarPositional)
                        }
                        "dictionary_splat_pattern" => {
                            Parameter::new(self.splat_name(&inner), ParamKind::VarKeyword)
                        }
                        _ => Parameter::new(self.text(&inner), named_kind),
                    };
                    param.annotation = annotation;
                    params.push(param);
                }
                "default_parameter" | "typed_default_parameter" => {
                    let Some(name) = child.child_by_field_name("name") else {
                        continue;
                    };
                    let mut param = Parameter::new(self.text(&name), named_kind).with_default();
                    param.annotation = child
                        .child_by_field_name("type")
                        .map(|t| normalize_type_text(self.text(&t)));
                    params.push(param);
                }
                "list_splat_pattern" => {
                    keyword_only = true;
                    params.push(Parameter::new(self.splat_name(&child), ParamKind::VarPositional));
                }
                "dictionary_splat_pattern" => {
                    params.push(Parameter::new(self.splat_name(&child), ParamKind::VarKeyword));
                }
                "keyword_separator" => keyword_only = true,
                _ => {}
            }
        }

        params
    }

    fn splat_name(&self, node: &Node) -> String {
        find_child_by_type(node, "identifier")
            .map(|n| self.text(&n).to_string())
            .unwrap_or_else(|| self.text(node).trim_start_matches('*').to_string())
    }

    /// Simple-name assignment targets become variables.
    fn extract_assignments(&mut self, stmt: &Node, parent: &str, parent_visibility: Option<Visibility>) {
        for expr in named_children(stmt) {
            if expr.kind() != "assignment" {
                continue;
            }
            let line = get_start_line(&expr);
            let mut targets = Vec::new();
            collect_targets(&expr, self.source, &mut targets);

            for name in targets {
                let visibility = match parent_visibility {
                    Some(pv) => self.member_visibility(pv, &name),
                    None => self.top_level_visibility(&name, false),
                };
                let identity = join_identity(parent, &name);
                self.builder.remove_subtree(&identity);
                self.builder.insert(
                    Entity::new(identity, EntityKind::Variable, self.location(line))
                        .with_parent(parent)
                        .with_visibility(visibility),
                );
            }
        }
    }
}

/// Names bound by an assignment, following chains like `a = b = 1`.
fn collect_targets(assignment: &Node, source: &str, out: &mut Vec<String>) {
    if let Some(left) = assignment.child_by_field_name("left") {
        collect_pattern_names(&left, source, out);
    }
    if let Some(right) = assignment.child_by_field_name("right") {
        if right.kind() == "assignment" {
            collect_targets(&right, source, out);
        }
    }
}

fn collect_pattern_names(node: &Node, source: &str, out: &mut Vec<String>) {
    match node.kind() {
        "identifier" => out.push(get_node_text(node, source).to_string()),
        "pattern_list" | "tuple_pattern" | "list_pattern" => {
            for child in named_children(node) {
                collect_pattern_names(&child, source, out);
            }
        }
        // Attribute and subscript targets do not create module bindings.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> ApiSurface {
        extract_with(source, "mod", PythonConvention::default())
    }

    fn extract_with(source: &str, module: &str, convention: PythonConvention) -> ApiSurface {
        let analyzer = PythonAnalyzer::new(convention);
        let context = ModuleContext::new(module, format!("{}.py", module));
        analyzer.analyze(source, &context).unwrap()
    }

    fn visibility(surface: &ApiSurface, identity: &str) -> Visibility {
        surface
            .get(identity)
            .unwrap_or_else(|| panic!("missing {identity}"))
            .visibility
    }

    #[test]
    fn test_parse_simple_function() {
        let source = r#"
def hello(name: str) -> str:
    """Say hello."""
    return f"Hello, {name}!"
"#;
        let surface = extract(source);
        let func = surface.get("mod.hello").unwrap();
        assert_eq!(func.kind, EntityKind::Function);
        assert_eq!(func.location.line, 2);
        assert_eq!(func.parent.as_deref(), Some("mod"));
        let sig = func.signature.as_ref().unwrap();
        assert_eq!(sig.return_type.as_deref(), Some("str"));
        assert_eq!(sig.parameters, vec![Parameter::positional("name").with_annotation("str")]);
    }

    #[test]
    fn test_module_entity_is_present() {
        let surface = extract("x = 1\n");
        let module = surface.get("mod").unwrap();
        assert_eq!(module.kind, EntityKind::Module);
        assert!(module.parent.is_none());
    }

    #[test]
    fn test_parse_class_with_members() {
        let source = r#"
class MyClass(BaseClass, mixins.Logging, metaclass=Meta):
    """A test class."""
    limit: int = 10

    def method(self, x, y=2):
        pass

    def _helper(self):
        pass

    class Inner:
        def run(self):
            pass
"#;
        let surface = extract(source);
        let class = surface.get("mod.MyClass").unwrap();
        assert_eq!(class.kind, EntityKind::Class);
        assert_eq!(class.bases, vec!["BaseClass", "mixins.Logging"]);

        assert_eq!(surface.get("mod.MyClass.limit").unwrap().kind, EntityKind::Variable);
        let method = surface.get("mod.MyClass.method").unwrap();
        assert_eq!(method.kind, EntityKind::Method);
        assert_eq!(method.parent.as_deref(), Some("mod.MyClass"));
        assert_eq!(visibility(&surface, "mod.MyClass._helper"), Visibility::Internal);
        assert_eq!(surface.get("mod.MyClass.Inner.run").unwrap().kind, EntityKind::Method);
    }

    #[test]
    fn test_parameter_kinds() {
        let source = "def f(a, b: int = 1, *args, c, d=2, **kwargs) -> None:\n    pass\n";
        let surface = extract(source);
        let params = &surface.get("mod.f").unwrap().signature.as_ref().unwrap().parameters;
        let kinds: Vec<(String, ParamKind, bool)> = params
            .iter()
            .map(|p| (p.name.clone(), p.kind, p.has_default))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("a".to_string(), ParamKind::Positional, false),
                ("b".to_string(), ParamKind::Positional, true),
                ("args".to_string(), ParamKind::VarPositional, false),
                ("c".to_string(), ParamKind::KeywordOnly, false),
                ("d".to_string(), ParamKind::KeywordOnly, true),
                ("kwargs".to_string(), ParamKind::VarKeyword, false),
            ]
        );
        assert_eq!(params[1].annotation.as_deref(), Some("int"));
    }

    #[test]
    fn test_bare_star_makes_keyword_only() {
        let surface = extract("def f(a, *, key=None):\n    pass\n");
        let params = &surface.get("mod.f").unwrap().signature.as_ref().unwrap().parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].kind, ParamKind::KeywordOnly);
        assert!(params[1].has_default);
    }

    #[test]
    fn test_underscore_names_are_internal() {
        let source = r#"
def public():
    pass

def _private():
    pass

class __Mangled:
    pass

VERSION = "1.0"
_cache = {}
"#;
        let surface = extract(source);
        assert_eq!(visibility(&surface, "mod.public"), Visibility::Public);
        assert_eq!(visibility(&surface, "mod._private"), Visibility::Internal);
        assert_eq!(visibility(&surface, "mod.__Mangled"), Visibility::Internal);
        assert_eq!(visibility(&surface, "mod.VERSION"), Visibility::Public);
        assert_eq!(visibility(&surface, "mod._cache"), Visibility::Internal);
    }

    #[test]
    fn test_dunder_methods_follow_convention() {
        let source = "class A:\n    def __init__(self):\n        pass\n";
        let surface = extract(source);
        assert_eq!(visibility(&surface, "mod.A.__init__"), Visibility::Public);

        let strict = PythonConvention {
            public_dunders: false,
            ..Default::default()
        };
        let surface = extract_with(source, "mod", strict);
        assert_eq!(visibility(&surface, "mod.A.__init__"), Visibility::Internal);
    }

    #[test]
    fn test_members_of_internal_class_are_internal() {
        let source = "class _Impl:\n    def run(self):\n        pass\n";
        let surface = extract(source);
        assert_eq!(visibility(&surface, "mod._Impl.run"), Visibility::Internal);
    }

    #[test]
    fn test_dunder_all_overrides_name_rules() {
        let source = r#"
from .impl import engine, _hidden
import json

__all__ = ["engine", "_exported_private"]
__all__ += ("Widget",)

def _exported_private():
    pass

def helper():
    pass

class Widget:
    pass
"#;
        let surface = extract(source);
        assert_eq!(visibility(&surface, "mod.engine"), Visibility::Public);
        assert_eq!(surface.get("mod.engine").unwrap().kind, EntityKind::Import);
        assert_eq!(visibility(&surface, "mod._hidden"), Visibility::Internal);
        assert_eq!(visibility(&surface, "mod.json"), Visibility::Internal);
        assert_eq!(visibility(&surface, "mod._exported_private"), Visibility::Public);
        assert_eq!(visibility(&surface, "mod.helper"), Visibility::Internal);
        assert_eq!(visibility(&surface, "mod.Widget"), Visibility::Public);
    }

    #[test]
    fn test_dunder_all_can_be_ignored() {
        let source = "__all__ = ['a']\n\ndef a():\n    pass\n\ndef b():\n    pass\n";
        let convention = PythonConvention {
            honor_dunder_all: false,
            ..Default::default()
        };
        let surface = extract_with(source, "mod", convention);
        assert_eq!(visibility(&surface, "mod.b"), Visibility::Public);
    }

    #[test]
    fn test_imports_are_internal_without_dunder_all() {
        let source = r#"
import os.path
import numpy as np
from typing import Optional, List as L
from helpers import *
"#;
        let surface = extract(source);
        for identity in ["mod.os", "mod.np", "mod.Optional", "mod.L", "mod.*helpers"] {
            let entity = surface.get(identity).unwrap_or_else(|| panic!("missing {identity}"));
            assert_eq!(entity.kind, EntityKind::Import);
            assert_eq!(entity.visibility, Visibility::Internal);
        }
    }

    #[test]
    fn test_decorators_are_recorded_without_arguments() {
        let source = r#"
@app.route("/items", methods=["GET"])
@cached
def items():
    pass
"#;
        let surface = extract(source);
        assert_eq!(
            surface.get("mod.items").unwrap().decorators,
            vec!["app.route", "cached"]
        );
    }

    #[test]
    fn test_property_setter_folds_into_property() {
        let source = r#"
class Account:
    @property
    def balance(self) -> int:
        return self._balance

    @balance.setter
    def balance(self, value: int) -> None:
        self._balance = value
"#;
        let surface = extract(source);
        let prop = surface.get("mod.Account.balance").unwrap();
        assert_eq!(prop.decorators, vec!["property"]);
        assert_eq!(prop.signature.as_ref().unwrap().parameters.len(), 1);
    }

    #[test]
    fn test_last_binding_wins() {
        let source = "def f(a):\n    pass\n\ndef f(a, b):\n    pass\n";
        let surface = extract(source);
        let sig = surface.get("mod.f").unwrap().signature.as_ref().unwrap();
        assert_eq!(sig.parameters.len(), 2);
        assert_eq!(surface.get("mod.f").unwrap().location.line, 4);
    }

    #[test]
    fn test_conditional_definitions_are_included() {
        let source = r#"
try:
    import ujson as json_impl
except ImportError:
    import json as json_impl

if HAS_FAST:
    def fast():
        pass
else:
    def slow():
        pass
"#;
        let surface = extract(source);
        assert!(surface.contains("mod.json_impl"));
        assert!(surface.contains("mod.fast"));
        assert!(surface.contains("mod.slow"));
    }

    #[test]
    fn test_assignment_targets() {
        let source = "a = b = 1\nc, (d, e) = 1, (2, 3)\nobj.attr = 4\nlimit: int\n";
        let surface = extract(source);
        for name in ["a", "b", "c", "d", "e", "limit"] {
            assert!(surface.contains(&format!("mod.{name}")), "missing {name}");
        }
        assert!(!surface.contains("mod.obj"));
    }

    #[test]
    fn test_private_module_is_internal() {
        let surface = extract_with("def run():\n    pass\n", "pkg._impl", PythonConvention::default());
        assert_eq!(visibility(&surface, "pkg._impl"), Visibility::Internal);
        assert_eq!(visibility(&surface, "pkg._impl.run"), Visibility::Internal);
    }

    #[test]
    fn test_return_type_whitespace_is_normalized() {
        let surface = extract("def f() -> Dict[str,  int]:\n    pass\n");
        let sig = surface.get("mod.f").unwrap().signature.as_ref().unwrap();
        assert_eq!(sig.return_type.as_deref(), Some("Dict[str,int]"));
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let analyzer = PythonAnalyzer::default();
        let err = analyzer.parse("def broken(:\n    pass\n", "broken.py").err().unwrap();
        assert!(matches!(err, crate::error::AnalyzeError::Syntax { .. }));
    }

    #[test]
    fn test_async_function() {
        let surface = extract("async def fetch(url: str) -> bytes:\n    pass\n");
        assert_eq!(surface.get("mod.fetch").unwrap().kind, EntityKind::Function);
    }
}
