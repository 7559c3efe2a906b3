//! TypeScript/JavaScript API surface extractor using tree-sitter.
//!
//! A top-level binding is public when the module exports it, either at the
//! declaration (`export function f`) or through an export list
//! (`export { f }`). A binding exported under another name
//! (`export { f as g }`) is published as `g` only. Files with no import or
//! export at all are scripts, whose top-level bindings are globals.
//! Interfaces and enums are modeled as classes; type aliases as variables.
//! Overload declarations replace the implementation signature.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tree_sitter::{Language, Node};

use super::helpers::{
    decorator_name, find_child_by_type, find_children_by_type, get_node_text, get_start_line,
    has_child_of_type, named_children, normalize_type_text, parse_with, strip_string_quotes,
};
use super::{LanguageAnalyzer, ModuleContext, ParseTree};
use crate::error::Result;
use crate::types::{
    join_identity, ApiSurface, Entity, EntityKind, Location, ParamKind, Parameter, Signature,
    SurfaceBuilder, Visibility,
};

/// ECMAScript-family visibility rules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcmaConvention {
    /// In files without `import`/`export`, treat top-level bindings as public.
    pub script_globals_public: bool,
    /// Treat `protected` class members as public (visible to subclasses).
    pub protected_members_public: bool,
}

impl Default for EcmaConvention {
    fn default() -> Self {
        Self {
            script_globals_public: true,
            protected_members_public: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Dialect {
    TypeScript,
    Tsx,
    JavaScript,
}

/// Analyzer for TypeScript, TSX and JavaScript sources.
#[derive(Clone, Debug)]
pub struct TypeScriptAnalyzer {
    dialect: Dialect,
    convention: EcmaConvention,
}

impl TypeScriptAnalyzer {
    pub fn typescript(convention: EcmaConvention) -> Self {
        Self {
            dialect: Dialect::TypeScript,
            convention,
        }
    }

    pub fn tsx(convention: EcmaConvention) -> Self {
        Self {
            dialect: Dialect::Tsx,
            convention,
        }
    }

    pub fn javascript(convention: EcmaConvention) -> Self {
        Self {
            dialect: Dialect::JavaScript,
            convention,
        }
    }

    fn grammar(&self) -> Language {
        match self.dialect {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Dialect::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        }
    }
}

impl LanguageAnalyzer for TypeScriptAnalyzer {
    fn language(&self) -> &'static str {
        match self.dialect {
            Dialect::TypeScript => "typescript",
            Dialect::Tsx => "tsx",
            Dialect::JavaScript => "javascript",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self.dialect {
            Dialect::TypeScript => &["ts"],
            Dialect::Tsx => &[],
            Dialect::JavaScript => &["js", "jsx"],
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self.dialect {
            Dialect::TypeScript => &["ts", "mts", "cts"],
            Dialect::Tsx => &["tsx"],
            Dialect::JavaScript => &["js", "jsx", "mjs", "cjs"],
        }
    }

    fn package_stem(&self) -> Option<&'static str> {
        Some("index")
    }

    fn parse<'src>(&self, source: &'src str, path: &str) -> Result<ParseTree<'src>> {
        let language = self.language();
        let tree = parse_with(self.grammar(), language, source, path)?;
        Ok(ParseTree {
            tree,
            source,
            language,
        })
    }

    fn extract_public_api(&self, tree: &ParseTree<'_>, context: &ModuleContext) -> ApiSurface {
        let root = tree.tree.root_node();
        let mut extractor = Extractor {
            convention: &self.convention,
            context,
            source: tree.source,
            builder: SurfaceBuilder::new(&context.module, tree.language, &context.path),
            exported_names: HashSet::new(),
            export_aliases: Vec::new(),
            overloads: HashMap::new(),
            script_mode: false,
        };
        extractor.scan_exports(&root);
        extractor.run(&root);
        extractor.builder.build()
    }
}

struct Extractor<'a> {
    convention: &'a EcmaConvention,
    context: &'a ModuleContext,
    source: &'a str,
    builder: SurfaceBuilder,
    /// Local names exported through `export { .. }` or `export default name`.
    exported_names: HashSet<String>,
    /// `export { local as alias }` clauses: (alias, local, line).
    export_aliases: Vec<(String, String, u32)>,
    /// Overload declarations seen so far, by identity.
    overloads: HashMap<String, Vec<Signature>>,
    /// No module syntax anywhere at top level.
    script_mode: bool,
}

impl<'a> Extractor<'a> {
    fn text(&self, node: &Node) -> &'a str {
        get_node_text(node, self.source)
    }

    fn location(&self, node: &Node) -> Location {
        Location::new(&self.context.path, get_start_line(node))
    }

    fn scan_exports(&mut self, root: &Node) {
        let mut has_module_syntax = false;
        for stmt in named_children(root) {
            match stmt.kind() {
                "import_statement" => has_module_syntax = true,
                "export_statement" => {
                    has_module_syntax = true;
                    if stmt.child_by_field_name("source").is_some() {
                        continue;
                    }
                    if let Some(clause) = find_child_by_type(&stmt, "export_clause") {
                        for spec in find_children_by_type(&clause, "export_specifier") {
                            let Some(local) = spec.child_by_field_name("name") else {
                                continue;
                            };
                            let local = self.text(&local).to_string();
                            match spec.child_by_field_name("alias") {
                                Some(alias) if self.text(&alias) != local => {
                                    let alias = self.text(&alias).to_string();
                                    self.export_aliases.push((alias, local, get_start_line(&spec)));
                                }
                                _ => {
                                    self.exported_names.insert(local);
                                }
                            }
                        }
                    }
                    if let Some(value) = stmt.child_by_field_name("value") {
                        if value.kind() == "identifier" {
                            self.exported_names.insert(self.text(&value).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
        self.script_mode = !has_module_syntax;
    }

    /// Visibility handed down to members: an aliased binding is reachable
    /// even though its local name is not.
    fn member_scope(&self, name: &str, visibility: Visibility) -> Visibility {
        if self.export_aliases.iter().any(|(_, local, _)| local == name) {
            Visibility::Public
        } else {
            visibility
        }
    }

    fn top_level_visibility(&self, name: &str, exported: bool) -> Visibility {
        let public = exported
            || self.exported_names.contains(name)
            || (self.script_mode && self.convention.script_globals_public);
        if public {
            Visibility::Public
        } else {
            Visibility::Internal
        }
    }

    fn run(&mut self, root: &Node) {
        let module = self.context.module.clone();
        self.builder.insert(Entity::new(
            &module,
            EntityKind::Module,
            Location::new(&self.context.path, 1),
        ));

        for stmt in named_children(root) {
            match stmt.kind() {
                "import_statement" => self.extract_import(&stmt),
                "export_statement" => self.extract_export(&stmt),
                _ => self.extract_declaration(&stmt, false, Vec::new()),
            }
        }

        self.publish_export_aliases();
    }

    /// Move each aliased binding, members included, to its exported name.
    /// A binding also exported under its own name is copied instead.
    fn publish_export_aliases(&mut self) {
        let module = self.context.module.clone();
        let aliases = std::mem::take(&mut self.export_aliases);

        // Snapshot every binding first: aliases may swap or repeat names.
        let bound: Vec<Vec<Entity>> = aliases
            .iter()
            .map(|(_, local, _)| self.builder.subtree(&join_identity(&module, local)))
            .collect();
        for (_, local, _) in &aliases {
            if !self.exported_names.contains(local) {
                self.builder.remove_subtree(&join_identity(&module, local));
            }
        }

        for ((alias, local, line), entities) in aliases.into_iter().zip(bound) {
            let local_identity = join_identity(&module, &local);
            let alias_identity = join_identity(&module, &alias);
            self.builder.remove_subtree(&alias_identity);
            if entities.is_empty() {
                self.builder.insert(
                    Entity::new(&alias_identity, EntityKind::Import, Location::new(&self.context.path, line))
                        .with_parent(&module)
                        .with_visibility(Visibility::Public),
                );
                continue;
            }
            for mut entity in entities {
                entity.identity = rebase_identity(&entity.identity, &local_identity, &alias_identity);
                if entity.identity == alias_identity {
                    entity.visibility = Visibility::Public;
                } else if let Some(parent) = entity.parent.take() {
                    entity.parent = Some(rebase_identity(&parent, &local_identity, &alias_identity));
                }
                self.builder.insert(entity);
            }
        }
    }

    fn insert_import(&mut self, binding: &str, node: &Node, visibility: Visibility) {
        let module = self.context.module.clone();
        self.builder.insert(
            Entity::new(join_identity(&module, binding), EntityKind::Import, self.location(node))
                .with_parent(module)
                .with_visibility(visibility),
        );
    }

    /// Each local binding an import introduces.
    fn extract_import(&mut self, node: &Node) {
        let Some(clause) = find_child_by_type(node, "import_clause") else {
            // Side-effect import, binds nothing.
            return;
        };
        let mut bindings = Vec::new();
        for child in named_children(&clause) {
            match child.kind() {
                "identifier" => bindings.push(self.text(&child).to_string()),
                "namespace_import" => {
                    if let Some(id) = find_child_by_type(&child, "identifier") {
                        bindings.push(self.text(&id).to_string());
                    }
                }
                "named_imports" => {
                    for spec in find_children_by_type(&child, "import_specifier") {
                        let local = spec
                            .child_by_field_name("alias")
                            .or_else(|| spec.child_by_field_name("name"));
                        if let Some(local) = local {
                            bindings.push(self.text(&local).to_string());
                        }
                    }
                }
                _ => {}
            }
        }
        for binding in bindings {
            let visibility = if self.exported_names.contains(&binding) {
                Visibility::Public
            } else {
                Visibility::Internal
            };
            self.insert_import(&binding, node, visibility);
        }
    }

    fn extract_export(&mut self, node: &Node) {
        let decorators: Vec<String> = find_children_by_type(node, "decorator")
            .iter()
            .map(|d| decorator_name(self.text(d)))
            .collect();

        if let Some(declaration) = node.child_by_field_name("declaration") {
            let is_default = has_child_of_type(node, "default");
            if is_default && declaration.child_by_field_name("name").is_none() {
                self.extract_default_value(&declaration);
            } else {
                self.extract_declaration(&declaration, true, decorators);
            }
            return;
        }

        if let Some(source_node) = node.child_by_field_name("source") {
            // Re-exports surface another module's bindings as our own.
            let from = strip_string_quotes(self.text(&source_node));
            if let Some(clause) = find_child_by_type(node, "export_clause") {
                for spec in find_children_by_type(&clause, "export_specifier") {
                    let public = spec
                        .child_by_field_name("alias")
                        .or_else(|| spec.child_by_field_name("name"));
                    if let Some(public) = public {
                        let binding = self.text(&public).to_string();
                        self.insert_import(&binding, node, Visibility::Public);
                    }
                }
            } else if let Some(ns) = find_child_by_type(node, "namespace_export") {
                let binding = named_children(&ns)
                    .last()
                    .map(|n| strip_string_quotes(self.text(n)))
                    .unwrap_or_else(|| format!("*{}", from));
                self.insert_import(&binding, node, Visibility::Public);
            } else {
                self.insert_import(&format!("*{}", from), node, Visibility::Public);
            }
            return;
        }

        if let Some(value) = node.child_by_field_name("value") {
            if value.kind() != "identifier" {
                self.extract_default_value(&value);
            }
        }
    }

    /// `export default <expression>` with no local name.
    fn extract_default_value(&mut self, value: &Node) {
        let module = self.context.module.clone();
        let identity = join_identity(&module, "default");
        let entity = match value.kind() {
            "arrow_function" | "function_expression" | "function" | "function_declaration"
            | "generator_function" | "generator_function_declaration" => {
                Entity::new(&identity, EntityKind::Function, self.location(value))
                    .with_signature(self.extract_signature(value))
            }
            "class" | "class_declaration" => {
                let entity = Entity::new(&identity, EntityKind::Class, self.location(value))
                    .with_bases(self.extract_heritage(value));
                if let Some(body) = value.child_by_field_name("body") {
                    self.extract_class_body(&body, &identity, Visibility::Public);
                }
                entity
            }
            _ => Entity::new(&identity, EntityKind::Variable, self.location(value)),
        };
        self.builder
            .insert(entity.with_parent(module).with_visibility(Visibility::Public));
    }

    fn extract_declaration(&mut self, node: &Node, exported: bool, decorators: Vec<String>) {
        match node.kind() {
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                self.extract_function(node, exported)
            }
            "class_declaration" | "abstract_class_declaration" => {
                self.extract_class(node, exported, decorators)
            }
            "interface_declaration" => self.extract_interface(node, exported),
            "enum_declaration" => self.extract_enum(node, exported),
            "type_alias_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let name = self.text(&name).to_string();
                    self.insert_variable(&name, node, exported);
                }
            }
            "lexical_declaration" | "variable_declaration" => {
                for declarator in find_children_by_type(node, "variable_declarator") {
                    self.extract_declarator(&declarator, exported);
                }
            }
            // `declare function f(): void;` and friends.
            "ambient_declaration" => {
                for inner in named_children(node) {
                    self.extract_declaration(&inner, exported, Vec::new());
                }
            }
            _ => {}
        }
    }

    fn insert_variable(&mut self, name: &str, node: &Node, exported: bool) {
        let module = self.context.module.clone();
        let visibility = self.top_level_visibility(name, exported);
        let identity = join_identity(&module, name);
        self.builder.remove_subtree(&identity);
        self.builder.insert(
            Entity::new(identity, EntityKind::Variable, self.location(node))
                .with_parent(module)
                .with_visibility(visibility),
        );
    }

    fn extract_function(&mut self, node: &Node, exported: bool) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(&name).to_string();
        let module = self.context.module.clone();
        let identity = join_identity(&module, &name);
        let visibility = self.top_level_visibility(&name, exported);
        let entity = Entity::new(identity, EntityKind::Function, self.location(node))
            .with_parent(module)
            .with_visibility(visibility);
        let entity = self.with_call_signature(entity, node, node.kind() == "function_signature");
        self.builder.remove_subtree(&entity.identity);
        self.builder.insert(entity);
    }

    /// Attach the signature of a callable. Declarations without a body are
    /// overloads; once a name has any, its implementation is not callable.
    fn with_call_signature(&mut self, entity: Entity, node: &Node, declaration_only: bool) -> Entity {
        let signature = self.extract_signature(node);
        if declaration_only {
            let declared = self.overloads.entry(entity.identity.clone()).or_default();
            declared.push(signature);
            let declared = declared.clone();
            return entity.with_overloads(declared);
        }
        match self.overloads.get(&entity.identity) {
            Some(declared) => entity.with_overloads(declared.clone()),
            None => entity.with_signature(signature),
        }
    }

    /// `const f = (a) => ..` is a function; anything else is a variable.
    fn extract_declarator(&mut self, declarator: &Node, exported: bool) {
        let Some(name_node) = declarator.child_by_field_name("name") else {
            return;
        };
        if name_node.kind() != "identifier" {
            let mut names = Vec::new();
            collect_pattern_names(&name_node, self.source, &mut names);
            for name in names {
                self.insert_variable(&name, declarator, exported);
            }
            return;
        }

        let name = self.text(&name_node).to_string();
        let value = declarator.child_by_field_name("value");
        match value {
            Some(v) if is_function_value(&v) => {
                let module = self.context.module.clone();
                let identity = join_identity(&module, &name);
                let visibility = self.top_level_visibility(&name, exported);
                self.builder.insert(
                    Entity::new(identity, EntityKind::Function, self.location(declarator))
                        .with_parent(module)
                        .with_signature(self.extract_signature(&v))
                        .with_visibility(visibility),
                );
            }
            _ => self.insert_variable(&name, declarator, exported),
        }
    }

    fn extract_class(&mut self, node: &Node, exported: bool, mut decorators: Vec<String>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(&name).to_string();
        let module = self.context.module.clone();
        let identity = join_identity(&module, &name);
        let visibility = self.top_level_visibility(&name, exported);

        decorators.extend(
            find_children_by_type(node, "decorator")
                .iter()
                .map(|d| decorator_name(self.text(d))),
        );

        self.builder.remove_subtree(&identity);
        self.builder.insert(
            Entity::new(&identity, EntityKind::Class, self.location(node))
                .with_parent(module)
                .with_bases(self.extract_heritage(node))
                .with_decorators(decorators)
                .with_visibility(visibility),
        );

        if let Some(body) = node.child_by_field_name("body") {
            let scope = self.member_scope(&name, visibility);
            self.extract_class_body(&body, &identity, scope);
        }
    }

    /// Superclass first, then implemented interfaces.
    fn extract_heritage(&self, class: &Node) -> Vec<String> {
        let Some(heritage) = find_child_by_type(class, "class_heritage") else {
            return Vec::new();
        };
        let mut bases = Vec::new();
        for clause in named_children(&heritage) {
            match clause.kind() {
                "extends_clause" => {
                    let text = self.text(&clause).trim_start_matches("extends");
                    bases.push(normalize_type_text(text));
                }
                "implements_clause" => {
                    for ty in named_children(&clause) {
                        bases.push(normalize_type_text(self.text(&ty)));
                    }
                }
                // JavaScript puts the superclass expression directly under the heritage.
                _ => bases.push(normalize_type_text(self.text(&clause))),
            }
        }
        bases
    }

    fn member_visibility(&self, class_visibility: Visibility, member: &Node) -> Visibility {
        if !class_visibility.is_public() {
            return Visibility::Internal;
        }
        if let Some(modifier) = find_child_by_type(member, "accessibility_modifier") {
            match self.text(&modifier) {
                "private" => return Visibility::Internal,
                "protected" if !self.convention.protected_members_public => {
                    return Visibility::Internal
                }
                _ => {}
            }
        }
        let name_kind = member
            .child_by_field_name("name")
            .or_else(|| member.child_by_field_name("property"))
            .map(|n| n.kind());
        if name_kind == Some("private_property_identifier") {
            Visibility::Internal
        } else {
            Visibility::Public
        }
    }

    fn extract_class_body(&mut self, body: &Node, class_identity: &str, class_visibility: Visibility) {
        let mut pending_decorators: Vec<String> = Vec::new();

        for member in named_children(body) {
            match member.kind() {
                "decorator" => {
                    pending_decorators.push(decorator_name(self.text(&member)));
                    continue;
                }
                "method_definition" | "method_signature" | "abstract_method_signature" => {
                    let Some(name) = member.child_by_field_name("name") else {
                        continue;
                    };
                    let name = self.text(&name).to_string();
                    let identity = join_identity(class_identity, &name);
                    let visibility = self.member_visibility(class_visibility, &member);
                    // Accessors read like properties at the call site.
                    let is_accessor = has_child_of_type(&member, "get") || has_child_of_type(&member, "set");
                    let mut decorators = std::mem::take(&mut pending_decorators);
                    decorators.extend(
                        find_children_by_type(&member, "decorator")
                            .iter()
                            .map(|d| decorator_name(self.text(d))),
                    );

                    let entity = if is_accessor {
                        if self.builder.get(&identity).is_some() {
                            continue;
                        }
                        Entity::new(&identity, EntityKind::Variable, self.location(&member))
                    } else {
                        let method = Entity::new(&identity, EntityKind::Method, self.location(&member));
                        let declaration_only = member.kind() != "method_definition";
                        self.with_call_signature(method, &member, declaration_only)
                    };
                    self.builder.insert(
                        entity
                            .with_parent(class_identity)
                            .with_decorators(decorators)
                            .with_visibility(visibility),
                    );
                }
                "public_field_definition" | "field_definition" => {
                    let name = member
                        .child_by_field_name("name")
                        .or_else(|| member.child_by_field_name("property"));
                    let Some(name) = name else {
                        continue;
                    };
                    let name = self.text(&name).to_string();
                    let identity = join_identity(class_identity, &name);
                    let visibility = self.member_visibility(class_visibility, &member);
                    let decorators = std::mem::take(&mut pending_decorators);

                    let entity = match member.child_by_field_name("value") {
                        Some(v) if is_function_value(&v) => {
                            Entity::new(&identity, EntityKind::Method, self.location(&member))
                                .with_signature(self.extract_signature(&v))
                        }
                        _ => Entity::new(&identity, EntityKind::Variable, self.location(&member)),
                    };
                    self.builder.insert(
                        entity
                            .with_parent(class_identity)
                            .with_decorators(decorators)
                            .with_visibility(visibility),
                    );
                }
                _ => {}
            }
            pending_decorators.clear();
        }
    }

    fn extract_interface(&mut self, node: &Node, exported: bool) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(&name).to_string();
        let module = self.context.module.clone();
        let identity = join_identity(&module, &name);
        let visibility = self.top_level_visibility(&name, exported);

        let bases: Vec<String> = find_child_by_type(node, "extends_type_clause")
            .map(|clause| {
                named_children(&clause)
                    .iter()
                    .map(|t| normalize_type_text(self.text(t)))
                    .collect()
            })
            .unwrap_or_default();

        self.builder.remove_subtree(&identity);
        self.builder.insert(
            Entity::new(&identity, EntityKind::Class, self.location(node))
                .with_parent(module)
                .with_bases(bases)
                .with_visibility(visibility),
        );

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let scope = self.member_scope(&name, visibility);
        for member in named_children(&body) {
            let Some(name) = member.child_by_field_name("name") else {
                continue;
            };
            let member_identity = join_identity(&identity, self.text(&name));
            let entity = match member.kind() {
                "method_signature" => {
                    let method = Entity::new(member_identity, EntityKind::Method, self.location(&member));
                    self.with_call_signature(method, &member, true)
                }
                "property_signature" => {
                    Entity::new(member_identity, EntityKind::Variable, self.location(&member))
                }
                _ => continue,
            };
            self.builder
                .insert(entity.with_parent(&identity).with_visibility(scope));
        }
    }

    fn extract_enum(&mut self, node: &Node, exported: bool) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(&name).to_string();
        let module = self.context.module.clone();
        let identity = join_identity(&module, &name);
        let visibility = self.top_level_visibility(&name, exported);

        self.builder.remove_subtree(&identity);
        self.builder.insert(
            Entity::new(&identity, EntityKind::Class, self.location(node))
                .with_parent(module)
                .with_visibility(visibility),
        );

        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let scope = self.member_scope(&name, visibility);
        for member in named_children(&body) {
            let name_node = match member.kind() {
                "enum_assignment" => member.child_by_field_name("name"),
                "property_identifier" | "string" => Some(member),
                _ => None,
            };
            if let Some(name_node) = name_node {
                let member_name = strip_string_quotes(self.text(&name_node));
                self.builder.insert(
                    Entity::new(
                        join_identity(&identity, &member_name),
                        EntityKind::Variable,
                        self.location(&member),
                    )
                    .with_parent(&identity)
                    .with_visibility(scope),
                );
            }
        }
    }

    /// Signature of any function-like node.
    fn extract_signature(&self, node: &Node) -> Signature {
        let parameters = match node.child_by_field_name("parameters") {
            Some(params) => self.extract_parameters(&params),
            // `x => x + 1`
            None => node
                .child_by_field_name("parameter")
                .map(|p| vec![Parameter::positional(self.text(&p))])
                .unwrap_or_default(),
        };
        let return_type = node
            .child_by_field_name("return_type")
            .map(|t| annotation_text(self.text(&t)));
        Signature::new(parameters, return_type)
    }

    fn extract_parameters(&self, node: &Node) -> Vec<Parameter> {
        let mut params = Vec::new();

        for child in named_children(node) {
            let param = match child.kind() {
                "required_parameter" | "optional_parameter" => {
                    let Some(pattern) = child.child_by_field_name("pattern") else {
                        continue;
                    };
                    if pattern.kind() == "this" {
                        continue;
                    }
                    let mut param = self.pattern_parameter(&pattern);
                    param.has_default = child.kind() == "optional_parameter"
                        || child.child_by_field_name("value").is_some();
                    param.annotation = child
                        .child_by_field_name("type")
                        .map(|t| annotation_text(self.text(&t)));
                    param
                }
                "assignment_pattern" => {
                    let Some(left) = child.child_by_field_name("left") else {
                        continue;
                    };
                    self.pattern_parameter(&left).with_default()
                }
                "identifier" | "rest_pattern" | "object_pattern" | "array_pattern" => {
                    self.pattern_parameter(&child)
                }
                _ => continue,
            };
            params.push(param);
        }

        params
    }

    fn pattern_parameter(&self, pattern: &Node) -> Parameter {
        match pattern.kind() {
            "rest_pattern" => {
                let name = self.text(pattern).trim_start_matches("...").trim().to_string();
                Parameter::new(name, ParamKind::VarPositional)
            }
            "identifier" => Parameter::positional(self.text(pattern)),
            // Destructured parameters are identified by their shape.
            _ => Parameter::positional(normalize_type_text(self.text(pattern))),
        }
    }
}

/// `svc.impl.run` rebased from `svc.impl` onto `svc.execute` is `svc.execute.run`.
fn rebase_identity(identity: &str, from: &str, to: &str) -> String {
    match identity.strip_prefix(from) {
        Some(rest) if rest.is_empty() || rest.starts_with('.') => format!("{}{}", to, rest),
        _ => identity.to_string(),
    }
}

fn is_function_value(node: &Node) -> bool {
    matches!(
        node.kind(),
        "arrow_function" | "function_expression" | "function" | "generator_function"
    )
}

/// `: Foo<Bar>` → `Foo<Bar>`, whitespace stripped.
fn annotation_text(text: &str) -> String {
    normalize_type_text(text.trim_start().trim_start_matches(':'))
}

fn collect_pattern_names(node: &Node, source: &str, out: &mut Vec<String>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => {
            out.push(get_node_text(node, source).to_string())
        }
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect_pattern_names(&value, source, out);
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" | "assignment_pattern"
        | "object_assignment_pattern" => {
            for child in named_children(node) {
                collect_pattern_names(&child, source, out);
            }
        }
        _ => {}
    }
}
