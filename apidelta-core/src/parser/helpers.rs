//! Helper functions for tree-sitter AST navigation.

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{AnalyzeError, Result};

/// Get the text content of a node.
pub fn get_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    let start = node.start_byte();
    let end = node.end_byte();
    if start < source.len() && end <= source.len() && start < end {
        &source[start..end]
    } else {
        ""
    }
}

/// Find the first child of a specific type.
#[allow(clippy::manual_find)]
pub fn find_child_by_type<'a>(node: &Node<'a>, type_name: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            return Some(child);
        }
    }
    None
}

/// Find all children of a specific type.
pub fn find_children_by_type<'a>(node: &Node<'a>, type_name: &str) -> Vec<Node<'a>> {
    let mut results = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() == type_name {
            results.push(child);
        }
    }
    results
}

/// Collect named children into a vector so callers can iterate freely.
pub fn named_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Check if a node has an anonymous or named child with the given kind.
pub fn has_child_of_type(node: &Node, type_name: &str) -> bool {
    find_child_by_type(node, type_name).is_some()
}

/// Get line number (1-indexed) from a node.
pub fn get_start_line(node: &Node) -> u32 {
    node.start_position().row as u32 + 1
}

/// Drop all whitespace so formatting-only edits compare equal.
pub fn normalize_type_text(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strip quote characters from a string literal.
pub fn strip_string_quotes(text: &str) -> String {
    text.trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .trim_start_matches("\"\"\"")
        .trim_start_matches("'''")
        .trim_start_matches('"')
        .trim_start_matches('\'')
        .trim_start_matches('`')
        .trim_end_matches("\"\"\"")
        .trim_end_matches("'''")
        .trim_end_matches('"')
        .trim_end_matches('\'')
        .trim_end_matches('`')
        .to_string()
}

/// Decorator name without the `@` and any call arguments.
pub fn decorator_name(text: &str) -> String {
    let text = text.trim().trim_start_matches('@');
    let name = match text.find('(') {
        Some(idx) => &text[..idx],
        None => text,
    };
    normalize_type_text(name)
}

/// Parse `source` with `language`, rejecting trees that contain errors.
pub fn parse_with(language: Language, language_name: &str, source: &str, path: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| AnalyzeError::Grammar {
            language: language_name.to_string(),
            message: e.to_string(),
        })?;

    let tree = parser.parse(source, None).ok_or_else(|| AnalyzeError::Grammar {
        language: language_name.to_string(),
        message: "parser returned no tree".to_string(),
    })?;

    let root = tree.root_node();
    if root.has_error() {
        let node = first_error_node(root).unwrap_or(root);
        let position = node.start_position();
        return Err(AnalyzeError::Syntax {
            path: path.to_string(),
            line: position.row as u32 + 1,
            column: position.column as u32 + 1,
            message: describe_error_node(&node, source),
        });
    }

    Ok(tree)
}

/// Depth-first search for the earliest ERROR or MISSING node.
pub fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error_node)
}

fn describe_error_node(node: &Node, source: &str) -> String {
    if node.is_missing() {
        return format!("missing `{}`", node.kind());
    }
    let text = get_node_text(node, source);
    let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
    if snippet.trim().is_empty() {
        "unexpected input".to_string()
    } else {
        format!("unexpected `{}`", snippet.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_type_text() {
        assert_eq!(normalize_type_text("Dict[str,  int]"), "Dict[str,int]");
        assert_eq!(normalize_type_text(" Optional[ User ] "), "Optional[User]");
    }

    #[test]
    fn test_strip_string_quotes() {
        assert_eq!(strip_string_quotes("\"name\""), "name");
        assert_eq!(strip_string_quotes("'name'"), "name");
        assert_eq!(strip_string_quotes("\"\"\"doc\"\"\""), "doc");
        assert_eq!(strip_string_quotes("u'legacy'"), "legacy");
    }

    #[test]
    fn test_decorator_name() {
        assert_eq!(decorator_name("@property"), "property");
        assert_eq!(decorator_name("@app.route('/x', methods=['GET'])"), "app.route");
        assert_eq!(decorator_name("@ functools.wraps (f)"), "functools.wraps");
    }

    #[test]
    fn test_parse_with_reports_first_error() {
        let err = parse_with(
            tree_sitter_python::LANGUAGE.into(),
            "python",
            "def ok():\n    pass\n\ndef broken(:\n    pass\n",
            "broken.py",
        )
        .unwrap_err();
        match err {
            AnalyzeError::Syntax { path, line, .. } => {
                assert_eq!(path, "broken.py");
                assert_eq!(line, 4);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_accepts_valid_source() {
        let tree = parse_with(
            tree_sitter_python::LANGUAGE.into(),
            "python",
            "x = 1\n",
            "ok.py",
        )
        .unwrap();
        assert_eq!(tree.root_node().kind(), "module");
    }
}
