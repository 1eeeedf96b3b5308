use std::fmt;

use codemedic_core::CodemedicError;
use tree_sitter::{Node, Parser, Point};

use crate::rules;

/// Report text for source that parses cleanly.
pub const NO_ERRORS: &str = "No syntax errors detected.";

const SNIPPET_MAX_CHARS: usize = 40;

/// The first syntax error found in a source file.
///
/// Line and column are 1-indexed; the column counts characters.
///
/// # Examples
///
/// ```
/// use codemedic_syntax::SyntaxIssue;
///
/// let issue = SyntaxIssue {
///     line: 3,
///     column: 5,
///     message: "missing \")\"".into(),
/// };
/// assert_eq!(issue.to_string(), "missing \")\" (line 3, column 5)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxIssue {
    /// Line where the error starts.
    pub line: usize,
    /// Column where the error starts.
    pub column: usize,
    /// Description of the error.
    pub message: String,
}

impl SyntaxIssue {
    /// Build an issue at a tree-sitter position within `code`.
    pub(crate) fn at(code: &str, point: Point, message: impl Into<String>) -> Self {
        Self {
            line: point.row + 1,
            column: char_column(code, point),
            message: message.into(),
        }
    }
}

impl fmt::Display for SyntaxIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (line {}, column {})",
            self.message, self.line, self.column
        )
    }
}

/// Check Python source for syntax errors and render the result as text.
///
/// Returns [`NO_ERRORS`] for valid source, otherwise `Syntax Error: ...`
/// describing the first error in document order. Never panics.
///
/// # Examples
///
/// ```
/// use codemedic_syntax::{check, NO_ERRORS};
///
/// assert_eq!(check("x = 1\n"), NO_ERRORS);
/// assert!(check("def f(:\n pass").starts_with("Syntax Error:"));
/// ```
pub fn check(code: &str) -> String {
    match find_syntax_issue(code) {
        Ok(None) => NO_ERRORS.to_string(),
        Ok(Some(issue)) => format!("Syntax Error: {issue}"),
        Err(e) => format!("Unexpected Error: {e}"),
    }
}

/// Parse Python source and return the first syntax error, if any.
///
/// tree-sitter recovers from errors, so the tree is searched for the first
/// `ERROR` or `MISSING` node in document order. A tree without such nodes is
/// then checked against the Python 3 rules the grammar leaves open, such as
/// `print` statements, leading-zero integers, missing indented blocks, call
/// argument order and mixed tab/space indentation.
///
/// # Errors
///
/// Returns [`CodemedicError::Parse`] if the grammar cannot be loaded or the
/// parser gives up without producing a tree.
///
/// # Examples
///
/// ```
/// use codemedic_syntax::find_syntax_issue;
///
/// assert!(find_syntax_issue("print('ok')\n").unwrap().is_none());
///
/// let issue = find_syntax_issue("a = 1\nb = (2\n").unwrap().unwrap();
/// assert!(issue.line >= 2);
/// ```
pub fn find_syntax_issue(code: &str) -> Result<Option<SyntaxIssue>, CodemedicError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| CodemedicError::Parse(format!("failed to set language: {e}")))?;

    let tree = parser
        .parse(code, None)
        .ok_or_else(|| CodemedicError::Parse("parser returned no tree".into()))?;

    let root = tree.root_node();
    let issue = if root.has_error() {
        first_error(root).map(|node| describe(node, code))
    } else {
        rules::first_violation(root, code)
    };
    if let Some(issue) = &issue {
        tracing::debug!(line = issue.line, column = issue.column, "syntax error found");
    }
    Ok(issue)
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    // has_error() was set but no node carries it; report the root.
    Some(root)
}

fn describe(node: Node<'_>, code: &str) -> SyntaxIssue {
    let message = if node.is_missing() {
        format!("missing \"{}\"", node.kind())
    } else {
        let text = node.utf8_text(code.as_bytes()).unwrap_or_default();
        let snippet = first_line_snippet(text);
        if snippet.is_empty() {
            "invalid syntax".to_string()
        } else {
            format!("invalid syntax near \"{snippet}\"")
        }
    };
    SyntaxIssue::at(code, node.start_position(), message)
}

/// 1-based character column of a byte position reported by tree-sitter.
fn char_column(code: &str, point: Point) -> usize {
    let line = code.split('\n').nth(point.row).unwrap_or_default();
    let prefix = line.get(..point.column).unwrap_or(line);
    prefix.chars().count() + 1
}

fn first_line_snippet(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() > SNIPPET_MAX_CHARS {
        let cut: String = line.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_source_has_no_issue() {
        let code = r#"
import os


class Greeter:
    def __init__(self, name):
        self.name = name

    def greet(self):
        return f"hello {self.name}"


def main():
    names = [n.upper() for n in os.listdir(".") if n]
    for name in names:
        print(Greeter(name).greet())


if __name__ == "__main__":
    main()
"#;
        assert_eq!(check(code), NO_ERRORS);
    }

    #[test]
    fn empty_source_is_valid() {
        assert_eq!(check(""), NO_ERRORS);
    }

    #[test]
    fn broken_def_reports_first_line() {
        let result = check("def f(:\n pass");
        assert!(result.starts_with("Syntax Error:"), "got: {result}");
        assert!(result.contains("line 1"), "got: {result}");
    }

    #[test]
    fn unclosed_paren_reports_its_line() {
        let issue = find_syntax_issue("a = 1\nb = 2\nc = (3").unwrap().unwrap();
        assert_eq!(issue.line, 3);
        assert!(check("a = 1\nb = 2\nc = (3").contains("line 3"));
    }

    #[test]
    fn check_is_idempotent() {
        let code = "def f(:\n pass";
        assert_eq!(check(code), check(code));
    }

    #[test]
    fn snippet_is_truncated() {
        let long = "x".repeat(100);
        let snippet = first_line_snippet(&long);
        assert_eq!(snippet.chars().count(), SNIPPET_MAX_CHARS + 3);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn snippet_keeps_first_line_only() {
        assert_eq!(first_line_snippet("  foo(:\nbar\n"), "foo(:");
    }

    #[test]
    fn column_counts_characters_not_bytes() {
        let code = "a = 1\nname = 'héllo' + (\n";
        // '(' sits at byte 18 but character 17 of the second line.
        assert_eq!(char_column(code, Point::new(1, 18)), 18);
        assert_eq!(char_column(code, Point::new(0, 4)), 5);
    }

    #[test]
    fn column_for_out_of_range_position_does_not_panic() {
        assert_eq!(char_column("ab", Point::new(3, 9)), 1);
        assert_eq!(char_column("é", Point::new(0, 1)), 2);
    }

    #[test]
    fn issue_display_includes_position() {
        let issue = SyntaxIssue {
            line: 7,
            column: 2,
            message: "invalid syntax".into(),
        };
        assert_eq!(issue.to_string(), "invalid syntax (line 7, column 2)");
    }
}
