//! Python 3 rules that the tree-sitter grammar does not enforce.
//!
//! The grammar stays compatible with Python 2 (`print "x"`, `exec code`,
//! `<>`, backtick repr, `0777`, `10L`) and leaves semantic restrictions
//! such as delete targets and call argument order to the compiler. These
//! passes run over an error-free tree and report the first violation.

use tree_sitter::{Node, Point};

use crate::checker::SyntaxIssue;

const TAB_SIZE: usize = 8;

/// Return the first Python 3 rule violation in `root`, if any.
pub(crate) fn first_violation(root: Node<'_>, code: &str) -> Option<SyntaxIssue> {
    let structural = first_structural(root, code);
    let indentation = inconsistent_indentation(root, code);
    match (structural, indentation) {
        (Some(a), Some(b)) => Some(if (b.line, b.column) < (a.line, a.column) { b } else { a }),
        (a, b) => a.or(b),
    }
}

fn first_structural(root: Node<'_>, code: &str) -> Option<SyntaxIssue> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(issue) = check_node(node, code) {
            return Some(issue);
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

fn check_node(node: Node<'_>, code: &str) -> Option<SyntaxIssue> {
    let at = |n: Node<'_>, message: &str| Some(SyntaxIssue::at(code, n.start_position(), message));

    match node.kind() {
        "print_statement" if !has_child_kind(node, "chevron") => at(
            node,
            "Missing parentheses in call to 'print'. Did you mean print(...)?",
        ),
        "exec_statement" => at(
            node,
            "Missing parentheses in call to 'exec'. Did you mean exec(...)?",
        ),
        "<>" => at(node, "invalid syntax"),
        "string_start" if text(node, code).contains('`') => at(node, "invalid syntax"),
        "integer" => integer_issue(text(node, code)).and_then(|message| at(node, message)),
        "block" if named_children(node).is_empty() => Some(missing_block(node, code)),
        "delete_statement" => named_children(node)
            .into_iter()
            .find_map(invalid_delete_target)
            .and_then(|(target, message)| at(target, &message)),
        "argument_list" => argument_order_issue(node).and_then(|(arg, message)| at(arg, message)),
        "for_in_clause" => unparenthesized_iterable(node, code),
        _ => None,
    }
}

fn text<'a>(node: Node<'_>, code: &'a str) -> &'a str {
    code.get(node.byte_range()).unwrap_or_default()
}

fn has_child_kind(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect();
    children
}

fn integer_issue(literal: &str) -> Option<&'static str> {
    let lower = literal.to_ascii_lowercase();
    let radix = ["0x", "0o", "0b"]
        .iter()
        .position(|prefix| lower.starts_with(prefix));

    if lower.ends_with('l') {
        return Some(match radix {
            Some(0) => "invalid hexadecimal literal",
            Some(1) => "invalid octal literal",
            Some(_) => "invalid binary literal",
            None => "invalid decimal literal",
        });
    }
    if radix.is_some() || lower.ends_with('j') {
        return None;
    }

    let digits: Vec<char> = lower.chars().filter(|c| *c != '_').collect();
    if digits.len() > 1 && digits[0] == '0' && digits.iter().any(|c| *c != '0') {
        return Some(
            "leading zeros in decimal integer literals are not permitted; \
             use an 0o prefix for octal integers",
        );
    }
    None
}

/// A compound statement whose suite is an empty `block`: the header's colon
/// was followed by a newline but no indented body.
fn missing_block(block: Node<'_>, code: &str) -> SyntaxIssue {
    let header_row = block
        .prev_sibling()
        .filter(|n| n.kind() == ":")
        .map_or(block.start_position().row, |colon| colon.end_position().row);

    let next_line = code
        .split('\n')
        .enumerate()
        .skip(header_row + 1)
        .find(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        });

    let point = match next_line {
        Some((row, line)) => Point::new(row, line.len() - line.trim_start().len()),
        None => Point::new(header_row + 1, 0),
    };
    SyntaxIssue::at(code, point, "expected an indented block")
}

fn invalid_delete_target(target: Node<'_>) -> Option<(Node<'_>, String)> {
    match target.kind() {
        "identifier" | "keyword_identifier" | "attribute" | "subscript" => None,
        "tuple" | "list" | "expression_list" | "parenthesized_expression" => {
            named_children(target).into_iter().find_map(invalid_delete_target)
        }
        kind => {
            let what = match kind {
                "call" => "function call",
                "list_splat" => "starred",
                "integer" | "float" | "string" | "concatenated_string" | "true" | "false"
                | "none" => "literal",
                _ => "expression",
            };
            Some((target, format!("cannot delete {what}")))
        }
    }
}

fn argument_order_issue(args: Node<'_>) -> Option<(Node<'_>, &'static str)> {
    let mut seen_keyword = false;
    let mut seen_double_star = false;

    for arg in named_children(args) {
        match arg.kind() {
            "keyword_argument" => seen_keyword = true,
            "dictionary_splat" => seen_double_star = true,
            "list_splat" if seen_double_star => {
                return Some((
                    arg,
                    "iterable argument unpacking follows keyword argument unpacking",
                ));
            }
            "list_splat" => {}
            _ if seen_double_star => {
                return Some((arg, "positional argument follows keyword argument unpacking"));
            }
            _ if seen_keyword => {
                return Some((arg, "positional argument follows keyword argument"));
            }
            _ => {}
        }
    }
    None
}

/// `for x in a, b` inside a comprehension: the iterable must be parenthesized.
/// Inside a call, this is a bare generator followed by more arguments.
fn unparenthesized_iterable(clause: Node<'_>, code: &str) -> Option<SyntaxIssue> {
    let mut cursor = clause.walk();
    let comma = clause.children(&mut cursor).find(|c| c.kind() == ",")?;

    let generator = clause
        .parent()
        .filter(|p| p.kind() == "generator_expression");
    let call_argument = generator.filter(|g| g.parent().is_some_and(|p| p.kind() == "call"));

    Some(match call_argument.and_then(|g| g.child_by_field_name("body")) {
        Some(body) => SyntaxIssue::at(
            code,
            body.start_position(),
            "Generator expression must be parenthesized",
        ),
        None => SyntaxIssue::at(code, comma.start_position(), "invalid syntax"),
    })
}

/// Replay the tokenizer's indentation stack over every logical line.
///
/// Each indent is measured twice, with tabs as eight columns and as one,
/// and both measures must order the lines the same way.
fn inconsistent_indentation(root: Node<'_>, code: &str) -> Option<SyntaxIssue> {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut levels: Vec<(usize, usize)> = vec![(0, 0)];
    let mut depth = 0usize;
    let mut in_string = 0usize;
    let mut last_row: Option<usize> = None;

    for leaf in leaves(root) {
        let kind = leaf.kind();
        if kind == "comment" || kind == "block" || leaf.start_byte() == leaf.end_byte() {
            continue;
        }

        let row = leaf.start_position().row;
        let starts_line = last_row.map_or(true, |last| row > last);
        if starts_line && depth == 0 && in_string == 0 {
            let line = lines.get(row).copied().unwrap_or_default();
            if let Some(message) = indent_step(&mut levels, measure(line)) {
                let indent = line.len() - line.trim_start_matches([' ', '\t', '\x0c']).len();
                return Some(SyntaxIssue::at(code, Point::new(row, indent), message));
            }
        }

        match kind {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth = depth.saturating_sub(1),
            "string_start" => in_string += 1,
            "string_end" => in_string = in_string.saturating_sub(1),
            _ => {}
        }
        last_row = Some(leaf.end_position().row);
    }
    None
}

fn leaves(root: Node<'_>) -> Vec<Node<'_>> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.child_count() == 0 {
            out.push(node);
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }
    out
}

/// Indentation width of `line` with tabs expanded to eight and to one column.
fn measure(line: &str) -> (usize, usize) {
    let (mut col, mut alt) = (0, 0);
    for c in line.chars() {
        match c {
            ' ' => {
                col += 1;
                alt += 1;
            }
            '\t' => {
                col = (col / TAB_SIZE + 1) * TAB_SIZE;
                alt += 1;
            }
            '\x0c' => {
                col = 0;
                alt = 0;
            }
            _ => break,
        }
    }
    (col, alt)
}

fn indent_step(
    levels: &mut Vec<(usize, usize)>,
    (col, alt): (usize, usize),
) -> Option<&'static str> {
    const TAB_ERROR: &str = "inconsistent use of tabs and spaces in indentation";

    let (top, top_alt) = levels.last().copied().unwrap_or((0, 0));
    if col == top {
        return (alt != top_alt).then_some(TAB_ERROR);
    }
    if col > top {
        if alt <= top_alt {
            return Some(TAB_ERROR);
        }
        levels.push((col, alt));
        return None;
    }

    while levels.len() > 1 && levels.last().is_some_and(|(c, _)| col < *c) {
        levels.pop();
    }
    let (top, top_alt) = levels.last().copied().unwrap_or((0, 0));
    if col != top {
        return Some("unindent does not match any outer indentation level");
    }
    (alt != top_alt).then_some(TAB_ERROR)
}
