//! Query abstract syntax tree.
//!
//! The tree mirrors the shape produced by a right-recursive Lucene grammar: a clause list
//! `a b c` becomes `Binary(a, Binary(b, c))`, groups and unary prefixes become `LeftOnly`
//! wrappers, and the leaves are `field:value` terms.
//!
//! A flat list of `n` clauses is a chain of `n - 1` binaries linked through their right
//! operands. Walks over the tree follow that chain in a loop and recurse only into left
//! operands and groups, so stack use grows with group nesting rather than with clause count.

use std::{fmt, mem};

use serde::Serialize;

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// The empty query. Matches everything.
    #[default]
    Empty,

    /// A single `field:value` (or bare value) clause.
    Term(Term),

    /// A single wrapped sub-expression: a parenthesized group or a prefixed clause.
    LeftOnly(LeftOnly),

    /// Two sub-expressions joined by an operator.
    Binary(Binary),
}

/// A leaf clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    /// Field name as written (escapes intact). `None` means the default field.
    pub field: Option<String>,
    /// Value as written, without surrounding quotes (escapes intact).
    pub term: String,
    /// Whether the value was a quoted phrase.
    pub quoted: bool,
    /// Optional `+`/`-` prefix.
    pub prefix: Option<Prefix>,
}

/// A `+` or `-` directly in front of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Prefix {
    /// `+term`: the clause must match.
    Required,
    /// `-term`: the clause must not match.
    Prohibited,
}

impl Prefix {
    /// Returns the prefix as it appears in query text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "+",
            Self::Prohibited => "-",
        }
    }
}

/// A unary operator in front of a wrapped sub-expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupPrefix {
    /// `NOT x` or `!x`.
    Not,
    /// `+x`.
    Required,
    /// `-x`.
    Prohibited,
}

impl GroupPrefix {
    /// Returns the prefix as it is written back out.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "NOT ",
            Self::Required => "+",
            Self::Prohibited => "-",
        }
    }
}

impl From<Prefix> for GroupPrefix {
    fn from(prefix: Prefix) -> Self {
        match prefix {
            Prefix::Required => Self::Required,
            Prefix::Prohibited => Self::Prohibited,
        }
    }
}

/// A node with a single child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeftOnly {
    /// The wrapped expression.
    pub child: Box<Node>,
    /// Unary operator applied to the child.
    pub prefix: Option<GroupPrefix>,
    /// Field scope for `field:(...)`.
    pub field: Option<String>,
    /// Whether the child is enclosed in parentheses.
    pub parenthesized: bool,
}

/// A node joining two expressions.
#[derive(Debug, Serialize)]
pub struct Binary {
    /// Left operand.
    pub left: Box<Node>,
    /// Join operator.
    pub operator: Operator,
    /// Right operand.
    pub right: Box<Node>,
    /// Field scope for `field:(a b)`.
    pub field: Option<String>,
    /// Whether the whole expression is enclosed in parentheses.
    pub parenthesized: bool,
}

/// Boolean operator between two clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// No operator written; Lucene treats adjacent clauses as AND.
    Implicit,
    /// `AND` or `&&`.
    And,
    /// `OR` or `||`.
    Or,
    /// `AND NOT`.
    AndNot,
    /// `OR NOT`.
    OrNot,
    /// `NOT` between two clauses.
    Not,
}

impl Operator {
    /// Returns the separator written between the operands.
    fn separator(self) -> &'static str {
        match self {
            Self::Implicit => " ",
            Self::And => " AND ",
            Self::Or => " OR ",
            Self::AndNot => " AND NOT ",
            Self::OrNot => " OR NOT ",
            Self::Not => " NOT ",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implicit => write!(f, "<implicit>"),
            other => write!(f, "{}", other.separator().trim()),
        }
    }
}

impl Term {
    /// Creates an unprefixed, unquoted term.
    pub fn new(field: Option<&str>, term: &str) -> Self {
        Self {
            field: field.map(str::to_string),
            term: term.to_string(),
            quoted: false,
            prefix: None,
        }
    }

    /// Marks the term as a quoted phrase.
    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }

    /// Sets the term prefix.
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Renders the term as query text.
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        if let Some(prefix) = self.prefix {
            out.push_str(prefix.as_str());
        }
        if let Some(field) = &self.field {
            out.push_str(field);
            out.push(':');
        }
        if self.quoted {
            out.push('"');
            out.push_str(&self.term);
            out.push('"');
        } else {
            out.push_str(&self.term);
        }
        out
    }
}

impl Binary {
    /// Takes one operand out, keeping this node's parentheses and field scope on it.
    ///
    /// The node is left with an empty operand and must be discarded.
    pub(crate) fn take_operand(&mut self, right: bool) -> Node {
        let operand = if right {
            mem::take(&mut *self.right)
        } else {
            mem::take(&mut *self.left)
        };

        if self.parenthesized || self.field.is_some() {
            Node::LeftOnly(LeftOnly {
                child: Box::new(operand),
                prefix: None,
                field: self.field.take(),
                parenthesized: true,
            })
        } else {
            operand
        }
    }

    /// Copies everything but the right operand, which is replaced by `right`.
    fn with_right(&self, right: Node) -> Self {
        Self {
            left: self.left.clone(),
            operator: self.operator,
            right: Box::new(right),
            field: self.field.clone(),
            parenthesized: self.parenthesized,
        }
    }
}

impl Clone for Binary {
    fn clone(&self) -> Self {
        let mut chain = Vec::new();
        let mut link = self;
        while let Node::Binary(next) = &*link.right {
            chain.push(link);
            link = next;
        }

        let mut copy = link.with_right(Node::clone(&link.right));
        for outer in chain.into_iter().rev() {
            copy = outer.with_right(Node::Binary(copy));
        }
        copy
    }
}

impl PartialEq for Binary {
    fn eq(&self, other: &Self) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            if a.operator != b.operator
                || a.field != b.field
                || a.parenthesized != b.parenthesized
                || a.left != b.left
            {
                return false;
            }
            match (&*a.right, &*b.right) {
                (Node::Binary(next_a), Node::Binary(next_b)) => {
                    a = next_a;
                    b = next_b;
                }
                (right_a, right_b) => return right_a == right_b,
            }
        }
    }
}

impl Eq for Binary {}

impl Drop for Binary {
    fn drop(&mut self) {
        // Unlink the right chain one binary at a time.
        let mut next = mem::take(&mut *self.right);
        while let Node::Binary(mut binary) = next {
            next = mem::take(&mut *binary.right);
        }
    }
}

impl Node {
    /// True for the empty query.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// True for a leaf clause.
    pub fn is_term(&self) -> bool {
        matches!(self, Self::Term(_))
    }

    /// True for a single-child node.
    pub fn is_left_only(&self) -> bool {
        matches!(self, Self::LeftOnly(_))
    }

    /// True for a two-child node.
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// True for nodes with children.
    pub fn is_composite(&self) -> bool {
        self.is_left_only() || self.is_binary()
    }

    /// True for a clause list that is neither parenthesized nor field-scoped.
    pub(crate) fn is_bare_list(&self) -> bool {
        matches!(self, Self::Binary(b) if !b.parenthesized && b.field.is_none())
    }

    /// Returns every term in depth-first, left-to-right order.
    pub fn terms(&self) -> Vec<&Term> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    /// Appends the terms below this node to `out`.
    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a Term>) {
        let mut node = self;
        loop {
            match node {
                Self::Empty => return,
                Self::Term(term) => {
                    out.push(term);
                    return;
                }
                Self::LeftOnly(group) => node = &group.child,
                Self::Binary(binary) => {
                    binary.left.collect_terms(out);
                    node = &binary.right;
                }
            }
        }
    }

    /// Renders the tree back to Lucene query text.
    ///
    /// Parsing the output yields a tree equal to `self` for every tree the parser or the filter
    /// operations can produce.
    pub fn to_query_string(&self) -> String {
        let mut out = String::new();
        self.write_query(&mut out);
        out
    }

    /// Appends the query text for this node to `out`.
    fn write_query(&self, out: &mut String) {
        let mut node = self;
        let mut open = 0;
        loop {
            match node {
                Self::Empty => break,
                Self::Term(term) => {
                    out.push_str(&term.to_query_string());
                    break;
                }
                Self::LeftOnly(group) => {
                    if let Some(prefix) = group.prefix {
                        out.push_str(prefix.as_str());
                    }
                    if let Some(field) = &group.field {
                        out.push_str(field);
                        out.push(':');
                    }
                    if group.parenthesized || group.child.is_bare_list() {
                        out.push('(');
                        open += 1;
                    }
                    node = &group.child;
                }
                Self::Binary(binary) => {
                    if let Some(field) = &binary.field {
                        out.push_str(field);
                        out.push(':');
                    }
                    if binary.field.is_some() || binary.parenthesized {
                        out.push('(');
                        open += 1;
                    }
                    if binary.left.is_bare_list() {
                        out.push('(');
                        binary.left.write_query(out);
                        out.push(')');
                    } else {
                        binary.left.write_query(out);
                    }
                    out.push_str(binary.operator.separator());
                    node = &binary.right;
                }
            }
        }
        out.push_str(&")".repeat(open));
    }

    /// Formats the node as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let mut node = self;
        let mut indent = indent;
        loop {
            let prefix = "  ".repeat(indent);
            match node {
                Self::Empty => return writeln!(f, "{prefix}Empty"),
                Self::Term(term) => {
                    return writeln!(f, "{prefix}Term({})", term.to_query_string());
                }
                Self::LeftOnly(group) => {
                    write!(f, "{prefix}LeftOnly")?;
                    if let Some(p) = group.prefix {
                        write!(f, " {}", p.as_str().trim())?;
                    }
                    if let Some(field) = &group.field {
                        write!(f, " field={field}")?;
                    }
                    if group.parenthesized {
                        write!(f, " ()")?;
                    }
                    writeln!(f)?;
                    node = &group.child;
                }
                Self::Binary(binary) => {
                    write!(f, "{prefix}{}", binary.operator)?;
                    if let Some(field) = &binary.field {
                        write!(f, " field={field}")?;
                    }
                    if binary.parenthesized {
                        write!(f, " ()")?;
                    }
                    writeln!(f)?;
                    binary.left.fmt_tree(f, indent + 1)?;
                    node = &binary.right;
                }
            }
            indent += 1;
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(field: &str, value: &str) -> Node {
        Node::Term(Term::new(Some(field), value))
    }

    fn binary(left: Node, operator: Operator, right: Node) -> Node {
        Node::Binary(Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            field: None,
            parenthesized: false,
        })
    }

    #[test]
    fn term_rendering() {
        let t = Term::new(Some("level"), "error").quoted().with_prefix(Prefix::Prohibited);
        assert_eq!(t.to_query_string(), "-level:\"error\"");
        assert_eq!(Term::new(None, "rust").to_query_string(), "rust");
    }

    #[test]
    fn predicates() {
        let leaf = term("a", "1");
        assert!(leaf.is_term());
        assert!(!leaf.is_composite());
        assert!(Node::Empty.is_empty());
        assert!(!Node::Empty.is_composite());

        let joined = binary(term("a", "1"), Operator::And, term("b", "2"));
        assert!(joined.is_binary());
        assert!(joined.is_composite());
        assert!(!joined.is_left_only());
    }

    #[test]
    fn binary_rendering() {
        let tree = binary(
            term("a", "1"),
            Operator::Implicit,
            binary(term("b", "2"), Operator::OrNot, term("c", "3")),
        );
        assert_eq!(tree.to_query_string(), "a:1 b:2 OR NOT c:3");
    }

    #[test]
    fn field_group_rendering() {
        let tree = Node::Binary(Binary {
            left: Box::new(Node::Term(Term::new(None, "x"))),
            operator: Operator::Or,
            right: Box::new(Node::Term(Term::new(None, "y"))),
            field: Some("host".into()),
            parenthesized: true,
        });
        assert_eq!(tree.to_query_string(), "host:(x OR y)");
    }

    #[test]
    fn take_operand_keeps_group_decoration() {
        let mut b = Binary {
            left: Box::new(term("a", "1")),
            operator: Operator::And,
            right: Box::new(term("b", "2")),
            field: None,
            parenthesized: true,
        };
        let kept = b.take_operand(true);
        assert_eq!(kept.to_query_string(), "(b:2)");
    }

    #[test]
    fn terms_in_order() {
        let tree = binary(
            binary(term("a", "1"), Operator::Or, term("b", "2")),
            Operator::And,
            term("c", "3"),
        );
        let names: Vec<_> = tree.terms().iter().map(|t| t.term.as_str()).collect();
        assert_eq!(names, vec!["1", "2", "3"]);
    }

    fn chain(len: usize) -> Node {
        (0..len - 1).rev().fold(term("f", &(len - 1).to_string()), |right, i| {
            binary(term("f", &i.to_string()), Operator::Or, right)
        })
    }

    #[test]
    fn long_chains_clone_compare_and_drop() {
        let tree = chain(100_000);
        let copy = tree.clone();
        assert_eq!(copy, tree);
        assert_ne!(copy, chain(99_999));
        assert_eq!(tree.terms().len(), 100_000);
        assert!(tree.to_query_string().ends_with("f:99998 OR f:99999"));
        drop(copy);
        drop(tree);
    }

    #[test]
    fn chain_equality_checks_every_link() {
        let mut other = chain(5);
        let Node::Binary(root) = &mut other else {
            panic!("expected binary");
        };
        let Node::Binary(second) = &mut *root.right else {
            panic!("expected binary");
        };
        second.parenthesized = true;
        assert_ne!(other, chain(5));
    }

    #[test]
    fn tree_display() {
        let tree = binary(term("a", "1"), Operator::And, term("b", "2"));
        assert_eq!(tree.to_string(), "AND\n  Term(a:1)\n  Term(b:2)\n");
        assert_eq!(
            chain(3).to_string(),
            "OR\n  Term(f:0)\n  OR\n    Term(f:1)\n    Term(f:2)\n"
        );
    }
}
