use super::Dialect;
use std::path::PathBuf;

/// A style rule and the position of the first character of its selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleNode {
    /// Raw selector text, trimmed
    pub selector: String,

    /// 1-based line
    pub line: usize,

    /// 1-based column, in UTF-16 code units
    pub column: usize,

    /// Rules and at-rules nested in the body
    pub children: Vec<Node>,
}

/// An at-rule with a body, e.g. `@media` or `@mixin`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRuleNode {
    /// Name without the `@`
    pub name: String,

    /// Everything between the name and the body
    pub params: String,

    pub line: usize,
    pub column: usize,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Rule(RuleNode),
    AtRule(AtRuleNode),
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Rule(rule) => &rule.children,
            Node::AtRule(at_rule) => &at_rule.children,
        }
    }
}

/// Parsed stylesheet
#[derive(Debug, Clone)]
pub struct StyleDocument {
    /// Stylesheet path as given to the parser
    pub path: PathBuf,

    /// Grammar the document was parsed with
    pub dialect: Dialect,

    /// Top-level nodes in document order
    pub nodes: Vec<Node>,
}

impl StyleDocument {
    /// Iterate over every node, parents before their children
    pub fn walk(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.nodes.iter()],
        }
    }

    /// Iterate over every style rule in document order, including rules
    /// nested in other rules or in at-rules
    pub fn rules(&self) -> impl Iterator<Item = &RuleNode> + '_ {
        self.walk().filter_map(|node| match node {
            Node::Rule(rule) => Some(rule),
            Node::AtRule(_) => None,
        })
    }
}

/// Pre-order iterator over a node tree
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Node>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(node) => {
                    self.stack.push(node.children().iter());
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
