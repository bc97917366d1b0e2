mod dialect;
mod document;
mod stylesheet;

pub use dialect::Dialect;
pub use document::{AtRuleNode, Descendants, Node, RuleNode, StyleDocument};
pub use stylesheet::{Malformed, StyleParser, StylesheetError};
