use crate::error::ParseError;
use std::fmt;

/// Non-empty dotted path such as `model.user.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    pub fn new(parts: Vec<String>) -> Result<Self, ParseError> {
        if parts.is_empty() {
            return Err(ParseError::EmptyPath);
        }
        Ok(Self(parts))
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// The leading identifier, looked up in the scope stack.
    pub fn head(&self) -> &str {
        &self.0[0]
    }

    /// The identifiers applied as field accesses after the head.
    pub fn tail(&self) -> &[String] {
        &self.0[1..]
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub path: PropertyPath,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfNode {
    pub condition: Expression,
    pub then_branch: Template,
    pub else_branch: Option<Template>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeachNode {
    pub loop_var: String, // a single identifier, never a path
    pub collection: Expression,
    pub body: Template,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Expression(Expression),
    If(IfNode),
    Foreach(ForeachNode),
}

/// A parsed template: the root of the tree and every directive body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    pub nodes: Vec<Node>,
}

impl Template {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indented outline of the tree, one node per line.
    pub fn pretty_print(&self, indent: &str) -> String {
        let mut out = format!("{indent}Template\n");
        let child_indent = format!("{indent}  ");
        for node in &self.nodes {
            out.push_str(&node.pretty_print(&child_indent));
        }
        out
    }
}

impl Node {
    pub fn pretty_print(&self, indent: &str) -> String {
        match self {
            Node::Text(text) => format!("{indent}Text({text:?})\n"),
            Node::Expression(expr) => format!("{indent}Expression({})\n", expr.path),
            Node::If(IfNode {
                condition,
                then_branch,
                else_branch,
            }) => {
                let inner = format!("{indent}    ");
                let mut out = format!("{indent}If({})\n", condition.path);
                out.push_str(&format!("{indent}  Then\n"));
                out.push_str(&then_branch.pretty_print(&inner));
                if let Some(else_branch) = else_branch {
                    out.push_str(&format!("{indent}  Else\n"));
                    out.push_str(&else_branch.pretty_print(&inner));
                }
                out
            }
            Node::Foreach(ForeachNode {
                loop_var,
                collection,
                body,
            }) => {
                let mut out = format!("{indent}Foreach({loop_var} : {})\n", collection.path);
                out.push_str(&body.pretty_print(&format!("{indent}  ")));
                out
            }
        }
    }
}
