use crate::ast::*;
use crate::context::Context;
use crate::value::Value;

/// True if the rendered text of an `if` condition selects the then-branch.
pub fn is_truthy(rendered: &str) -> bool {
    !rendered.is_empty() && rendered != "false"
}

impl Template {
    /// Render against a fresh [`Context`] whose root scope binds `model`.
    pub fn render(&self, model: &Value) -> String {
        let mut context = Context::new(model.clone());
        self.render_in(&mut context)
    }

    /// Render against an existing context. Scopes pushed while rendering are
    /// popped again before this returns.
    pub fn render_in(&self, context: &mut Context) -> String {
        let mut output = String::new();
        for node in &self.nodes {
            output.push_str(&node.render(context));
        }
        output
    }
}

impl Expression {
    pub fn evaluate(&self, context: &Context) -> Option<Value> {
        context.resolve(&self.path)
    }

    pub fn render(&self, context: &Context) -> String {
        self.evaluate(context)
            .map(|value| value.render())
            .unwrap_or_default()
    }
}

impl Node {
    pub fn render(&self, context: &mut Context) -> String {
        match self {
            Node::Text(text) => text.clone(),
            Node::Expression(expr) => expr.render(context),
            Node::If(IfNode {
                condition,
                then_branch,
                else_branch,
            }) => {
                if is_truthy(&condition.render(context)) {
                    then_branch.render_in(context)
                } else if let Some(else_branch) = else_branch {
                    else_branch.render_in(context)
                } else {
                    String::new()
                }
            }
            Node::Foreach(ForeachNode {
                loop_var,
                collection,
                body,
            }) => {
                let resolved = collection.evaluate(context);
                let Some(items) = resolved.as_ref().and_then(Value::as_list) else {
                    tracing::debug!(
                        collection = %collection.path,
                        "foreach over a value that is not a list; rendering nothing"
                    );
                    return String::new();
                };

                let mut output = String::new();
                for item in items {
                    let mut scope = context.push();
                    scope.set(loop_var.as_str(), item.clone());
                    output.push_str(&body.render_in(&mut scope));
                }
                output
            }
        }
    }
}
