use std::{cell::RefCell, collections::HashMap};

use super::{BuildContext, CppExpr};

/// The parameter list of a translated function or lambda.
///
/// `types` is the argument-type table: parameter name to C++ type spelling.
/// Hooks write it from docstrings, callers may write it directly via
/// [`ArgumentsNode::set_arg_type`], and emission reads it. Table entries take
/// precedence over source annotations; parameters with neither fall back to
/// the `int` placeholder.
#[derive(Debug, Clone)]
pub struct ArgumentsNode {
    pub args: Vec<CppArg>,
    pub vararg: Option<String>,
    pub kwarg: Option<String>,
    pub defaults: Vec<CppExpr>,
    types: RefCell<HashMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct CppArg {
    pub name: String,
    pub annotation: Option<CppExpr>,
}

impl ArgumentsNode {
    pub fn new(
        args: Vec<CppArg>,
        vararg: Option<String>,
        kwarg: Option<String>,
        defaults: Vec<CppExpr>,
    ) -> Self {
        Self {
            args,
            vararg,
            kwarg,
            defaults,
            types: RefCell::new(HashMap::new()),
        }
    }

    /// Install the C++ spelling for a parameter.
    pub fn set_arg_type(&self, name: impl Into<String>, cpptype: impl Into<String>) {
        self.types.borrow_mut().insert(name.into(), cpptype.into());
    }

    pub fn build(&self, ctx: &BuildContext) -> String {
        let table = self.types.borrow();
        let start = self.args.len().saturating_sub(self.defaults.len());

        let mut parts = vec![];
        for (i, arg) in self.args.iter().enumerate() {
            let ty = match table.get(&arg.name) {
                Some(spelling) => spelling.clone(),
                None => match &arg.annotation {
                    Some(annotation) => ctx.registry().detect(&annotation.build(ctx), false),
                    None => "int".to_string(),
                },
            };

            if i < start {
                parts.push(format!("{} {}", ty, arg.name));
            } else {
                parts.push(format!(
                    "{} {}={}",
                    ty,
                    arg.name,
                    self.defaults[i - start].build(ctx)
                ));
            }
        }

        // the conventional receiver vanishes from method signatures
        if ctx.is_class_method() && self.args.first().map(|arg| arg.name.as_str()) == Some("self")
        {
            parts.remove(0);
        }

        parts.join(", ")
    }
}
