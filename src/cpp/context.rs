use super::{ClassDef, For, FunctionDef, If, While};
use crate::types::TypeRegistry;

pub const INDENT: &str = "    ";

/// A frame on the build stack: one of the target nodes enclosing the node
/// currently being emitted.
#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    Class(&'a ClassDef),
    Function(&'a FunctionDef),
    For(&'a For),
    While(&'a While),
    If(&'a If),
}

/// Emission context: indent depth, enclosing-node ancestry, and the type
/// registry consulted for parameter and return types.
///
/// Entering a nested node creates a child value via [`BuildContext::child`];
/// the parent context is never mutated, which keeps recursive emission safe.
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    indent_level: usize,
    stack: Vec<Frame<'a>>,
    registry: &'a TypeRegistry,
}

impl<'a> BuildContext<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            indent_level: 0,
            stack: vec![],
            registry,
        }
    }

    /// A context one level deeper, with `frame` appended to the ancestry.
    pub fn child(&self, frame: Frame<'a>) -> Self {
        let mut stack = self.stack.clone();
        stack.push(frame);
        Self {
            indent_level: self.indent_level + 1,
            stack,
            registry: self.registry,
        }
    }

    pub fn indent(&self) -> String {
        INDENT.repeat(self.indent_level)
    }

    pub fn registry(&self) -> &'a TypeRegistry {
        self.registry
    }

    /// Whether any enclosing node is a class definition.
    pub fn in_class(&self) -> bool {
        self.stack
            .iter()
            .any(|frame| matches!(frame, Frame::Class(_)))
    }

    /// Whether the node currently being emitted belongs to a method: the top
    /// of the stack is a function whose immediate parent is a class.
    pub fn is_class_method(&self) -> bool {
        let len = self.stack.len();
        if len < 2 {
            return false;
        }
        matches!(self.stack[len - 1], Frame::Function(_))
            && matches!(self.stack[len - 2], Frame::Class(_))
    }

    /// The class definition on top of the stack, if any.
    pub fn enclosing_class(&self) -> Option<&'a ClassDef> {
        match self.stack.last() {
            Some(Frame::Class(class_def)) => Some(class_def),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::cpp::{ArgumentsNode, ClassDef, CppStmt, Frame, FunctionDef};

    fn function(name: &str) -> FunctionDef {
        FunctionDef {
            name: name.to_string(),
            args: Rc::new(ArgumentsNode::new(vec![], None, None, vec![])),
            body: vec![CppStmt::Pass],
            docstring: None,
            returns: None,
        }
    }

    fn class(name: &str) -> ClassDef {
        ClassDef {
            name: name.to_string(),
            bases: vec![],
            body: vec![],
            docstring: None,
        }
    }

    #[test]
    fn test_module_context_is_not_a_class() {
        let registry = crate::types::TypeRegistry::with_builtins();
        let ctx = BuildContext::new(&registry);

        assert!(!ctx.in_class());
        assert!(!ctx.is_class_method());
        assert_eq!(ctx.indent(), "");
    }

    #[test]
    fn test_method_context() {
        let registry = crate::types::TypeRegistry::with_builtins();
        let class_def = class("test");
        let function_def = function("method");

        let ctx = BuildContext::new(&registry);
        let class_ctx = ctx.child(Frame::Class(&class_def));
        let method_ctx = class_ctx.child(Frame::Function(&function_def));

        assert!(class_ctx.in_class());
        assert!(!class_ctx.is_class_method());
        assert!(method_ctx.is_class_method());
        assert_eq!(method_ctx.indent(), "        ");
        assert_eq!(class_ctx.enclosing_class().map(|c| c.name.as_str()), Some("test"));
    }

    #[test]
    fn test_child_does_not_touch_parent() {
        let registry = crate::types::TypeRegistry::with_builtins();
        let class_def = class("test");

        let ctx = BuildContext::new(&registry);
        let _child = ctx.child(Frame::Class(&class_def));

        assert!(!ctx.in_class());
        assert_eq!(ctx.indent(), "");
    }
}
