//! Mapping from source-language type spellings to the C++ spellings used
//! during emission.

use std::collections::HashMap;

use crate::docstring::TypeOf;

/// Registry of known type mappings.
///
/// Unknown types never fail a lookup: parameters fall back to the `int`
/// placeholder (deliberately wrong for non-numeric types, so the generated
/// code forces author review), return types fall back to `void`.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    type_map: HashMap<String, String>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-seeded with the built-in mappings.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("bool", "bool");
        registry.register("int", "int");
        registry.register("long", "long");
        registry.register("float", "double");
        registry.register("complex", "std::complex<double>");
        registry.register("str", "std::string");
        registry.register("bytearray", "std::string");
        registry.register("List[int]", "std::vector<int>");
        registry
    }

    pub fn register(&mut self, pytype: impl Into<String>, cpptype: impl Into<String>) {
        self.type_map.insert(pytype.into(), cpptype.into());
    }

    pub fn contains(&self, pytype: &str) -> bool {
        self.type_map.contains_key(pytype)
    }

    /// The registered spelling of `pytype`, falling back to the placeholder.
    pub fn convert(&self, pytype: &str) -> String {
        self.type_map
            .get(pytype)
            .cloned()
            .unwrap_or_else(|| "int".to_string())
    }

    /// Resolve a type spelling for emission. Unregistered names collapse to
    /// `void` in return position and to the `int` placeholder otherwise.
    pub fn detect(&self, pytype: &str, rettype: bool) -> String {
        if !self.contains(pytype) {
            return (if rettype { "void" } else { "int" }).to_string();
        }
        self.convert(pytype)
    }

    /// Resolve a parsed `T of U` docstring compound by projecting its head
    /// through the registry.
    pub fn detect_type_of(&self, ty: &TypeOf, rettype: bool) -> String {
        match ty {
            TypeOf::Name(name) => self.detect(name, rettype),
            TypeOf::Of(head, _) => self.detect(head, rettype),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::docstring::parse_type_of;

    #[test]
    fn test_detect_builtin() {
        let registry = TypeRegistry::with_builtins();

        assert_eq!(registry.detect("float", false), "double");
        assert_eq!(registry.detect("str", true), "std::string");
        assert_eq!(registry.detect("List[int]", false), "std::vector<int>");
    }

    #[test]
    fn test_detect_unknown() {
        let registry = TypeRegistry::with_builtins();

        assert_eq!(registry.detect("Spam", false), "int");
        assert_eq!(registry.detect("Spam", true), "void");
    }

    #[test]
    fn test_register_overrides_lookup() {
        let mut registry = TypeRegistry::with_builtins();
        registry.register("Spam", "Spam *");

        assert_eq!(registry.detect("Spam", false), "Spam *");
    }

    #[test]
    fn test_detect_type_of_projects_head() {
        let mut registry = TypeRegistry::with_builtins();
        registry.register("list", "std::vector<int>");

        let parsed = parse_type_of("list of str");
        assert_eq!(registry.detect_type_of(&parsed, true), "std::vector<int>");

        let unknown = parse_type_of("set of str");
        assert_eq!(registry.detect_type_of(&unknown, true), "void");
    }
}
