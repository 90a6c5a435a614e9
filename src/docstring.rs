//! Extraction of `:param ...:` and `:rtype:` fields from docstrings.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r":param(?: (?P<type>\w+))? (?P<param>\w+):(?: (?P<doc>.*))?").unwrap()
});

static RTYPE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r":rtype: (?P<rtype>.*)").unwrap());

static TYPE_OF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<head>\w+?) of (?P<rest>.+)$").unwrap());

/// A single `:param [<type>] <name>: <doc>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    pub ty: Option<String>,
    pub param: String,
    pub doc: Option<String>,
}

/// All `:param:` entries of a docstring, in order of appearance.
pub fn get_params(docstring: &str) -> Vec<ParamDoc> {
    PARAM_RE
        .captures_iter(docstring)
        .map(|caps| ParamDoc {
            ty: caps.name("type").map(|m| m.as_str().trim().to_string()),
            param: caps["param"].trim().to_string(),
            doc: caps.name("doc").map(|m| m.as_str().trim().to_string()),
        })
        .collect()
}

/// The first `:rtype:` entry of a docstring, if any.
pub fn get_rtype(docstring: &str) -> Option<String> {
    RTYPE_RE
        .captures(docstring)
        .map(|caps| caps["rtype"].trim().to_string())
}

/// A docstring type expression: either a bare name or the right-recursive
/// compound `T of U`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOf {
    Name(String),
    Of(String, Box<TypeOf>),
}

/// Parse a `T of U` type expression into its nested pair structure.
///
/// Anything that does not match the compound grammar (including
/// parenthesized tails like `(str, str)`) stays a bare name.
pub fn parse_type_of(s: &str) -> TypeOf {
    match TYPE_OF_RE.captures(s) {
        None => TypeOf::Name(s.to_string()),
        Some(caps) => TypeOf::Of(
            caps["head"].trim().to_string(),
            Box::new(parse_type_of(caps["rest"].trim())),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_params_ignores_rtype() {
        assert_eq!(get_params("\n:rtype: int\n"), vec![]);
    }

    #[test]
    fn test_get_params_single() {
        assert_eq!(
            get_params("\n:param type name: doc\n"),
            vec![ParamDoc {
                ty: Some("type".into()),
                param: "name".into(),
                doc: Some("doc".into()),
            }]
        );
    }

    #[test]
    fn test_get_params_multiple() {
        assert_eq!(
            get_params("\n:param type name1: doc1\n:param type name2: doc2\n"),
            vec![
                ParamDoc {
                    ty: Some("type".into()),
                    param: "name1".into(),
                    doc: Some("doc1".into()),
                },
                ParamDoc {
                    ty: Some("type".into()),
                    param: "name2".into(),
                    doc: Some("doc2".into()),
                },
            ]
        );
    }

    #[test]
    fn test_get_params_without_type() {
        assert_eq!(
            get_params(":param name: doc"),
            vec![ParamDoc {
                ty: None,
                param: "name".into(),
                doc: Some("doc".into()),
            }]
        );
    }

    #[test]
    fn test_get_rtype_missing() {
        assert_eq!(get_rtype("\n:param type name: doc\n"), None);
    }

    #[test]
    fn test_get_rtype() {
        assert_eq!(get_rtype("\n:rtype: int\n"), Some("int".into()));
    }

    #[test]
    fn test_get_rtype_first_wins() {
        assert_eq!(get_rtype("\n:rtype: int\n:rtype: float\n"), Some("int".into()));
    }

    #[test]
    fn test_get_rtype_compound() {
        assert_eq!(get_rtype("\n:rtype: list of str\n"), Some("list of str".into()));
    }

    #[test]
    fn test_parse_type_of_bare() {
        assert_eq!(parse_type_of("list"), TypeOf::Name("list".into()));
    }

    #[test]
    fn test_parse_type_of_pair() {
        assert_eq!(
            parse_type_of("list of str"),
            TypeOf::Of("list".into(), Box::new(TypeOf::Name("str".into())))
        );
    }

    #[test]
    fn test_parse_type_of_nested() {
        assert_eq!(
            parse_type_of("list of map of (str, str)"),
            TypeOf::Of(
                "list".into(),
                Box::new(TypeOf::Of(
                    "map".into(),
                    Box::new(TypeOf::Name("(str, str)".into()))
                ))
            )
        );
    }
}
