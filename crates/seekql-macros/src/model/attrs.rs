//! Attribute parsing for the `Model` derive macro.
//!
//! Two attributes are recognized: `#[model(...)]` on the struct and
//! `#[field(...)]` on its fields.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Expr, ExprLit, Lit, LitStr, Meta, MetaNameValue, Result, Token,
};

/// The declared kind of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindAttr {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    /// `choices("A", "B")`
    Choices(Vec<String>),
    /// `relation = "auth.user"`
    Relation(String),
}

impl KindAttr {
    fn from_flag(name: &str) -> Option<Self> {
        Some(match name {
            "text" => KindAttr::Text,
            "integer" => KindAttr::Integer,
            "float" => KindAttr::Float,
            "boolean" | "bool" => KindAttr::Boolean,
            "date" => KindAttr::Date,
            "datetime" => KindAttr::DateTime,
            _ => return None,
        })
    }
}

/// Struct-level attributes from `#[model(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ModelAttr {
    /// Registry name of the model (default: the struct name in snake case).
    pub name: Option<String>,
}

impl Parse for ModelAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ModelAttr::default();
        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;
        for meta in content {
            match &meta {
                Meta::NameValue(nv) if nv.path.is_ident("name") => {
                    let name = string_value(nv, "name")?;
                    if name.value().trim().is_empty() {
                        return Err(Error::new(name.span(), "model name must not be empty"));
                    }
                    attr.name = Some(name.value());
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown model attribute. Expected: name = \"...\"",
                    ))
                }
            }
        }
        Ok(attr)
    }
}

/// Field-level attributes from `#[field(...)]`.
#[derive(Debug, Clone)]
pub struct FieldAttr {
    /// Explicit kind; inferred from the Rust type when absent.
    pub kind: Option<KindAttr>,
    pub nullable: bool,
    /// Explicit suggestability; the kind's default when absent.
    pub suggest: Option<bool>,
    pub skip: bool,
    /// Query name (default: the field name).
    pub rename: Option<String>,
    pub page_size: Option<usize>,
    /// The span for error reporting.
    pub span: Span,
}

impl Default for FieldAttr {
    fn default() -> Self {
        FieldAttr {
            kind: None,
            nullable: false,
            suggest: None,
            skip: false,
            rename: None,
            page_size: None,
            span: Span::call_site(),
        }
    }
}

impl FieldAttr {
    fn set_kind(&mut self, kind: KindAttr, span: Span) -> Result<()> {
        if self.kind.is_some() {
            return Err(Error::new(span, "field type given more than once"));
        }
        self.kind = Some(kind);
        self.span = span;
        Ok(())
    }
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                // Flags: text, integer, ..., nullable, suggest, skip
                Meta::Path(p) => {
                    let Some(ident) = p.get_ident() else {
                        return Err(Error::new(p.span(), "expected a field type or flag"));
                    };
                    let name = ident.to_string();
                    match name.as_str() {
                        "nullable" => attr.nullable = true,
                        "suggest" => attr.suggest = Some(true),
                        "skip" => attr.skip = true,
                        other => match KindAttr::from_flag(other) {
                            Some(kind) => attr.set_kind(kind, ident.span())?,
                            None => {
                                return Err(Error::new(
                                    ident.span(),
                                    format!(
                                        "unknown field type: '{}'. Expected one of: text, integer, float, boolean, date, datetime",
                                        other
                                    ),
                                ))
                            }
                        },
                    }
                }

                // choices("A", "B")
                Meta::List(list) if list.path.is_ident("choices") => {
                    let choices: Punctuated<LitStr, Token![,]> =
                        list.parse_args_with(Punctuated::parse_terminated)?;
                    if choices.is_empty() {
                        return Err(Error::new(list.span(), "choices must not be empty"));
                    }
                    let choices = choices.iter().map(LitStr::value).collect();
                    attr.set_kind(KindAttr::Choices(choices), list.span())?;
                }

                // rename = "...", relation = "...", page_size = N, suggest = bool
                Meta::NameValue(nv) => {
                    if nv.path.is_ident("rename") {
                        let name = string_value(nv, "rename")?;
                        if name.value().is_empty() || name.value().contains('.') {
                            return Err(Error::new(
                                name.span(),
                                "rename must be a non-empty name without dots",
                            ));
                        }
                        attr.rename = Some(name.value());
                    } else if nv.path.is_ident("relation") {
                        let target = string_value(nv, "relation")?;
                        attr.set_kind(KindAttr::Relation(target.value()), target.span())?;
                    } else if nv.path.is_ident("page_size") {
                        let size = match &nv.value {
                            Expr::Lit(ExprLit {
                                lit: Lit::Int(n), ..
                            }) => n.base10_parse::<usize>()?,
                            other => {
                                return Err(Error::new(
                                    other.span(),
                                    "page_size must be an integer literal",
                                ))
                            }
                        };
                        if size == 0 {
                            return Err(Error::new(nv.value.span(), "page_size must be positive"));
                        }
                        attr.page_size = Some(size);
                    } else if nv.path.is_ident("suggest") {
                        match &nv.value {
                            Expr::Lit(ExprLit {
                                lit: Lit::Bool(b), ..
                            }) => attr.suggest = Some(b.value),
                            other => {
                                return Err(Error::new(other.span(), "suggest must be true or false"))
                            }
                        }
                    } else {
                        return Err(Error::new(
                            nv.path.span(),
                            "unknown attribute. Expected: rename, relation, page_size or suggest",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown field attribute. Expected a type, choices(...), relation = \"...\", nullable, suggest, skip, rename = \"...\" or page_size = N",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

fn string_value<'a>(nv: &'a MetaNameValue, key: &str) -> Result<&'a LitStr> {
    match &nv.value {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", key),
        )),
    }
}

/// Extracts `#[model(...)]` from the struct's attributes.
pub fn parse_model_attrs(attrs: &[Attribute]) -> Result<ModelAttr> {
    for attr in attrs {
        if attr.path().is_ident("model") {
            return attr.parse_args::<ModelAttr>();
        }
    }
    Ok(ModelAttr::default())
}

/// Extracts `#[field(...)]` from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("field") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_field(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    #[test]
    fn test_kind_flags() {
        assert_eq!(parse_field("text").unwrap().kind, Some(KindAttr::Text));
        assert_eq!(parse_field("integer").unwrap().kind, Some(KindAttr::Integer));
        assert_eq!(parse_field("bool").unwrap().kind, Some(KindAttr::Boolean));
        assert_eq!(parse_field("boolean").unwrap().kind, Some(KindAttr::Boolean));
        assert_eq!(parse_field("datetime").unwrap().kind, Some(KindAttr::DateTime));
    }

    #[test]
    fn test_choices() {
        let attr = parse_field(r#"choices("Drama", "Comedy"), suggest = false"#).unwrap();
        assert_eq!(
            attr.kind,
            Some(KindAttr::Choices(vec!["Drama".into(), "Comedy".into()]))
        );
        assert_eq!(attr.suggest, Some(false));
    }

    #[test]
    fn test_empty_choices() {
        assert!(parse_field("choices()").is_err());
    }

    #[test]
    fn test_relation_and_flags() {
        let attr = parse_field(r#"relation = "auth.user", nullable"#).unwrap();
        assert_eq!(attr.kind, Some(KindAttr::Relation("auth.user".into())));
        assert!(attr.nullable);
        assert!(!attr.skip);
    }

    #[test]
    fn test_suggest_and_page_size() {
        let attr = parse_field("suggest, page_size = 25").unwrap();
        assert_eq!(attr.kind, None);
        assert_eq!(attr.suggest, Some(true));
        assert_eq!(attr.page_size, Some(25));
    }

    #[test]
    fn test_zero_page_size() {
        let err = parse_field("page_size = 0").unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_rename() {
        let attr = parse_field(r#"text, rename = "title""#).unwrap();
        assert_eq!(attr.rename, Some("title".to_string()));
        assert!(parse_field(r#"rename = "a.b""#).is_err());
    }

    #[test]
    fn test_skip() {
        assert!(parse_field("skip").unwrap().skip);
    }

    #[test]
    fn test_conflicting_kinds() {
        let err = parse_field("text, integer").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_unknown_type() {
        let err = parse_field("string").unwrap_err();
        assert!(err.to_string().contains("unknown field type"));
    }

    #[test]
    fn test_model_name() {
        let attr = syn::parse_str::<ModelAttr>(r#"name = "core.book""#).unwrap();
        assert_eq!(attr.name, Some("core.book".to_string()));
        assert!(syn::parse_str::<ModelAttr>(r#"label = "x""#).is_err());
        assert!(syn::parse_str::<ModelAttr>(r#"name = """#).is_err());
    }
}
