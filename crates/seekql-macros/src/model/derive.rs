//! Implementation of the `#[derive(Model)]` macro.
//!
//! This macro generates an implementation of `seekql::Model` and field name
//! constants for building queries without string typos.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    spanned::Spanned, Data, DeriveInput, Error, Fields, GenericArgument, PathArguments, Result,
    Type,
};

use super::attrs::{parse_field_attrs, parse_model_attrs, KindAttr};

/// Main implementation of the Model derive macro.
pub fn model_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Model can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Model can only be derived for structs",
            ))
        }
    };

    let model_attr = parse_model_attrs(&input.attrs)?;
    let model_name = model_attr
        .name
        .unwrap_or_else(|| to_snake_case(&struct_name.to_string()));

    let mut descriptions: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut const_names: Vec<String> = vec!["MODEL_NAME".to_string()];

    for field in fields.iter() {
        let field_ident = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attr = parse_field_attrs(&field.attrs)?;
        if attr.skip {
            continue;
        }

        let (inner_ty, is_option) = unwrap_option(&field.ty);
        let kind = match attr.kind {
            Some(kind) => kind,
            None => infer_kind(inner_ty).ok_or_else(|| {
                Error::new(
                    field.ty.span(),
                    "cannot infer the field type; annotate it with #[field(...)] or #[field(skip)]",
                )
            })?,
        };

        let query_name = attr.rename.unwrap_or_else(|| {
            let name = field_ident.to_string();
            name.strip_prefix("r#").map(str::to_string).unwrap_or(name)
        });

        let const_str = to_snake_case(&query_name).to_uppercase();
        if const_names.contains(&const_str) {
            return Err(Error::new(
                field_ident.span(),
                format!("field constant `{}` would be defined twice", const_str),
            ));
        }
        const_names.push(const_str.clone());
        let const_name = format_ident!("{}", const_str);
        field_constants.push(quote! {
            /// Query name of this field.
            pub const #const_name: &'static str = #query_name;
        });

        let mut description = match kind {
            KindAttr::Text => quote! { ::seekql::FieldDescription::text(#query_name) },
            KindAttr::Integer => quote! { ::seekql::FieldDescription::integer(#query_name) },
            KindAttr::Float => quote! { ::seekql::FieldDescription::float(#query_name) },
            KindAttr::Boolean => quote! { ::seekql::FieldDescription::boolean(#query_name) },
            KindAttr::Date => quote! { ::seekql::FieldDescription::date(#query_name) },
            KindAttr::DateTime => quote! { ::seekql::FieldDescription::datetime(#query_name) },
            KindAttr::Choices(choices) => quote! {
                ::seekql::FieldDescription::enumeration(#query_name, [#(#choices),*])
            },
            KindAttr::Relation(target) => quote! {
                ::seekql::FieldDescription::relation(#query_name, #target)
            },
        };
        if attr.nullable || is_option {
            description = quote! { #description.nullable() };
        }
        if let Some(suggest) = attr.suggest {
            description = quote! { #description.suggestable(#suggest) };
        }
        if let Some(size) = attr.page_size {
            description = quote! { #description.page_size(#size) };
        }
        descriptions.push(description);
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            /// Registry name of this model.
            pub const MODEL_NAME: &'static str = #model_name;
            #(#field_constants)*
        }

        impl #impl_generics ::seekql::Model for #struct_name #ty_generics #where_clause {
            fn model_description() -> ::seekql::ModelDescription {
                ::seekql::ModelDescription::new(#model_name)
                    #(.field(#descriptions))*
            }
        }
    };

    Ok(expanded)
}

/// Returns the `T` of `Option<T>` and whether the type was an option.
fn unwrap_option(ty: &Type) -> (&Type, bool) {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            if segment.ident == "Option" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return (inner, true);
                    }
                }
            }
        }
    }
    (ty, false)
}

/// Kind implied by a plain Rust type, by the last segment of its path.
fn infer_kind(ty: &Type) -> Option<KindAttr> {
    match ty {
        Type::Reference(r) => infer_kind(&r.elem),
        Type::Path(path) => {
            let ident = path.path.segments.last()?.ident.to_string();
            Some(match ident.as_str() {
                "String" | "str" => KindAttr::Text,
                "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
                    KindAttr::Integer
                }
                "f32" | "f64" => KindAttr::Float,
                "bool" => KindAttr::Boolean,
                "NaiveDate" => KindAttr::Date,
                "NaiveDateTime" | "DateTime" => KindAttr::DateTime,
                _ => return None,
            })
        }
        _ => None,
    }
}

/// Convert a string to snake_case.
fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.extend(c.to_lowercase());
            prev_was_lower = false;
        } else if c == '-' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c);
            prev_was_lower = c != '_';
        }
    }

    result
}
