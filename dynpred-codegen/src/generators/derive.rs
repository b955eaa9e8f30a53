//! Implementation of the `#[derive(Record)]` macro.

use std::collections::HashSet;

use convert_case::{Case, Casing};
use dynpred_schema::is_identifier;
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Path, Type};

/// Parse and generate code for the `#[derive(Record)]` macro.
pub fn derive_record_impl(input: &DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Record derive does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Record derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "Record derive only supports structs",
            ));
        }
    };

    let struct_attrs = parse_struct_attrs(input)?;
    let krate = struct_attrs
        .krate
        .unwrap_or_else(|| syn::parse_quote!(::dynpred));
    let record_name = struct_attrs
        .name
        .unwrap_or_else(|| name.unraw().to_string());

    let mut field_infos = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some(info) = parse_field(field, struct_attrs.rename_all)? {
            field_infos.push(info);
        }
    }
    check_property_names(&field_infos)?;

    let properties = field_infos.iter().map(|f| {
        let field = &f.ident;
        let ty = &f.ty;
        let property = &f.property;
        quote! {
            .property::<#ty>(#property, |record| {
                record
                    .downcast_ref::<#name>()
                    .map(|record| #krate::Field::field_ref(&record.#field))
            })
        }
    });

    let expect_msg = format!("schema of `{}` is valid", record_name);

    Ok(quote! {
        impl #krate::Record for #name {
            fn schema() -> &'static #krate::RecordSchema {
                static SCHEMA: ::std::sync::OnceLock<#krate::RecordSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    #krate::RecordSchema::builder(#record_name)
                        #(#properties)*
                        .build()
                        .expect(#expect_msg)
                })
            }
        }

        impl #krate::Field for #name {
            fn property_type() -> #krate::PropertyType {
                #krate::PropertyType::Record(<#name as #krate::Record>::schema)
            }

            fn field_ref(&self) -> #krate::FieldRef<'_> {
                #krate::FieldRef::Record(self)
            }
        }
    })
}

/// Struct-level attributes parsed from `#[record(...)]`.
#[derive(Debug, Default)]
struct StructAttrs {
    name: Option<String>,
    rename_all: Option<Case>,
    krate: Option<Path>,
}

/// Parse struct-level `#[record(...)]` attributes.
fn parse_struct_attrs(input: &DeriveInput) -> Result<StructAttrs, syn::Error> {
    let mut attrs = StructAttrs::default();

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.name = Some(value.value());
            } else if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.rename_all = Some(parse_case(&value)?);
            } else if meta.path.is_ident("crate") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.krate = Some(value.parse()?);
            } else {
                return Err(meta.error("unknown record attribute"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}

/// Map a `rename_all` value to a case conversion.
///
/// Only conventions that keep names usable as path segments are accepted.
fn parse_case(value: &LitStr) -> Result<Case, syn::Error> {
    let case = match value.value().as_str() {
        "PascalCase" => Case::Pascal,
        "camelCase" => Case::Camel,
        "snake_case" => Case::Snake,
        "SCREAMING_SNAKE_CASE" => Case::ScreamingSnake,
        "lowercase" => Case::Flat,
        "UPPERCASE" => Case::UpperFlat,
        other => {
            return Err(syn::Error::new_spanned(
                value,
                format!(
                    "unsupported rename_all `{}`, expected one of PascalCase, camelCase, snake_case, SCREAMING_SNAKE_CASE, lowercase, UPPERCASE",
                    other
                ),
            ));
        }
    };
    Ok(case)
}

/// Information about an exposed field.
#[derive(Debug)]
struct FieldInfo {
    ident: Ident,
    ty: Type,
    property: String,
    name_lit: LitStr,
}

/// Parse a field and its `#[record(...)]` attributes.
///
/// Returns `None` for skipped fields.
fn parse_field(field: &syn::Field, rename_all: Option<Case>) -> Result<Option<FieldInfo>, syn::Error> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| syn::Error::new_spanned(field, "Fields must be named"))?;

    let field_name = ident.unraw().to_string();
    let mut property = match rename_all {
        Some(case) => field_name.to_case(case),
        None => field_name,
    };
    let mut name_lit = LitStr::new(&property, ident.span());
    let mut skip = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                property = value.value();
                name_lit = value;
            } else if meta.path.is_ident("skip") {
                skip = true;
            } else {
                return Err(meta.error("unknown record field attribute"));
            }
            Ok(())
        })?;
    }

    if skip {
        return Ok(None);
    }

    Ok(Some(FieldInfo {
        ident,
        ty: field.ty.clone(),
        property,
        name_lit,
    }))
}

/// Reject names that could never be reached by a property path.
fn check_property_names(fields: &[FieldInfo]) -> Result<(), syn::Error> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !is_identifier(&field.property) {
            return Err(syn::Error::new_spanned(
                &field.name_lit,
                format!("property name `{}` is not an identifier", field.property),
            ));
        }
        if !seen.insert(field.property.as_str()) {
            return Err(syn::Error::new_spanned(
                &field.name_lit,
                format!("duplicate property name `{}`", field.property),
            ));
        }
    }
    Ok(())
}
