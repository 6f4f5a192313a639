use heck::ToSnakeCase;
use quote::format_ident;
use syn::{Attribute, Data, DeriveInput, Ident, LitStr, Variant};

#[derive(Debug, Default)]
pub(crate) struct OperatorOptions {
    pub(crate) skip: bool,
    pub(crate) name: Option<Ident>,
}

impl OperatorOptions {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in attrs {
            if !attr.path().is_ident("operator") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    options.skip = true;
                    Ok(())
                } else if meta.path.is_ident("name") {
                    let lit: LitStr = meta.value()?.parse()?;
                    options.name = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `skip` or `name = \"...\"`"))
                }
            })?;
        }
        Ok(options)
    }
}

/// A unit variant paired with the builder function name it produces.
pub(crate) struct OperatorVariant<'a> {
    pub(crate) ident: &'a Ident,
    pub(crate) fn_name: Ident,
}

pub(crate) fn operator_variants(input: &DeriveInput) -> syn::Result<Vec<OperatorVariant<'_>>> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "operator derives only support enums",
        ));
    };

    let mut variants = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        ensure_unit(variant)?;
        let options = OperatorOptions::from_attrs(&variant.attrs)?;
        if options.skip {
            continue;
        }
        let fn_name = options
            .name
            .unwrap_or_else(|| format_ident!("{}", variant.ident.to_string().to_snake_case()));
        variants.push(OperatorVariant {
            ident: &variant.ident,
            fn_name,
        });
    }
    Ok(variants)
}

fn ensure_unit(variant: &Variant) -> syn::Result<()> {
    if matches!(variant.fields, syn::Fields::Unit) {
        Ok(())
    } else {
        Err(syn::Error::new_spanned(
            variant,
            "operator variants cannot carry fields",
        ))
    }
}
