use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::options::operator_variants;

pub fn binary_operator_impl(input: &DeriveInput) -> TokenStream {
    let enum_name = &input.ident;

    let variants = match operator_variants(input) {
        Ok(variants) => variants,
        Err(e) => return e.to_compile_error(),
    };

    let functions = variants.iter().map(|var| {
        let var_name = var.ident;
        let fn_name = &var.fn_name;
        let doc = format!("Builds `{enum_name}::{var_name}` over `left` and `right`.");

        quote! {
            #[doc = #doc]
            pub fn #fn_name<L, R>(left: L, right: R) -> crate::Expr
            where
                L: crate::IntoExpr,
                R: crate::IntoExpr,
            {
                crate::Expr::binary(#enum_name::#var_name, left, right)
            }
        }
    });

    quote! { #(#functions)* }
}
