use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::options::operator_variants;

pub fn unary_operator_impl(input: &DeriveInput) -> TokenStream {
    let enum_name = &input.ident;

    let variants = match operator_variants(input) {
        Ok(variants) => variants,
        Err(e) => return e.to_compile_error(),
    };

    let functions = variants.iter().map(|var| {
        let var_name = var.ident;
        let fn_name = &var.fn_name;
        let doc = format!("Builds `{enum_name}::{var_name}` over `operand`.");

        quote! {
            #[doc = #doc]
            pub fn #fn_name<E>(operand: E) -> crate::Expr
            where
                E: crate::IntoExpr,
            {
                crate::Expr::unary(#enum_name::#var_name, operand)
            }
        }
    });

    quote! { #(#functions)* }
}
