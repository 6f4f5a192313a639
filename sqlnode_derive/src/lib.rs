use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod binary;
mod options;
mod unary;

/// Generates a free builder function per variant of a binary operator enum,
/// e.g. `Less` becomes `pub fn less(left, right) -> Expr`.
#[proc_macro_derive(BinaryOperator, attributes(operator))]
pub fn binary_operator(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    binary::binary_operator_impl(&input).into()
}

/// Generates a free builder function per variant of a unary operator enum,
/// e.g. `Not` becomes `pub fn not(operand) -> Expr`.
#[proc_macro_derive(UnaryOperator, attributes(operator))]
pub fn unary_operator(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    unary::unary_operator_impl(&input).into()
}
