use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::ToTokens;
use syn::{self, Ident, ImplItemFn};

/// This macro is added before a method of `RoundEngine` in the impl block.
/// Use this macro to first check if the current round phase is exactly the phase in
/// the attribute.
///
/// For example, `#[allowed_phase(Betting)]` will make a method first check
/// if the current phase is `GamePhase::Betting`. If not, the method returns
/// `Err(GameError::WrongPhase { .. })` before touching any state.
///
/// `GamePhase` and `GameError` must be in scope where the macro is used.
#[proc_macro_attribute]
pub fn allowed_phase(attr: TokenStream1, item: TokenStream1) -> TokenStream1 {
    match expand_allowed_phase(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_allowed_phase(attr: TokenStream2, item: TokenStream2) -> syn::Result<TokenStream2> {
    let mut ast: ImplItemFn = syn::parse2(item)?;
    let phase: Ident = syn::parse2(attr)?;
    let action = ast.sig.ident.to_string();

    let early_return: syn::Stmt = syn::parse_quote! {
        if self.phase != GamePhase::#phase {
            return Err(GameError::WrongPhase {
                action: #action,
                expected: GamePhase::#phase,
                actual: self.phase,
            });
        }
    };
    ast.block.stmts.insert(0, early_return);
    Ok(ast.into_token_stream())
}
