use proc_macro::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, ItemFn, ReturnType};

/// Turns a workload function into a complete benchmark program.
///
/// The annotated function is kept as-is (but never inlined, so that its code stays recognizable in
/// a disassembly listing), and a `riscv-rt` entry point is generated which configures the PMU,
/// snapshots the counters around a single call of the function, and then exits with the results
/// in registers `s2` to `s10`. See `hpmbench_cva6::run_benchmark`.
///
/// ```ignore
/// #[hpmbench_proc_macros::benchmark]
/// fn workload() {
///     // Code to measure.
/// }
/// ```
///
/// The function must take no arguments, return `()`, and must not be generic, `async` or named
/// `main` (the generated entry point uses that name). The attribute takes no arguments.
#[proc_macro_attribute]
pub fn benchmark(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand_benchmark(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_benchmark(
    attr: proc_macro2::TokenStream,
    item: proc_macro2::TokenStream,
) -> syn::Result<proc_macro2::TokenStream> {
    if !attr.is_empty() {
        return Err(syn::Error::new(
            attr.span(),
            "#[benchmark] does not take any arguments",
        ));
    }
    let workload: ItemFn = syn::parse2(item)?;
    let sig = &workload.sig;
    if sig.ident == "main" {
        return Err(syn::Error::new(
            sig.ident.span(),
            "a #[benchmark] function can't be named `main`, that name is used by the generated \
             entry point",
        ));
    }
    if !sig.inputs.is_empty() {
        return Err(syn::Error::new(
            sig.inputs.span(),
            "a #[benchmark] function must not take any arguments",
        ));
    }
    if !sig.generics.params.is_empty() || sig.generics.where_clause.is_some() {
        return Err(syn::Error::new(
            sig.generics.span(),
            "a #[benchmark] function must not be generic",
        ));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new(
            asyncness.span(),
            "a #[benchmark] function must not be async",
        ));
    }
    if let ReturnType::Type(_, ty) = &sig.output {
        return Err(syn::Error::new(
            ty.span(),
            "a #[benchmark] function must return `()`",
        ));
    }

    let ident = &sig.ident;
    Ok(quote! {
        #[inline(never)]
        #workload

        #[::hpmbench_cva6::entry]
        fn main() -> ! {
            ::hpmbench_cva6::run_benchmark(&mut #ident)
        }
    })
}
