use proc_macro::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{FnArg, GenericParam, ItemFn, ReturnType, parse_macro_input};

/// 计时宏：把函数体移到私有的包装函数中，用 `log::debug!` 记录耗时
///
/// 只用于自由函数（同步或异步），调用方需要依赖 `log`。
#[proc_macro_attribute]
pub fn timing(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input_fn = parse_macro_input!(item as ItemFn);
    let fn_name = &input_fn.sig.ident;
    let wrapped_fn_name = format_ident!("{}_wrapped", fn_name);
    let vis = &input_fn.vis;
    let sig = &input_fn.sig;
    let is_async = sig.asyncness.is_some();
    let block = &input_fn.block;
    let attrs = &input_fn.attrs;

    if let Some(FnArg::Receiver(receiver)) = sig.inputs.first() {
        return syn::Error::new_spanned(receiver, "#[timing] does not support methods")
            .to_compile_error()
            .into();
    }

    let generic_params: Vec<&GenericParam> = sig.generics.params.iter().collect();
    let where_clause = sig
        .generics
        .where_clause
        .as_ref()
        .map(|wc| quote! { #wc })
        .unwrap_or_default();

    // 调用包装函数时只需要参数名
    let arg_patterns: Vec<proc_macro2::TokenStream> = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(pat_type.pat.to_token_stream()),
            FnArg::Receiver(_) => None,
        })
        .collect();
    let fn_inputs: Vec<&FnArg> = sig.inputs.iter().collect();

    let return_type = match &sig.output {
        ReturnType::Default => quote! { () },
        ReturnType::Type(_, ty) => ty.to_token_stream(),
    };

    let (call, asyncness) = if is_async {
        (quote! { #wrapped_fn_name(#(#arg_patterns),*).await }, quote! { async })
    } else {
        (quote! { #wrapped_fn_name(#(#arg_patterns),*) }, quote! {})
    };

    let output = quote! {
        #(#attrs)*
        #vis #sig {
            let start_time = std::time::Instant::now();
            let result = #call;
            log::debug!("Function `{}` executed in {:?}", stringify!(#fn_name), start_time.elapsed());
            result
        }

        #asyncness fn #wrapped_fn_name<#(#generic_params),*>(
            #(#fn_inputs),*
        ) -> #return_type #where_clause {
            #block
        }
    };

    TokenStream::from(output)
}
