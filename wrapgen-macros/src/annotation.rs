//! Implementation of the `annotation` procedural macro
//!
//! This module turns a plain function over a catalog `Function` into a
//! unit struct implementing the `Annotation` trait.

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, ItemFn, PatType, ReturnType, parse_macro_input};

/// Transform a function into an annotation struct
///
/// This function takes a function definition and transforms it into:
/// 1. A unit struct with the same name in CamelCase
/// 2. An implementation of the Annotation trait for that struct
/// 3. The original function, unchanged, which the trait implementation calls
///
/// # Arguments
///
/// * `attr` - The attribute arguments (unused)
/// * `item` - The function to transform
///
/// # Returns
///
/// A TokenStream containing the generated code
pub fn handle_annotation(attr: TokenStream, item: TokenStream) -> TokenStream {
	let _ = attr;
	let input_fn = parse_macro_input!(item as ItemFn);

	let fn_name = &input_fn.sig.ident;
	// Only doc comments carry over to the generated struct
	let doc_attrs = input_fn.attrs.iter().filter(|attr| attr.path().is_ident("doc"));
	let fn_vis = &input_fn.vis;

	let struct_ident = format_ident!("{}", fn_name_to_struct_name(&fn_name.to_string()));

	validate_annotation_signature(&input_fn);

	let output = quote! {
		#(#doc_attrs)*
		#[derive(Debug, Clone, Copy, Default)]
		#fn_vis struct #struct_ident;

		impl #struct_ident {
			/// Create a new instance of this annotation
			#[must_use]
			pub const fn new() -> Self {
				Self
			}
		}

		impl ::wrapgen::Annotation for #struct_ident {
			fn apply(&self, func: &mut ::wrapgen::Function) -> ::wrapgen::AnnotationResult {
				#fn_name(func)
			}

			fn name(&self) -> &'static str {
				stringify!(#fn_name)
			}

			fn clone_box(&self) -> ::std::boxed::Box<dyn ::wrapgen::Annotation> {
				::std::boxed::Box::new(Self)
			}
		}

		#input_fn
	};

	output.into()
}

/// Convert a snake_case function name to a CamelCase struct name
fn fn_name_to_struct_name(name: &str) -> String {
	let mut result = String::new();
	for part in name.split('_') {
		let mut chars = part.chars();
		if let Some(first) = chars.next() {
			result.push_str(&first.to_uppercase().to_string());
			result.push_str(chars.as_str());
		}
	}
	result
}

/// Validate that the function has the correct signature for an annotation
///
/// An annotation must:
/// 1. Take exactly one argument: `&mut Function`
/// 2. Return `AnnotationResult`
/// 3. Not be generic
///
/// # Panics
///
/// Panics if the function does not have the correct signature
fn validate_annotation_signature(input_fn: &ItemFn) {
	if !input_fn.sig.generics.params.is_empty() {
		panic!("Annotation functions cannot be generic");
	}

	match &input_fn.sig.output {
		ReturnType::Default => {
			panic!("Annotation must return AnnotationResult");
		},
		ReturnType::Type(_, ty) => {
			let type_str = quote!(#ty).to_string();
			if !type_str.contains("AnnotationResult") {
				panic!("Annotation must return AnnotationResult, got {}", type_str);
			}
		},
	}

	if input_fn.sig.inputs.len() != 1 {
		panic!("Annotation must take exactly one argument: &mut Function");
	}

	let arg = input_fn.sig.inputs.first().unwrap();
	match arg {
		FnArg::Receiver(_) => {
			panic!("Annotation cannot be a method");
		},
		FnArg::Typed(PatType { ty, .. }) => {
			let ty_str = quote!(#ty).to_string();

			if !(ty_str.contains('&') && ty_str.contains("mut") && ty_str.contains("Function")) {
				panic!("Annotation argument must be &mut Function, got {}", ty_str);
			}
		},
	}
}

#[cfg(test)]
mod tests {
	use super::fn_name_to_struct_name;

	#[test]
	fn struct_names_are_camel_case() {
		assert_eq!(fn_name_to_struct_name("va_list_passthrough"), "VaListPassthrough");
		assert_eq!(fn_name_to_struct_name("nomap_nolog_variant"), "NomapNologVariant");
		assert_eq!(fn_name_to_struct_name("_leading"), "Leading");
	}
}
