mod model;
mod route;

use proc_macro::TokenStream;

/// Generates an aide documentation function for the annotated handler, named
/// after it with a `_docs` suffix. The first line of the handler's doc
/// comment becomes the operation summary and the remaining lines the
/// description.
#[proc_macro_attribute]
pub fn route(args: TokenStream, input: TokenStream) -> TokenStream {
	route::expand(args, input)
}

/// Generates `Create<Model>Input` and `Update<Model>Input` structs next to
/// the annotated model. The `id` field and any field marked with
/// `#[serde(skip)]` or `#[serde(skip_deserializing)]` are left out; the
/// update struct wraps every field in `Option`.
#[proc_macro_attribute]
pub fn model(_args: TokenStream, input: TokenStream) -> TokenStream {
	model::expand(input)
}
