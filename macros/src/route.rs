use darling::{ast, FromMeta};
use proc_macro::TokenStream;
use quote::{format_ident, quote};

#[derive(FromMeta)]
struct RouteArgs {
	#[darling(multiple)]
	tag: Vec<syn::Expr>,
	#[darling(multiple)]
	response: Vec<ResponseArgs>,
}

#[derive(FromMeta)]
struct ResponseArgs {
	status: syn::LitInt,
	shape: Option<syn::Type>,
	description: Option<String>,
}

pub fn expand(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = match ast::NestedMeta::parse_meta_list(args.into()) {
		Ok(args) => args,
		Err(e) => return e.into_compile_error().into(),
	};

	let args = match RouteArgs::from_list(&args) {
		Ok(args) => args,
		Err(e) => return e.write_errors().into(),
	};

	let function = syn::parse_macro_input!(input as syn::ItemFn);
	let (summary, description) = doc_sections(&function.attrs);

	let docs_fn = format_ident!("{}_docs", function.sig.ident);
	let vis = &function.vis;

	let tags = args.tag.iter();
	let responses = args.response.into_iter().map(|response| {
		let status = response.status;
		let shape = response
			.shape
			.map_or_else(|| quote!(()), |shape| quote!(#shape));

		match response.description {
			Some(description) => quote! {
				.response_with::<#status, #shape, _>(|res| res.description(#description))
			},
			None => quote! {
				.response::<#status, #shape>()
			},
		}
	});

	quote! {
		#function

		#vis fn #docs_fn(op: aide::transform::TransformOperation) -> aide::transform::TransformOperation {
			op.summary(#summary).description(#description)
				#(
					.tag(#tags)
				)*
				#(
					#responses
				)*
		}
	}
	.into()
}

/// Splits a doc comment into an operation summary (the first line) and a
/// description (everything after it, possibly empty).
fn doc_sections(attrs: &[syn::Attribute]) -> (String, String) {
	let mut lines = String::new();

	for attr in attrs {
		let syn::Meta::NameValue(ref pair) = attr.meta else {
			continue;
		};

		if !pair.path.is_ident("doc") {
			continue;
		}

		if let syn::Expr::Lit(syn::ExprLit {
			lit: syn::Lit::Str(ref text),
			..
		}) = pair.value
		{
			// Trim lines the way rustdoc renders them
			lines += text.value().trim();
			lines += "\n";
		}
	}

	let lines = lines.trim();
	let (summary, description) = lines.split_once('\n').unwrap_or((lines, ""));

	(summary.to_owned(), description.trim().to_owned())
}
