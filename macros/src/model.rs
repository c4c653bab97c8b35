use darling::{ast, FromDeriveInput, FromField};
use proc_macro2::TokenTree;
use quote::{format_ident, quote, ToTokens};
use syn::Meta;

#[derive(FromDeriveInput)]
#[darling(supports(struct_named), forward_attrs)]
struct ModelReceiver {
	ident: syn::Ident,

	generics: syn::Generics,

	data: ast::Data<(), FieldReceiver>,

	attrs: Vec<syn::Attribute>,
}

#[derive(FromField)]
#[darling(forward_attrs)]
struct FieldReceiver {
	ident: Option<syn::Ident>,

	ty: syn::Type,
	vis: syn::Visibility,

	attrs: Vec<syn::Attribute>,
}

pub fn expand(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = syn::parse_macro_input!(input as syn::DeriveInput);
	let model = match ModelReceiver::from_derive_input(&input) {
		Ok(model) => model,
		Err(e) => return e.write_errors().into(),
	};

	let vis = &input.vis;
	let generics = &model.generics;
	let create_ident = format_ident!("Create{}Input", model.ident);
	let update_ident = format_ident!("Update{}Input", model.ident);

	let attrs = &model.attrs;

	let fields = model.data.take_struct().expect("expected a named struct");
	let fields = fields
		.iter()
		.filter_map(|field| {
			let ident = field.ident.as_ref()?;

			// The id is server-assigned, and serde-skipped fields never
			// appear in request payloads.
			if ident == "id" || skipped(&field.attrs) {
				return None;
			}

			Some((&field.attrs, ident, &field.ty, &field.vis))
		})
		.collect::<Vec<_>>();

	let create_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: #ty,
		}
	});

	let update_fields = fields.iter().map(|(attrs, ident, ty, vis)| {
		quote! {
			#(#attrs)*
			#vis #ident: Option<#ty>,
		}
	});

	quote! {
		#input

		#(#attrs)*
		#vis struct #create_ident #generics {
			#(
				#create_fields
			)*
		}

		#(#attrs)*
		#vis struct #update_ident #generics {
			#(
				#update_fields
			)*
		}
	}
	.into()
}

/// Whether a field carries `#[serde(skip)]` or `#[serde(skip_deserializing)]`.
fn skipped(attrs: &[syn::Attribute]) -> bool {
	attrs.iter().any(|attr| {
		let Meta::List(ref list) = attr.meta else {
			return false;
		};

		if !list.path.is_ident("serde") {
			return false;
		}

		list.tokens.to_token_stream().into_iter().any(|token| {
			matches!(token, TokenTree::Ident(ref ident) if ident == "skip_deserializing" || ident == "skip")
		})
	})
}
