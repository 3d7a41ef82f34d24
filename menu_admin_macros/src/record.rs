use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitStr};

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let collection = struct_attr(&input, "collection").unwrap_or_else(|| {
        // Default: snake_case struct name + "s"
        format!("{}s", to_snake_case(&name.to_string()))
    });
    let label = struct_attr(&input, "label").unwrap_or_else(|| "Item".to_string());

    let id_field = match marked_field(&input, "id", "id") {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let expanded = quote! {
        impl menu_admin::Record for #name {
            const COLLECTION: &'static str = #collection;
            const LABEL: &'static str = #label;

            fn id(&self) -> &str {
                &self.#id_field
            }
        }
    };

    TokenStream::from(expanded)
}

pub fn derive_ordered_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let position = match marked_field(&input, "position", "sort_order") {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };
    let active = match marked_field(&input, "active", "active") {
        Ok(field) => field,
        Err(err) => return err.to_compile_error().into(),
    };

    let position_name = LitStr::new(&position.to_string(), position.span());
    let active_name = LitStr::new(&active.to_string(), active.span());

    let expanded = quote! {
        impl menu_admin::OrderedRecord for #name {
            const POSITION_FIELD: &'static str = #position_name;
            const ACTIVE_FIELD: &'static str = #active_name;

            fn position(&self) -> u32 {
                self.#position
            }

            fn set_position(&mut self, position: u32) {
                self.#position = position;
            }

            fn is_active(&self) -> bool {
                self.#active
            }

            fn set_active(&mut self, active: bool) {
                self.#active = active;
            }
        }
    };

    TokenStream::from(expanded)
}

/// Reads `#[record(key = "...")]` from the struct-level attributes.
fn struct_attr(input: &DeriveInput, key: &str) -> Option<String> {
    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        let mut found = None;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(key) {
                let value: LitStr = meta.value()?.parse()?;
                found = Some(value.value());
            } else if meta.input.peek(syn::Token![=]) {
                // Skip values of keys we are not looking for.
                let _: LitStr = meta.value()?.parse()?;
            }
            Ok(())
        });

        if found.is_some() {
            return found;
        }
    }
    None
}

/// Finds the field tagged `#[record(marker)]`, falling back to a field named `fallback`.
fn marked_field(input: &DeriveInput, marker: &str, fallback: &str) -> syn::Result<Ident> {
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "record derives only support structs",
        ));
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "record derives need named fields",
        ));
    };

    for field in &fields.named {
        for attr in &field.attrs {
            if !attr.path().is_ident("record") {
                continue;
            }
            let mut tagged = false;
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident(marker) {
                    tagged = true;
                }
                Ok(())
            });
            if tagged {
                if let Some(ident) = &field.ident {
                    return Ok(ident.clone());
                }
            }
        }
    }

    for field in &fields.named {
        if let Some(ident) = &field.ident {
            if ident == fallback {
                return Ok(ident.clone());
            }
        }
    }

    Err(syn::Error::new(
        Span::call_site(),
        format!("no field marked with #[record({marker})] and no field named `{fallback}`"),
    ))
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, ch) in s.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}
