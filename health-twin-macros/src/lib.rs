use proc_macro::TokenStream;
use quote::quote;
use syn::{
    meta::ParseNestedMeta, parse_macro_input, Attribute, Data, DeriveInput, Fields,
    GenericArgument, Lit, PathArguments, Type,
};

/// Derives `health_twin_sdk::WorkflowDefinition` for a page's argument struct.
///
/// The struct carries `#[workflow(id, name, description)]`; each field may carry
/// `#[field(label, description, type, min, max, pattern, options)]`. Fields
/// named `workflow_metadata` are skipped.
#[proc_macro_derive(WorkflowDefinition, attributes(workflow, field))]
pub fn derive_workflow_definition(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let page = match extract_workflow_meta(&input.attrs) {
        Ok(meta) => meta,
        Err(e) => return e.to_compile_error().into(),
    };

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    &input.ident,
                    "WorkflowDefinition only supports structs with named fields",
                )
                .to_compile_error()
                .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(&input.ident, "WorkflowDefinition only supports structs")
                .to_compile_error()
                .into()
        }
    };

    let field_schemas: Vec<proc_macro2::TokenStream> = named
        .iter()
        .filter_map(|f| {
            let ident = f.ident.as_ref()?;
            let name = ident.to_string();
            if name == "workflow_metadata" {
                return None;
            }

            let meta = extract_field_meta(&f.attrs);
            let field_type = meta
                .field_type_tokens()
                .unwrap_or_else(|| infer_field_type(&f.ty));
            let label = meta.label.unwrap_or_else(|| name.replace('_', " "));
            let description = meta.description.unwrap_or_default();
            let cli_arg = extract_cli_arg(&f.attrs, &name);
            let required = !is_optional_type(&f.ty) && !has_default(&f.attrs);
            let default = extract_default(&f.attrs);

            Some(quote! {
                health_twin_sdk::FieldSchema {
                    name: #name.to_string(),
                    field_type: #field_type,
                    label: #label.to_string(),
                    description: #description.to_string(),
                    cli_arg: #cli_arg.to_string(),
                    required: #required,
                    default: #default,
                }
            })
        })
        .collect();

    let struct_name = &input.ident;
    let id = &page.id;
    let name = &page.name;
    let description = &page.description;

    let expanded = quote! {
        impl health_twin_sdk::WorkflowDefinition for #struct_name {
            fn metadata() -> health_twin_sdk::WorkflowMetadata {
                health_twin_sdk::WorkflowMetadata {
                    id: #id.to_string(),
                    name: #name.to_string(),
                    description: #description.to_string(),
                }
            }

            fn fields() -> Vec<health_twin_sdk::FieldSchema> {
                vec![#(#field_schemas),*]
            }
        }
    };

    TokenStream::from(expanded)
}

struct WorkflowMeta {
    id: String,
    name: String,
    description: String,
}

fn string_value(meta: &ParseNestedMeta) -> syn::Result<Option<String>> {
    let lit: Lit = meta.value()?.parse()?;
    Ok(match lit {
        Lit::Str(s) => Some(s.value()),
        _ => None,
    })
}

fn extract_workflow_meta(attrs: &[Attribute]) -> syn::Result<WorkflowMeta> {
    let attr = attrs
        .iter()
        .find(|a| a.path().is_ident("workflow"))
        .ok_or_else(|| {
            syn::Error::new(
                proc_macro2::Span::call_site(),
                "missing #[workflow(id = \"..\", name = \"..\", description = \"..\")] attribute",
            )
        })?;

    let mut id = String::new();
    let mut name = String::new();
    let mut description = String::new();

    attr.parse_nested_meta(|meta| {
        let value = string_value(&meta)?.unwrap_or_default();
        if meta.path.is_ident("id") {
            id = value;
        } else if meta.path.is_ident("name") {
            name = value;
        } else if meta.path.is_ident("description") {
            description = value;
        }
        Ok(())
    })?;

    if id.is_empty() {
        return Err(syn::Error::new_spanned(attr, "#[workflow] requires a non-empty `id`"));
    }

    Ok(WorkflowMeta { id, name, description })
}

#[derive(Default)]
struct FieldMeta {
    label: Option<String>,
    description: Option<String>,
    field_type: Option<String>,
    min: Option<i64>,
    max: Option<i64>,
    pattern: Option<String>,
    options: Vec<String>,
}

impl FieldMeta {
    fn field_type_tokens(&self) -> Option<proc_macro2::TokenStream> {
        let kind = self.field_type.as_deref()?;
        let options = &self.options;
        Some(match kind {
            "number" => {
                let min = option_tokens(self.min);
                let max = option_tokens(self.max);
                quote! { health_twin_sdk::FieldType::Number { min: #min, max: #max } }
            }
            "file_path" => {
                let pattern = match &self.pattern {
                    Some(p) => quote! { Some(#p.to_string()) },
                    None => quote! { None },
                };
                quote! { health_twin_sdk::FieldType::FilePath { pattern: #pattern } }
            }
            "select" => quote! {
                health_twin_sdk::FieldType::Select {
                    options: vec![#(#options.to_string()),*],
                }
            },
            "multi_select" => quote! {
                health_twin_sdk::FieldType::MultiSelect {
                    options: vec![#(#options.to_string()),*],
                }
            },
            _ => quote! { health_twin_sdk::FieldType::Text },
        })
    }
}

fn option_tokens(value: Option<i64>) -> proc_macro2::TokenStream {
    match value {
        Some(v) => quote! { Some(#v) },
        None => quote! { None },
    }
}

fn extract_field_meta(attrs: &[Attribute]) -> FieldMeta {
    let mut meta_out = FieldMeta::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("field")) {
        let _ = attr.parse_nested_meta(|meta| {
            let value = string_value(&meta)?;
            let Some(value) = value else {
                return Ok(());
            };

            if meta.path.is_ident("label") {
                meta_out.label = Some(value);
            } else if meta.path.is_ident("description") {
                meta_out.description = Some(value);
            } else if meta.path.is_ident("type") {
                meta_out.field_type = Some(value);
            } else if meta.path.is_ident("min") {
                meta_out.min = value.parse().ok();
            } else if meta.path.is_ident("max") {
                meta_out.max = value.parse().ok();
            } else if meta.path.is_ident("pattern") {
                meta_out.pattern = Some(value);
            } else if meta.path.is_ident("options") {
                meta_out.options = value
                    .split('|')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect();
            }
            Ok(())
        });
    }

    meta_out
}

/// Finds `#[arg(long)]` / `#[arg(long = "..")]` and returns the flag as typed on the command line.
fn extract_cli_arg(attrs: &[Attribute], field_name: &str) -> String {
    for attr in attrs.iter().filter(|a| a.path().is_ident("arg")) {
        let mut long_name = None;

        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("long") {
                long_name = match meta.value() {
                    Ok(value) => match value.parse::<Lit>()? {
                        Lit::Str(s) => Some(s.value()),
                        _ => None,
                    },
                    Err(_) => Some(field_name.replace('_', "-")),
                };
            } else if meta.input.peek(syn::Token![=]) {
                // Consume values of unrelated keys (short = 'x', default_value = "..").
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });

        if let Some(name) = long_name {
            return format!("--{}", name);
        }
    }

    format!("--{}", field_name.replace('_', "-"))
}

fn arg_default(attrs: &[Attribute]) -> Option<String> {
    let mut default_value = None;

    for attr in attrs.iter().filter(|a| a.path().is_ident("arg")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default_value") {
                if let Lit::Str(s) = meta.value()?.parse::<Lit>()? {
                    default_value = Some(s.value());
                }
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });
    }

    default_value
}

fn has_default(attrs: &[Attribute]) -> bool {
    arg_default(attrs).is_some()
}

fn extract_default(attrs: &[Attribute]) -> proc_macro2::TokenStream {
    match arg_default(attrs) {
        Some(val) => quote! { Some(#val.to_string()) },
        None => quote! { None },
    }
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(type_path) => type_path.path.segments.last(),
        _ => None,
    }
}

fn infer_field_type(ty: &Type) -> proc_macro2::TokenStream {
    let inner = last_segment(ty)
        .filter(|segment| segment.ident == "Option" || segment.ident == "Vec")
        .and_then(|segment| match &segment.arguments {
            PathArguments::AngleBracketed(args) => match args.args.first() {
                Some(GenericArgument::Type(inner_ty)) => Some(inner_ty),
                _ => None,
            },
            _ => None,
        })
        .unwrap_or(ty);

    let type_name = last_segment(inner)
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default();

    match type_name.as_str() {
        "PathBuf" => quote! { health_twin_sdk::FieldType::FilePath { pattern: None } },
        "u8" | "u16" | "u32" | "u64" | "usize" | "i32" | "i64" | "f32" | "f64" => {
            quote! { health_twin_sdk::FieldType::Number { min: None, max: None } }
        }
        _ => quote! { health_twin_sdk::FieldType::Text },
    }
}

/// `Option<T>`, `Vec<T>` and `bool` fields never block submission.
fn is_optional_type(ty: &Type) -> bool {
    last_segment(ty)
        .map(|segment| {
            segment.ident == "Option" || segment.ident == "Vec" || segment.ident == "bool"
        })
        .unwrap_or(false)
}
