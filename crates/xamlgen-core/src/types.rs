//! Type descriptor resolution.
//!
//! Raw type descriptors come from the host project's code model and may be
//! namespace-qualified (`System.Int32`), nullable (`int?`,
//! `System.Nullable<System.DateTime>`) or generic
//! (`System.Collections.Generic.List<MyApp.Models.Tag>`). Resolution reduces
//! them to the short spelling used in generated source.

/// Primitive value types, in both keyword and framework spellings.
const VALUE_TYPES: &[&str] = &[
    "bool", "Boolean",
    "byte", "Byte", "sbyte", "SByte",
    "char", "Char",
    "short", "Int16", "ushort", "UInt16",
    "int", "Int32", "uint", "UInt32",
    "long", "Int64", "ulong", "UInt64",
    "float", "Single", "double", "Double", "decimal", "Decimal",
    "DateTime", "DateTimeOffset", "DateOnly", "TimeOnly", "TimeSpan",
    "Guid",
];

/// Result of resolving a raw type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedType {
    /// Short type name with qualification stripped, without the nullable marker.
    pub canonical: String,
    /// Whether the descriptor was `?`-suffixed or wrapped in `Nullable<>`.
    pub nullable: bool,
    /// Whether the canonical name is one of the primitive value types.
    pub value_type: bool,
}

impl ResolvedType {
    /// Spelling to use in generated source, including the nullable marker.
    pub fn source_name(&self) -> String {
        if self.nullable {
            format!("{}?", self.canonical)
        } else {
            self.canonical.clone()
        }
    }

    /// Whether this is a nullable value type such as `int?`.
    pub fn is_nullable_value_type(&self) -> bool {
        self.nullable && self.value_type
    }
}

/// Resolve a raw type descriptor.
///
/// Never fails: an unknown name is treated as a reference type, and an empty
/// descriptor resolves to `object`.
pub fn resolve_type(raw: &str) -> ResolvedType {
    let (inner, nullable) = strip_nullable(raw.trim());
    let canonical = canonicalize(inner);
    let value_type = VALUE_TYPES.contains(&canonical.as_str());

    ResolvedType {
        canonical,
        nullable,
        value_type,
    }
}

/// Whether a canonical name is a primitive value type.
pub fn is_value_type_name(canonical: &str) -> bool {
    VALUE_TYPES.contains(&canonical)
}

fn strip_nullable(raw: &str) -> (&str, bool) {
    if let Some(inner) = raw.strip_suffix('?') {
        return (inner.trim_end(), true);
    }

    let unglobal = raw.strip_prefix("global::").unwrap_or(raw);
    for prefix in ["System.Nullable<", "Nullable<"] {
        if let Some(inner) = unglobal
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix('>'))
        {
            return (inner.trim(), true);
        }
    }

    (raw, false)
}

fn canonicalize(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "object".to_string();
    }

    if let Some(element) = raw.strip_suffix("[]") {
        return format!("{}[]", canonicalize(element));
    }

    match raw.find('<') {
        Some(open) if raw.ends_with('>') => {
            let head = last_segment(&raw[..open]);
            let args: Vec<String> = split_generic_args(&raw[open + 1..raw.len() - 1])
                .into_iter()
                .map(|arg| resolve_type(arg).source_name())
                .collect();
            format!("{}<{}>", head, args.join(", "))
        }
        _ => last_segment(raw).to_string(),
    }
}

fn last_segment(qualified: &str) -> &str {
    let qualified = qualified.strip_prefix("global::").unwrap_or(qualified);
    qualified.rsplit('.').next().unwrap_or(qualified).trim()
}

/// Split generic arguments on top-level commas.
fn split_generic_args(args: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, ch) in args.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(args[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(args[start..].trim());
    parts
}
