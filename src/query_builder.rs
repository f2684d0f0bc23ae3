use crate::models::query::StructuredQuery;

/// Build the PRTG API v2 `filter` parameter for a query target.
///
/// Clauses come out in a fixed order (type, status, group, device, kind_name,
/// tags, custom) so the same query always compiles to the same string. An empty
/// result means "match all".
pub fn build_filter(query: &StructuredQuery) -> String {
    let mut clauses: Vec<String> = [
        build_equality_filter("type", &query.object_types),
        build_equality_filter("status", &query.statuses),
        build_equality_filter("group", &query.groups),
        build_equality_filter("device", &query.devices),
        build_equality_filter("kind_name", &query.sensor_types),
        build_contains_filter("tags", &query.tags),
    ]
    .into_iter()
    .flatten()
    .collect();

    // Custom expressions are trusted query-language text; the upstream validates them.
    if let Some(custom) = query.filter.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
        clauses.push(format!("({custom})"));
    }

    clauses.join(" AND ")
}

/// `field = 'v'` for one value, `(field = 'a' OR field = 'b')` for several.
pub fn build_equality_filter(field: &str, values: &[String]) -> Option<String> {
    build_field_filter(field, "=", values)
}

/// Substring match, used for the tag list.
pub fn build_contains_filter(field: &str, values: &[String]) -> Option<String> {
    build_field_filter(field, "contains", values)
}

fn build_field_filter(field: &str, op: &str, values: &[String]) -> Option<String> {
    let clauses: Vec<String> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| format!("{field} {op} {}", quote_filter_value(v)))
        .collect();

    match clauses.len() {
        0 => None,
        1 => clauses.into_iter().next(),
        _ => Some(format!("({})", clauses.join(" OR "))),
    }
}

/// Single-quote a value, backslash-escaping `\` and `'`.
pub fn quote_filter_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}
