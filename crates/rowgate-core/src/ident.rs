//! CQL identifier rendering.
//!
//! Every keyspace, table and column name that ends up in statement text goes
//! through [`quote`], so arbitrary client-supplied names can never change the
//! shape of a statement.

use std::borrow::Cow;

/// Words that must be quoted even when they look like plain identifiers.
const RESERVED: &[&str] = &[
    "add", "allow", "alter", "and", "apply", "asc", "authorize", "batch", "begin", "by",
    "columnfamily", "create", "delete", "desc", "describe", "drop", "entries", "execute", "from",
    "full", "grant", "if", "in", "index", "infinity", "insert", "into", "is", "keyspace", "limit",
    "materialized", "mbean", "mbeans", "modify", "nan", "norecursive", "not", "null", "of", "on",
    "or", "order", "primary", "rename", "replace", "revoke", "schema", "select", "set", "table",
    "to", "token", "truncate", "unlogged", "unset", "update", "use", "using", "view", "where",
    "with",
];

/// Returns true when `name` can be written without quotes.
pub fn is_unquoted_safe(name: &str) -> bool {
    let mut bytes = name.bytes();
    let starts_ok = matches!(bytes.next(), Some(b'a'..=b'z'));
    starts_ok
        && bytes.all(|b| matches!(b, b'a'..=b'z' | b'0'..=b'9' | b'_'))
        && !RESERVED.contains(&name)
}

/// Renders `name` as a CQL identifier, quoting it when needed.
///
/// Case is preserved: `userId` is rendered as `"userId"`.
pub fn quote(name: &str) -> Cow<'_, str> {
    if is_unquoted_safe(name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

/// Renders `keyspace.table`.
pub fn qualified(keyspace: &str, table: &str) -> String {
    format!("{}.{}", quote(keyspace), quote(table))
}
