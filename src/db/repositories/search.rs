//! Case-insensitive substring search.
//!
//! SQLite's `lower()` and `LIKE` fold ASCII only, so searchable columns keep
//! a shadow copy folded here on write, and the term is folded the same way.

use sea_orm::sea_query::LikeExpr;

const ESCAPE: char = '\\';

/// Unicode lowercase form stored in the `*_folded` columns.
#[must_use]
pub fn fold(value: &str) -> String {
    value.to_lowercase()
}

/// `LIKE` pattern matching `term` literally anywhere in a folded column.
#[must_use]
pub fn contains(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(&fold(term)))).escape(ESCAPE)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            escaped.push(ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}
