//! MySQL repository implementations.

mod category_repository;
mod product_repository;

pub use category_repository::*;
pub use product_repository::*;

use catalog_core::PageRequest;

/// Builds an `ORDER BY` clause from a page request.
///
/// `columns` maps domain property names onto column names. Unknown or missing
/// properties sort by `id`. The id is always the final tie-breaker so page
/// boundaries stay stable.
fn order_clause(page: &PageRequest, columns: &[(&str, &'static str)]) -> String {
    let column = page
        .order_by
        .as_deref()
        .and_then(|property| {
            columns
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(property))
                .map(|(_, column)| *column)
        })
        .unwrap_or("id");

    if column == "id" {
        format!("ORDER BY id {}", page.direction.as_sql())
    } else {
        format!("ORDER BY {column} {}, id ASC", page.direction.as_sql())
    }
}

/// Converts a page request into `LIMIT`/`OFFSET` bind values.
fn limit_offset(page: &PageRequest) -> (i64, i64) {
    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

fn to_count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
