//! Declarative list configuration shared by the list endpoints.
//!
//! A [`ListSpec`] names the columns an endpoint searches and the public field
//! names it may be ordered by. Exact-match filters stay typed in each service
//! because their value types differ per endpoint.

use sea_orm::{
    Condition, Order, QueryFilter, QueryOrder,
    sea_query::{Alias, ColumnRef, Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};

use crate::routes::params::ListParams;

const LIKE_ESCAPE: char = '!';

/// Makes `%` and `_` in user input match literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

#[derive(Debug, Clone, Default)]
pub struct ListSpec {
    search: Vec<ColumnRef>,
    ordering: Vec<(&'static str, ColumnRef)>,
    default_order: Vec<(ColumnRef, Order)>,
}

impl ListSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_on(mut self, column: impl IntoColumnRef) -> Self {
        self.search.push(column.into_column_ref());
        self
    }

    pub fn order_on(mut self, field: &'static str, column: impl IntoColumnRef) -> Self {
        self.ordering.push((field, column.into_column_ref()));
        self
    }

    /// Ordering used when the request names no known field.
    pub fn default_order(mut self, column: impl IntoColumnRef, order: Order) -> Self {
        self.default_order.push((column.into_column_ref(), order));
        self
    }

    /// OR of case-insensitive substring matches over every search column.
    /// Non-text columns are compared on their text form.
    pub fn search_condition(&self, term: &str) -> Option<Condition> {
        let term = term.trim();
        if term.is_empty() || self.search.is_empty() {
            return None;
        }
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        let condition = self.search.iter().fold(Condition::any(), |cond, column| {
            let text = Expr::col(column.clone()).cast_as(Alias::new("TEXT"));
            let like = LikeExpr::new(pattern.clone()).escape(LIKE_ESCAPE);
            cond.add(Expr::expr(Func::lower(text)).like(like))
        });
        Some(condition)
    }

    /// Parses `name,-price` style ordering. Unknown fields are ignored.
    pub fn order_terms(&self, raw: Option<&str>) -> Vec<(ColumnRef, Order)> {
        let requested: Vec<(ColumnRef, Order)> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .filter_map(|field| {
                let (name, order) = match field.strip_prefix('-') {
                    Some(name) => (name, Order::Desc),
                    None => (field, Order::Asc),
                };
                self.ordering
                    .iter()
                    .find(|(allowed, _)| *allowed == name)
                    .map(|(_, column)| (column.clone(), order))
            })
            .collect();

        if requested.is_empty() {
            self.default_order.clone()
        } else {
            requested
        }
    }

    pub fn apply<S>(&self, select: S, params: &ListParams) -> S
    where
        S: QueryFilter + QueryOrder,
    {
        let mut select = select;
        if let Some(condition) = params
            .search
            .as_deref()
            .and_then(|term| self.search_condition(term))
        {
            select = select.filter(condition);
        }
        for (column, order) in self.order_terms(params.ordering.as_deref()) {
            select = select.order_by(SimpleExpr::Column(column), order);
        }
        select
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, EntityTrait, QueryTrait};

    use super::*;
    use crate::entity::products::{self, Entity as Products};

    fn product_spec() -> ListSpec {
        ListSpec::new()
            .search_on((Products, products::Column::ProductName))
            .search_on((Products, products::Column::Price))
            .order_on("product_name", (Products, products::Column::ProductName))
            .order_on("price", (Products, products::Column::Price))
            .default_order((Products, products::Column::Id), Order::Asc)
    }

    #[test]
    fn blank_search_adds_no_condition() {
        assert!(product_spec().search_condition("   ").is_none());
        assert!(ListSpec::new().search_condition("phone").is_none());
    }

    #[test]
    fn search_matches_any_column_case_insensitively() {
        let sql = product_spec()
            .apply(Products::find(), &ListParams::search("PhOnE"))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("LOWER(CAST(\"products\".\"product_name\" AS TEXT)) LIKE '%phone%' ESCAPE '!'"));
        assert!(sql.contains("LOWER(CAST(\"products\".\"price\" AS TEXT)) LIKE '%phone%' ESCAPE '!'"));
        assert!(sql.contains(" OR "));
    }

    #[test]
    fn wildcards_in_search_match_literally() {
        assert_eq!(escape_like("50%_off!"), "50!%!_off!!");

        let sql = product_spec()
            .apply(Products::find(), &ListParams::search("%"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains("LIKE '%!%%' ESCAPE '!'"));
    }

    #[test]
    fn ordering_honours_direction_and_skips_unknown_fields() {
        let terms = product_spec().order_terms(Some("-price, bogus ,product_name"));
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].1, Order::Desc);
        assert_eq!(terms[1].1, Order::Asc);

        let sql = product_spec()
            .apply(Products::find(), &ListParams::ordered_by("-price"))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("ORDER BY \"products\".\"price\" DESC"));
    }

    #[test]
    fn unknown_ordering_falls_back_to_default() {
        let terms = product_spec().order_terms(Some("stock"));
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].1, Order::Asc);
        assert!(product_spec().order_terms(None).len() == 1);
    }
}
