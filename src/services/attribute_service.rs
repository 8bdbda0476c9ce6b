use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType, LoaderTrait, Order,
    PaginatorTrait, QueryFilter, QuerySelect, RelationTrait, Select,
};

use crate::dto::attributes::{AttributeList, AttributeValueList, ProductAttributeList};
use crate::{
    entity::{
        attribute_values::{self, Entity as AttributeValues},
        attributes::{self, Entity as Attributes},
        product_attributes::{self, Entity as ProductAttributes, Relation},
    },
    error::AppResult,
    models::{Attribute, AttributeValue, ProductAttribute},
    query::ListSpec,
    response::{ApiResponse, Meta},
    routes::params::{AttributeKeyFilter, AttributeValueFilter, ListParams, Pagination},
    state::AppState,
};

fn key_spec() -> ListSpec {
    ListSpec::new()
        .search_on((Attributes, attributes::Column::AttributeName))
        .order_on("attribute_name", (Attributes, attributes::Column::AttributeName))
        .default_order((Attributes, attributes::Column::Id), Order::Asc)
}

fn value_spec() -> ListSpec {
    ListSpec::new()
        .search_on((AttributeValues, attribute_values::Column::AttributeValue))
        .order_on(
            "attribute_value",
            (AttributeValues, attribute_values::Column::AttributeValue),
        )
        .default_order((AttributeValues, attribute_values::Column::Id), Order::Asc)
}

/// Search and ordering reach through to the key and value tables.
fn product_attribute_spec() -> ListSpec {
    ListSpec::new()
        .search_on((Attributes, attributes::Column::AttributeName))
        .search_on((AttributeValues, attribute_values::Column::AttributeValue))
        .order_on("key", (Attributes, attributes::Column::AttributeName))
        .order_on(
            "value",
            (AttributeValues, attribute_values::Column::AttributeValue),
        )
        .default_order((ProductAttributes, product_attributes::Column::Id), Order::Asc)
}

fn product_attribute_select(product_id: i32, params: &ListParams) -> Select<ProductAttributes> {
    let select = ProductAttributes::find()
        .join(JoinType::InnerJoin, Relation::Attributes.def())
        .join(JoinType::InnerJoin, Relation::AttributeValues.def())
        .filter(product_attributes::Column::ProductId.eq(product_id));
    product_attribute_spec().apply(select, params)
}

/// Attributes of one product with key and value rows loaded in two batched
/// queries. `window` is `(limit, offset)`.
pub(crate) async fn load_product_attributes<C>(
    db: &C,
    product_id: i32,
    params: &ListParams,
    window: Option<(u64, u64)>,
) -> AppResult<Vec<ProductAttribute>>
where
    C: ConnectionTrait,
{
    let mut select = product_attribute_select(product_id, params);
    if let Some((limit, offset)) = window {
        select = select.limit(limit).offset(offset);
    }
    let rows = select.all(db).await?;
    let keys = rows.load_one(Attributes, db).await?;
    let values = rows.load_one(AttributeValues, db).await?;

    let items = rows
        .into_iter()
        .zip(keys)
        .zip(values)
        .filter_map(|((row, key), value)| {
            Some(ProductAttribute {
                id: row.id,
                product_id: row.product_id,
                key: Attribute::from(key?),
                value: AttributeValue::from(value?),
            })
        })
        .collect();
    Ok(items)
}

pub async fn list_product_attributes(
    state: &AppState,
    product_id: i32,
    pagination: Pagination,
    params: ListParams,
) -> AppResult<ApiResponse<ProductAttributeList>> {
    let (_, limit, offset) = pagination.normalize();
    let total = product_attribute_select(product_id, &params)
        .count(&state.orm)
        .await?;
    let items = load_product_attributes(
        &state.orm,
        product_id,
        &params,
        Some((limit as u64, offset as u64)),
    )
    .await?;

    let meta = Meta::paged(&pagination, total);
    Ok(ApiResponse::success(
        "Product attributes",
        ProductAttributeList { items },
        Some(meta),
    ))
}

pub async fn list_attribute_keys(
    state: &AppState,
    pagination: Pagination,
    params: ListParams,
    filter: AttributeKeyFilter,
) -> AppResult<ApiResponse<AttributeList>> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(name) = filter.attribute_name.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(attributes::Column::AttributeName.eq(name.clone()));
    }

    let finder = key_spec().apply(Attributes::find().filter(condition), &params);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Attribute::from)
        .collect();

    let meta = Meta::paged(&pagination, total);
    Ok(ApiResponse::success(
        "Attribute keys",
        AttributeList { items },
        Some(meta),
    ))
}

pub async fn list_attribute_values(
    state: &AppState,
    pagination: Pagination,
    params: ListParams,
    filter: AttributeValueFilter,
) -> AppResult<ApiResponse<AttributeValueList>> {
    let (_, limit, offset) = pagination.normalize();

    let mut condition = Condition::all();
    if let Some(value) = filter.attribute_value.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(attribute_values::Column::AttributeValue.eq(value.clone()));
    }

    let finder = value_spec().apply(AttributeValues::find().filter(condition), &params);
    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(AttributeValue::from)
        .collect();

    let meta = Meta::paged(&pagination, total);
    Ok(ApiResponse::success(
        "Attribute values",
        AttributeValueList { items },
        Some(meta),
    ))
}
