use contracts::shared::pagination::{Page, PageParams};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect, Select};

/// Run `query` for one page and convert the rows into aggregates
pub async fn fetch_page<E, C, T>(
    conn: &C,
    query: Select<E>,
    params: &PageParams,
) -> anyhow::Result<Page<T>>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
    T: TryFrom<E::Model, Error = anyhow::Error>,
{
    let count = query.clone().count(conn).await?;
    let rows = query
        .offset(params.offset())
        .limit(params.limit())
        .all(conn)
        .await?;
    let results = rows
        .into_iter()
        .map(T::try_from)
        .collect::<anyhow::Result<Vec<T>>>()?;
    Ok(Page::new(count, results))
}

/// Run `query` without paging
pub async fn fetch_all<E, C, T>(conn: &C, query: Select<E>) -> anyhow::Result<Vec<T>>
where
    E: EntityTrait,
    C: ConnectionTrait,
    T: TryFrom<E::Model, Error = anyhow::Error>,
{
    query
        .all(conn)
        .await?
        .into_iter()
        .map(T::try_from)
        .collect()
}
