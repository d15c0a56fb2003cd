//! Paged reads shared by the list repositories.

use sea_orm::{ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, Select};

use crate::errors::AppResult;
use crate::types::PaginationParams;

/// Fetch one page of `select` together with the total row count.
pub(super) async fn fetch_page<C, E>(
    db: &C,
    select: Select<E>,
    params: &PaginationParams,
) -> AppResult<(Vec<E::Model>, u64)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: FromQueryResult + Sized + Send + Sync,
{
    let paginator = select.paginate(db, params.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(params.page_index()).await?;
    Ok((data, total))
}
