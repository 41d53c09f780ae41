use sea_orm::{ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Select};
use serde::{Deserialize, Serialize};

/// Largest page size a client may request.
pub const MAX_PER_PAGE: u64 = 100;
/// Default page size for most listings.
pub const DEFAULT_PER_PAGE: u64 = 15;

/// `?page=&per_page=` query parameters. Missing or zero values fall back to defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl PaginationQuery {
    /// 1-based page number.
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.filter(|p| *p > 0).unwrap_or(1)
    }

    /// Page size, capped at [`MAX_PER_PAGE`].
    #[must_use]
    pub fn per_page(&self, default: u64) -> u64 {
        self.per_page
            .filter(|n| *n > 0)
            .unwrap_or(default)
            .min(MAX_PER_PAGE)
    }
}

/// Paginated list envelope.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub last_page: u64,
}

impl<T> PaginatedResponse<T> {
    /// Run `select` one page at a time and wrap the requested page.
    ///
    /// # Errors
    ///
    /// Returns an error if the count or page query fails.
    pub async fn fetch<'db, E, C>(
        conn: &'db C,
        select: Select<E>,
        query: PaginationQuery,
        default_per_page: u64,
    ) -> Result<Self, DbErr>
    where
        E: EntityTrait<Model = T>,
        T: FromQueryResult + Sized + Send + Sync + 'db,
        C: ConnectionTrait,
    {
        let page = query.page();
        let per_page = query.per_page(default_per_page);

        let paginator = select.paginate(conn, per_page);
        let counts = paginator.num_items_and_pages().await?;
        let data = paginator.fetch_page(page - 1).await?;

        Ok(Self {
            data,
            total: counts.number_of_items,
            page,
            per_page,
            last_page: counts.number_of_pages.max(1),
        })
    }

    /// Transform every item while keeping the paging metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = PaginationQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(DEFAULT_PER_PAGE), 15);
        assert_eq!(query.per_page(10), 10);
    }

    #[test]
    fn test_per_page_is_capped() {
        let query = PaginationQuery {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(query.page(), 1);
        assert_eq!(query.per_page(DEFAULT_PER_PAGE), MAX_PER_PAGE);
    }
}
