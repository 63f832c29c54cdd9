///
/// QueryModifiers
///
/// Pagination window. Both bounds are optional and rendered inline.
///

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct QueryModifiers {
    limit: Option<u64>,
    offset: Option<u64>,
}

impl QueryModifiers {
    #[must_use]
    pub const fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self { limit, offset }
    }

    #[must_use]
    pub const fn limit(limit: u64) -> Self {
        Self::new(Some(limit), None)
    }

    #[must_use]
    pub const fn offset(offset: u64) -> Self {
        Self::new(None, Some(offset))
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub const fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    #[must_use]
    pub const fn get_offset(&self) -> Option<u64> {
        self.offset
    }

    #[must_use]
    pub const fn is_restricting(&self) -> bool {
        self.limit.is_some() || self.offset.is_some()
    }

    /// Exclusive upper row bound (`offset + limit`), saturating.
    #[must_use]
    pub const fn end(&self) -> Option<u64> {
        match self.limit {
            Some(limit) => Some(match self.offset {
                Some(offset) => offset.saturating_add(limit),
                None => limit,
            }),
            None => None,
        }
    }
}
