//! SODA paging query: `$limit`, `$offset`, `$order`, `$where`.

/// One page request against a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub dataset: &'static str,
    pub limit: usize,
    pub offset: usize,
    /// e.g. `issue_date DESC`
    pub order: String,
    /// e.g. `issue_date >= '20240115'`
    pub where_clause: Option<String>,
}

impl PageQuery {
    /// Query parameters in the order the portal documents them.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("$limit", self.limit.to_string()),
            ("$offset", self.offset.to_string()),
            ("$order", self.order.clone()),
        ];
        if let Some(ref clause) = self.where_clause {
            params.push(("$where", clause.clone()));
        }
        params
    }

    /// Resource path relative to the portal base URL.
    pub fn path(&self) -> String {
        format!("/resource/{}.json", self.dataset)
    }
}
