//! Table and pagination rules for a page of records

use serde_json::Value;

use model_console_api::Record;

/// Navigation state derived from `skip`, `take` and `total`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: usize,
    pub take: usize,
    pub total: usize,
}

impl Pagination {
    pub fn new(skip: usize, take: usize, total: usize) -> Self {
        Self { skip, take, total }
    }

    pub fn has_previous(&self) -> bool {
        self.skip > 0
    }

    pub fn has_next(&self) -> bool {
        self.skip.saturating_add(self.take) < self.total
    }

    /// Offset of the previous page, floored at zero
    pub fn previous_skip(&self) -> Option<usize> {
        self.has_previous()
            .then(|| self.skip.saturating_sub(self.take))
    }

    pub fn next_skip(&self) -> Option<usize> {
        self.has_next().then(|| self.skip + self.take)
    }

    /// 1-based first row shown, 0 when there is nothing to show
    pub fn first_row(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.skip + 1
        }
    }

    pub fn last_row(&self) -> usize {
        self.skip.saturating_add(self.take).min(self.total)
    }

    pub fn range_label(&self) -> String {
        format!(
            "showing {}–{} of {}",
            self.first_row(),
            self.last_row(),
            self.total
        )
    }
}

/// Column order: the id field, then the remaining scalar fields as the
/// server listed them
pub fn columns(id_field_name: &str, scalar_fields: &[String]) -> Vec<String> {
    std::iter::once(id_field_name.to_string())
        .chain(
            scalar_fields
                .iter()
                .filter(|f| f.as_str() != id_field_name)
                .cloned(),
        )
        .collect()
}

/// Text shown in a table cell
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Object(_) | Value::Array(_) | Value::Null)) => {
            serde_json::to_string(v).unwrap_or_default()
        }
        Some(v) => v.to_string(),
    }
}

/// All cells of a row, in column order
pub fn row_cells(record: &Record, columns: &[String]) -> Vec<String> {
    columns.iter().map(|c| cell_text(record.get(c))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_navigation_enabled_flags() {
        for total in 0..12usize {
            for take in 1..5usize {
                for skip in 0..12usize {
                    let p = Pagination::new(skip, take, total);
                    assert_eq!(p.has_previous(), skip > 0);
                    assert_eq!(p.has_next(), skip + take < total);
                }
            }
        }
    }

    #[test]
    fn test_previous_is_floored() {
        let p = Pagination::new(30, 50, 200);
        assert_eq!(p.previous_skip(), Some(0));
        assert_eq!(p.next_skip(), Some(80));
        assert_eq!(Pagination::new(0, 50, 10).previous_skip(), None);
        assert_eq!(Pagination::new(0, 50, 50).next_skip(), None);
    }

    #[test]
    fn test_range_label() {
        assert_eq!(Pagination::new(0, 50, 0).range_label(), "showing 0–0 of 0");
        assert_eq!(Pagination::new(50, 50, 51).range_label(), "showing 51–51 of 51");
        assert_eq!(Pagination::new(0, 20, 45).range_label(), "showing 1–20 of 45");
    }

    #[test]
    fn test_columns_put_id_first() {
        let fields = vec!["email".to_string(), "id".to_string(), "name".to_string()];
        assert_eq!(columns("id", &fields), vec!["id", "email", "name"]);
    }

    #[test]
    fn test_cell_text() {
        let record = json!({
            "id": 1,
            "name": "Ada",
            "active": true,
            "meta": { "k": [1, 2] },
            "deleted_at": null
        });
        let record = record.as_object().unwrap();
        let cols = columns(
            "id",
            &["name", "active", "meta", "deleted_at", "nickname"]
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
        );
        assert_eq!(
            row_cells(record, &cols),
            vec!["1", "Ada", "true", r#"{"k":[1,2]}"#, "null", ""]
        );
    }
}
