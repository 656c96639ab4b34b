use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_PAGE_SIZE: usize = 10;

//Column Descriptor
/// A column of the list view: the row field it addresses, its display
/// label, and an optional renderer that receives the whole row.
pub struct Column<T> {
    key: &'static str,
    label: &'static str,
    render: Option<Box<dyn Fn(&T) -> String + Send + Sync>>,
}

impl<T> Column<T> {
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Column {
            key,
            label,
            render: None,
        }
    }

    pub fn rendered(
        key: &'static str,
        label: &'static str,
        render: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        Column {
            key,
            label,
            render: Some(Box::new(render)),
        }
    }
}

//List Query
/// Free-text search term and page number, as sent by the client. A request
/// carrying neither starts unfiltered on page 1.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<usize>,
}

//List Page
/// One rendered page of a list: column labels, cell text per retained row,
/// and pagination counters. `rows` is empty when nothing matched.
#[derive(Debug, Serialize, PartialEq)]
pub struct ListPage {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub page: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub total: usize,
}

//Generic List View
/// Shapes an arbitrary collection into a searchable, paginated table. Rows
/// keep their input order; filtering and pagination are the only
/// transformations applied.
pub struct ListView<T> {
    columns: Vec<Column<T>>,
    page_size: usize,
}

impl<T: Serialize> ListView<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        ListView {
            columns,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Filters, paginates, and renders. A row is retained when any of its
    /// field values contains the search term as a case-insensitive
    /// substring; the page number is clamped to the valid range.
    pub fn render(&self, rows: &[T], query: &ListQuery) -> ListPage {
        let term = query
            .search
            .as_deref()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        let serialized: Vec<Value> = rows
            .iter()
            .map(|row| serde_json::to_value(row).unwrap_or(Value::Null))
            .collect();

        let retained: Vec<usize> = serialized
            .iter()
            .enumerate()
            .filter(|(_, value)| term.is_empty() || matches_term(value, &term))
            .map(|(i, _)| i)
            .collect();

        let total = retained.len();
        let page_count = (total + self.page_size - 1) / self.page_size;
        let page = query.page.unwrap_or(1).max(1).min(page_count.max(1));

        let start = (page - 1) * self.page_size;
        let rendered: Vec<Vec<String>> = retained
            .iter()
            .skip(start)
            .take(self.page_size)
            .map(|&i| {
                self.columns
                    .iter()
                    .map(|column| match &column.render {
                        Some(render) => render(&rows[i]),
                        None => cell_text(&serialized[i], column.key),
                    })
                    .collect()
            })
            .collect();

        ListPage {
            headers: self
                .columns
                .iter()
                .map(|column| column.label.to_string())
                .collect(),
            rows: rendered,
            page,
            page_count,
            page_size: self.page_size,
            total,
        }
    }
}

/// True when any field value of `row` contains `term` (already lowercased).
fn matches_term(row: &Value, term: &str) -> bool {
    match row {
        Value::Null => false,
        Value::String(s) => s.to_lowercase().contains(term),
        Value::Number(n) => n.to_string().to_lowercase().contains(term),
        Value::Bool(b) => b.to_string().contains(term),
        Value::Array(items) => items.iter().any(|item| matches_term(item, term)),
        Value::Object(fields) => fields.values().any(|value| matches_term(value, term)),
    }
}

/// Textual form of the field addressed by `key`. Missing and null fields
/// render empty.
fn cell_text(row: &Value, key: &str) -> String {
    match row.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Clone)]
    struct Ward {
        name: String,
        floor: i64,
        open: bool,
        lead: Option<String>,
    }

    fn ward(name: &str, floor: i64) -> Ward {
        Ward {
            name: name.to_string(),
            floor,
            open: true,
            lead: None,
        }
    }

    fn view() -> ListView<Ward> {
        ListView::new(vec![
            Column::new("name", "Name"),
            Column::new("floor", "Floor"),
            Column::new("lead", "Lead"),
        ])
    }

    fn numbered(count: usize) -> Vec<Ward> {
        (1..=count).map(|i| ward(&format!("Ward {}", i), i as i64)).collect()
    }

    #[test]
    fn twenty_five_rows_make_three_pages() {
        let rows = numbered(25);
        let page = view().render(&rows, &ListQuery::default());

        assert_eq!(page.page_count, 3);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 25);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[0][0], "Ward 1");
        assert_eq!(page.rows[9][0], "Ward 10");
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let rows = numbered(25);
        let query = ListQuery {
            search: None,
            page: Some(3),
        };
        let page = view().render(&rows, &query);

        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.rows[0][0], "Ward 21");
    }

    #[test]
    fn page_count_is_the_ceiling_of_total_over_page_size() {
        for (count, expected) in [(0, 0), (1, 1), (10, 1), (11, 2), (20, 2), (21, 3)] {
            let rows = numbered(count);
            let page = view().render(&rows, &ListQuery::default());
            assert_eq!(page.page_count, expected, "count {}", count);
        }
    }

    #[test]
    fn page_is_clamped_to_the_valid_range() {
        let rows = numbered(25);

        let past_end = view().render(
            &rows,
            &ListQuery {
                search: None,
                page: Some(99),
            },
        );
        assert_eq!(past_end.page, 3);
        assert_eq!(past_end.rows.len(), 5);

        let before_start = view().render(
            &rows,
            &ListQuery {
                search: None,
                page: Some(0),
            },
        );
        assert_eq!(before_start.page, 1);
    }

    #[test]
    fn search_without_page_starts_at_page_one() {
        let rows = numbered(25);
        let query = ListQuery {
            search: Some("ward".to_string()),
            page: None,
        };
        let page = view().render(&rows, &query);
        assert_eq!(page.page, 1);
        assert_eq!(page.total, 25);
    }

    #[test]
    fn filtering_is_a_case_insensitive_substring_over_any_field() {
        let mut rows = numbered(3);
        rows[1].lead = Some("Dr. GREY".to_string());

        let by_lead = view().render(
            &rows,
            &ListQuery {
                search: Some("grey".to_string()),
                page: None,
            },
        );
        assert_eq!(by_lead.total, 1);
        assert_eq!(by_lead.rows[0][0], "Ward 2");

        let by_number = view().render(
            &rows,
            &ListQuery {
                search: Some("3".to_string()),
                page: None,
            },
        );
        assert_eq!(by_number.total, 1);
        assert_eq!(by_number.rows[0][0], "Ward 3");
    }

    #[test]
    fn filtered_rows_are_a_subset_that_contains_the_term() {
        let rows = numbered(25);
        let term = "2";
        let page = view()
            .with_page_size(100)
            .render(
                &rows,
                &ListQuery {
                    search: Some(term.to_string()),
                    page: None,
                },
            );

        assert!(page.total <= rows.len());
        for row in &page.rows {
            assert!(
                row.iter().any(|cell| cell.to_lowercase().contains(term)),
                "row {:?} does not contain {}",
                row,
                term
            );
        }
    }

    #[test]
    fn no_match_yields_an_empty_page() {
        let rows = numbered(5);
        let page = view().render(
            &rows,
            &ListQuery {
                search: Some("radiology".to_string()),
                page: None,
            },
        );

        assert_eq!(page.total, 0);
        assert_eq!(page.page_count, 0);
        assert!(page.rows.is_empty());
        assert_eq!(page.page, 1);
    }

    #[test]
    fn custom_renderer_receives_the_whole_row() {
        let rows = numbered(2);
        let view = ListView::new(vec![Column::rendered("name", "Ward", |w: &Ward| {
            format!("{} (floor {})", w.name, w.floor)
        })]);

        let page = view.render(&rows, &ListQuery::default());
        assert_eq!(page.rows[0][0], "Ward 1 (floor 1)");
    }

    #[test]
    fn missing_and_null_fields_render_empty() {
        let rows = numbered(1);
        let view = ListView::new(vec![
            Column::new("lead", "Lead"),
            Column::new("no_such_field", "Nothing"),
        ]);

        let page = view.render(&rows, &ListQuery::default());
        assert_eq!(page.rows[0], vec!["".to_string(), "".to_string()]);
    }

    #[test]
    fn input_order_is_preserved() {
        let rows = vec![ward("Zeta", 1), ward("Alpha", 2), ward("Midway", 3)];
        let page = view().render(&rows, &ListQuery::default());
        let names: Vec<&str> = page.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Midway"]);
    }
}
