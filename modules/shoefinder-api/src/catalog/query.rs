use shoefinder_common::{CatalogTable, QueryIntent};

/// Number of rows returned by the best-sellers query.
pub const TOP_SELLING_LIMIT: u32 = 5;

/// A value bound to a `?` placeholder. Request data only ever travels here.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    Number(f64),
}

/// SQL text plus its positional bindings.
///
/// The text is assembled from fixed fragments and a [`CatalogTable`]
/// identifier; nothing from the request is interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    pub sql: String,
    pub params: Vec<QueryParam>,
}

impl CatalogQuery {
    /// Filtered product search for `/analyze`.
    ///
    /// `has_type_column` comes from the per-request schema lookup; the subtype
    /// predicate is only added when the table has one. The color match is
    /// case-insensitive whatever the `Description` collation.
    pub fn filter(table: CatalogTable, intent: &QueryIntent, has_type_column: bool) -> Self {
        let mut sql = format!("SELECT * FROM {} WHERE 1=1", table.as_str());
        let mut params = Vec::new();

        if let Some(color) = &intent.color {
            sql.push_str(" AND REGEXP_LIKE(Description, ?, 'i')");
            params.push(QueryParam::Text(whole_word_pattern(color)));
        }

        sql.push_str(" AND Price >= ? AND Price <= ?");
        params.push(QueryParam::Number(intent.price_min));
        params.push(QueryParam::Number(intent.price_max));

        if let (true, Some(subtype)) = (has_type_column, &intent.subtype) {
            sql.push_str(" AND Type LIKE ?");
            params.push(QueryParam::Text(format!("%{}%", escape_like(subtype))));
        }

        sql.push_str(" ORDER BY Rating DESC");

        Self { sql, params }
    }

    /// Best sellers by `Ratings Count`.
    pub fn top_selling(table: CatalogTable) -> Self {
        Self {
            sql: format!(
                "SELECT * FROM {} ORDER BY `Ratings Count` DESC LIMIT {}",
                table.as_str(),
                TOP_SELLING_LIMIT
            ),
            params: Vec::new(),
        }
    }
}

/// Schema lookup for the `Type` column, bound to the table name.
pub const TYPE_COLUMN_SQL: &str = "SELECT COUNT(*) FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND COLUMN_NAME = 'Type'";

/// `word` as a standalone whitespace-delimited token.
fn whole_word_pattern(word: &str) -> String {
    format!(r"(^|\s){}(\s|$)", regex::escape(word))
}

/// Escape LIKE wildcards so the value matches literally (MySQL's default escape is `\`).
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
