//! Table observer for pretty-printing counters.
//!
//! This module provides [`TableObserver`], which renders a collection of
//! [`Observable`] counters as a formatted ASCII table using the `tabled` crate.
//!
//! # Feature Flag
//!
//! This module requires the `table` feature:
//!
//! ```toml
//! [dependencies]
//! strisce = { version = "0.1", features = ["table"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use strisce::counters::adder::LongAdder;
//! use strisce::counters::Observable;
//! use strisce::observers::table::{TableObserver, TableStyle};
//!
//! let requests = LongAdder::named("requests");
//! let errors = LongAdder::named("errors");
//!
//! requests.add(1000);
//! errors.add(5);
//!
//! let counters: Vec<&dyn Observable> = vec![&requests, &errors];
//!
//! let observer = TableObserver::new().with_style(TableStyle::Rounded);
//! println!("{}", observer.render(counters.into_iter()));
//! // ╭──────────┬───────┬─────────╮
//! // │ Name     │ Value │ Stripes │
//! // ├──────────┼───────┼─────────┤
//! // │ requests │ 1000  │ 0       │
//! // │ errors   │ 5     │ 0       │
//! // ╰──────────┴───────┴─────────╯
//! ```

use crate::counters::Observable;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

/// Available table styles for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableStyle {
    /// ASCII table with simple characters: +, -, |
    Ascii,
    /// Modern rounded corners (default)
    #[default]
    Rounded,
    /// Sharp corners with box-drawing characters
    Sharp,
    /// GitHub-flavored Markdown table
    Markdown,
    /// No borders, just spacing
    Blank,
}

/// Configuration for the table observer.
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// The style to use for rendering.
    pub style: TableStyle,
    /// Whether to show the header row (only in non-compact mode).
    pub show_header: bool,
    /// Custom title for the table (optional).
    pub title: Option<String>,
    /// Whether to use compact format (`name: value` in cells).
    pub compact: bool,
    /// Number of columns in compact mode (default: 1).
    pub columns: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            style: TableStyle::default(),
            show_header: true,
            title: None,
            compact: false,
            columns: 1,
        }
    }
}

/// Internal row representation for tabled (standard mode).
#[derive(Tabled)]
struct CounterRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Stripes")]
    stripes: usize,
}

/// An observer that renders counters as a formatted ASCII table.
///
/// Supports two rendering modes:
///
/// 1. **Standard mode**: one row per counter with its name, value and the
///    current length of its cell table (`0` while it has never contended)
/// 2. **Compact mode**: multi-column grid with `name: value` cells
#[derive(Debug, Clone, Default)]
pub struct TableObserver {
    config: TableConfig,
}

impl TableObserver {
    /// Creates a new table observer with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new table observer with the specified configuration.
    pub fn with_config(config: TableConfig) -> Self {
        Self { config }
    }

    /// Sets the table style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.config.style = style;
        self
    }

    /// Sets whether to show the header row.
    pub fn with_header(mut self, show: bool) -> Self {
        self.config.show_header = show;
        self
    }

    /// Sets an optional title for the table.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    /// Enables or disables compact mode.
    pub fn compact(mut self, enabled: bool) -> Self {
        self.config.compact = enabled;
        self
    }

    /// Sets the number of columns in compact mode. Values below 1 count as 1.
    pub fn columns(mut self, count: usize) -> Self {
        self.config.columns = count.max(1);
        self
    }

    /// Renders the counters.
    pub fn render<'a>(&self, counters: impl Iterator<Item = &'a dyn Observable>) -> String {
        let rows = counters.map(|c| row(c, c.value().to_string())).collect();
        self.render_rows(rows)
    }

    /// Renders the counters, resetting each one as it is read.
    pub fn render_and_reset<'a>(
        &self,
        counters: impl Iterator<Item = &'a dyn Observable>,
    ) -> String {
        let rows = counters
            .map(|c| row(c, c.value_and_reset().to_string()))
            .collect();
        self.render_rows(rows)
    }

    fn render_rows(&self, rows: Vec<CounterRow>) -> String {
        let table = if self.config.compact {
            if rows.is_empty() {
                return String::new();
            }
            self.compact_table(rows)
        } else {
            self.standard_table(rows)
        };

        match &self.config.title {
            Some(title) => format!("{}\n{}", title, table),
            None => table.to_string(),
        }
    }

    fn standard_table(&self, rows: Vec<CounterRow>) -> Table {
        let mut table = Table::new(&rows);
        self.apply_style(&mut table);
        if !self.config.show_header {
            table.with(tabled::settings::Remove::row(
                tabled::settings::object::Rows::first(),
            ));
        }
        table
    }

    fn compact_table(&self, rows: Vec<CounterRow>) -> Table {
        let cells: Vec<String> = rows
            .into_iter()
            .map(|r| format!("{}: {}", r.name, r.value))
            .collect();

        let cols = self.config.columns;
        let mut builder = Builder::default();
        for chunk in cells.chunks(cols) {
            let mut record = chunk.to_vec();
            // Pad the last row
            record.resize(cols, String::new());
            builder.push_record(record);
        }

        let mut table = builder.build();
        self.apply_style(&mut table);
        table
    }

    fn apply_style(&self, table: &mut Table) {
        match self.config.style {
            TableStyle::Ascii => {
                table.with(Style::ascii());
            }
            TableStyle::Rounded => {
                table.with(Style::rounded());
            }
            TableStyle::Sharp => {
                table.with(Style::sharp());
            }
            TableStyle::Markdown => {
                table.with(Style::markdown());
            }
            TableStyle::Blank => {
                table.with(Style::blank());
            }
        }
    }
}

fn row(counter: &dyn Observable, value: String) -> CounterRow {
    CounterRow {
        name: match counter.name() {
            "" => "(unnamed)".to_string(),
            name => name.to_string(),
        },
        value,
        stripes: counter.stripes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counters::adder::{DoubleAdder, LongAdder};
    use crate::counters::maximum::Maximum;

    #[test]
    fn test_render_standard() {
        let requests = LongAdder::named("requests");
        requests.add(1000);
        let latency = Maximum::<i64>::new().with_name("latency_max");
        latency.observe(250);

        let counters: Vec<&dyn Observable> = vec![&requests, &latency];
        let output = TableObserver::new().render(counters.into_iter());

        assert!(output.contains("Name"));
        assert!(output.contains("Stripes"));
        assert!(output.contains("requests"));
        assert!(output.contains("1000"));
        assert!(output.contains("latency_max"));
        assert!(output.contains("250"));
    }

    #[test]
    fn test_render_without_header() {
        let c = LongAdder::named("c");
        let counters: Vec<&dyn Observable> = vec![&c];
        let output = TableObserver::new()
            .with_header(false)
            .render(counters.into_iter());
        assert!(!output.contains("Name"));
        assert!(output.contains("c"));
    }

    #[test]
    fn test_render_with_title() {
        let c = LongAdder::named("c");
        let counters: Vec<&dyn Observable> = vec![&c];
        let output = TableObserver::new()
            .with_title("Metrics")
            .render(counters.into_iter());
        assert!(output.starts_with("Metrics\n"));
    }

    #[test]
    fn test_render_unnamed() {
        let c = DoubleAdder::new();
        c.add(0.5);
        let counters: Vec<&dyn Observable> = vec![&c];
        let output = TableObserver::new().render(counters.into_iter());
        assert!(output.contains("(unnamed)"));
        assert!(output.contains("0.5"));
    }

    #[test]
    fn test_render_compact() {
        let a = LongAdder::named("a");
        let b = LongAdder::named("b");
        let c = LongAdder::named("c");
        a.add(1);
        b.add(2);
        c.add(3);

        let counters: Vec<&dyn Observable> = vec![&a, &b, &c];
        let output = TableObserver::new()
            .compact(true)
            .columns(2)
            .with_style(TableStyle::Ascii)
            .render(counters.into_iter());

        assert!(output.contains("a: 1"));
        assert!(output.contains("b: 2"));
        assert!(output.contains("c: 3"));
        assert!(!output.contains("Stripes"));
    }

    #[test]
    fn test_render_compact_empty() {
        let output = TableObserver::new()
            .compact(true)
            .render(std::iter::empty::<&dyn Observable>());
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_and_reset() {
        let c = LongAdder::named("period");
        c.add(100);
        let counters: Vec<&dyn Observable> = vec![&c];
        let output = TableObserver::new()
            .with_style(TableStyle::Markdown)
            .render_and_reset(counters.into_iter());
        assert!(output.contains("100"));
        assert_eq!(c.sum(), 0);
    }

    #[test]
    fn test_columns_minimum() {
        let observer = TableObserver::new().columns(0);
        assert_eq!(observer.config.columns, 1);
    }
}
