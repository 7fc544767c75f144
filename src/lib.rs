//! Data pipeline behind the topic-trends dashboard.
//!
//! Two CSV shapes describe the same topic weights over time:
//! a long table (`topic,date,distribution`) feeding the trend line chart and a
//! wide table (`week,<topic>...`) feeding the weekly pie chart.  Everything
//! here is synchronous and stateless; selection state is passed in as plain
//! parameters by whoever renders the charts.

pub mod chart;
pub mod data;

pub use data::error::{DataError, ErrorKind, Result};
pub use data::filter::filter_trends;
pub use data::generator::generate;
pub use data::loader::{load_snapshots, load_trends};
pub use data::model::{PieSlice, SnapshotTable, TrendDataset, TrendRecord, WeekKey};
pub use data::snapshot::extract_snapshot;
