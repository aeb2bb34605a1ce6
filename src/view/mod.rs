mod compose;
mod panel;
mod table;

pub use compose::{bounds_of, dedup_by_id, fit, union};
pub use panel::{PanelLayer, PanelView, View};
pub use table::{SUM_LABEL, TableRow, table};
