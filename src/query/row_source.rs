use crate::{database::{Property, RowId, ScalarValue}, error::PropertyQueryError};

/// Something that can hand out point-in-time views of its matched rows.
///
/// The snapshot must stay stable for as long as it is alive; property
/// queries take exactly one snapshot per terminal call.
pub trait RowSource {
    type Snapshot<'a>: RowSnapshot
    where
        Self: 'a;

    fn snapshot(&self) -> Result<Self::Snapshot<'_>, PropertyQueryError>;

    /// Whether `property` may be read from this source. Checked when a
    /// property query is created, before anything is scanned.
    fn supports(&self, property: &Property) -> bool;
}

/// A stable view of the matched rows and their raw values.
pub trait RowSnapshot {
    /// Matched row handles in match order.
    fn matched_rows(&self) -> &[RowId];

    /// Raw value of `property` in `row`; `None` when the slot's null flag is set.
    fn raw_value(&self, row: RowId, property: &Property) -> Result<Option<ScalarValue>, PropertyQueryError>;
}
