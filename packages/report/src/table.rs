//! Fixed-width package table for terminal output.

use dc_receiving_manifest_models::PackageRow;

use crate::format_optional_quantity;
use crate::worksheet::truncate_chars;

const NAME_WIDTH: usize = 40;
const ID_WIDTH: usize = 24;

/// Renders `rows` as an aligned text table with a header line.
#[must_use]
pub fn render(rows: &[PackageRow]) -> String {
    let header = format!(
        "{:>4}  {:<ID_WIDTH$}  {:<NAME_WIDTH$}  {:>8}  {}\n",
        "#", "Package ID", "Item Name", "Shipped", "Batch"
    );
    std::iter::once(header)
        .chain(rows.iter().map(|row| {
            format!(
                "{:>4}  {:<ID_WIDTH$}  {:<NAME_WIDTH$}  {:>8}  {}\n",
                row.sequence,
                truncate_chars(&row.package_id, ID_WIDTH),
                truncate_chars(&row.item_name, NAME_WIDTH),
                format_optional_quantity(row.quantity_shipped),
                row.production_batch,
            )
        }))
        .collect()
}
