/// An identifier bound to a 1-based, row-major sheet slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAssignment<'a> {
    pub slot: usize,
    pub id: &'a str,
}

/// Fills slots `start_index..=total_slots` with `ids` in order.
///
/// Slots before `start_index` stay blank so a partly used sheet can go back
/// through the printer. Only one page is produced: IDs that do not fit are
/// left out of the result.
pub fn assign_slots(ids: &[String], start_index: usize, total_slots: usize) -> Vec<SlotAssignment<'_>> {
    let start = start_index.max(1);
    (start..=total_slots)
        .zip(ids)
        .map(|(slot, id)| SlotAssignment { slot, id: id.as_str() })
        .collect()
}
