//! Previous/next navigation between featured photos.

use serde::Serialize;

/// Photos adjacent to the current one in featured order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Neighbours {
    pub previous_id: Option<i64>,
    pub next_id: Option<i64>,
}

/// Find the neighbours of `id` in `ordered_ids` (oldest featured date first).
///
/// Returns `None` when `id` is not in the list.
pub fn neighbours(ordered_ids: &[i64], id: i64) -> Option<Neighbours> {
    let index = ordered_ids.iter().position(|&candidate| candidate == id)?;
    Some(Neighbours {
        previous_id: index
            .checked_sub(1)
            .and_then(|i| ordered_ids.get(i))
            .copied(),
        next_id: ordered_ids.get(index + 1).copied(),
    })
}
