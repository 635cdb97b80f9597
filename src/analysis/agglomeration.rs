use crate::config::Miles;
use crate::domain::Located;
use crate::utils::distance;

/// Splits `items` into runs of spatially contiguous neighbours.
///
/// Walks the slice once, left to right. The first item opens a group. Every later item
/// joins the current group when it lies strictly within `threshold` of its immediate
/// predecessor in `items`, and opens a new group otherwise. Membership chains: a group may
/// stretch far from its own first member as long as each step stays under the threshold.
///
/// Groups are contiguous sub-slices, so every item appears in exactly one group, in order,
/// and no group is empty.
pub fn agglomerate<T: Located>(items: &[T], threshold: Miles) -> Vec<&[T]> {
    let mut groups = Vec::new();
    if items.is_empty() {
        return groups;
    }

    let mut group_start = 0;
    for idx in 1..items.len() {
        let step = distance(items[idx - 1].position(), items[idx].position());
        if step >= threshold {
            groups.push(&items[group_start..idx]);
            group_start = idx;
        }
    }
    groups.push(&items[group_start..]);

    groups
}
