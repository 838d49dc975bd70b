//! Sequential pane naming: the active pane becomes `main`; the rest are
//! named in ascending numeric-id order from a configured sequence,
//! overflowing to `worker<N>`.

use crate::domain::{PaneCollection, PaneId, PaneName};

/// Assigns names across every pane in `collection`. A pane whose computed
/// name would violate an aggregate invariant (e.g. a worker role landing on
/// the active pane) is left unnamed; naming continues for the rest.
pub fn assign_names(collection: &mut PaneCollection, name_sequence: &[String]) {
    let active_id: Option<PaneId> = collection.get_active().map(|p| p.id().clone());

    if let Some(active_id) = &active_id
        && let Some(pane) = collection.get_mut(active_id)
        && let Ok(main) = PaneName::create("main")
    {
        let _ = pane.assign_name(main);
    }

    let mut remaining: Vec<PaneId> = collection.ids_sorted_by_numeric();
    remaining.retain(|id| Some(id.as_str()) != active_id.as_ref().map(PaneId::as_str));

    let mut worker_counter = 1usize;
    for (i, id) in remaining.iter().enumerate() {
        let candidate = match name_sequence.get(i) {
            Some(name) => name.clone(),
            None => {
                let name = format!("worker{worker_counter}");
                worker_counter += 1;
                name
            }
        };
        if let Ok(name) = PaneName::create(candidate)
            && let Some(pane) = collection.get_mut(id)
        {
            let _ = pane.assign_name(name);
        }
    }
}
