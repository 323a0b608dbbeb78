//! Expose (Mission Control) overlay: grid slots for every visible window and click selection.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{expose_grid, expose_transform, ExposeTransform, EXPOSE_GAP_PX, EXPOSE_PADDING_PX},
    model::{DesktopState, InstanceId},
};

/// Stacking base for windows while expose is active.
pub const EXPOSE_Z_INDEX_BASE: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposeSlot {
    pub instance_id: InstanceId,
    /// Grid cell, unique in `0..N`.
    pub index: usize,
    pub transform: ExposeTransform,
    pub z_index: u32,
}

/// Assigns every open, non-minimized instance a grid cell in registry order.
///
/// The assignment depends only on registry order, so re-entering expose with the same windows
/// yields the same cells.
pub fn expose_layout(state: &DesktopState) -> Vec<ExposeSlot> {
    let visible: Vec<_> = state.visible_instances().collect();
    if visible.is_empty() {
        return Vec::new();
    }
    let env = &state.environment;
    let grid = expose_grid(
        visible.len(),
        env.viewport,
        EXPOSE_PADDING_PX,
        EXPOSE_GAP_PX,
        env.is_mobile,
    );
    visible
        .into_iter()
        .enumerate()
        .map(|(index, instance)| ExposeSlot {
            instance_id: instance.instance_id,
            index,
            transform: expose_transform(instance.rect(), index, &grid),
            z_index: EXPOSE_Z_INDEX_BASE + index as u32,
        })
        .collect()
}

pub fn expose_slot(state: &DesktopState, instance_id: InstanceId) -> Option<ExposeSlot> {
    expose_layout(state)
        .into_iter()
        .find(|slot| slot.instance_id == instance_id)
}

/// Validates a click in expose; only visible windows can be picked.
pub fn expose_selection(state: &DesktopState, instance_id: InstanceId) -> Option<InstanceId> {
    if !state.expose_mode {
        return None;
    }
    state
        .instance(instance_id)
        .filter(|instance| instance.is_visible())
        .map(|instance| instance.instance_id)
}
