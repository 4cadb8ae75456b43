//! Script lifecycle pass
//!
//! Each tick every script slot gets `ready` once (the first tick the slot
//! is processed) followed by `update`. The slot list is queried fresh at
//! the start of the pass, so entities created during the pass wait until
//! the next tick, and entities destroyed mid-pass are skipped.

use crate::scene::Scene;

/// Run `ready`/`update` for every script slot
///
/// A callback failure is logged against the owning entity and the pass
/// moves on; one entity's failure never interrupts the others.
pub(crate) fn run(scene: &mut Scene) {
    for (entity, slot) in scene.store().script_slots() {
        let Some((mut script, ready_run)) = scene.store_mut().take_script(entity, slot) else {
            continue;
        };

        if !ready_run {
            if let Err(err) = script.ready(scene, entity) {
                log::error!("script ready failed for entity {entity}: {err}");
            }
        }
        if let Err(err) = script.update(scene, entity) {
            log::error!("script update failed for entity {entity}: {err}");
        }

        scene.store_mut().restore_script(entity, slot, script, true);
    }
}
