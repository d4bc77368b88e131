//! Live per-block objects. Block types flagged `wants_update` get one
//! instance per placed block, receiving lifecycle and frame hooks. All
//! notifications are fire-and-forget; nothing an object does changes chunk
//! behavior.
pub trait UpdateBlock {
    /// The block entered the world, either placed or loaded from storage.
    fn on_loaded(&mut self) {}

    /// The block was freshly placed by gameplay (after `on_loaded`).
    fn on_placed(&mut self) {}

    /// The block is leaving the world: chunk unload, removal, overwrite.
    fn on_unloaded(&mut self) {}

    /// The block's cell was overwritten by another block.
    fn on_destroyed(&mut self) {}

    fn before_draw(&mut self) {}

    fn after_draw(&mut self) {}
}
