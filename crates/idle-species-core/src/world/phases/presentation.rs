use super::super::World;

impl World {
    /// Per-frame easing of display position and alpha. Never touches `alive`.
    pub(in crate::world) fn presentation_phase(&mut self) {
        let topology = self.topology;
        let fade_speed = self.config.fade_speed;
        for cell in &mut self.cells {
            cell.ease(&topology, fade_speed);
        }
    }
}
