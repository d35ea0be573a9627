//! # Camera
//!
//! Follows the knight with a dead zone: the view only scrolls once the
//! target drifts more than a quarter of the viewport from its center.

use crate::utils::Vector2;

/// Camera position in world units plus the visible area.
///
/// # Examples
///
/// ```
/// use dungeonlife::{CameraRig, Vector2};
///
/// let mut camera = CameraRig::new(Vector2::ZERO, 320.0, 240.0);
/// camera.follow(Vector2::new(50.0, 0.0));
/// assert_eq!(camera.position(), Vector2::ZERO);
/// camera.follow(Vector2::new(100.0, 0.0));
/// assert_eq!(camera.position(), Vector2::new(20.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    position: Vector2,
    viewport_width: f32,
    viewport_height: f32,
}

impl CameraRig {
    pub fn new(position: Vector2, viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position,
            viewport_width,
            viewport_height,
        }
    }

    /// Center of the view in world units.
    pub fn position(&self) -> Vector2 {
        self.position
    }

    /// Jumps straight to `target`, e.g. on level entry.
    pub fn center_on(&mut self, target: Vector2) {
        self.position = target;
    }

    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;
    }

    /// Half extents of the dead zone.
    pub fn dead_zone(&self) -> Vector2 {
        Vector2::new(self.viewport_width / 4.0, self.viewport_height / 4.0)
    }

    /// Drags the camera just enough to keep `target` inside the dead zone.
    pub fn follow(&mut self, target: Vector2) {
        let zone = self.dead_zone();
        self.position.x = Self::drag(self.position.x, target.x, zone.x);
        self.position.y = Self::drag(self.position.y, target.y, zone.y);
    }

    fn drag(camera: f32, target: f32, half_zone: f32) -> f32 {
        if target - camera > half_zone {
            target - half_zone
        } else if camera - target > half_zone {
            target + half_zone
        } else {
            camera
        }
    }

    /// Maps a world point to screen pixels. Screen y grows downwards.
    pub fn world_to_screen(&self, point: Vector2, zoom: f32, screen: Vector2) -> Vector2 {
        Vector2::new(
            screen.x / 2.0 + (point.x - self.position.x) * zoom,
            screen.y / 2.0 - (point.y - self.position.y) * zoom,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_dead_zone_does_not_scroll() {
        let mut camera = CameraRig::new(Vector2::new(100.0, 100.0), 320.0, 240.0);
        camera.follow(Vector2::new(170.0, 50.0));
        assert_eq!(camera.position(), Vector2::new(100.0, 100.0));
    }

    #[test]
    fn test_drags_on_both_sides() {
        let mut camera = CameraRig::new(Vector2::ZERO, 320.0, 240.0);
        camera.follow(Vector2::new(-100.0, 100.0));
        assert_eq!(camera.position(), Vector2::new(-20.0, 40.0));
        camera.follow(Vector2::new(-100.0, -100.0));
        assert_eq!(camera.position(), Vector2::new(-20.0, -40.0));
    }

    #[test]
    fn test_world_to_screen_flips_y() {
        let camera = CameraRig::new(Vector2::new(10.0, 10.0), 320.0, 240.0);
        let screen = Vector2::new(640.0, 480.0);
        assert_eq!(
            camera.world_to_screen(Vector2::new(10.0, 10.0), 2.0, screen),
            Vector2::new(320.0, 240.0)
        );
        assert_eq!(
            camera.world_to_screen(Vector2::new(20.0, 20.0), 2.0, screen),
            Vector2::new(340.0, 220.0)
        );
    }

    #[test]
    fn test_center_on_jumps() {
        let mut camera = CameraRig::new(Vector2::ZERO, 320.0, 240.0);
        camera.center_on(Vector2::new(500.0, -500.0));
        assert_eq!(camera.position(), Vector2::new(500.0, -500.0));
    }
}
