use bevy_ecs::component::Component;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Position, rotation (degrees around Z), and scale of an entity, plus the model matrix derived from them.
///
/// The model matrix is rebuilt on every mutation, so it never goes stale.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Transform {
    position: Vec2,
    rotation: f32,
    scale: Vec2,
    model: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 0.0, Vec2::ONE)
    }
}

impl Transform {
    pub fn new(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        let mut transform = Self {
            position,
            rotation,
            scale,
            model: Mat4::IDENTITY,
        };
        transform.rebuild();
        transform
    }

    pub fn from_position(position: Vec2) -> Self {
        Self::new(position, 0.0, Vec2::ONE)
    }

    fn rebuild(&mut self) {
        self.model = Mat4::from_scale_rotation_translation(
            Vec3::new(self.scale.x, self.scale.y, 1.0),
            Quat::from_rotation_z(self.rotation.to_radians()),
            self.position.extend(0.0),
        );
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.rebuild();
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.rebuild();
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.rebuild();
    }

    pub fn model_matrix(&self) -> &Mat4 {
        &self.model
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.position + delta);
    }

    /// Moves toward `target` by at most `max_delta`, landing exactly on it when close enough.
    pub fn move_towards(&mut self, target: Vec2, max_delta: f32) {
        let offset = target - self.position;
        let distance = offset.length();
        if distance <= max_delta || distance == 0.0 {
            self.set_position(target);
        } else {
            self.set_position(self.position + offset / distance * max_delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_matrix_tracks_mutations() {
        let mut transform = Transform::new(Vec2::new(3.0, 4.0), 0.0, Vec2::splat(2.0));
        transform.translate(Vec2::new(1.0, 0.0));
        transform.set_rotation(90.0);

        let expected = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 2.0, 1.0),
            Quat::from_rotation_z(90f32.to_radians()),
            Vec3::new(4.0, 4.0, 0.0),
        );
        assert!(transform.model_matrix().abs_diff_eq(expected, 1e-5));
    }
}
