use eframe::egui::{Pos2, Rect, Vec2, vec2};

/// Pan/zoom state for the rendered scene. The transform is applied
/// translate-then-scale, anchored at the viewport center.
#[derive(Clone, Copy, Debug)]
pub(super) struct Viewport {
    pub(super) scale: f32,
    pub(super) translation: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub(super) const MIN_SCALE: f32 = 0.05;
    pub(super) const MAX_SCALE: f32 = 6.0;

    /// Clamps a proposed translation into the pan bounds for `content`:
    /// each component may travel at most one scaled content dimension
    /// from center, so the scene can never be panned out of reach and
    /// zooming in widens the range proportionally.
    pub(super) fn clamp_translation(&self, proposed: Vec2, content: Vec2) -> Vec2 {
        let rbound = content.x * self.scale;
        let lbound = -rbound;
        let bbound = content.y * self.scale;
        let tbound = -bbound;
        vec2(
            proposed.x.clamp(lbound, rbound),
            proposed.y.clamp(tbound, bbound),
        )
    }

    /// Applies a gesture's proposed scale and translation. The scale is
    /// adopted first so the pan bounds grow and shrink with it.
    pub(super) fn apply_gesture(&mut self, scale: f32, translation: Vec2, content: Vec2) {
        self.scale = scale.clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        self.translation = self.clamp_translation(translation, content);
    }

    pub(super) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(super) fn to_screen(&self, rect: Rect, scene: Vec2) -> Pos2 {
        rect.center() + self.translation + scene * self.scale
    }

    pub(super) fn to_scene(&self, rect: Rect, screen: Pos2) -> Vec2 {
        (screen - rect.center() - self.translation) / self.scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_stays_inside_the_scaled_bounds() {
        let content = vec2(960.0, 720.0);
        let proposals = [
            vec2(0.0, 0.0),
            vec2(1e6, -1e6),
            vec2(-1e6, 1e6),
            vec2(17.5, -42.0),
            vec2(f32::MAX / 2.0, f32::MIN / 2.0),
        ];

        for scale in [0.05, 0.5, 1.0, 3.2, 6.0] {
            let viewport = Viewport {
                scale,
                translation: Vec2::ZERO,
            };
            for proposed in proposals {
                let clamped = viewport.clamp_translation(proposed, content);
                assert!(clamped.x >= -content.x * scale && clamped.x <= content.x * scale);
                assert!(clamped.y >= -content.y * scale && clamped.y <= content.y * scale);
            }
        }
    }

    #[test]
    fn zooming_in_widens_the_pan_range() {
        let content = vec2(100.0, 100.0);
        let mut viewport = Viewport::default();
        let far = vec2(500.0, 500.0);

        viewport.apply_gesture(1.0, far, content);
        assert_eq!(viewport.translation, vec2(100.0, 100.0));

        viewport.apply_gesture(4.0, far, content);
        assert_eq!(viewport.translation, vec2(400.0, 400.0));
    }

    #[test]
    fn gesture_scale_is_kept_positive_and_bounded() {
        let content = vec2(100.0, 100.0);
        let mut viewport = Viewport::default();

        viewport.apply_gesture(0.0, Vec2::ZERO, content);
        assert_eq!(viewport.scale, Viewport::MIN_SCALE);

        viewport.apply_gesture(1e9, Vec2::ZERO, content);
        assert_eq!(viewport.scale, Viewport::MAX_SCALE);
    }

    #[test]
    fn screen_mapping_is_translate_then_scale() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(200.0, 200.0));
        let viewport = Viewport {
            scale: 2.0,
            translation: vec2(10.0, -10.0),
        };

        let screen = viewport.to_screen(rect, vec2(5.0, 5.0));
        assert_eq!(screen, Pos2::new(100.0 + 10.0 + 10.0, 100.0 - 10.0 + 10.0));

        let roundtrip = viewport.to_scene(rect, screen);
        assert!((roundtrip - vec2(5.0, 5.0)).length() < 1e-4);
    }
}
