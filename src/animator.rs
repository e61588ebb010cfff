use glam::Vec2;

use crate::color::hsv_to_rgb;

/// Hue at which the color cycle restarts.
const HUE_LIMIT: f32 = 360.0;

/// Tunables for the bouncing sprite and the background color cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatorConfig {
    /// Distance per second along each axis, in NDC units.
    pub move_speed: f32,
    /// Hue degrees advanced per second.
    pub hue_speed: f32,
    /// Saturation of the clear color.
    pub saturation: f32,
    /// Value (brightness) of the clear color.
    pub value: f32,
    /// Sprite half-width and half-height used to derive the bounce bounds.
    pub half_extents: Vec2,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            hue_speed: 50.0,
            saturation: 0.7,
            value: 0.5,
            half_extents: Vec2::new(0.075, 0.15),
        }
    }
}

/// Limits for the sprite center inside the [-1, 1] viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub right: f32,
    pub left: f32,
    pub top: f32,
    pub down: f32,
}

impl Bounds {
    pub fn from_half_extents(half: Vec2) -> Self {
        let bounds = Self {
            right: 1.0 - half.x,
            left: -1.0 + half.x,
            top: 1.0 - half.y,
            down: -1.0 + half.y,
        };
        debug_assert!(bounds.left < bounds.right, "sprite wider than viewport");
        debug_assert!(bounds.down < bounds.top, "sprite taller than viewport");
        bounds
    }
}

/// Everything that changes from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Sprite center offset from screen center (NDC).
    pub position: Vec2,
    /// Travel sign per axis, always exactly +1.0 or -1.0.
    pub direction: Vec2,
    /// Hue in degrees, [0, 360).
    pub hue: f32,
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            direction: Vec2::ONE,
            hue: 0.0,
        }
    }
}

/// Advance `state` by `dt` seconds.
///
/// Hue past 360 snaps back to exactly 0 rather than wrapping, and each axis
/// is clamped and reflected independently. `dt` has no upper bound, so a long
/// stall can carry the sprite across the whole viewport in one step; it is
/// still clamped to the far bound.
pub fn tick(
    state: AnimationState,
    config: &AnimatorConfig,
    bounds: &Bounds,
    dt: f32,
) -> AnimationState {
    let mut next = state;

    next.hue += config.hue_speed * dt;
    if next.hue >= HUE_LIMIT {
        next.hue = 0.0;
    }

    next.position += config.move_speed * next.direction * dt;

    let (x, dx) = reflect(next.position.x, next.direction.x, bounds.left, bounds.right);
    let (y, dy) = reflect(next.position.y, next.direction.y, bounds.down, bounds.top);
    next.position = Vec2::new(x, y);
    next.direction = Vec2::new(dx, dy);

    next
}

/// Clamp one axis to `[low, high]`, pointing the direction back inside on contact.
fn reflect(pos: f32, dir: f32, low: f32, high: f32) -> (f32, f32) {
    if pos >= high {
        (high, -1.0)
    } else if pos <= low {
        (low, 1.0)
    } else {
        (pos, dir)
    }
}

/// Owns the animation state and the config it was built from.
#[derive(Debug, Clone)]
pub struct Animator {
    config: AnimatorConfig,
    bounds: Bounds,
    state: AnimationState,
}

impl Animator {
    pub fn new(config: AnimatorConfig) -> Self {
        Self {
            bounds: Bounds::from_half_extents(config.half_extents),
            config,
            state: AnimationState::new(),
        }
    }

    /// Called once per frame, before rendering.
    pub fn tick(&mut self, dt: f32) {
        self.state = tick(self.state, &self.config, &self.bounds, dt);
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Sprite offset for the vertex shader uniform.
    pub fn offset(&self) -> [f32; 2] {
        self.state.position.into()
    }

    /// Background color for the current hue.
    pub fn clear_color(&self) -> [f32; 3] {
        hsv_to_rgb(self.state.hue, self.config.saturation, self.config.value)
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(AnimatorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(state: &AnimationState, b: &Bounds) -> bool {
        (b.left..=b.right).contains(&state.position.x) && (b.down..=b.top).contains(&state.position.y)
    }

    #[test]
    fn default_bounds() {
        let b = Bounds::from_half_extents(AnimatorConfig::default().half_extents);
        assert_eq!(b.right, 1.0 - 0.075);
        assert_eq!(b.left, -1.0 + 0.075);
        assert_eq!(b.top, 1.0 - 0.15);
        assert_eq!(b.down, -1.0 + 0.15);
        assert!(b.left < b.right && b.down < b.top);
    }

    #[test]
    fn starts_at_origin_moving_up_right() {
        let anim = Animator::default();
        assert_eq!(anim.state().position, Vec2::ZERO);
        assert_eq!(anim.state().direction, Vec2::ONE);
        assert_eq!(anim.state().hue, 0.0);
    }

    #[test]
    fn integrates_position_and_hue() {
        let mut anim = Animator::default();
        anim.tick(0.25);
        assert_eq!(anim.state().position, Vec2::new(0.25, 0.25));
        assert_eq!(anim.state().hue, 12.5);
        assert_eq!(anim.offset(), [0.25, 0.25]);
    }

    #[test]
    fn stays_within_bounds() {
        let mut anim = Animator::default();
        let deltas = [0.016, 0.5, 0.0, 1.7, 0.033, 3.0, 0.25, 0.9, 0.001, 2.2];
        for _ in 0..50 {
            for &dt in &deltas {
                anim.tick(dt);
                assert!(within(anim.state(), anim.bounds()), "{:?}", anim.state());
                let dir = anim.state().direction;
                assert!(dir.x == 1.0 || dir.x == -1.0);
                assert!(dir.y == 1.0 || dir.y == -1.0);
            }
        }
    }

    #[test]
    fn flips_at_right_bound_and_holds_until_left() {
        let config = AnimatorConfig::default();
        let bounds = Bounds::from_half_extents(config.half_extents);
        let mut state = AnimationState::new();

        state = tick(state, &config, &bounds, 0.5);
        assert_eq!(state.position.x, 0.5);
        assert_eq!(state.direction.x, 1.0);

        state = tick(state, &config, &bounds, 0.5);
        assert_eq!(state.position.x, bounds.right);
        assert_eq!(state.direction.x, -1.0);

        // Travelling left across the viewport keeps the sign.
        for _ in 0..3 {
            state = tick(state, &config, &bounds, 0.5);
            assert_eq!(state.direction.x, -1.0);
        }

        state = tick(state, &config, &bounds, 0.5);
        assert_eq!(state.position.x, bounds.left);
        assert_eq!(state.direction.x, 1.0);
    }

    #[test]
    fn axes_reflect_independently() {
        let config = AnimatorConfig::default();
        let bounds = Bounds::from_half_extents(config.half_extents);
        let state = AnimationState {
            position: Vec2::new(0.0, 0.8),
            direction: Vec2::ONE,
            hue: 0.0,
        };

        let next = tick(state, &config, &bounds, 0.1);
        assert_eq!(next.position.y, bounds.top);
        assert_eq!(next.direction.y, -1.0);
        assert_eq!(next.direction.x, 1.0);
        assert_eq!(next.position.x, 0.1);
    }

    #[test]
    fn bottom_bound_turns_sprite_upward() {
        let config = AnimatorConfig::default();
        let bounds = Bounds::from_half_extents(config.half_extents);
        let state = AnimationState {
            position: Vec2::new(0.0, -0.8),
            direction: Vec2::new(-1.0, -1.0),
            hue: 0.0,
        };

        let next = tick(state, &config, &bounds, 0.1);
        assert_eq!(next.position.y, bounds.down);
        assert_eq!(next.direction.y, 1.0);
        assert_eq!(next.direction.x, -1.0);
        assert_eq!(next.position.x, -0.1);
    }

    #[test]
    fn long_stall_clamps_to_far_bound() {
        let mut anim = Animator::default();
        anim.tick(10.0);
        assert_eq!(anim.state().position, Vec2::new(anim.bounds().right, anim.bounds().top));
        assert_eq!(anim.state().direction, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn hue_overshoot_resets_to_zero() {
        let mut anim = Animator::default();
        for _ in 0..14 {
            anim.tick(0.5);
        }
        assert_eq!(anim.state().hue, 350.0);

        // 375 would be 15 under modulo; the cycle restarts at exactly 0.
        anim.tick(0.5);
        assert_eq!(anim.state().hue, 0.0);

        anim.tick(0.5);
        assert_eq!(anim.state().hue, 25.0);
    }

    #[test]
    fn hue_landing_on_360_resets() {
        let config = AnimatorConfig::default();
        let bounds = Bounds::from_half_extents(config.half_extents);
        let state = AnimationState { hue: 300.0, ..AnimationState::new() };
        assert_eq!(tick(state, &config, &bounds, 1.2).hue, 0.0);
    }

    #[test]
    fn zero_delta_is_identity() {
        let config = AnimatorConfig::default();
        let bounds = Bounds::from_half_extents(config.half_extents);
        let mut state = AnimationState::new();
        for &dt in &[0.0, 0.3, 0.7, 0.45, 1.1, 0.05, 0.6] {
            state = tick(state, &config, &bounds, dt);
            assert_eq!(tick(state, &config, &bounds, 0.0), state);
        }
    }

    #[test]
    fn identical_inputs_give_identical_trajectories() {
        let deltas: Vec<f32> = (0..500).map(|i| ((i * 37) % 101) as f32 / 1000.0).collect();

        let run = || {
            let mut anim = Animator::default();
            deltas
                .iter()
                .map(|&dt| {
                    anim.tick(dt);
                    (*anim.state(), anim.clear_color())
                })
                .collect::<Vec<_>>()
        };

        let a = run();
        let b = run();
        for ((sa, ca), (sb, cb)) in a.iter().zip(&b) {
            assert_eq!(sa.position.x.to_bits(), sb.position.x.to_bits());
            assert_eq!(sa.position.y.to_bits(), sb.position.y.to_bits());
            assert_eq!(sa.hue.to_bits(), sb.hue.to_bits());
            assert_eq!(ca, cb);
        }
    }

    #[test]
    fn custom_config() {
        let config = AnimatorConfig {
            move_speed: 2.0,
            hue_speed: 90.0,
            half_extents: Vec2::new(0.5, 0.5),
            ..AnimatorConfig::default()
        };
        let mut anim = Animator::new(config);
        anim.tick(0.25);
        assert_eq!(anim.state().position, Vec2::new(0.5, 0.5));
        assert_eq!(anim.state().direction, Vec2::new(-1.0, -1.0));
        assert_eq!(anim.state().hue, 22.5);
    }

    #[test]
    fn clear_color_starts_red() {
        let [r, g, b] = Animator::default().clear_color();
        assert!((r - 0.5).abs() < 1e-6);
        assert!((g - 0.15).abs() < 1e-6);
        assert!((b - 0.15).abs() < 1e-6);
    }
}
