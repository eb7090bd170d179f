pub const MIN_ACCELERATION: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Opening,
    Closing,
}

/// Ease-in slide for the console panel.
///
/// `offset` is how far the panel is pushed out of view: 0 is fully shown, `max_offset` fully hidden.
/// Speed grows by `acceleration` every tick and restarts from zero whenever the direction is set.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideAnimator {
    offset: f32,
    velocity: f32,
    max_offset: f32,
    acceleration: f32,
    direction: SlideDirection,
}

impl SlideAnimator {
    /// Out-of-range inputs are clamped: a bad height becomes 0 and a bad acceleration becomes
    /// [`MIN_ACCELERATION`].
    pub fn new(max_offset: f32, acceleration: f32) -> Self {
        let max_offset = if max_offset.is_finite() { max_offset.max(0.0) } else { 0.0 };
        let acceleration =
            if acceleration.is_finite() { acceleration.max(MIN_ACCELERATION) } else { MIN_ACCELERATION };
        Self { offset: max_offset, velocity: 0.0, max_offset, acceleration, direction: SlideDirection::Closing }
    }

    pub fn set_direction(&mut self, direction: SlideDirection) {
        self.direction = direction;
        self.velocity = 0.0;
    }

    pub fn tick(&mut self) {
        self.velocity += self.acceleration;
        match self.direction {
            SlideDirection::Opening => self.offset -= self.velocity,
            SlideDirection::Closing => self.offset += self.velocity,
        }
        self.offset = self.offset.clamp(0.0, self.max_offset);
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn max_offset(&self) -> f32 {
        self.max_offset
    }

    pub fn is_hidden(&self) -> bool {
        self.offset >= self.max_offset
    }

    pub fn is_settled(&self) -> bool {
        match self.direction {
            SlideDirection::Opening => self.offset <= 0.0,
            SlideDirection::Closing => self.is_hidden(),
        }
    }
}
