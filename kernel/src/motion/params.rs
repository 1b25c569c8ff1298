//! Motion model parameters and budgets.

use crate::error::KernelError;

/// Physical constants and budgets of the route simulation.
///
/// - speed: `V = v0 · exp(−speed_decay · M)`
/// - resource draw per unit distance: `rate = draw_per_mass · M + base_draw`
/// - a step that would push time past `time_budget` or resource past
///   `resource_budget` ends the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionParams {
    /// Unloaded travel speed `V0`.
    pub v0: f64,
    /// Exponential speed decay per unit of carried mass (`a`).
    pub speed_decay: f64,
    /// Resource draw growth per unit of carried mass (`b`).
    pub draw_per_mass: f64,
    /// Resource draw with no load (`b0`).
    pub base_draw: f64,
    /// Time budget `Tmax`.
    pub time_budget: f64,
    /// Resource budget `Qmax`.
    pub resource_budget: f64,
    /// Sweep radius `R_col` around a travelled segment.
    pub collision_radius: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            v0: 1.0,
            speed_decay: 0.0698,
            draw_per_mass: 3.0,
            base_draw: 100.0,
            time_budget: 600.0,
            resource_budget: 10_000.0,
            collision_radius: 0.45,
        }
    }
}

impl MotionParams {
    /// Check every field for finiteness and range.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::InvalidMotionParam`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<(), KernelError> {
        let fields = [
            ("v0", self.v0),
            ("speed_decay", self.speed_decay),
            ("draw_per_mass", self.draw_per_mass),
            ("base_draw", self.base_draw),
            ("time_budget", self.time_budget),
            ("resource_budget", self.resource_budget),
            ("collision_radius", self.collision_radius),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(KernelError::InvalidMotionParam {
                    name,
                    value,
                    detail: "must be finite",
                });
            }
        }
        if self.v0 <= 0.0 {
            return Err(KernelError::InvalidMotionParam {
                name: "v0",
                value: self.v0,
                detail: "must be positive",
            });
        }
        for (name, value) in [
            ("time_budget", self.time_budget),
            ("resource_budget", self.resource_budget),
            ("collision_radius", self.collision_radius),
        ] {
            if value < 0.0 {
                return Err(KernelError::InvalidMotionParam {
                    name,
                    value,
                    detail: "must not be negative",
                });
            }
        }
        Ok(())
    }

    /// Travel speed when carrying `mass`.
    #[must_use]
    pub fn speed(&self, mass: f64) -> f64 {
        self.v0 * (-self.speed_decay * mass).exp()
    }

    /// Resource draw per unit distance when carrying `mass`.
    #[must_use]
    pub fn draw_rate(&self, mass: f64) -> f64 {
        self.draw_per_mass * mass + self.base_draw
    }
}
