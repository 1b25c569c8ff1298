//! Motion translator: waypoints → relative `TURN` / `GO` instructions.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::path::Path;

use sweeproute_kernel::instance::target::Point;

/// Moves shorter than this produce no instructions.
pub const MIN_MOVE_DISTANCE: f64 = 1e-6;

/// Last line of every rendered script.
pub const FINISH_MARKER: &str = "FINISH";

/// One vehicle command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    /// Rotate in place; positive is counter-clockwise. Always in `[-180, 180)`.
    Turn { degrees: f64 },
    /// Drive forward along the current heading.
    Go { distance: f64 },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turn { degrees } => write!(f, "TURN {degrees:.5}"),
            Self::Go { distance } => write!(f, "GO {distance:.5}"),
        }
    }
}

/// Wrap an angle in radians into `[-π, π)`.
#[must_use]
pub fn wrap_angle(radians: f64) -> f64 {
    (radians + PI).rem_euclid(TAU) - PI
}

/// Tracks the vehicle pose and accumulates instructions.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionTranslator {
    position: Point,
    heading: f64,
    instructions: Vec<Instruction>,
}

impl Default for MotionTranslator {
    fn default() -> Self {
        Self::new(Point::ORIGIN, 0.0)
    }
}

impl MotionTranslator {
    #[must_use]
    pub fn new(start: Point, heading: f64) -> Self {
        Self {
            position: start,
            heading,
            instructions: Vec::new(),
        }
    }

    /// Turn toward `target` and drive to it. Negligible moves are skipped.
    pub fn move_to(&mut self, target: Point) {
        let dx = target.x - self.position.x;
        let dy = target.y - self.position.y;
        let distance = dx.hypot(dy);
        if distance < MIN_MOVE_DISTANCE {
            return;
        }
        let bearing = dy.atan2(dx);
        let rotation = wrap_angle(bearing - self.heading);
        self.instructions.push(Instruction::Turn {
            degrees: rotation.to_degrees(),
        });
        self.instructions.push(Instruction::Go { distance });
        self.position = target;
        self.heading = bearing;
    }

    pub fn follow<I>(&mut self, waypoints: I)
    where
        I: IntoIterator<Item = Point>,
    {
        for p in waypoints {
            self.move_to(p);
        }
    }

    #[must_use]
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Heading in radians.
    #[must_use]
    pub fn heading(&self) -> f64 {
        self.heading
    }

    /// One instruction per line, then [`FINISH_MARKER`] with no trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for instruction in &self.instructions {
            out.push_str(&instruction.to_string());
            out.push('\n');
        }
        out.push_str(FINISH_MARKER);
        out
    }

    /// Write the rendered script to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from directory creation or the write.
    pub fn export(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.render())
    }
}
