//! Combat Substrate
//!
//! Class-agnostic mechanical components the specialization rotations share:
//! resource pools, cooldown tracking, shapeshift state, DoT/HoT bookkeeping,
//! combo points, the eclipse oscillator, and healer triage. Each component
//! is a plain value type ticked by the dispatcher; none talks to the host
//! directly except through the adapter handed in by its caller.

pub mod combo;
pub mod cooldowns;
pub mod dots;
pub mod eclipse;
pub mod forms;
pub mod resources;
pub mod triage;

pub use combo::ComboPointLedger;
pub use cooldowns::CooldownMap;
pub use dots::DotHotTracker;
pub use eclipse::{EclipseOscillator, EclipseSide, EclipseState};
pub use forms::{Form, FormTracker};
pub use resources::ResourceLedger;
pub use triage::{DamageTracker, TriageBucket, TriageEntry, TriageQueue};
