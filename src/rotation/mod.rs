//! Specialization Rotations
//!
//! Each druid specialization has its own module that implements the
//! `ClassRotation` trait. The `DruidBot` dispatcher owns the shared combat
//! context (resources, cooldowns, form state, DoT tracking, decision log)
//! and routes every host tick to the active specialization's priority list.

pub mod balance;
pub mod detector;
pub mod feral;
pub mod guardian;
pub mod restoration;

use std::collections::HashSet;

use tracing::{debug, info};

use crate::combat::log::{CombatLog, CombatLogEventType};
use crate::constants::RAGE_PER_DAMAGE_TAKEN;
use crate::clock::GameClock;
use crate::host::{HostAdapter, PowerKind, UnitId};
use crate::spellbook::{Spell, SpellBook, SpellbookError};
use crate::substrate::{
    ComboPointLedger, CooldownMap, DotHotTracker, EclipseOscillator, Form, FormTracker,
    ResourceLedger,
};

pub use detector::detect_specialization;

/// The four druid specializations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Specialization {
    Balance,
    Feral,
    Guardian,
    Restoration,
}

impl std::fmt::Display for Specialization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Shared combat state threaded through every rotation decision.
pub struct CombatContext {
    pub spellbook: SpellBook,
    pub clock: GameClock,
    pub resources: ResourceLedger,
    pub cooldowns: CooldownMap,
    pub forms: FormTracker,
    pub dots: DotHotTracker,
    pub combo: ComboPointLedger,
    pub eclipse: EclipseOscillator,
    pub log: CombatLog,
    gcd_cast_this_tick: bool,
    unknown_logged: HashSet<Spell>,
}

impl CombatContext {
    pub fn new(spellbook: SpellBook) -> Self {
        Self {
            spellbook,
            clock: GameClock::new(),
            resources: ResourceLedger::new(),
            cooldowns: CooldownMap::new(),
            forms: FormTracker::new(),
            dots: DotHotTracker::new(),
            combo: ComboPointLedger::new(false),
            eclipse: EclipseOscillator::new(0.0),
            log: CombatLog::new(),
            gcd_cast_this_tick: false,
            unknown_logged: HashSet::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Gate and execute a cast request. Checks, in order: the spell is
    /// known, off cooldown, the global cooldown (for on-GCD spells), the
    /// current form permits it, the resource cost is affordable, and the
    /// target is in range. Only then is the host asked; an accepted cast
    /// spends the resource, arms the cooldown, and is logged.
    pub fn try_cast(
        &mut self,
        host: &mut dyn HostAdapter,
        me: UnitId,
        target: UnitId,
        spell: Spell,
    ) -> bool {
        self.try_cast_inner(host, me, target, spell, false)
    }

    /// Same gates as [`try_cast`](Self::try_cast) minus the per-spell
    /// cooldown, for proc effects that override it.
    pub fn try_cast_ignoring_cooldown(
        &mut self,
        host: &mut dyn HostAdapter,
        me: UnitId,
        target: UnitId,
        spell: Spell,
    ) -> bool {
        self.try_cast_inner(host, me, target, spell, true)
    }

    fn try_cast_inner(
        &mut self,
        host: &mut dyn HostAdapter,
        me: UnitId,
        target: UnitId,
        spell: Spell,
        ignore_cooldown: bool,
    ) -> bool {
        if !host.knows_spell(me, spell) {
            if self.unknown_logged.insert(spell) {
                debug!("Skipping unknown spell {spell} for {me}");
            }
            return false;
        }
        if !ignore_cooldown && !self.cooldowns.ready(spell) {
            return false;
        }
        let Some(config) = self.spellbook.get(spell) else {
            if self.unknown_logged.insert(spell) {
                debug!("No definition for spell {spell}");
            }
            return false;
        };
        let (power, cost) = (config.power, config.cost);
        let range = config.range;
        let triggers_gcd = config.triggers_gcd;
        if triggers_gcd && (self.gcd_cast_this_tick || !self.cooldowns.gcd_ready()) {
            return false;
        }
        if !self.forms.permits(spell) {
            return false;
        }
        if !self.resources.can_afford(power, cost) {
            return false;
        }
        if target != me && range > 0.0 && host.distance(me, target) > range {
            return false;
        }
        if !host.cast(me, target, spell) {
            self.log.note_rejected_cast();
            return false;
        }
        self.resources.spend(power, cost);
        let cooldown = self.spellbook.cooldown_ms(spell);
        self.cooldowns.arm(spell, cooldown);
        if triggers_gcd {
            self.cooldowns.trigger_gcd();
            self.gcd_cast_this_tick = true;
        }
        let message = if target == me {
            format!("{me} casts {spell}")
        } else {
            format!("{me} casts {spell} on {target}")
        };
        info!("{message}");
        self.log.log_cast(self.clock.now(), spell, message);
        true
    }

    /// Shift into `form`, logging the transition.
    pub fn shift_form(&mut self, host: &mut dyn HostAdapter, me: UnitId, form: Form) -> bool {
        let now = self.clock.now();
        if self.forms.shift_to(host, &mut self.resources, now, me, form) {
            self.log.log(
                now,
                CombatLogEventType::FormShift,
                format!("{me} shifts into {form:?}"),
            );
            true
        } else {
            false
        }
    }
}

/// Decision procedure for one specialization. Implementations are priority
/// lists: they walk their `try_*` rules top-down and stop at the first rule
/// that takes an action.
pub trait ClassRotation {
    fn specialization(&self) -> Specialization;

    /// Form the specialization idles in between fights. `None` means stay
    /// in caster form.
    fn home_form(&self) -> Option<Form> {
        None
    }

    /// Run one rotation tick. Returns `true` if an action was taken.
    fn run(
        &mut self,
        host: &mut dyn HostAdapter,
        ctx: &mut CombatContext,
        me: UnitId,
        target: Option<UnitId>,
    ) -> bool;
}

/// Factory mapping a specialization to its rotation.
pub fn rotation_for(spec: Specialization) -> Box<dyn ClassRotation> {
    match spec {
        Specialization::Balance => Box::new(balance::BalanceRotation::new()),
        Specialization::Feral => Box::new(feral::FeralRotation::new()),
        Specialization::Guardian => Box::new(guardian::GuardianRotation::new()),
        Specialization::Restoration => Box::new(restoration::RestorationRotation::new()),
    }
}

/// Top-level combat controller for one druid unit.
///
/// Owns the combat context and the active rotation; the host calls
/// [`update_rotation`](Self::update_rotation) every world tick and
/// [`note_damage_taken`](Self::note_damage_taken) on incoming hits.
pub struct DruidBot {
    me: UnitId,
    spec: Specialization,
    rotation: Box<dyn ClassRotation>,
    ctx: CombatContext,
}

impl DruidBot {
    /// Build a bot for `me`, detecting the specialization from the spells
    /// the unit knows.
    pub fn new(host: &dyn HostAdapter, me: UnitId) -> Result<Self, SpellbookError> {
        let spellbook = SpellBook::load_default()?;
        let spec = detect_specialization(host, me);
        Ok(Self::with_spec(me, spellbook, spec))
    }

    /// Build a bot with an explicit specialization and spell book.
    pub fn with_spec(me: UnitId, spellbook: SpellBook, spec: Specialization) -> Self {
        let mut ctx = CombatContext::new(spellbook);
        ctx.log.log(
            0,
            CombatLogEventType::Engine,
            format!("{me} initialized as {spec}"),
        );
        info!("{me} initialized as {spec}");
        Self {
            me,
            spec,
            rotation: rotation_for(spec),
            ctx,
        }
    }

    pub fn unit(&self) -> UnitId {
        self.me
    }

    pub fn specialization(&self) -> Specialization {
        self.spec
    }

    /// Re-run detection after a talent change and swap rotations if the
    /// specialization moved.
    pub fn respecialize(&mut self, host: &dyn HostAdapter) {
        let spec = detect_specialization(host, self.me);
        if spec != self.spec {
            self.ctx.log.log(
                self.ctx.now(),
                CombatLogEventType::Engine,
                format!("{} respecialized {} -> {spec}", self.me, self.spec),
            );
            self.spec = spec;
            self.rotation = rotation_for(spec);
            self.ctx.combo.reset();
        }
    }

    /// Advance time and run one rotation tick. Ticks arriving within the
    /// minimum interval of the previous one are elided. Returns `true` if
    /// an action was taken.
    pub fn update_rotation(
        &mut self,
        host: &mut dyn HostAdapter,
        target: Option<UnitId>,
    ) -> bool {
        let elapsed = self.ctx.clock.sync(host.now_ms());
        let in_combat = host.in_combat(self.me);
        if elapsed > 0 {
            self.ctx.cooldowns.tick(elapsed);
            self.ctx.resources.tick(elapsed, in_combat);
            let now = self.ctx.now();
            self.ctx.dots.prune(now);
        }
        if !self.ctx.clock.begin_rotation() {
            return false;
        }
        self.ctx.gcd_cast_this_tick = false;
        self.ctx.resources.sync_mana(
            host.power(self.me, PowerKind::Mana),
            host.max_power(self.me, PowerKind::Mana),
        );
        self.ctx
            .resources
            .set_berserk(host.has_aura(self.me, Spell::Berserk));
        if let Some(form) = observed_form(host, self.me) {
            self.ctx.forms.observe(form);
        }

        let target = self.resolve_target(host, target);
        let acted = self.rotation.run(host, &mut self.ctx, self.me, target);
        self.mirror_power(host);
        acted
    }

    /// Out-of-combat upkeep: settle into the specialization's home form.
    pub fn update_buffs(&mut self, host: &mut dyn HostAdapter) {
        self.ctx.clock.sync(host.now_ms());
        if host.in_combat(self.me) {
            return;
        }
        if let Some(form) = self.rotation.home_form() {
            self.ctx.shift_form(host, self.me, form);
        }
        self.mirror_power(host);
    }

    pub fn on_combat_start(&mut self) {
        self.ctx.log.log(
            self.ctx.now(),
            CombatLogEventType::Engine,
            format!("{} entering combat", self.me),
        );
    }

    /// Combat dropped: combo points fade with the fight.
    pub fn on_combat_end(&mut self) {
        self.ctx.combo.reset();
        self.ctx.log.log(
            self.ctx.now(),
            CombatLogEventType::Engine,
            format!("{} leaving combat", self.me),
        );
    }

    /// Incoming damage builds rage while in a rage-fueled form.
    pub fn note_damage_taken(&mut self, host: &mut dyn HostAdapter, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        if self.ctx.forms.current() == Form::Bear {
            self.ctx
                .resources
                .gain(PowerKind::Rage, amount * RAGE_PER_DAMAGE_TAKEN);
            self.mirror_power(host);
        }
    }

    pub fn combat_log(&self) -> &CombatLog {
        &self.ctx.log
    }

    pub fn context(&self) -> &CombatContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut CombatContext {
        &mut self.ctx
    }

    fn resolve_target(
        &mut self,
        host: &dyn HostAdapter,
        target: Option<UnitId>,
    ) -> Option<UnitId> {
        let target = target.or_else(|| host.selected_target(self.me));
        match target {
            Some(t) if host.is_alive(t) => Some(t),
            Some(t) => {
                self.ctx.dots.forget_target(t);
                None
            }
            None => None,
        }
    }

    /// Push the engine-authoritative pools back to the host.
    fn mirror_power(&mut self, host: &mut dyn HostAdapter) {
        host.set_power(
            self.me,
            PowerKind::Energy,
            self.ctx.resources.current(PowerKind::Energy),
        );
        host.set_power(
            self.me,
            PowerKind::Rage,
            self.ctx.resources.current(PowerKind::Rage),
        );
    }
}

/// Map host-visible form auras back to engine form state. `None` when the
/// host reports no form aura, in which case the engine's own state stands.
fn observed_form(host: &dyn HostAdapter, me: UnitId) -> Option<Form> {
    const FORM_AURAS: &[(Spell, Form)] = &[
        (Spell::BearForm, Form::Bear),
        (Spell::CatForm, Form::Cat),
        (Spell::MoonkinForm, Form::Moonkin),
        (Spell::TreeOfLife, Form::TreeOfLife),
        (Spell::AquaticForm, Form::Aquatic),
        (Spell::TravelForm, Form::Travel),
        (Spell::FlightForm, Form::Flight),
    ];
    FORM_AURAS
        .iter()
        .find(|(spell, _)| host.has_aura(me, *spell))
        .map(|&(_, form)| form)
}
