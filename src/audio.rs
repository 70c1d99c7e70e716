//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::balance::WeaponKind;
use crate::sim::{GameEvent, PickupKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SoundEffect {
    /// Weapon fired (timbre varies by weapon)
    Shot(WeaponKind),
    /// Projectile connected
    Hit,
    /// Critical hit
    CritHit,
    /// Chain lightning arc
    ChainZap,
    /// Enemy died
    EnemyDeath,
    /// Explosive payload went off
    Explosion,
    /// Player took damage
    PlayerHurt,
    /// Player healed (regen pickup, life steal burst)
    Heal,
    /// Attack dodged
    Dodge,
    /// Attack blocked by shield
    Block,
    /// Money collected
    MoneyPickup,
    /// Health pickup collected
    HealthPickup,
    /// Round timer tick in the final seconds
    Countdown { urgent: bool },
    /// Round survived
    RoundComplete,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Map a simulation event to a sound, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::WeaponFired(kind) => Some(SoundEffect::Shot(*kind)),
            GameEvent::EnemyHit { crit: true } => Some(SoundEffect::CritHit),
            GameEvent::EnemyHit { crit: false } => Some(SoundEffect::Hit),
            GameEvent::ChainArc => Some(SoundEffect::ChainZap),
            GameEvent::EnemyKilled(_) => Some(SoundEffect::EnemyDeath),
            GameEvent::Explosion => Some(SoundEffect::Explosion),
            GameEvent::PlayerHurt => Some(SoundEffect::PlayerHurt),
            GameEvent::PlayerHealed => Some(SoundEffect::Heal),
            GameEvent::DodgedAttack => Some(SoundEffect::Dodge),
            GameEvent::BlockedAttack => Some(SoundEffect::Block),
            GameEvent::PickupCollected(PickupKind::Money { .. }) => Some(SoundEffect::MoneyPickup),
            GameEvent::PickupCollected(PickupKind::Health { .. }) => Some(SoundEffect::HealthPickup),
            GameEvent::CountdownTick { urgent, .. } => Some(SoundEffect::Countdown { urgent: *urgent }),
            GameEvent::RoundComplete => Some(SoundEffect::RoundComplete),
            GameEvent::GameOver => Some(SoundEffect::GameOver),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Shot(kind) => self.play_shot(ctx, vol, kind),
            SoundEffect::Hit => self.play_hit(ctx, vol),
            SoundEffect::CritHit => self.play_crit(ctx, vol),
            SoundEffect::ChainZap => self.play_chain_zap(ctx, vol),
            SoundEffect::EnemyDeath => self.play_enemy_death(ctx, vol),
            SoundEffect::Explosion => self.play_explosion(ctx, vol),
            SoundEffect::PlayerHurt => self.play_player_hurt(ctx, vol),
            SoundEffect::Heal => self.play_heal(ctx, vol),
            SoundEffect::Dodge => self.play_dodge(ctx, vol),
            SoundEffect::Block => self.play_block(ctx, vol),
            SoundEffect::MoneyPickup => self.play_money(ctx, vol),
            SoundEffect::HealthPickup => self.play_health_pickup(ctx, vol),
            SoundEffect::Countdown { urgent } => self.play_countdown(ctx, vol, urgent),
            SoundEffect::RoundComplete => self.play_round_complete(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Weapon shot - each weapon gets its own timbre from a shared
    /// pitch-sweep envelope
    fn play_shot(&self, ctx: &AudioContext, vol: f32, kind: WeaponKind) {
        use WeaponKind::*;
        // (start freq, end freq, wave, gain scale, duration)
        let (start, end, wave, gain_scale, dur) = match kind {
            Pistol => (800.0, 300.0, OscillatorType::Square, 0.2, 0.08),
            Shotgun => (250.0, 60.0, OscillatorType::Sawtooth, 0.4, 0.15),
            Smg => (900.0, 500.0, OscillatorType::Square, 0.12, 0.05),
            RocketLauncher => (120.0, 40.0, OscillatorType::Sawtooth, 0.45, 0.3),
            LaserBeam => (1400.0, 1200.0, OscillatorType::Sine, 0.2, 0.12),
            Ricochet => (700.0, 350.0, OscillatorType::Triangle, 0.25, 0.1),
            WaveGun => (500.0, 800.0, OscillatorType::Sine, 0.22, 0.15),
            BurstRifle => (850.0, 400.0, OscillatorType::Square, 0.18, 0.06),
            OrbitalCannon => (350.0, 150.0, OscillatorType::Sawtooth, 0.3, 0.2),
            NovaBurst => (600.0, 200.0, OscillatorType::Triangle, 0.3, 0.18),
            ChainLightning => (1000.0, 2000.0, OscillatorType::Sawtooth, 0.2, 0.08),
            Boomerang => (450.0, 650.0, OscillatorType::Triangle, 0.22, 0.2),
            GravityWell => (200.0, 50.0, OscillatorType::Sine, 0.35, 0.4),
        };

        let Some((osc, gain)) = self.create_osc(ctx, start, wave) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * gain_scale, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + dur as f64)
            .ok();
        osc.frequency().set_value_at_time(start, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(end, t + dur as f64)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + dur as f64 + 0.05).ok();
    }

    /// Projectile hit - soft tap
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.05)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Critical hit - sharper, higher crack
    fn play_crit(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 1200.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.frequency().set_value_at_time(1200.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(600.0, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }

        // Body under the crack
        if let Some((osc, gain)) = self.create_osc(ctx, 200.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.08).ok();
        }
    }

    /// Chain lightning arc - zappy frequency jumps
    fn play_chain_zap(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(120.0, t).ok();
        osc.frequency().set_value_at_time(2000.0, t + 0.02).ok();
        osc.frequency().set_value_at_time(300.0, t + 0.04).ok();
        osc.frequency().set_value_at_time(1500.0, t + 0.06).ok();
        osc.frequency().set_value_at_time(150.0, t + 0.09).ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Enemy death - short descending pop
    fn play_enemy_death(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.3, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(80.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Explosion - boom!
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.5, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.4)
            .ok();
        osc.frequency().set_value_at_time(100.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(30.0, t + 0.4)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.5).ok();

        // Add high frequency crack
        if let Some((osc2, gain2)) = self.create_osc(ctx, 1500.0, OscillatorType::Square) {
            gain2.gain().set_value_at_time(vol * 0.2, t).ok();
            gain2
                .gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc2.start().ok();
            osc2.stop_with_when(t + 0.15).ok();
        }
    }

    /// Player hurt - harsh low buzz
    fn play_player_hurt(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(150.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(50.0, t + 0.25)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Heal - soft rising tone
    fn play_heal(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 400.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.25)
            .ok();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(700.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.3).ok();
    }

    /// Dodge - quick airy whoosh
    fn play_dodge(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 900.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();
        osc.frequency().set_value_at_time(900.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1400.0, t + 0.08)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Shield block - metallic tink
    fn play_block(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(500.0, t).ok();
            osc.frequency().set_value_at_time(350.0, t + 0.04).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1100.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.1).ok();
        }
    }

    /// Money collect - coin arpeggio
    fn play_money(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [900.0, 1200.0].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }
    }

    /// Health pickup - warm two-note chime
    fn play_health_pickup(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.22, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.25).ok();
            }
        }
    }

    /// Countdown tick, urgent in the final seconds
    fn play_countdown(&self, ctx: &AudioContext, vol: f32, urgent: bool) {
        let freq = if urgent { 880.0 } else { 440.0 };
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        let gain_scale = if urgent { 0.35 } else { 0.2 };
        gain.gain().set_value_at_time(vol * gain_scale, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.12).ok();
    }

    /// Round complete - triumphant fanfare
    fn play_round_complete(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
            let delay = i as f64 * 0.1;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}
