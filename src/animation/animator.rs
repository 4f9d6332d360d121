use std::collections::HashMap;

use bevy_ecs::component::Component;
use smallvec::SmallVec;
use tracing::trace;

use crate::animation::{Animation, FrameAction};
use crate::error::AnimationError;

/// Name of the animation every animator falls back to when nothing else was selected.
pub const IDLE_ANIMATION: &str = "idle";

type Requirements = SmallVec<[(String, bool); 2]>;

/// An edge of the animator's state machine.
///
/// A transition is eligible when its source matches the current animation (or it has no source)
/// and every required trigger and bool currently holds its required value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transition {
    from: Option<String>,
    to: String,
    triggers: Requirements,
    bools: Requirements,
}

fn require(requirements: &mut Requirements, name: &str, value: bool) {
    match requirements.iter_mut().find(|(key, _)| key == name) {
        Some((_, required)) => *required = value,
        None => requirements.push((name.to_string(), value)),
    }
}

impl Transition {
    pub fn new(from: Option<&str>, to: &str) -> Self {
        Self {
            from: from.map(str::to_string),
            to: to.to_string(),
            ..Default::default()
        }
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn triggers(&self) -> impl Iterator<Item = (&str, bool)> {
        self.triggers.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn bools(&self) -> impl Iterator<Item = (&str, bool)> {
        self.bools.iter().map(|(name, value)| (name.as_str(), *value))
    }
}

/// Trigger-driven state machine over a set of named animations.
///
/// Triggers are one-shot flags: the transition that fires resets every trigger it references.
/// Bools persist until changed. Transitions are evaluated in the order they were added and the
/// first eligible one wins.
#[derive(Component, Debug, Clone)]
pub struct Animator {
    animations: HashMap<String, Animation>,
    transitions: Vec<(String, Transition)>,
    triggers: HashMap<String, bool>,
    bools: HashMap<String, bool>,
    current: Option<String>,
    pub enabled: bool,
}

impl Default for Animator {
    fn default() -> Self {
        Self {
            animations: HashMap::new(),
            transitions: Vec::new(),
            triggers: HashMap::new(),
            bools: HashMap::new(),
            current: None,
            enabled: true,
        }
    }
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an animation, optionally making it the current one.
    pub fn add_animation(&mut self, animation: Animation, starting: bool) {
        let name = animation.name().to_string();
        if starting {
            self.current = Some(name.clone());
        }
        self.animations.insert(name, animation);
    }

    pub fn set_current_animation(&mut self, name: &str) -> Result<(), AnimationError> {
        let animation = self
            .animations
            .get_mut(name)
            .ok_or_else(|| AnimationError::AnimationNotFound(name.to_string()))?;
        animation.reset();
        self.current = Some(name.to_string());
        Ok(())
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Animation> {
        self.current.as_ref().and_then(|name| self.animations.get(name))
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.get(name)
    }

    pub fn add_trigger(&mut self, name: &str) {
        self.triggers.entry(name.to_string()).or_insert(false);
    }

    pub fn add_bool(&mut self, name: &str) {
        self.bools.entry(name.to_string()).or_insert(false);
    }

    /// Sets a trigger, registering it first if needed.
    pub fn set_trigger(&mut self, name: &str) {
        self.triggers.insert(name.to_string(), true);
    }

    pub fn get_trigger(&self, name: &str) -> Option<bool> {
        self.triggers.get(name).copied()
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.bools.insert(name.to_string(), value);
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    /// Adds a transition. Re-adding an existing name keeps the first one.
    pub fn add_transition(&mut self, name: &str, from: Option<&str>, to: &str) {
        if self.transition(name).is_none() {
            self.transitions.push((name.to_string(), Transition::new(from, to)));
        }
    }

    pub fn remove_transition(&mut self, name: &str) -> Option<Transition> {
        let index = self.transitions.iter().position(|(key, _)| key == name)?;
        Some(self.transitions.remove(index).1)
    }

    pub fn transition(&self, name: &str) -> Option<&Transition> {
        self.transitions.iter().find(|(key, _)| key == name).map(|(_, t)| t)
    }

    fn transition_mut(&mut self, name: &str) -> Result<&mut Transition, AnimationError> {
        self.transitions
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, t)| t)
            .ok_or_else(|| AnimationError::TransitionNotFound(name.to_string()))
    }

    /// Requires `trigger` to equal `value` for the transition to fire. Registers the trigger.
    pub fn use_trigger(&mut self, transition: &str, trigger: &str, value: bool) -> Result<(), AnimationError> {
        require(&mut self.transition_mut(transition)?.triggers, trigger, value);
        self.add_trigger(trigger);
        Ok(())
    }

    /// Requires the bool `name` to equal `value` for the transition to fire. Registers the bool.
    pub fn use_bool(&mut self, transition: &str, name: &str, value: bool) -> Result<(), AnimationError> {
        require(&mut self.transition_mut(transition)?.bools, name, value);
        self.add_bool(name);
        Ok(())
    }

    /// Prepares the animator for its first tick.
    ///
    /// Registers an empty repeating `idle` animation if none exists and selects it when no
    /// animation is current.
    pub fn start(&mut self) {
        if !self.animations.contains_key(IDLE_ANIMATION) {
            self.animations
                .insert(IDLE_ANIMATION.to_string(), Animation::empty(IDLE_ANIMATION));
        }
        if self.current.is_none() {
            self.current = Some(IDLE_ANIMATION.to_string());
        }
    }

    /// Transitions whose target animation does not exist, as `(transition, target)` pairs.
    pub fn dangling_transitions(&self) -> Vec<(&str, &str)> {
        self.transitions
            .iter()
            .filter(|(_, t)| !self.animations.contains_key(&t.to))
            .map(|(name, t)| (name.as_str(), t.to.as_str()))
            .collect()
    }

    fn is_eligible(&self, transition: &Transition) -> bool {
        let source_matches = match &transition.from {
            Some(from) => self.current.as_ref() == Some(from),
            None => true,
        };
        source_matches
            && transition
                .triggers
                .iter()
                .all(|(name, value)| self.triggers.get(name).copied().unwrap_or(false) == *value)
            && transition
                .bools
                .iter()
                .all(|(name, value)| self.bools.get(name).copied().unwrap_or(false) == *value)
    }

    /// Whether the current animation may be interrupted.
    fn can_transition(&self) -> bool {
        self.current().is_none_or(|animation| !animation.is_atomic() || animation.is_finished())
    }

    /// Runs one step: fires at most one transition, then advances the current animation.
    ///
    /// A transition targeting an unknown animation is an error and leaves every trigger untouched.
    pub fn tick(&mut self, dt: f32) -> Result<Option<FrameAction>, AnimationError> {
        if self.can_transition() {
            if let Some((name, transition)) = self.transitions.iter().find(|(_, t)| self.is_eligible(t)) {
                if !self.animations.contains_key(&transition.to) {
                    return Err(AnimationError::UnknownAnimation {
                        transition: name.clone(),
                        animation: transition.to.clone(),
                    });
                }

                let target = transition.to.clone();
                let consumed: SmallVec<[String; 2]> = transition.triggers.iter().map(|(k, _)| k.clone()).collect();
                for trigger in consumed {
                    self.triggers.insert(trigger, false);
                }

                if self.current.as_deref() != Some(target.as_str()) {
                    trace!(from = ?self.current, to = %target, "Animator transition");
                    if let Some(animation) = self.animations.get_mut(&target) {
                        animation.reset();
                    }
                    self.current = Some(target);
                }
            }
        }

        let action = match &self.current {
            Some(name) => self.animations.get_mut(name).and_then(|animation| animation.advance(dt)),
            None => None,
        };
        Ok(action)
    }
}
