use std::collections::HashMap;

use bevy_ecs::{
    component::Component,
    entity::Entity,
    event::{EventReader, EventWriter},
    query::Without,
    system::Query,
};
use rand::seq::IndexedRandom;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    audio::Sound,
    events::GameEvent,
    platform,
    systems::{
        audio::{AudioEvent, AudioListener},
        components::EntityKind,
        transform::Transform,
    },
};

/// A teleporter linked to every other portal sharing its link id.
///
/// Overlap is tracked across two frames so a traveller is moved once when it enters, and never
/// bounced back while it keeps overlapping the destination.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Portal {
    link_id: i64,
    targets: SmallVec<[Entity; 2]>,
    overlapping_prev: bool,
    overlapping: bool,
}

impl Portal {
    pub fn new(link_id: i64) -> Self {
        Self {
            link_id,
            targets: SmallVec::new(),
            overlapping_prev: false,
            overlapping: false,
        }
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = Entity>) -> Self {
        self.targets = targets.into_iter().collect();
        self
    }

    pub fn set_targets(&mut self, targets: impl IntoIterator<Item = Entity>) {
        self.targets = targets.into_iter().collect();
    }

    pub fn link_id(&self) -> i64 {
        self.link_id
    }

    pub fn targets(&self) -> &[Entity] {
        &self.targets
    }

    pub fn is_overlapping(&self) -> bool {
        self.overlapping
    }
}

/// Pairs up portals: each portal targets every other portal with the same link id.
pub fn link_targets(portals: &[(Entity, i64)]) -> HashMap<Entity, SmallVec<[Entity; 2]>> {
    portals
        .iter()
        .map(|&(entity, link_id)| {
            let targets = portals
                .iter()
                .filter(|&&(other, other_link)| other != entity && other_link == link_id)
                .map(|&(other, _)| other)
                .collect();
            (entity, targets)
        })
        .collect()
}

/// Shifts this frame's overlap flag into the previous-frame slot.
pub fn portal_frame_system(mut portals: Query<&mut Portal>) {
    for mut portal in portals.iter_mut() {
        portal.overlapping_prev = portal.overlapping;
        portal.overlapping = false;
    }
}

/// Teleports Pac-Man or a ghost that just started overlapping a portal to one of its targets.
pub fn portal_collision_system(
    mut events: EventReader<GameEvent>,
    mut portals: Query<(&mut Portal, &Transform, Option<&AudioListener>)>,
    mut travellers: Query<&mut Transform, Without<Portal>>,
    kinds: Query<&EntityKind>,
    mut audio: EventWriter<AudioEvent>,
) {
    let mut rng = platform::rng();

    for event in events.read() {
        let GameEvent::Collision(a, b) = *event else { continue };
        let (portal_entity, traveller) = if portals.contains(a) {
            (a, b)
        } else if portals.contains(b) {
            (b, a)
        } else {
            continue;
        };
        if !matches!(kinds.get(traveller), Ok(EntityKind::Pacman | EntityKind::Ghost)) {
            continue;
        }

        let Ok((portal, _, _)) = portals.get(portal_entity) else { continue };
        let Some(&target) = portal.targets().choose(&mut rng) else {
            continue;
        };
        let Ok((_, target_transform, _)) = portals.get(target) else { continue };
        let destination = target_transform.position();

        let Ok((mut portal, _, listener)) = portals.get_mut(portal_entity) else { continue };
        portal.overlapping = true;
        let listener = listener.copied();

        if let Ok((mut target_portal, _, _)) = portals.get_mut(target) {
            target_portal.overlapping = true;
            target_portal.overlapping_prev = true;
        }

        let Ok((portal, _, _)) = portals.get(portal_entity) else { continue };
        if portal.overlapping && !portal.overlapping_prev {
            if let Ok(mut transform) = travellers.get_mut(traveller) {
                transform.set_position(destination);
                debug!(?traveller, from = ?portal_entity, to = ?target, "Teleported");
                if let Some(listener) = listener {
                    audio.write(listener.play(Sound::Teleport));
                }
            }
        }
    }
}
