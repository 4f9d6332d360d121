//! Turns a [`LevelData`] document into a running Pac-Man [`Scene`].

use bevy_ecs::entity::Entity;
use bevy_ecs::schedule::IntoScheduleConfigs;
use glam::{IVec2, Vec2};
use tracing::{debug, info, warn};

use crate::animation::presets::{coin_animator, ghost_animator, pacman_animator};
use crate::constants::{atlas, layer};
use crate::error::{GameResult, GraphicsError, LevelError};
use crate::game::{FrameSet, Scene};
use crate::graphics::context::GraphicsContext;
use crate::graphics::{GraphicsBackend, TextureDescriptor};
use crate::map::grid::{CellOccupant, Grid};
use crate::map::level::{CellData, GridData, LevelData};
use crate::systems::audio::{Ambient, AudioListener};
use crate::systems::collision::CollisionMatrix;
use crate::systems::components::{Background, EntityKind, PlacedBundle, Wall};
use crate::systems::ghost::{ghost_movement_system, ghost_start_system, GhostBuilder};
use crate::systems::item::{coin_collision_system, coin_start_system, Coin};
use crate::systems::player::{
    pacman_collision_system, pacman_control_system, pacman_movement_system, pacman_start_system, Pacman,
};
use crate::systems::portal::{link_targets, portal_collision_system, portal_frame_system, Portal};
use crate::systems::render::SpriteRenderer;
use crate::systems::transform::Transform;
use crate::texture::sprite::{AtlasStore, SpriteAtlas, SpriteKey};

/// Loads every sprite sheet the game draws from.
///
/// The background sheet is only loaded when the level names an image, which replaces the
/// default source.
pub fn load_atlases(backend: &mut dyn GraphicsBackend, background: Option<&str>) -> Result<AtlasStore, GraphicsError> {
    let mut store = AtlasStore::default();
    for sheet in &atlas::SHEETS {
        let source = if sheet.atlas == atlas::BACKGROUND {
            match background {
                Some(image) => image,
                None => continue,
            }
        } else {
            sheet.source
        };

        let texture = backend.load_texture(&TextureDescriptor {
            source,
            width: sheet.width,
            height: sheet.height,
            alpha: sheet.alpha,
            premultiply_alpha: sheet.alpha,
        })?;

        let mut sprites = SpriteAtlas::new(texture, sheet.width, sheet.height);
        match &sheet.layout {
            Some(layout) => sprites.crop_evenly(layout),
            None => sprites.crop_whole(sheet.atlas),
        };
        debug!(atlas = sheet.atlas, source, sprites = sprites.len(), "Atlas loaded");
        store.insert(sheet.atlas, sprites);
    }
    Ok(store)
}

/// Builds the Pac-Man scene described by `level`.
///
/// Loading is all-or-nothing: on error the partially built scene is dropped.
pub fn load_pacman_scene(level: &LevelData, backend: &mut dyn GraphicsBackend) -> GameResult<Scene> {
    let grid_data = &level.grid;
    let mut grid = Grid::new(
        Vec2::new(grid_data.offset.x, grid_data.offset.y),
        grid_data.rows,
        grid_data.columns,
        Vec2::new(grid_data.cells.size.width, grid_data.cells.size.height),
    )?;

    let mut graphics = GraphicsContext::new(level.size.width, level.size.height);
    graphics.set_clear_color(grid_data.background.color);
    graphics.load_sprite_shader(backend)?;
    let atlases = load_atlases(backend, grid_data.background.image.as_deref())?;

    let mut scene = Scene::new(graphics);
    scene.world_mut().insert_resource(atlases);
    spawn_background(&mut scene, &grid, grid_data);

    let mut pacman: Option<Entity> = None;
    let mut portals: Vec<(Entity, i64)> = Vec::new();

    for cell in &grid_data.cells.data {
        let kind = cell
            .kind
            .parse::<EntityKind>()
            .ok()
            .filter(EntityKind::is_placeable)
            .ok_or_else(|| LevelError::UnknownEntityType(cell.kind.clone()))?;

        let coord = IVec2::new(cell.position.x, cell.position.y);
        if !grid.is_cell_in_range(coord) {
            return Err(LevelError::CellOutOfRange {
                row: coord.y,
                column: coord.x,
            }
            .into());
        }

        let entity = spawn_cell(&mut scene, &grid, cell, kind, coord, pacman.is_some())?;
        match kind {
            EntityKind::Pacman => pacman = Some(entity),
            EntityKind::Portal => {
                if let Some(link_id) = cell.additional.link_id {
                    portals.push((entity, link_id));
                }
            }
            _ => {}
        }
        grid.set_cell(coord.y, coord.x, CellOccupant { entity, kind })?;
    }

    if pacman.is_none() {
        return Err(LevelError::MissingPacman.into());
    }

    let world = scene.world_mut();
    for (entity, targets) in link_targets(&portals) {
        if targets.is_empty() {
            warn!(?entity, "Portal has no linked partner");
        }
        if let Some(mut portal) = world.get_mut::<Portal>(entity) {
            portal.set_targets(targets);
        }
    }

    world.insert_resource(grid);
    world.insert_resource(CollisionMatrix::pacman());
    install_systems(&mut scene);

    info!(
        rows = grid_data.rows,
        columns = grid_data.columns,
        cells = grid_data.cells.data.len(),
        portals = portals.len(),
        "Level loaded"
    );
    Ok(scene)
}

fn spawn_background(scene: &mut Scene, grid: &Grid, grid_data: &GridData) {
    let sprite = grid_data
        .background
        .image
        .as_ref()
        .map(|_| SpriteKey::new(atlas::BACKGROUND, atlas::BACKGROUND));
    let transform = Transform::new(grid.offset(), 0.0, grid.extent());

    scene.world_mut().spawn((
        EntityKind::Background,
        transform,
        SpriteRenderer::new(sprite, grid_data.background.color, layer::BACKGROUND),
        Background,
        Ambient,
        AudioListener::default(),
    ));
}

fn spawn_cell(
    scene: &mut Scene,
    grid: &Grid,
    cell: &CellData,
    kind: EntityKind,
    coord: IVec2,
    has_pacman: bool,
) -> GameResult<Entity> {
    let scale = Vec2::new(cell.scale.x, cell.scale.y);
    let transform = Transform::new(grid.cell_to_world(coord, scale), cell.rotation, scale);
    let renderer = SpriteRenderer::new(
        Some(SpriteKey::new(kind.atlas(), cell.texture.as_str())),
        cell.color,
        kind.render_layer(),
    );
    let placed = PlacedBundle::new(kind, transform, renderer);
    let world = scene.world_mut();

    let entity = match kind {
        EntityKind::Wall => world.spawn((placed, Wall)).id(),
        EntityKind::Coin => world
            .spawn((placed, Coin::default(), coin_animator()?, AudioListener::default()))
            .id(),
        EntityKind::Ghost => {
            let name = cell.additional.name.as_deref().ok_or(LevelError::MissingField {
                entity: "ghost",
                field: "name",
            })?;
            let scatter = cell.additional.scatter_target.ok_or(LevelError::MissingField {
                entity: "ghost",
                field: "scatterTarget",
            })?;
            let mut builder = GhostBuilder::new(name).scatter_target(IVec2::new(scatter.x, scatter.y));
            if let Some(range) = cell.additional.range {
                builder = builder.range(range);
            }
            world.spawn((placed, builder.build(), ghost_animator()?)).id()
        }
        EntityKind::Pacman => {
            if has_pacman {
                return Err(LevelError::DuplicatePacman.into());
            }
            world
                .spawn((placed, Pacman::default(), pacman_animator()?, AudioListener::default()))
                .id()
        }
        EntityKind::Portal => {
            let link_id = cell.additional.link_id.ok_or(LevelError::MissingField {
                entity: "portal",
                field: "linkId",
            })?;
            world.spawn((placed, Portal::new(link_id), AudioListener::default())).id()
        }
        EntityKind::Background => return Err(LevelError::UnknownEntityType(cell.kind.clone()).into()),
    };
    Ok(entity)
}

fn install_systems(scene: &mut Scene) {
    scene.start_schedule_mut().add_systems(
        (pacman_start_system, ghost_start_system, coin_start_system)
            .chain()
            .in_set(FrameSet::Logic),
    );

    let update = scene.update_schedule_mut();
    update.add_systems((
        pacman_control_system.in_set(FrameSet::Input),
        (portal_frame_system, pacman_movement_system, ghost_movement_system)
            .chain()
            .in_set(FrameSet::Logic),
        (pacman_collision_system, coin_collision_system, portal_collision_system)
            .chain()
            .in_set(FrameSet::Reaction),
    ));
}
