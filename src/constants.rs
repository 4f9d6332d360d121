//! This module contains all the constants used by the engine and the game.

use std::time::Duration;

/// Target duration of one iteration of the fixed loop (60 Hz).
pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// Upper bound for the delta time of a single tick, in seconds.
///
/// Movement per tick must stay below one grid cell for the single-step wall rollback to hold.
pub const MAX_FRAME_DELTA: f32 = 0.1;

/// Movement speeds, in world units per second.
pub mod speed {
    pub const PACMAN: f32 = 75.0;
    pub const GHOST: f32 = 30.0;
    /// Multiplier applied to an entity's speed when it softly snaps back onto the lane grid.
    pub const SNAP_FACTOR: f32 = 3.0;
}

pub mod ghost {
    /// Grid distance within which a ghost considers Pac-Man "in range".
    pub const DEFAULT_RANGE: f32 = 8.0;
    /// How many cells ahead of Pac-Man Pinky aims.
    pub const PINKY_LOOKAHEAD: i32 = 4;
    /// How many cells ahead of Pac-Man Inky places the pivot it reflects Blinky through.
    pub const INKY_PIVOT_LOOKAHEAD: i32 = 2;
    /// Registry name Inky uses to find Blinky.
    pub const BLINKY_NAME: &str = "blinky";
}

/// Collider sizes relative to the entity's scale.
pub mod collider {
    pub const WALL: f32 = 1.0;
    pub const COIN: f32 = 0.6;
    pub const GHOST: f32 = 0.9;
    pub const PACMAN: f32 = 0.8;
    pub const PORTAL: f32 = 0.8;
}

/// Draw order; higher layers are drawn on top.
pub mod layer {
    pub const BACKGROUND: u8 = 0;
    pub const WALL: u8 = 1;
    pub const ITEM: u8 = 2;
    pub const GHOST: u8 = 3;
    pub const PACMAN: u8 = 4;
}

/// Volume used for every gameplay sound effect.
pub const EFFECT_VOLUME: f32 = 0.1;

pub mod atlas {
    /// Describes how a sprite sheet is cut into evenly sized sprites.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SheetLayout {
        pub prefix: &'static str,
        pub sprite_width: u32,
        pub sprite_height: u32,
        pub rows: u32,
        pub columns: u32,
        pub spacing: u32,
        pub border: u32,
    }

    /// A sprite sheet the game loads at scene construction.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SheetSource {
        pub atlas: &'static str,
        pub source: &'static str,
        pub width: u32,
        pub height: u32,
        pub alpha: bool,
        /// `None` means the whole sheet becomes a single sprite named after the atlas.
        pub layout: Option<SheetLayout>,
    }

    pub const WALLS: &str = "walls";
    pub const COINS: &str = "coins";
    pub const GHOSTS: &str = "ghosts";
    pub const PACMANS: &str = "pacmans";
    pub const PORTALS: &str = "portals";
    pub const BACKGROUND: &str = "background";

    pub const WALLS_PREFIX: &str = "walls_";
    pub const COINS_PREFIX: &str = "coins_";
    pub const GHOSTS_PREFIX: &str = "ghosts_";
    pub const PACMANS_PREFIX: &str = "pacmans_";
    pub const PORTALS_PREFIX: &str = "portals_";

    const fn even(prefix: &'static str, rows: u32, columns: u32) -> SheetLayout {
        SheetLayout {
            prefix,
            sprite_width: 16,
            sprite_height: 16,
            rows,
            columns,
            spacing: 0,
            border: 0,
        }
    }

    pub const SHEETS: [SheetSource; 6] = [
        SheetSource {
            atlas: BACKGROUND,
            source: "assets/textures/pacman/background.png",
            width: 448,
            height: 496,
            alpha: false,
            layout: None,
        },
        SheetSource {
            atlas: PACMANS,
            source: "assets/textures/pacman/pacmans.png",
            width: 176,
            height: 32,
            alpha: true,
            layout: Some(even(PACMANS_PREFIX, 2, 11)),
        },
        SheetSource {
            atlas: WALLS,
            source: "assets/textures/pacman/walls.png",
            width: 144,
            height: 32,
            alpha: true,
            layout: Some(even(WALLS_PREFIX, 2, 9)),
        },
        SheetSource {
            atlas: COINS,
            source: "assets/textures/pacman/coins.png",
            width: 64,
            height: 16,
            alpha: true,
            layout: Some(even(COINS_PREFIX, 1, 4)),
        },
        // Portals reuse the coin sheet.
        SheetSource {
            atlas: PORTALS,
            source: "assets/textures/pacman/coins.png",
            width: 64,
            height: 16,
            alpha: true,
            layout: Some(even(PORTALS_PREFIX, 1, 4)),
        },
        SheetSource {
            atlas: GHOSTS,
            source: "assets/textures/pacman/ghosts.png",
            width: 128,
            height: 16,
            alpha: true,
            layout: Some(even(GHOSTS_PREFIX, 1, 8)),
        },
    ];
}

pub mod shader {
    pub const SPRITE: &str = "sprite-shader";

    pub const UNIFORM_TEXTURE: &str = "uTexture";
    pub const UNIFORM_MVP: &str = "mvp";
    pub const UNIFORM_COLOR: &str = "uColor";
    pub const UNIFORM_TEXTURE_SET: &str = "textureSet";

    pub const ATTRIBUTE_COLORS: &str = "aColors";
    pub const ATTRIBUTE_VERTICES: &str = "aVertices";
    pub const ATTRIBUTE_UVS: &str = "aUvs";

    pub const SPRITE_VERTEX: &str = r#"#version 300 es
in vec3 aVertices;
in vec4 aColors;
in vec2 aUvs;
uniform mat4 mvp;
out vec4 vColor;
out vec2 vUv;
void main() {
    vColor = aColors;
    vUv = aUvs;
    gl_Position = mvp * vec4(aVertices, 1.0);
}
"#;

    pub const SPRITE_FRAGMENT: &str = r#"#version 300 es
precision mediump float;
in vec4 vColor;
in vec2 vUv;
uniform sampler2D uTexture;
uniform vec4 uColor;
uniform int textureSet;
out vec4 outColor;
void main() {
    vec4 base = textureSet == 1 ? texture(uTexture, vUv) : vec4(1.0);
    outColor = base * vColor * uColor;
}
"#;
}
