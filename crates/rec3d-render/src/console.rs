use crate::camera::{Camera, Pose};
use crate::error::RenderError;
use crate::scene::{Hit, Map};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::time::Instant;

/// Nearest to farthest.
pub const GLYPH_RAMP: &[u8] = b"@%#*+=-:.";

/// Drawn where a ray hits nothing.
pub const BACKGROUND_GLYPH: char = ' ';

pub const DEFAULT_MAX_DISTANCE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Distance mapped onto the far end of [`GLYPH_RAMP`].
    pub max_distance: f64,
    /// Worker threads for row rendering; 0 uses rayon's global pool.
    pub threads: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            threads: 0,
        }
    }
}

/// Shade for a single cell. Hits at or past `max_distance` get the last
/// ramp glyph.
pub fn glyph_for(hit: Option<Hit>, max_distance: f64) -> char {
    let Some(hit) = hit else {
        return BACKGROUND_GLYPH;
    };
    let last = GLYPH_RAMP.len() - 1;
    let scaled = (hit.distance / max_distance * GLYPH_RAMP.len() as f64).floor();
    let bucket = if scaled.is_nan() || scaled < 0.0 {
        0
    } else {
        (scaled as usize).min(last)
    };
    char::from(GLYPH_RAMP[bucket])
}

/// One rendered screen, top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub rows: Vec<String>,
    pub pose: Pose,
}

impl Frame {
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

pub struct ConsoleRenderer {
    map: Map,
    camera: Camera,
    settings: RenderSettings,
    pool: Option<ThreadPool>,
}

impl ConsoleRenderer {
    pub fn new(map: Map, camera: Camera, settings: RenderSettings) -> Result<Self, RenderError> {
        if !(settings.max_distance.is_finite() && settings.max_distance > 0.0) {
            return Err(RenderError::MaxDistance(settings.max_distance));
        }
        let pool = if settings.threads == 0 {
            None
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(settings.threads)
                .build()
                .map_err(RenderError::ThreadPool)?;
            Some(pool)
        };

        Ok(Self {
            map,
            camera,
            settings,
            pool,
        })
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Casts one ray per cell. Rows are independent and rendered in parallel
    /// against the current camera snapshot.
    pub fn render(&self) -> Frame {
        let width = self.camera.width();
        let height = self.camera.height();
        let start = Instant::now();
        let mut cells = vec![BACKGROUND_GLYPH; width * height];

        self.with_thread_pool(|| {
            cells
                .par_chunks_mut(width)
                .enumerate()
                .for_each(|(row, line)| {
                    for (col, cell) in line.iter_mut().enumerate() {
                        let ray = self.camera.ray(col, row);
                        *cell = glyph_for(self.map.nearest(&ray), self.settings.max_distance);
                    }
                });
        });

        let rows = cells
            .chunks(width)
            .map(|line| line.iter().collect::<String>())
            .collect();

        tracing::debug!(
            width,
            height,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "frame rendered"
        );

        Frame {
            width,
            height,
            rows,
            pose: self.camera.pose(),
        }
    }

    fn with_thread_pool<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        match &self.pool {
            Some(pool) => pool.install(f),
            None => f(),
        }
    }
}
