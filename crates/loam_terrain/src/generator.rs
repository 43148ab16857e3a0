use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::time::Instant;

use glam::Vec3;
use serde::Serialize;

use crate::blend;
use crate::chunk::{Chunk, ChunkCoord};
use crate::chunk_map::ChunkMap;
use crate::config::GenerationConfig;
use crate::error::TerrainError;
use crate::mesh_gen::build_chunk;
use crate::seed::WorldSeed;
use crate::sink::{MeshSink, SectionBuffers};
use crate::slope;

/// Marks a worker that holds no job
const IDLE: u32 = u32::MAX;

/// Where a generation run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Seeding,
    Dispatching,
    Joining,
    Reordering,
    Smoothing,
    Published,
}

/// Summary of one finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    /// Seed actually used; feed it back in to reproduce the run
    pub seed: u32,
    pub chunk_count: usize,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Highest vertex across all chunks
    pub highest_point: Vec3,
    pub elapsed_ms: f64,
}

/// Chunk coordinates paired with their section index, in section order.
///
/// Rows run from +view_distance down to -view_distance, columns from
/// -view_distance up to +view_distance.
pub fn chunk_layout(config: &GenerationConfig) -> Vec<(ChunkCoord, u32)> {
    if config.unbounded {
        return vec![(ChunkCoord::ORIGIN, 0)];
    }

    let v = config.view_distance as i32;
    let mut layout = Vec::with_capacity(config.chunk_count());
    let mut section = 0;

    for y in (-v..=v).rev() {
        for x in -v..=v {
            layout.push((ChunkCoord::new(x, y), section));
            section += 1;
        }
    }

    layout
}

/// Drives one terrain generation run from seed resolution to publication.
pub struct Generator {
    config: GenerationConfig,
    origin: Vec3,
    map: ChunkMap,
    state: GenerationState,
    generated_seed: Option<WorldSeed>,
}

impl Generator {
    pub fn new(config: GenerationConfig, origin: Vec3) -> Result<Self, TerrainError> {
        config.validate()?;

        Ok(Self {
            config,
            origin,
            map: ChunkMap::new(),
            state: GenerationState::Idle,
            generated_seed: None,
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Replace the configuration used by the next run
    pub fn set_config(&mut self, config: GenerationConfig) -> Result<(), TerrainError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Seed resolved by the most recent run
    pub fn generated_seed(&self) -> Option<u32> {
        self.generated_seed.map(|seed| seed.value)
    }

    pub fn chunk_map(&self) -> &ChunkMap {
        &self.map
    }

    /// Run a full generation and publish every section to `sink`.
    ///
    /// A panicking chunk worker aborts the run: the map is cleared and the
    /// generator returns to `Idle`.
    pub fn generate(&mut self, sink: &mut dyn MeshSink) -> Result<GenerationReport, TerrainError> {
        self.generate_with(sink, build_chunk)
    }

    /// `generate` with the per-chunk builder supplied by the caller
    fn generate_with<B>(&mut self, sink: &mut dyn MeshSink, build: B) -> Result<GenerationReport, TerrainError>
    where
        B: Fn(ChunkCoord, u32, &GenerationConfig, WorldSeed, Vec3) -> Chunk + Sync,
    {
        let started = Instant::now();

        self.transition(GenerationState::Seeding);
        self.map.clear(sink);
        let seed = WorldSeed::resolve(self.config.seed);
        self.generated_seed = Some(seed);

        let layout = chunk_layout(&self.config);
        log::info!(
            "Generating {} chunks ({}x{} cells each) with seed {}",
            layout.len(),
            self.config.columns,
            self.config.rows,
            seed.value
        );

        self.map.reset(layout.len());
        self.transition(GenerationState::Dispatching);

        let config = &self.config;
        let origin = self.origin;
        let joined = dispatch_and_join(
            &layout,
            config.max_workers,
            &mut self.map,
            &mut self.state,
            |coord, section| build(coord, section, config, seed, origin),
        )
        .and_then(|()| match self.map.first_missing() {
            Some(section) => Err(TerrainError::MissingChunk { section }),
            None => Ok(()),
        });

        if let Err(e) = joined {
            log::warn!("Generation aborted: {}", e);
            self.map.clear(sink);
            self.transition(GenerationState::Idle);
            return Err(e);
        }

        self.transition(GenerationState::Reordering);
        self.map.sort_by_section();

        self.transition(GenerationState::Smoothing);
        if self.config.apply_material_blend {
            blend::apply_material_blend(&mut self.map, &self.config, seed);
        }
        if self.config.apply_slope_blend {
            slope::apply_slope_blend(&mut self.map, &self.config);
        }

        for chunk in self.map.chunks() {
            sink.publish_section(chunk.section_index, &SectionBuffers::from_chunk(chunk));
        }
        self.transition(GenerationState::Published);

        let report = self.report(seed, started);
        log::info!(
            "Published {} sections: {} vertices, {} triangles in {:.1} ms",
            report.chunk_count,
            report.vertex_count,
            report.triangle_count,
            report.elapsed_ms
        );

        Ok(report)
    }

    fn transition(&mut self, next: GenerationState) {
        log::debug!("Generation state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn report(&self, seed: WorldSeed, started: Instant) -> GenerationReport {
        let highest_point = self
            .map
            .chunks()
            .map(|chunk| chunk.positions[chunk.max_z_vertex])
            .max_by(|a, b| a[2].total_cmp(&b[2]))
            .map(Vec3::from_array)
            .unwrap_or(self.origin);

        GenerationReport {
            seed: seed.value,
            chunk_count: self.map.len(),
            vertex_count: self.map.chunks().map(Chunk::vertex_count).sum(),
            triangle_count: self.map.chunks().map(Chunk::triangle_count).sum(),
            highest_point,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

/// Fan out one build job per layout entry and block until every worker
/// has exited. Workers pull jobs from a shared cursor and hand finished
/// chunks back over a channel; only this thread writes to the map.
fn dispatch_and_join<B>(
    layout: &[(ChunkCoord, u32)],
    max_workers: usize,
    map: &mut ChunkMap,
    state: &mut GenerationState,
    build: B,
) -> Result<(), TerrainError>
where
    B: Fn(ChunkCoord, u32) -> Chunk + Sync,
{
    let worker_count = match max_workers {
        0 => layout.len(),
        limit => limit.min(layout.len()),
    };
    let cursor = AtomicUsize::new(0);
    let in_flight: Vec<AtomicU32> = (0..worker_count).map(|_| AtomicU32::new(IDLE)).collect();

    std::thread::scope(|scope| {
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<Chunk>();
        let cursor = &cursor;
        let in_flight = &in_flight;
        let build = &build;

        let handles: Vec<_> = (0..worker_count)
            .map(|worker_id| {
                let result_tx = result_tx.clone();
                scope.spawn(move || loop {
                    let next = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(&(coord, section)) = layout.get(next) else {
                        break;
                    };

                    in_flight[worker_id].store(section, Ordering::Relaxed);
                    let chunk = build(coord, section);
                    in_flight[worker_id].store(IDLE, Ordering::Relaxed);

                    if result_tx.send(chunk).is_err() {
                        break;
                    }
                })
            })
            .collect();

        // Workers hold the only senders now; the channel closes once they exit
        drop(result_tx);
        log::debug!("Generation state {:?} -> {:?}", *state, GenerationState::Joining);
        *state = GenerationState::Joining;

        for chunk in result_rx.iter() {
            map.add_chunk(chunk);
        }

        let mut failure = None;
        for (worker_id, handle) in handles.into_iter().enumerate() {
            if handle.join().is_err() && failure.is_none() {
                let section = in_flight[worker_id].load(Ordering::Relaxed);
                failure = Some(TerrainError::WorkerPanicked {
                    section: (section != IDLE).then_some(section),
                });
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn config() -> GenerationConfig {
        GenerationConfig {
            rows: 8,
            columns: 8,
            cell_width: 100.0,
            cell_height: 100.0,
            height_ceiling: 500.0,
            frequency: 10.0,
            octaves: 3,
            seed: 42,
            ..Default::default()
        }
    }

    #[test]
    fn test_layout_scan_order() {
        let layout = chunk_layout(&GenerationConfig { view_distance: 1, ..config() });
        let coords: Vec<(i32, i32)> = layout.iter().map(|(c, _)| (c.x, c.y)).collect();

        assert_eq!(
            coords,
            vec![(-1, 1), (0, 1), (1, 1), (-1, 0), (0, 0), (1, 0), (-1, -1), (0, -1), (1, -1)]
        );
        assert!(layout.iter().enumerate().all(|(i, (_, s))| *s as usize == i));
    }

    #[test]
    fn test_unbounded_layout_is_single_chunk() {
        let layout = chunk_layout(&GenerationConfig { unbounded: true, view_distance: 5, ..config() });
        assert_eq!(layout, vec![(ChunkCoord::ORIGIN, 0)]);
    }

    #[test]
    fn test_generate_reaches_published() {
        let mut generator = Generator::new(config(), Vec3::ZERO).unwrap();
        let mut sink = MemorySink::default();
        assert_eq!(generator.state(), GenerationState::Idle);

        let report = generator.generate(&mut sink).unwrap();

        assert_eq!(generator.state(), GenerationState::Published);
        assert_eq!(generator.generated_seed(), Some(42));
        assert_eq!(report.seed, 42);
        assert_eq!(report.chunk_count, 9);
        assert_eq!(report.vertex_count, 9 * 81);
        assert_eq!(report.triangle_count, 9 * 128);
        assert_eq!(sink.clear_count, 1);
        assert_eq!(sink.publish_order, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn test_bounded_workers_match_unbounded() {
        let mut unbounded = Generator::new(config(), Vec3::ZERO).unwrap();
        let mut bounded = Generator::new(GenerationConfig { max_workers: 2, ..config() }, Vec3::ZERO).unwrap();
        let mut a = MemorySink::default();
        let mut b = MemorySink::default();

        unbounded.generate(&mut a).unwrap();
        bounded.generate(&mut b).unwrap();

        assert_eq!(a.sections, b.sections);
    }

    #[test]
    fn test_highest_point_is_reported() {
        let mut generator = Generator::new(config(), Vec3::new(0.0, 0.0, 20.0)).unwrap();
        let mut sink = MemorySink::default();
        let report = generator.generate(&mut sink).unwrap();

        let highest = sink
            .sections
            .values()
            .flat_map(|s| s.positions.iter())
            .map(|p| p[2])
            .fold(f32::MIN, f32::max);
        assert_eq!(report.highest_point.z, highest);
    }

    fn stub_chunk(coord: ChunkCoord, section: u32) -> Chunk {
        Chunk::with_capacity(coord, section, 2, 2)
    }

    #[test]
    fn test_panicked_worker_fails_join() {
        let layout = chunk_layout(&config());
        let mut map = ChunkMap::new();
        let mut state = GenerationState::Dispatching;
        map.reset(layout.len());

        let result = dispatch_and_join(&layout, 0, &mut map, &mut state, |coord, section| {
            if section == 4 {
                panic!("chunk {} failed", section);
            }
            stub_chunk(coord, section)
        });

        assert!(matches!(result, Err(TerrainError::WorkerPanicked { section: Some(4) })));
        assert_eq!(state, GenerationState::Joining);
        assert_eq!(map.len(), 8);
        assert_eq!(map.first_missing(), Some(4));
    }

    #[test]
    fn test_surviving_workers_drain_the_queue() {
        let layout = chunk_layout(&config());
        let mut map = ChunkMap::new();
        let mut state = GenerationState::Dispatching;
        map.reset(layout.len());

        // One of the two workers dies on its first job; the other builds the rest
        let result = dispatch_and_join(&layout, 2, &mut map, &mut state, |coord, section| {
            if section == 0 {
                panic!("chunk {} failed", section);
            }
            stub_chunk(coord, section)
        });

        assert!(matches!(result, Err(TerrainError::WorkerPanicked { section: Some(0) })));
        assert_eq!(map.len(), 8);
        assert_eq!(map.first_missing(), Some(0));
    }

    #[test]
    fn test_panicked_worker_aborts_run() {
        let mut generator = Generator::new(config(), Vec3::ZERO).unwrap();
        let mut sink = MemorySink::default();
        generator.generate(&mut sink).unwrap();
        assert_eq!(sink.sections.len(), 9);

        let result = generator.generate_with(&mut sink, |coord, section, config, seed, origin| {
            if section == 6 {
                panic!("chunk {} failed", section);
            }
            build_chunk(coord, section, config, seed, origin)
        });

        assert!(matches!(result, Err(TerrainError::WorkerPanicked { section: Some(6) })));
        assert_eq!(generator.state(), GenerationState::Idle);
        assert!(generator.chunk_map().is_empty());
        // Once at the start of each run, once more on abort
        assert_eq!(sink.clear_count, 3);
        assert!(sink.sections.is_empty());
    }

    #[test]
    fn test_missing_section_aborts_run() {
        let mut generator = Generator::new(config(), Vec3::ZERO).unwrap();
        let mut sink = MemorySink::default();

        // Section 2 comes back tagged with an index outside the layout
        let result = generator.generate_with(&mut sink, |coord, section, _config, _seed, _origin| {
            stub_chunk(coord, if section == 2 { 9 } else { section })
        });

        assert!(matches!(result, Err(TerrainError::MissingChunk { section: 2 })));
        assert_eq!(generator.state(), GenerationState::Idle);
        assert!(generator.chunk_map().is_empty());
        assert_eq!(sink.clear_count, 2);
        assert!(sink.publish_order.is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(Generator::new(GenerationConfig { octaves: 40, ..config() }, Vec3::ZERO).is_err());
    }
}
