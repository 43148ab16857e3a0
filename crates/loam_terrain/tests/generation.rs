use glam::Vec3;
use loam_terrain::{
    build_chunk, chunk_layout, ChunkCoord, Edge, GenerationConfig, Generator, MaterialLayer, MemorySink,
    WorldSeed, RANDOM_SEED,
};

fn scenario_config() -> GenerationConfig {
    GenerationConfig {
        seed: 42,
        rows: 2,
        columns: 2,
        cell_width: 100.0,
        cell_height: 100.0,
        height_ceiling: 500.0,
        frequency: 10.0,
        octaves: 3,
        terrain_cut: 1.0,
        invert_world: false,
        view_distance: 1,
        unbounded: true,
        ..Default::default()
    }
}

fn world_config(seed: u32) -> GenerationConfig {
    GenerationConfig {
        seed,
        rows: 16,
        columns: 12,
        cell_width: 80.0,
        cell_height: 120.0,
        height_ceiling: 2000.0,
        frequency: 4.0,
        octaves: 5,
        view_distance: 1,
        material_max_deviation: 0.05,
        apply_material_blend: true,
        material_blend_probability: 0.6,
        apply_slope_blend: true,
        slope_height_multiplier: 0.01,
        ..Default::default()
    }
}

fn run(config: GenerationConfig, origin: Vec3) -> (MemorySink, loam_terrain::GenerationReport) {
    let mut generator = Generator::new(config, origin).unwrap();
    let mut sink = MemorySink::default();
    let report = generator.generate(&mut sink).unwrap();
    (sink, report)
}

#[test]
fn test_fixed_seed_is_byte_identical() {
    let (a, _) = run(world_config(1587), Vec3::new(10.0, 20.0, 30.0));
    let (b, _) = run(world_config(1587), Vec3::new(10.0, 20.0, 30.0));

    assert_eq!(a.sections.len(), b.sections.len());
    for (section, left) in &a.sections {
        let right = &b.sections[section];
        let (l, r) = (left.buffers(), right.buffers());
        assert_eq!(l.position_bytes(), r.position_bytes(), "positions of section {section}");
        assert_eq!(l.color_bytes(), r.color_bytes(), "colors of section {section}");
        assert_eq!(l.triangle_bytes(), r.triangle_bytes(), "triangles of section {section}");
    }
}

#[test]
fn test_different_seeds_differ() {
    let (a, _) = run(world_config(1), Vec3::ZERO);
    let (b, _) = run(world_config(2), Vec3::ZERO);
    assert_ne!(a.sections[&4].positions, b.sections[&4].positions);
}

#[test]
fn test_border_vertices_keep_base_layer() {
    let config = GenerationConfig {
        bleed: loam_terrain::BleedProbabilities {
            first_on_second: 0.5,
            first_on_third: 0.5,
            second_on_first: 0.5,
            second_on_third: 0.5,
            third_on_first: 0.5,
            third_on_second: 0.5,
        },
        second_material_under_water: false,
        ..world_config(77)
    };
    let seed = WorldSeed::new(77);
    let mut interior_bled = 0;

    for (coord, section) in chunk_layout(&config) {
        let chunk = build_chunk(coord, section, &config, seed, Vec3::ZERO);

        for row in 0..chunk.vertex_rows {
            for column in 0..chunk.vertex_columns {
                let i = chunk.vertex_index(row, column);
                if chunk.is_border(row, column) {
                    assert_eq!(chunk.weight(i), chunk.layers[i].weight(), "border ({row}, {column}) of {coord:?}");
                } else if !chunk.layers[i].matches_weight(chunk.weight(i)) {
                    interior_bled += 1;
                }
            }
        }
    }

    // Sanity check that bleed was actually active
    assert!(interior_bled > 0);
}

#[test]
fn test_adjacent_chunks_meet_at_shared_edges() {
    let config = world_config(5);
    let seed = WorldSeed::new(5);
    let origin = Vec3::new(-500.0, 250.0, 0.0);
    let center = build_chunk(ChunkCoord::new(0, 0), 4, &config, seed, origin);
    let right = build_chunk(ChunkCoord::new(1, 0), 5, &config, seed, origin);
    let above = build_chunk(ChunkCoord::new(0, 1), 1, &config, seed, origin);

    for (neighbor, edge) in [(&right, Edge::Right), (&above, Edge::Top)] {
        let ours = center.edge_vertices(edge);
        let theirs = neighbor.edge_vertices(edge.opposite());
        assert_eq!(ours.len(), theirs.len());

        for (a, b) in ours.into_iter().zip(theirs) {
            assert_eq!(center.positions[a], neighbor.positions[b]);
        }
    }
}

#[test]
fn test_sections_published_in_ascending_order() {
    let config = GenerationConfig { view_distance: 2, rows: 4, columns: 4, ..world_config(9) };
    let (sink, report) = run(config, Vec3::ZERO);

    assert_eq!(report.chunk_count, 25);
    assert_eq!(sink.publish_order, (0..25).collect::<Vec<u32>>());
    assert_eq!(sink.sections.keys().copied().collect::<Vec<_>>(), (0..25).collect::<Vec<u32>>());
}

#[test]
fn test_heights_stay_within_ceiling() {
    let origin = Vec3::new(0.0, 0.0, -150.0);
    for (cut, invert) in [(1.0, false), (0.5, false), (1.0, true), (0.3, true), (0.0, false)] {
        let config = GenerationConfig {
            terrain_cut: cut,
            invert_world: invert,
            frequency: 20.0,
            octaves: 8,
            ..world_config(31)
        };
        let ceiling = config.height_ceiling;
        let (sink, _) = run(config, origin);

        for section in sink.sections.values() {
            for p in &section.positions {
                assert!(
                    p[2] >= origin.z && p[2] <= origin.z + ceiling,
                    "z {} outside [{}, {}] (cut {cut}, invert {invert})",
                    p[2],
                    origin.z,
                    origin.z + ceiling
                );
            }
        }
    }
}

#[test]
fn test_triangle_count_is_two_per_cell() {
    for (rows, columns) in [(1, 1), (1, 5), (3, 2), (7, 9)] {
        let config = GenerationConfig { rows, columns, ..world_config(3) };
        let chunk = build_chunk(ChunkCoord::ORIGIN, 0, &config, WorldSeed::new(3), Vec3::ZERO);
        assert_eq!(chunk.triangle_count(), 2 * rows as usize * columns as usize);
    }
}

#[test]
fn test_small_scenario() {
    let (first, report) = run(scenario_config(), Vec3::ZERO);

    assert_eq!(report.chunk_count, 1);
    let section = &first.sections[&0];
    assert_eq!(section.positions.len(), 9);
    assert_eq!(section.triangles.len() / 3, 8);
    assert!(section.positions.iter().all(|p| (0.0..=500.0).contains(&p[2])));

    let (second, _) = run(scenario_config(), Vec3::ZERO);
    assert_eq!(section.positions, second.sections[&0].positions);
}

#[test]
fn test_random_seed_is_reported_and_reproducible() {
    let config = GenerationConfig { seed: RANDOM_SEED, ..world_config(RANDOM_SEED) };
    let mut generator = Generator::new(config.clone(), Vec3::ZERO).unwrap();
    let mut random_run = MemorySink::default();
    let report = generator.generate(&mut random_run).unwrap();

    let generated = generator.generated_seed().unwrap();
    assert_eq!(generated, report.seed);
    assert_ne!(generated, RANDOM_SEED);

    let (replay, _) = run(GenerationConfig { seed: generated, ..config }, Vec3::ZERO);
    assert_eq!(random_run.sections, replay.sections);
}

#[test]
fn test_regenerating_clears_previous_sections() {
    let mut generator = Generator::new(GenerationConfig { view_distance: 2, ..world_config(4) }, Vec3::ZERO).unwrap();
    let mut sink = MemorySink::default();
    generator.generate(&mut sink).unwrap();
    assert_eq!(sink.sections.len(), 25);

    generator
        .set_config(GenerationConfig { view_distance: 1, ..world_config(4) })
        .unwrap();
    generator.generate(&mut sink).unwrap();

    assert_eq!(sink.clear_count, 2);
    assert_eq!(sink.sections.len(), 9);
    assert_eq!(generator.chunk_map().len(), 9);
}

#[test]
fn test_smoothing_leaves_borders_alone() {
    let (sink, _) = run(world_config(12), Vec3::ZERO);
    let config = world_config(12);
    let seed = WorldSeed::new(12);

    for (coord, section) in chunk_layout(&config) {
        let raw = build_chunk(coord, section, &config, seed, Vec3::ZERO);
        let published = &sink.sections[&section];

        for row in 0..raw.vertex_rows {
            for column in 0..raw.vertex_columns {
                if raw.is_border(row, column) {
                    let i = raw.vertex_index(row, column);
                    assert_eq!(raw.colors[i], published.colors[i]);
                }
            }
        }
    }
}

#[test]
fn test_every_published_weight_is_a_layer() {
    let (sink, _) = run(world_config(21), Vec3::ZERO);
    for section in sink.sections.values() {
        assert!(section
            .colors
            .iter()
            .all(|c| MaterialLayer::from_weight(c[3]).is_some()));
    }
}
