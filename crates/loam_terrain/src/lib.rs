pub mod blend;
pub mod chunk;
pub mod chunk_map;
pub mod config;
pub mod error;
pub mod generator;
pub mod height;
pub mod material;
pub mod mesh_gen;
pub mod noise_util;
pub mod seed;
pub mod sink;
pub mod slope;

// Re-export commonly used items
pub use chunk::{Chunk, ChunkCoord, Edge};
pub use chunk_map::ChunkMap;
pub use config::{BleedProbabilities, GenerationConfig};
pub use error::TerrainError;
pub use generator::{chunk_layout, GenerationReport, GenerationState, Generator};
pub use height::HeightSampler;
pub use material::{Classification, MaterialClassifier, MaterialLayer};
pub use mesh_gen::build_chunk;
pub use seed::{SeedStream, WorldSeed, RANDOM_SEED};
pub use sink::{MemorySink, MeshSink, OwnedSection, SectionBuffers};
