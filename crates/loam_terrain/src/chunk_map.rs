use crate::chunk::{Chunk, ChunkCoord};
use crate::sink::MeshSink;

/// Owns every chunk of the current run, one slot per section index.
///
/// Slots are sized before dispatch. `order` records insertion order, which is
/// completion order until `sort_by_section` runs.
#[derive(Debug, Default)]
pub struct ChunkMap {
    slots: Vec<Option<Chunk>>,
    order: Vec<u32>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all chunks and size the map for `chunk_count` sections
    pub fn reset(&mut self, chunk_count: usize) {
        self.slots.clear();
        self.slots.resize_with(chunk_count, || None);
        self.order.clear();
        self.order.reserve(chunk_count);
    }

    /// Discard every chunk and tell the sink to drop its sections
    pub fn clear(&mut self, sink: &mut dyn MeshSink) {
        let dropped = self.len();
        self.slots.clear();
        self.order.clear();
        sink.clear_sections();
        log::debug!("Cleared chunk map ({} chunks)", dropped);
    }

    /// Store a finished chunk in its section slot.
    ///
    /// Each section index may be added once per run.
    pub fn add_chunk(&mut self, chunk: Chunk) {
        let section = chunk.section_index as usize;
        if section >= self.slots.len() {
            self.slots.resize_with(section + 1, || None);
        }

        debug_assert!(
            self.slots[section].is_none(),
            "section {} added twice",
            section
        );

        self.order.push(chunk.section_index);
        self.slots[section] = Some(chunk);
    }

    pub fn sort_by_section(&mut self) {
        self.order.sort_unstable();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, section: u32) -> Option<&Chunk> {
        self.slots.get(section as usize).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, section: u32) -> Option<&mut Chunk> {
        self.slots.get_mut(section as usize).and_then(Option::as_mut)
    }

    pub fn find(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks().find(|chunk| chunk.coord == coord)
    }

    /// First section slot still empty, if any
    pub fn first_missing(&self) -> Option<u32> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(|section| section as u32)
    }

    /// Section indices in insertion order
    pub fn order(&self) -> &[u32] {
        &self.order
    }

    /// Chunks in insertion order
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.order.iter().filter_map(|&section| self.get(section))
    }

    /// Mutable access to every chunk, in section order. Chunks are disjoint,
    /// so callers may process them independently.
    pub fn chunks_mut(&mut self) -> impl Iterator<Item = &mut Chunk> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }
}
