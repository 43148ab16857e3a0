use std::collections::BTreeMap;

use crate::chunk::Chunk;

/// Borrowed mesh buffers for one published section
#[derive(Debug, Clone, Copy)]
pub struct SectionBuffers<'a> {
    pub positions: &'a [[f32; 3]],
    pub triangles: &'a [u32],
    pub normals: &'a [[f32; 3]],
    pub uvs: &'a [[f32; 2]],
    pub colors: &'a [[f32; 4]],
    pub tangents: &'a [[f32; 3]],
}

impl<'a> SectionBuffers<'a> {
    pub fn from_chunk(chunk: &'a Chunk) -> Self {
        Self {
            positions: &chunk.positions,
            triangles: &chunk.triangles,
            normals: &chunk.normals,
            uvs: &chunk.uvs,
            colors: &chunk.colors,
            tangents: &chunk.tangents,
        }
    }

    pub fn position_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.positions)
    }

    pub fn triangle_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.triangles)
    }

    pub fn color_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.colors)
    }

    pub fn to_section(&self) -> OwnedSection {
        OwnedSection {
            positions: self.positions.to_vec(),
            triangles: self.triangles.to_vec(),
            normals: self.normals.to_vec(),
            uvs: self.uvs.to_vec(),
            colors: self.colors.to_vec(),
            tangents: self.tangents.to_vec(),
        }
    }
}

/// Receives finished terrain sections, keyed by section index
pub trait MeshSink {
    /// Drop every previously published section
    fn clear_sections(&mut self);

    fn publish_section(&mut self, section: u32, buffers: &SectionBuffers<'_>);
}

/// Owned copy of one section
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OwnedSection {
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub tangents: Vec<[f32; 3]>,
}

impl OwnedSection {
    pub fn buffers(&self) -> SectionBuffers<'_> {
        SectionBuffers {
            positions: &self.positions,
            triangles: &self.triangles,
            normals: &self.normals,
            uvs: &self.uvs,
            colors: &self.colors,
            tangents: &self.tangents,
        }
    }
}

/// Keeps every published section in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub sections: BTreeMap<u32, OwnedSection>,
    /// Section indices in the order they were published
    pub publish_order: Vec<u32>,
    pub clear_count: usize,
}

impl MeshSink for MemorySink {
    fn clear_sections(&mut self) {
        self.sections.clear();
        self.publish_order.clear();
        self.clear_count += 1;
    }

    fn publish_section(&mut self, section: u32, buffers: &SectionBuffers<'_>) {
        self.publish_order.push(section);
        self.sections.insert(section, buffers.to_section());
    }
}
