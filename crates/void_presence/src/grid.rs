//! Presence map buffer shared with GPU consumers

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use parking_lot::RwLock;
use std::sync::Arc;

/// One presence map cell, laid out as an RGBA float texel:
/// rgb = world position of the nearest tracked object, a = strength
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PresenceTexel {
    pub position: [f32; 3],
    pub strength: f32,
}

impl PresenceTexel {
    /// Empty cell: zero position, zero strength
    pub const EMPTY: Self = Self {
        position: [0.0; 3],
        strength: 0.0,
    };

    pub fn new(position: Vec3, strength: f32) -> Self {
        Self {
            position: position.to_array(),
            strength,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn to_rgba(self) -> [f32; 4] {
        [self.position[0], self.position[1], self.position[2], self.strength]
    }
}

/// `width * height` texels in row-major order (`x + y * width`)
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceMap {
    width: u32,
    height: u32,
    texels: Vec<PresenceTexel>,
}

impl PresenceMap {
    /// Allocate a cleared map
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            texels: vec![PresenceTexel::EMPTY; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.texels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texels.is_empty()
    }

    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<PresenceTexel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.texels[self.index(x, y)])
    }

    pub fn texels(&self) -> &[PresenceTexel] {
        &self.texels
    }

    pub fn texels_mut(&mut self) -> &mut [PresenceTexel] {
        &mut self.texels
    }

    /// Reset every texel to [`PresenceTexel::EMPTY`]
    pub fn clear(&mut self) {
        self.texels.fill(PresenceTexel::EMPTY);
    }

    /// Raw pixel data for texture upload (RGBA32F)
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.texels)
    }
}

/// Presence map handle shared between a mapper (writer) and its consumers
pub type SharedPresenceMap = Arc<RwLock<PresenceMap>>;
