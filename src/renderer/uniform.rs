//! Uniform blocks uploaded to the GPU.
//!
//! Each struct mirrors a WGSL `struct` bound with `var<uniform>`. Sizes are
//! padded to 16 bytes to satisfy uniform buffer layout rules.

/// Mirrors `Camera` in `camera.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
}

/// Mirrors `Selection` in `pieces.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SelectionUniform {
    /// Entity id of the selected piece, or `-1`.
    pub selected: i32,
    pub _padding: [i32; 3],
}

/// Mirrors `Highlight` in `overlay.wgsl`. Absent tiles are `[-1, -1]`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct HighlightUniform {
    pub hovered: [i32; 2],
    pub prev_move: [i32; 2],
}

/// Mirrors `Wave` in `loading.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WaveUniform {
    /// Seconds since the loading screen appeared.
    pub time: f32,
    pub _padding: [f32; 3],
}

/// Mirrors `Fade` in `fade.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FadeUniform {
    pub opacity: f32,
    pub _padding: [f32; 3],
}

/// Raw bytes of any uniform block for `queue.write_buffer`.
pub fn as_bytes<T: bytemuck::Pod>(uniform: &T) -> &[u8] {
    bytemuck::bytes_of(uniform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_are_16_byte_multiples() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
        assert_eq!(std::mem::size_of::<SelectionUniform>(), 16);
        assert_eq!(std::mem::size_of::<HighlightUniform>(), 16);
        assert_eq!(std::mem::size_of::<WaveUniform>(), 16);
        assert_eq!(std::mem::size_of::<FadeUniform>(), 16);
    }
}
