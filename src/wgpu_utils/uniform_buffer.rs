use std::marker::PhantomData;

/// Typed uniform buffer that skips redundant uploads
pub struct UniformBuffer<Content> {
    buffer: wgpu::Buffer,
    content_type: PhantomData<Content>,
    previous_content: Vec<u8>,
}

impl<Content: bytemuck::Pod> UniformBuffer<Content> {
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Content>();
        let pos = type_name.rfind(':').unwrap_or(0);
        if pos > 0 {
            &type_name[(pos + 1)..]
        } else {
            type_name
        }
    }

    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", Self::name())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: Vec::new(),
        }
    }

    /// Create buffer with initial data
    pub fn new_with_data(device: &wgpu::Device, initial_content: &Content) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", Self::name())),
            size: std::mem::size_of::<Content>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: true,
        });

        buffer
            .slice(..)
            .get_mapped_range_mut()
            .copy_from_slice(bytemuck::bytes_of(initial_content));
        buffer.unmap();

        UniformBuffer {
            buffer,
            content_type: PhantomData,
            previous_content: bytemuck::bytes_of(initial_content).to_vec(),
        }
    }

    /// Writes new content unless it is byte-identical to the last upload
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: Content) {
        let new_content = bytemuck::bytes_of(&content);
        if self.previous_content == new_content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, new_content);
        self.previous_content = new_content.to_vec();
    }

    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wgpu_utils::noop_device;

    #[repr(C)]
    #[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
    struct Tint {
        color: [f32; 4],
    }

    #[test]
    fn identical_content_is_not_reuploaded() {
        let (device, queue) = noop_device();
        let mut ubo = UniformBuffer::new_with_data(&device, &Tint { color: [1.0; 4] });
        assert_eq!(ubo.previous_content, bytemuck::bytes_of(&Tint { color: [1.0; 4] }));

        ubo.update_content(&queue, Tint { color: [0.5, 0.5, 0.5, 1.0] });
        assert_eq!(
            ubo.previous_content,
            bytemuck::bytes_of(&Tint { color: [0.5, 0.5, 0.5, 1.0] })
        );
    }

    #[test]
    fn fresh_buffer_uploads_first_content() {
        let (device, queue) = noop_device();
        let mut ubo = UniformBuffer::<Tint>::new(&device);
        assert!(ubo.previous_content.is_empty());
        ubo.update_content(&queue, Tint { color: [0.0; 4] });
        assert_eq!(ubo.previous_content.len(), std::mem::size_of::<Tint>());
        assert_eq!(UniformBuffer::<Tint>::name(), "Tint");
    }
}
