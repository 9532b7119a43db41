//! WGPU utility functions and helpers

pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;

/// Device on wgpu's noop backend: no GPU work happens, but resource and
/// pipeline validation runs as on real hardware.
#[cfg(test)]
pub(crate) fn noop_device() -> (std::sync::Arc<wgpu::Device>, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::NOOP,
        backend_options: wgpu::BackendOptions {
            noop: wgpu::NoopBackendOptions { enable: true },
            ..Default::default()
        },
        ..Default::default()
    });

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
        .expect("noop adapter");
    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Noop Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::default(),
        trace: wgpu::Trace::Off,
    }))
    .expect("noop device");

    (std::sync::Arc::new(device), queue)
}
