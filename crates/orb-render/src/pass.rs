//! Per-frame command encoding and the main render pass.

use std::sync::Arc;

/// Describes the clear and depth setup of a render pass.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    clear_color: wgpu::Color,
    depth_view: Option<&'a wgpu::TextureView>,
    depth_clear: f32,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            depth_view: None,
            depth_clear: crate::DepthBuffer::CLEAR_VALUE,
            label: None,
        }
    }

    #[must_use]
    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    #[must_use]
    pub fn depth(mut self, view: &'a wgpu::TextureView, clear_value: f32) -> Self {
        self.depth_view = Some(view);
        self.depth_clear = clear_value;
        self
    }

    #[must_use]
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        color_view: &'e wgpu::TextureView,
    ) -> wgpu::RenderPass<'e>
    where
        'a: 'e,
    {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_view
                .map(|view| wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.depth_clear),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Owns one frame's command encoder and surface texture. Submits and
/// presents on [`submit`](Self::submit), or on drop if that was skipped.
pub struct FrameEncoder {
    encoder: Option<wgpu::CommandEncoder>,
    queue: Arc<wgpu::Queue>,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view,
        }
    }

    pub fn begin_render_pass<'e>(
        &'e mut self,
        builder: &RenderPassBuilder<'e>,
    ) -> wgpu::RenderPass<'e> {
        let encoder = self
            .encoder
            .as_mut()
            .expect("encoder is present until submit consumes the frame");
        builder.begin(encoder, &self.surface_view)
    }

    pub fn submit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            self.queue.submit([encoder.finish()]);
            surface_texture.present();
        }
    }
}

impl Drop for FrameEncoder {
    fn drop(&mut self) {
        if self.encoder.is_some() {
            log::warn!("FrameEncoder dropped without submit(), submitting now");
            self.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_black_without_depth() {
        let b = RenderPassBuilder::new();
        assert_eq!(b.clear_color, wgpu::Color::BLACK);
        assert!(b.depth_view.is_none());
        assert_eq!(b.depth_clear, 0.0);
    }

    #[test]
    fn test_builder_sets_clear_color_and_label() {
        let color = wgpu::Color {
            r: 0.1,
            g: 0.2,
            b: 0.3,
            a: 1.0,
        };
        let b = RenderPassBuilder::new().clear_color(color).label("main");
        assert_eq!(b.clear_color, color);
        assert_eq!(b.label, Some("main"));
    }
}
