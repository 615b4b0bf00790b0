use tessel_engine::core::{App, AppControl, FrameCtx};
use tessel_engine::device::Gpu;
use tessel_engine::error::StartupError;
use tessel_engine::render::{GpuProgram, QuadTexture, Release, StaticMesh, Vertex};
use tessel_engine::shader::{self, LinkedProgram, ShaderError, ShaderSource};

use crate::geometry::{PositionVertex, TexturedVertex, SOLID_QUAD, TEXTURED_QUAD};
use crate::variant::DemoVariant;

/// Compiles both stages and links them. Runs entirely on the CPU; the
/// vertex stage is compiled first and its failure stops the build.
pub fn build_program(
    vertex: &ShaderSource,
    fragment: &ShaderSource,
) -> Result<LinkedProgram, ShaderError> {
    let vertex = shader::compile(vertex)?;
    let fragment = shader::compile(fragment)?;
    shader::link(vertex, fragment)
}

/// Texture bound to the program's resource slots.
struct SceneTexture {
    texture: QuadTexture,
    bind_group: wgpu::BindGroup,
}

impl Release for SceneTexture {
    fn release(self) {
        drop(self.bind_group);
        self.texture.release();
    }
}

/// Everything drawn each frame, created once in [`App::init`].
struct QuadScene<P = GpuProgram, M = StaticMesh, T = SceneTexture> {
    program: P,
    mesh: M,
    texture: Option<T>,
}

impl QuadScene {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if let Some(texture) = &self.texture {
            pass.set_bind_group(0, &texture.bind_group, &[]);
        }
        self.program.bind(pass);
        self.mesh.draw(pass);
    }
}

impl<P: Release, M: Release, T: Release> Release for QuadScene<P, M, T> {
    /// Program, then mesh, then texture.
    fn release(self) {
        let QuadScene { program, mesh, texture } = self;
        program.release();
        mesh.release();
        if let Some(texture) = texture {
            texture.release();
        }
    }
}

pub struct QuadApp {
    variant: DemoVariant,
    scene: Option<QuadScene>,
}

impl QuadApp {
    pub fn new(variant: DemoVariant) -> Self {
        Self { variant, scene: None }
    }
}

impl App for QuadApp {
    fn init(&mut self, gpu: &Gpu<'_>) -> Result<(), StartupError> {
        let (vs, fs) = self.variant.shaders();
        let linked = build_program(&vs, &fs)?;

        let device = gpu.device();
        let (program, mesh) = match self.variant {
            DemoVariant::Solid => (
                GpuProgram::new(device, gpu.surface_format(), linked, PositionVertex::layout())?,
                StaticMesh::upload(device, "solid quad", &SOLID_QUAD),
            ),
            DemoVariant::Textured => (
                GpuProgram::new(device, gpu.surface_format(), linked, TexturedVertex::layout())?,
                StaticMesh::upload(device, "textured quad", &TEXTURED_QUAD),
            ),
        };

        let texture = self.variant.texture_path().and_then(|path| {
            let texture = QuadTexture::load_or_placeholder(device, gpu.queue(), path);
            let bind_group = program.texture_bind_group(device, &texture)?;
            Some(SceneTexture { texture, bind_group })
        });

        self.scene = Some(QuadScene { program, mesh, texture });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_ref() else {
            return AppControl::Continue;
        };
        ctx.render(self.variant.background(), |pass| scene.draw(pass))
    }

    fn shutdown(&mut self) {
        if let Some(scene) = self.scene.take() {
            scene.release();
            log::debug!("{}: scene released", self.variant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tessel_engine::shader::{ResourceKind, StageKind, MAX_DIAGNOSTIC_LEN};

    fn shipped(variant: DemoVariant) -> LinkedProgram {
        let (vs, fs) = variant.shaders();
        build_program(&vs, &fs).unwrap()
    }

    // ── shipped shaders ───────────────────────────────────────────────────

    #[test]
    fn solid_program_links_without_resources() {
        let program = shipped(DemoVariant::Solid);
        assert!(program.resources().is_empty());
        assert_eq!(program.vertex_inputs().len(), 1);
    }

    #[test]
    fn textured_program_reflects_texture_and_sampler() {
        let program = shipped(DemoVariant::Textured);
        let kinds: Vec<(u32, ResourceKind)> =
            program.resources().iter().map(|r| (r.binding, r.kind)).collect();
        assert_eq!(kinds, vec![(0, ResourceKind::Texture2d), (1, ResourceKind::Sampler)]);
    }

    #[test]
    fn vertex_layouts_feed_every_input() {
        shipped(DemoVariant::Solid)
            .check_vertex_attributes(PositionVertex::ATTRIBUTES)
            .unwrap();
        shipped(DemoVariant::Textured)
            .check_vertex_attributes(TexturedVertex::ATTRIBUTES)
            .unwrap();
    }

    #[test]
    fn plain_layout_cannot_feed_textured_program() {
        let err = shipped(DemoVariant::Textured)
            .check_vertex_attributes(PositionVertex::ATTRIBUTES)
            .unwrap_err();
        assert!(err.log().as_str().contains("@location(1)"));
    }

    // ── build failures ────────────────────────────────────────────────────

    #[test]
    fn malformed_fragment_fails_before_linking() {
        let (vs, _) = DemoVariant::Solid.shaders();
        let fs = ShaderSource::fragment(
            "broken.frag",
            "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec4<f32>(1.0, 0.5 }",
        );

        match build_program(&vs, &fs).unwrap_err() {
            ShaderError::Compile { kind, label, log } => {
                assert_eq!(kind, StageKind::Fragment);
                assert_eq!(label, "broken.frag");
                assert!(!log.is_empty());
                assert!(log.len() <= MAX_DIAGNOSTIC_LEN);
            }
            other => panic!("expected a compile error, got {other}"),
        }
    }

    #[test]
    fn vertex_failure_is_reported_first() {
        let vs = ShaderSource::vertex("broken.vert", "@vertex fn vs_main(");
        let fs = ShaderSource::fragment("broken.frag", "not wgsl at all");

        let err = build_program(&vs, &fs).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { kind: StageKind::Vertex, .. }));
    }

    #[test]
    fn two_vertex_stages_fail_to_link() {
        let (vs, _) = DemoVariant::Solid.shaders();
        let err = shader::link(shader::compile(&vs).unwrap(), shader::compile(&vs).unwrap())
            .unwrap_err();

        assert!(matches!(err, ShaderError::Link { .. }));
        assert!(!err.log().is_empty());
    }

    // ── teardown ──────────────────────────────────────────────────────────

    struct Recorded {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Release for Recorded {
        fn release(self) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn recorded(name: &'static str, log: &Rc<RefCell<Vec<&'static str>>>) -> Recorded {
        Recorded { name, log: Rc::clone(log) }
    }

    #[test]
    fn scene_releases_program_then_mesh_then_texture() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let scene = QuadScene {
            program: recorded("program", &log),
            mesh: recorded("mesh", &log),
            texture: Some(recorded("texture", &log)),
        };

        scene.release();
        assert_eq!(*log.borrow(), ["program", "mesh", "texture"]);
    }

    #[test]
    fn untextured_scene_releases_program_then_mesh() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let scene: QuadScene<Recorded, Recorded, Recorded> = QuadScene {
            program: recorded("program", &log),
            mesh: recorded("mesh", &log),
            texture: None,
        };

        scene.release();
        assert_eq!(*log.borrow(), ["program", "mesh"]);
    }
}
