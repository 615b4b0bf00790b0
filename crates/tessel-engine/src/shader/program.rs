use super::interface::{
    describe_type, entry_inputs, entry_outputs, is_float_color, used_resources,
    vertex_format_matches,
};
use super::{CompiledStage, Diagnostic, InterfaceVar, ResourceSlot, ShaderError, StageKind};

/// Validated IR of one linked stage, kept only until the GPU pipeline is built.
#[derive(Debug)]
pub(crate) struct StageModule {
    pub label: String,
    pub module: naga::Module,
    pub entry_point: String,
}

impl StageModule {
    fn from_stage(stage: CompiledStage) -> Self {
        let entry_point = stage.entry_point_name().to_owned();
        Self {
            label: stage.label().to_owned(),
            module: stage.module,
            entry_point,
        }
    }
}

/// A vertex + fragment pair whose interfaces and resource bindings agree.
///
/// Carries the reflection the GPU side needs: the vertex inputs (to check the
/// mesh layout) and the resource slots (to build the bind group layout).
#[derive(Debug)]
pub struct LinkedProgram {
    pub(crate) vertex: StageModule,
    pub(crate) fragment: StageModule,
    vertex_inputs: Vec<InterfaceVar>,
    resources: Vec<ResourceSlot>,
}

impl LinkedProgram {
    /// `@location` inputs of the vertex entry point, sorted by location.
    pub fn vertex_inputs(&self) -> &[InterfaceVar] {
        &self.vertex_inputs
    }

    /// Resource bindings used by either stage, sorted by `(group, binding)`.
    pub fn resources(&self) -> &[ResourceSlot] {
        &self.resources
    }

    /// Checks that `attributes` feed every vertex input with a compatible format.
    pub fn check_vertex_attributes(
        &self,
        attributes: &[wgpu::VertexAttribute],
    ) -> Result<(), ShaderError> {
        let problems: Vec<String> = self
            .vertex_inputs
            .iter()
            .filter_map(|input| {
                match attributes.iter().find(|a| a.shader_location == input.location) {
                    None => Some(format!(
                        "error: vertex input @location({}) has no vertex attribute",
                        input.location
                    )),
                    Some(a) if !vertex_format_matches(&input.ty, a.format) => Some(format!(
                        "error: vertex input @location({}) is {}, attribute format is {:?}",
                        input.location,
                        describe_type(&input.ty),
                        a.format
                    )),
                    Some(_) => None,
                }
            })
            .collect();

        if problems.is_empty() { Ok(()) } else { Err(link_error(problems)) }
    }
}

/// Links a vertex and a fragment stage.
///
/// Both stages are consumed: what the program keeps moves into it, the rest
/// is dropped when this returns, whether linking succeeded or not. Every
/// problem found is reported, one line each, in a bounded log.
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<LinkedProgram, ShaderError> {
    let mut problems = Vec::new();

    for (slot, stage) in [(StageKind::Vertex, &vertex), (StageKind::Fragment, &fragment)] {
        if stage.kind() != slot {
            problems.push(format!(
                "error: {slot} slot holds {} stage '{}'",
                stage.kind(),
                stage.label()
            ));
        }
    }
    // Interface checks are meaningless with the wrong stage in a slot.
    if !problems.is_empty() {
        return Err(link_error(problems));
    }

    let vs_out = entry_outputs(&vertex);
    let fs_in = entry_inputs(&fragment);
    let fs_out = entry_outputs(&fragment);

    if !vs_out.writes_position() {
        problems.push(format!(
            "error: vertex stage '{}' does not write @builtin(position)",
            vertex.label()
        ));
    }

    for input in &fs_in.vars {
        match vs_out.location(input.location) {
            None => problems.push(format!(
                "error: fragment input @location({}) is not written by the vertex stage",
                input.location
            )),
            Some(out) if out.ty != input.ty => problems.push(format!(
                "error: @location({}) type mismatch: vertex writes {}, fragment reads {}",
                input.location,
                describe_type(&out.ty),
                describe_type(&input.ty)
            )),
            Some(out) if !out.qualifiers_match(input) => problems.push(format!(
                "error: @location({}) interpolation mismatch: vertex writes {}, fragment reads {}",
                input.location,
                out.describe_qualifiers(),
                input.describe_qualifiers()
            )),
            Some(_) => {}
        }
    }

    match fs_out.location(0) {
        None => problems.push(format!(
            "error: fragment stage '{}' does not write a color at @location(0)",
            fragment.label()
        )),
        Some(color) if !is_float_color(&color.ty) => problems.push(format!(
            "error: fragment color @location(0) is {}, the color target needs a float value",
            describe_type(&color.ty)
        )),
        Some(_) => {}
    }

    let resources = merge_resources(&vertex, &fragment, &mut problems);

    if !problems.is_empty() {
        return Err(link_error(problems));
    }

    let mut vertex_inputs = entry_inputs(&vertex).vars;
    vertex_inputs.sort_by_key(|v| v.location);

    let program = LinkedProgram {
        vertex: StageModule::from_stage(vertex),
        fragment: StageModule::from_stage(fragment),
        vertex_inputs,
        resources,
    };

    log::info!(
        "linked program '{}' + '{}' ({} resource slot(s))",
        program.vertex.label,
        program.fragment.label,
        program.resources.len()
    );

    Ok(program)
}

fn merge_resources(
    vertex: &CompiledStage,
    fragment: &CompiledStage,
    problems: &mut Vec<String>,
) -> Vec<ResourceSlot> {
    let mut slots: Vec<ResourceSlot> = Vec::new();

    for stage in [vertex, fragment] {
        let visibility = stage.kind().wgpu_stages();

        for res in used_resources(stage) {
            let kind = match res.kind {
                Ok(kind) => kind,
                Err(ty) => {
                    problems.push(format!(
                        "error: @group({}) @binding({}) in {} stage has unsupported type {ty}",
                        res.group,
                        res.binding,
                        stage.kind()
                    ));
                    continue;
                }
            };

            if res.group != 0 {
                problems.push(format!(
                    "error: @group({}) @binding({}): only bind group 0 is supported",
                    res.group, res.binding
                ));
                continue;
            }

            match slots
                .iter_mut()
                .find(|s| s.group == res.group && s.binding == res.binding)
            {
                Some(existing) if existing.kind != kind => problems.push(format!(
                    "error: @group({}) @binding({}) is {:?} in one stage and {:?} in another",
                    res.group, res.binding, existing.kind, kind
                )),
                Some(existing) => existing.visibility |= visibility,
                None => slots.push(ResourceSlot {
                    group: res.group,
                    binding: res.binding,
                    kind,
                    name: res.name,
                    visibility,
                }),
            }
        }
    }

    slots.sort_by_key(|s| (s.group, s.binding));
    slots
}

fn link_error(problems: Vec<String>) -> ShaderError {
    ShaderError::Link {
        log: Diagnostic::new(problems.join("\n")),
    }
}
