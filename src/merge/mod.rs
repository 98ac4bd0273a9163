pub mod color;

use thiserror::Error;

use crate::core::mesh::{Annotation, MergedMesh, Region};
use crate::core::scene::{PrimitiveSource, SceneSource};
use crate::core::shared::{ConfigType, POSITION_COMPONENTS, RGBA_CHANNELS};
use self::color::ColorLayout;

/// Decides when the merger labels every vertex with the index of its primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationMode {
    /// Annotate when the scene has more than one primitive, every primitive is named,
    /// colors are present, and the first primitive has 3 or 4 color components.
    Auto,
    /// Never annotate.
    Disabled,
}

#[derive(Debug, Clone)]
pub struct Config {
    annotation: AnnotationMode,
}

impl ConfigType for Config {
    fn default() -> Self {
        Self {
            annotation: AnnotationMode::Auto,
        }
    }
}

impl Config {
    pub fn with_annotation(mut self, mode: AnnotationMode) -> Self {
        self.annotation = mode;
        self
    }

    pub fn annotation(&self) -> AnnotationMode {
        self.annotation
    }
}

#[remain::sorted]
#[derive(Error, Debug)]
pub enum Err {
    #[error("No meshes found in the scene.")]
    EmptyScene,
    #[error("Primitive {primitive} has index {index} but only {num_vertices} vertices.")]
    IndexOutOfRange { primitive: usize, index: u32, num_vertices: usize },
    #[error("Merged mesh is inconsistent: {0}")]
    Mesh(#[from] crate::core::mesh::Err),
    #[error("Primitive {primitive} has no {attribute}.")]
    MissingAttribute { primitive: usize, attribute: &'static str },
    #[error("Primitive {primitive} has {num_indices} indices, which do not form triangles.")]
    NotTriangles { primitive: usize, num_indices: usize },
    #[error("Failed to read primitive {0}: {1}")]
    Source(usize, #[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("The scene has {0} vertices, more than a 32-bit index can address.")]
    TooManyVertices(usize),
}

/// What the first pass learns about a primitive.
#[derive(Debug, Clone, Copy)]
struct PrimitiveStats {
    num_vertices: usize,
    num_indices: usize,
    color_layout: Option<ColorLayout>,
}

/// Flattens every primitive of `scene` into a single mesh.
///
/// The first pass sizes the output buffers exactly; the second pass fills them, shifting
/// the indices of each primitive by the number of vertices of all earlier primitives.
pub fn merge<S: SceneSource>(scene: &S, cfg: &Config) -> Result<MergedMesh, Err> {
    if scene.num_meshes() == 0 {
        return Err(Err::EmptyScene);
    }
    let primitives = scene.primitives();

    // Pass 1: sizes.
    let mut stats = Vec::with_capacity(primitives.len());
    let mut total_vertices = 0usize;
    let mut total_indices = 0usize;
    for (i, primitive) in primitives.iter().enumerate() {
        let num_vertices = primitive
            .vertex_count()
            .ok_or(Err::MissingAttribute { primitive: i, attribute: "POSITION" })?;
        let num_indices = primitive
            .index_count()
            .filter(|&n| n > 0)
            .ok_or(Err::MissingAttribute { primitive: i, attribute: "indices" })?;
        if num_vertices > 0 && num_indices % 3 != 0 {
            return Err(Err::NotTriangles { primitive: i, num_indices });
        }
        let color_layout = primitive
            .color_value_count()
            .map(|n| ColorLayout::infer(n, num_vertices));
        if color_layout == Some(ColorLayout::Unexpected) && num_vertices > 0 {
            tracing::warn!(
                "Primitive {} has {:?} color values for {} vertices; using white.",
                i,
                primitive.color_value_count(),
                num_vertices
            );
        }
        if num_vertices > 0 {
            total_vertices += num_vertices;
            total_indices += num_indices;
        }
        stats.push(PrimitiveStats { num_vertices, num_indices, color_layout });
    }
    if u32::try_from(total_vertices).is_err() {
        return Err(Err::TooManyVertices(total_vertices));
    }

    let has_colors = stats.iter().any(|s| s.color_layout.is_some());
    let annotate = match cfg.annotation {
        AnnotationMode::Disabled => false,
        AnnotationMode::Auto => {
            primitives.len() > 1
                && primitives.iter().all(|p| !p.name().is_empty())
                && has_colors
                && stats[0].color_layout.and_then(ColorLayout::num_components).is_some_and(|n| n >= 3)
        }
    };

    // Pass 2: fill.
    let mut positions = vec![0.0f32; total_vertices * POSITION_COMPONENTS];
    let mut indices = vec![0u32; total_indices];
    let mut colors = has_colors.then(|| vec![0u8; total_vertices * RGBA_CHANNELS]);
    let mut scalars = annotate.then(|| vec![0.0f32; total_vertices]);
    let mut annotation = annotate.then(Annotation::new);
    // scratch for one primitive's color values, sized for the largest one
    let max_color_values = stats
        .iter()
        .filter_map(|s| Some(s.num_vertices * s.color_layout?.num_components()?))
        .max()
        .unwrap_or(0);
    let mut color_values = vec![0.0f32; max_color_values];

    let mut vertex_offset = 0usize;
    let mut index_offset = 0usize;
    for (i, (primitive, s)) in primitives.iter().zip(&stats).enumerate() {
        if s.num_vertices == 0 {
            tracing::debug!("Skipping primitive {} without vertices.", i);
            continue;
        }
        let vertex_range = vertex_offset..vertex_offset + s.num_vertices;
        let index_range = index_offset..index_offset + s.num_indices;

        primitive
            .read_positions(&mut positions[vertex_range.start * POSITION_COMPONENTS..vertex_range.end * POSITION_COMPONENTS])
            .map_err(|e| Err::Source(i, Box::new(e)))?;

        let dst = &mut indices[index_range.clone()];
        primitive.read_indices(dst).map_err(|e| Err::Source(i, Box::new(e)))?;
        if let Some(&index) = dst.iter().find(|&&idx| idx as usize >= s.num_vertices) {
            return Err(Err::IndexOutOfRange { primitive: i, index, num_vertices: s.num_vertices });
        }
        let offset = u32::try_from(vertex_offset).map_err(|_| Err::TooManyVertices(total_vertices))?;
        dst.iter_mut().for_each(|idx| *idx += offset);

        let mut last_rgb = [255, 255, 255];
        if let Some(colors) = colors.as_mut() {
            let values = match s.color_layout.and_then(ColorLayout::num_components) {
                Some(components) => {
                    let values = &mut color_values[..s.num_vertices * components];
                    primitive.read_colors(values).map_err(|e| Err::Source(i, Box::new(e)))?;
                    Some(&*values)
                }
                None => None,
            };
            last_rgb = color::fill_rgba(
                s.color_layout,
                values,
                &mut colors[vertex_range.start * RGBA_CHANNELS..vertex_range.end * RGBA_CHANNELS],
            );
        }

        if let (Some(scalars), Some(annotation)) = (scalars.as_mut(), annotation.as_mut()) {
            scalars[vertex_range.clone()].fill(i as f32);
            annotation.insert(
                i as u32,
                Region {
                    name: primitive.name().to_string(),
                    r: last_rgb[0],
                    g: last_rgb[1],
                    b: last_rgb[2],
                },
            );
        }

        tracing::debug!(
            "Primitive {} ({:?}): {} vertices, {} indices, colors {:?}, vertex offset {}",
            i,
            primitive.name(),
            s.num_vertices,
            s.num_indices,
            s.color_layout,
            vertex_offset
        );

        vertex_offset = vertex_range.end;
        index_offset = index_range.end;
    }
    debug_assert_eq!(vertex_offset, total_vertices);
    debug_assert_eq!(index_offset, total_indices);

    tracing::info!(
        "Merged {} meshes, {} primitives: {} vertices, {} faces, colors: {}, annotated regions: {}",
        scene.num_meshes(),
        primitives.len(),
        total_vertices,
        total_indices / 3,
        has_colors,
        annotation.as_ref().map_or(0, Annotation::len)
    );

    Ok(MergedMesh::from_parts(positions, indices, colors, scalars, annotation)?)
}
