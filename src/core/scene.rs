//! The narrow view of a 3D scene that the merger works on.
//!
//! A container parser only has to say how many meshes there are, list the primitives
//! of all meshes in order, and give access to each primitive's positions, indices and
//! colors. [`Scene`] is an in-memory implementation used for synthetic documents.

use thiserror::Error;

use crate::core::shared::POSITION_COMPONENTS;

/// A single drawable geometry unit.
pub trait PrimitiveSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Name of the mesh owning this primitive, or an empty string.
    fn name(&self) -> &str;

    /// Number of vertices, or `None` when the primitive has no position attribute.
    fn vertex_count(&self) -> Option<usize>;

    /// Number of indices, or `None` when the primitive is not indexed.
    fn index_count(&self) -> Option<usize>;

    /// Total number of scalar values in the color attribute (vertices times components),
    /// or `None` when the primitive has no color attribute.
    fn color_value_count(&self) -> Option<usize>;

    /// Fills `out` with the flattened xyz positions. `out` holds exactly `3 * vertex_count` values.
    fn read_positions(&self, out: &mut [f32]) -> Result<(), Self::Error>;

    /// Fills `out` with the primitive-local indices. `out` holds exactly `index_count` values.
    fn read_indices(&self, out: &mut [u32]) -> Result<(), Self::Error>;

    /// Fills `out` with the flattened color values as stored, either normalized to [0,1] or
    /// in [0,255]. `out` holds exactly `color_value_count` values.
    fn read_colors(&self, out: &mut [f32]) -> Result<(), Self::Error>;
}

/// An ordered collection of meshes, each with an ordered list of primitives.
pub trait SceneSource {
    type Primitive<'a>: PrimitiveSource where Self: 'a;

    fn num_meshes(&self) -> usize;

    /// Primitives of every mesh, mesh by mesh, in document order.
    fn primitives(&self) -> Vec<Self::Primitive<'_>>;
}


#[remain::sorted]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Err {
    #[error("Attribute {0} holds {1} values but {2} were requested.")]
    LengthMismatch(&'static str, usize, usize),
    #[error("Attribute {0} is missing.")]
    Missing(&'static str),
}

/// Owned primitive data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenePrimitive {
    pub positions: Option<Vec<[f32; 3]>>,
    pub indices: Option<Vec<u32>>,
    /// Flattened color values, 3 or 4 per vertex.
    pub colors: Option<Vec<f32>>,
}

impl ScenePrimitive {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions: Some(positions),
            indices: Some(indices),
            colors: None,
        }
    }

    pub fn with_rgb(mut self, colors: Vec<[f32; 3]>) -> Self {
        self.colors = Some(colors.into_iter().flatten().collect());
        self
    }

    pub fn with_rgba(mut self, colors: Vec<[f32; 4]>) -> Self {
        self.colors = Some(colors.into_iter().flatten().collect());
        self
    }

    /// Sets the color values without any assumption on the number of components.
    pub fn with_raw_colors(mut self, colors: Vec<f32>) -> Self {
        self.colors = Some(colors);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneMesh {
    pub name: String,
    pub primitives: Vec<ScenePrimitive>,
}

impl SceneMesh {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitives: Vec::new(),
        }
    }

    pub fn with_primitive(mut self, primitive: ScenePrimitive) -> Self {
        self.primitives.push(primitive);
        self
    }
}

/// In-memory scene document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub meshes: Vec<SceneMesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self { meshes: Vec::new() }
    }

    pub fn with_mesh(mut self, mesh: SceneMesh) -> Self {
        self.meshes.push(mesh);
        self
    }
}

/// A primitive of [`Scene`] borrowed together with the name of its mesh.
#[derive(Debug, Clone, Copy)]
pub struct ScenePrimitiveRef<'a> {
    name: &'a str,
    primitive: &'a ScenePrimitive,
}

impl PrimitiveSource for ScenePrimitiveRef<'_> {
    type Error = Err;

    fn name(&self) -> &str {
        self.name
    }

    fn vertex_count(&self) -> Option<usize> {
        self.primitive.positions.as_ref().map(Vec::len)
    }

    fn index_count(&self) -> Option<usize> {
        self.primitive.indices.as_ref().map(Vec::len)
    }

    fn color_value_count(&self) -> Option<usize> {
        self.primitive.colors.as_ref().map(Vec::len)
    }

    fn read_positions(&self, out: &mut [f32]) -> Result<(), Err> {
        let positions = self.primitive.positions.as_ref().ok_or(Err::Missing("POSITION"))?;
        if positions.len() * POSITION_COMPONENTS != out.len() {
            return Err(Err::LengthMismatch("POSITION", positions.len() * POSITION_COMPONENTS, out.len()));
        }
        for (dst, src) in out.chunks_exact_mut(POSITION_COMPONENTS).zip(positions) {
            dst.copy_from_slice(src);
        }
        Ok(())
    }

    fn read_indices(&self, out: &mut [u32]) -> Result<(), Err> {
        let indices = self.primitive.indices.as_ref().ok_or(Err::Missing("indices"))?;
        if indices.len() != out.len() {
            return Err(Err::LengthMismatch("indices", indices.len(), out.len()));
        }
        out.copy_from_slice(indices);
        Ok(())
    }

    fn read_colors(&self, out: &mut [f32]) -> Result<(), Err> {
        let colors = self.primitive.colors.as_ref().ok_or(Err::Missing("COLOR_0"))?;
        if colors.len() != out.len() {
            return Err(Err::LengthMismatch("COLOR_0", colors.len(), out.len()));
        }
        out.copy_from_slice(colors);
        Ok(())
    }
}

impl SceneSource for Scene {
    type Primitive<'a> = ScenePrimitiveRef<'a>;

    fn num_meshes(&self) -> usize {
        self.meshes.len()
    }

    fn primitives(&self) -> Vec<ScenePrimitiveRef<'_>> {
        self.meshes
            .iter()
            .flat_map(|mesh| {
                mesh.primitives.iter().map(move |primitive| ScenePrimitiveRef {
                    name: &mesh.name,
                    primitive,
                })
            })
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_are_flattened_in_document_order() {
        let scene = Scene::new()
            .with_mesh(
                SceneMesh::new("a")
                    .with_primitive(ScenePrimitive::new(vec![[0.0; 3]; 3], vec![0, 1, 2]))
                    .with_primitive(ScenePrimitive::new(vec![[1.0; 3]; 4], vec![0, 1, 2, 1, 2, 3])),
            )
            .with_mesh(SceneMesh::new("b").with_primitive(ScenePrimitive::new(vec![[2.0; 3]; 5], vec![0, 1, 4])));

        let primitives = scene.primitives();
        assert_eq!(scene.num_meshes(), 2);
        assert_eq!(
            primitives.iter().map(|p| (p.name(), p.vertex_count())).collect::<Vec<_>>(),
            vec![("a", Some(3)), ("a", Some(4)), ("b", Some(5))]
        );
    }

    #[test]
    fn read_positions_checks_length() {
        let scene = Scene::new().with_mesh(
            SceneMesh::new("m").with_primitive(ScenePrimitive::new(vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], vec![0, 1, 1])),
        );
        let primitives = scene.primitives();
        let mut out = [0.0; 6];
        primitives[0].read_positions(&mut out).unwrap();
        assert_eq!(out, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);

        let mut short = [0.0; 3];
        assert_eq!(
            primitives[0].read_positions(&mut short),
            Err(Err::LengthMismatch("POSITION", 6, 3))
        );
    }

    #[test]
    fn rgb_colors_are_flattened() {
        let primitive = ScenePrimitive::new(vec![[0.0; 3]; 2], vec![0, 1, 1])
            .with_rgb(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(primitive.colors, Some(vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0]));
    }

    #[test]
    fn read_colors_fills_exact_slice() {
        let scene = Scene::new().with_mesh(SceneMesh::new("m").with_primitive(
            ScenePrimitive::new(vec![[0.0; 3]; 2], vec![0, 1, 1]).with_rgb(vec![[0.25; 3], [0.75; 3]]),
        ));
        let primitives = scene.primitives();
        let mut out = [0.0; 6];
        primitives[0].read_colors(&mut out).unwrap();
        assert_eq!(out, [0.25, 0.25, 0.25, 0.75, 0.75, 0.75]);

        let mut long = [0.0; 8];
        assert_eq!(primitives[0].read_colors(&mut long), Err(Err::LengthMismatch("COLOR_0", 6, 8)));
    }
}
