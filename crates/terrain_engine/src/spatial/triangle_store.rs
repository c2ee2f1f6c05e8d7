//! Flat triangle storage feeding k-d tree construction

use crate::physics::Triangle;
use super::SpatialError;

/// Index of a triangle inside a [`TriangleStore`], valid until the next purge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriangleId(u32);

impl TriangleId {
    /// Position of the triangle in the store
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Callers bound `index` by a u32 triangle count
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

/// All world-space triangles contributed by the current terrain
///
/// Append-only between purges, so ids handed out earlier stay valid until
/// [`TriangleStore::purge`] is called.
#[derive(Debug, Clone, Default)]
pub struct TriangleStore {
    triangles: Vec<Triangle>,
}

impl TriangleStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one triangle
    pub fn add(&mut self, triangle: Triangle) -> Result<TriangleId, SpatialError> {
        if !triangle.is_finite() {
            return Err(SpatialError::DataError { index: 0 });
        }
        let id = self.next_id()?;
        self.triangles.push(triangle);
        Ok(id)
    }

    /// Append a batch of triangles
    ///
    /// The whole batch is validated first; on error nothing is appended.
    pub fn add_all(&mut self, triangles: &[Triangle]) -> Result<usize, SpatialError> {
        if let Some(index) = triangles.iter().position(|tri| !tri.is_finite()) {
            return Err(SpatialError::DataError { index });
        }
        if u32::try_from(self.triangles.len() + triangles.len()).is_err() {
            return Err(SpatialError::InvalidArgument("triangle store is full".to_string()));
        }
        self.triangles.extend_from_slice(triangles);
        Ok(triangles.len())
    }

    /// Remove every triangle
    pub fn purge(&mut self) {
        self.triangles.clear();
    }

    /// Look up a triangle by id
    pub fn get(&self, id: TriangleId) -> Option<&Triangle> {
        self.triangles.get(id.index())
    }

    /// All triangles in insertion order
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of stored triangles
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the store holds no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    fn next_id(&self) -> Result<TriangleId, SpatialError> {
        u32::try_from(self.triangles.len())
            .map(TriangleId)
            .map_err(|_| SpatialError::InvalidArgument("triangle store is full".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn tri(offset: f32) -> Triangle {
        Triangle::new(
            Vec3::new(offset, 0.0, 0.0),
            Vec3::new(offset + 1.0, 0.0, 0.0),
            Vec3::new(offset, 0.0, 1.0),
        )
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut store = TriangleStore::new();
        assert_eq!(store.add(tri(0.0)).unwrap().index(), 0);
        assert_eq!(store.add(tri(1.0)).unwrap().index(), 1);
        assert_eq!(store.add_all(&[tri(2.0), tri(3.0)]).unwrap(), 2);

        assert_eq!(store.len(), 4);
        assert_eq!(store.get(TriangleId::from_index(3)), Some(&tri(3.0)));
        assert_eq!(store.get(TriangleId::from_index(4)), None);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut store = TriangleStore::new();
        store.add_all(&[tri(0.0), tri(0.0)]).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_batch_with_nan_is_rejected_atomically() {
        let mut store = TriangleStore::new();
        store.add(tri(0.0)).unwrap();

        let mut bad = tri(5.0);
        bad.v1.z = f32::INFINITY;
        let result = store.add_all(&[tri(1.0), bad, tri(2.0)]);

        assert_eq!(result, Err(SpatialError::DataError { index: 1 }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_purge_empties_store() {
        let mut store = TriangleStore::new();
        store.add_all(&[tri(0.0), tri(1.0)]).unwrap();
        store.purge();
        assert!(store.is_empty());
        assert_eq!(store.get(TriangleId::from_index(0)), None);
    }
}
