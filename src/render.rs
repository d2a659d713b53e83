use crate::math::Vec2;

/// Flat buffers the page reads after each tick: `[x0, y0, x1, y1, ...]` and one
/// radius per entity. Simulation state never holds a rendering handle.
#[derive(Clone, Debug, Default)]
pub struct RenderBuffers {
    positions: Vec<f64>,
    radii: Vec<f64>,
}

impl RenderBuffers {
    pub fn sync<I>(&mut self, entities: I)
    where
        I: IntoIterator<Item = (Vec2, f64)>,
    {
        self.positions.clear();
        self.radii.clear();
        for (position, radius) in entities {
            self.positions.push(position.x);
            self.positions.push(position.y);
            self.radii.push(radius);
        }
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn len(&self) -> usize {
        self.radii.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radii.is_empty()
    }
}
