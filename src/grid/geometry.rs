use thiserror::Error;

use crate::core::{
    ImageSize,
    Vertex,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("image dimensions {width}x{height} cannot be used for normalization")]
    DegenerateImage { width: u32, height: u32 },
}

impl ImageSize {
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.width == 0 || self.height == 0 {
            return Err(GeometryError::DegenerateImage { width: self.width, height: self.height });
        }
        Ok(())
    }
}

/// Normalized centroid of a polygon, or `None` when either axis has no usable
/// coordinate. Each axis is averaged over its own present values.
pub fn resolve_center(polygon: &[Vertex], image: ImageSize) -> Option<(f64, f64)> {
    if image.width == 0 || image.height == 0 {
        return None;
    }

    let xs: Vec<f64> = polygon.iter().filter_map(|v| v.x).collect();
    let ys: Vec<f64> = polygon.iter().filter_map(|v| v.y).collect();

    if xs.is_empty() || ys.is_empty() {
        return None;
    }

    let cx = xs.iter().sum::<f64>() / xs.len() as f64;
    let cy = ys.iter().sum::<f64>() / ys.len() as f64;

    Some((cx / image.width as f64, cy / image.height as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Vertex> {
        vec![Vertex::new(x0, y0), Vertex::new(x1, y0), Vertex::new(x1, y1), Vertex::new(x0, y1)]
    }

    #[test]
    fn centroid_is_normalized_mean() {
        let center = resolve_center(&square(100.0, 50.0, 300.0, 150.0), ImageSize::new(1000, 500));
        assert_eq!(center, Some((0.2, 0.2)));
    }

    #[test]
    fn missing_coordinates_are_dropped_per_axis() {
        let polygon = vec![
            Vertex { x: None, y: Some(0.0) },
            Vertex { x: Some(200.0), y: None },
            Vertex { x: Some(400.0), y: Some(100.0) },
        ];
        let center = resolve_center(&polygon, ImageSize::new(1000, 100));
        assert_eq!(center, Some((0.3, 0.5)));
    }

    #[test]
    fn axis_without_values_is_unresolvable() {
        let no_y = vec![Vertex { x: Some(1.0), y: None }, Vertex { x: Some(3.0), y: None }];
        assert_eq!(resolve_center(&no_y, ImageSize::new(10, 10)), None);
        assert_eq!(resolve_center(&[], ImageSize::new(10, 10)), None);
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        assert_eq!(resolve_center(&square(0.0, 0.0, 1.0, 1.0), ImageSize::new(0, 10)), None);
        assert_eq!(
            ImageSize::new(640, 0).validate(),
            Err(GeometryError::DegenerateImage { width: 640, height: 0 })
        );
        assert!(ImageSize::new(640, 480).validate().is_ok());
    }
}
