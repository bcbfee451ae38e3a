//! Aspect-ratio containment of an image inside a field rectangle

use super::PdfRect;

/// Where an image lands inside a field, relative to the field origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Containment {
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Containment {
    /// Scales an `image_width` × `image_height` image to fit entirely
    /// inside `field`, centered along the axis it does not fill.
    ///
    /// Equal ratios take the fit-to-height branch.
    pub fn fit(image_width: f64, image_height: f64, field: &PdfRect) -> Self {
        let image_ratio = image_width / image_height;
        let field_ratio = field.aspect_ratio();

        if image_ratio > field_ratio {
            let draw_height = field.width / image_ratio;
            Self {
                draw_width: field.width,
                draw_height,
                offset_x: 0.0,
                offset_y: (field.height - draw_height) / 2.0,
            }
        } else {
            let draw_width = field.height * image_ratio;
            Self {
                draw_width,
                draw_height: field.height,
                offset_x: (field.width - draw_width) / 2.0,
                offset_y: 0.0,
            }
        }
    }

    /// Absolute drawing origin in PDF points.
    pub fn origin(&self, field: &PdfRect) -> (f64, f64) {
        (field.x + self.offset_x, field.y + self.offset_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_image_fits_width() {
        let fit = Containment::fit(200.0, 100.0, &PdfRect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(
            fit,
            Containment { draw_width: 100.0, draw_height: 50.0, offset_x: 0.0, offset_y: 25.0 }
        );
    }

    #[test]
    fn test_tall_image_fits_height() {
        let fit = Containment::fit(50.0, 100.0, &PdfRect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(
            fit,
            Containment { draw_width: 50.0, draw_height: 100.0, offset_x: 25.0, offset_y: 0.0 }
        );
    }

    #[test]
    fn test_equal_ratio_takes_height_branch() {
        let field = PdfRect::new(10.0, 20.0, 200.0, 50.0);
        let fit = Containment::fit(400.0, 100.0, &field);

        assert_eq!(fit.draw_height, 50.0);
        assert_eq!(fit.draw_width, 200.0);
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, 0.0);
        assert_eq!(fit.origin(&field), (10.0, 20.0));
    }

    #[test]
    fn test_origin_is_offset_from_field_corner() {
        let field = PdfRect::new(100.0, 700.0, 200.0, 50.0);
        let fit = Containment::fit(640.0, 320.0, &field);

        assert_eq!(fit.draw_width, 100.0);
        assert_eq!(fit.origin(&field), (150.0, 700.0));
    }
}
