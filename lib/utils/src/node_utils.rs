use web_sys::HtmlElement;

/// Measurements of a scrollable element, in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollGeometry {
    pub scroll_top: i32,
    pub client_height: i32,
    pub scroll_height: i32,
}

impl ScrollGeometry {
    pub fn new(scroll_top: i32, client_height: i32, scroll_height: i32) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Offset of the bottom edge of the visible area within the content
    pub fn position(&self) -> i32 {
        self.client_height + self.scroll_top
    }

    pub fn distance_to_bottom(&self) -> i32 {
        self.scroll_height - self.position()
    }
}

pub fn get_scroll_geometry(element: &HtmlElement) -> ScrollGeometry {
    ScrollGeometry::new(element.scroll_top(), element.client_height(), element.scroll_height())
}

#[cfg(test)]
mod tests {
    use crate::node_utils::ScrollGeometry;

    #[test]
    fn test_scroll_geometry_distance_to_bottom() {
        let geometry = ScrollGeometry::new(1100, 500, 2000);
        assert_eq!(geometry.position(), 1600);
        assert_eq!(geometry.distance_to_bottom(), 400);

        let geometry = ScrollGeometry::new(1500, 500, 2000);
        assert_eq!(geometry.distance_to_bottom(), 0);
    }

    #[test]
    fn test_scroll_geometry_short_content() {
        let geometry = ScrollGeometry::new(0, 800, 300);
        assert_eq!(geometry.distance_to_bottom(), -500);
    }
}
