//! Sliding-window search of a reference image inside a captured region.

use {
    crate::{config::SEARCH_STRIDE, probe::CapturedRegion, template::ReferenceImage},
    image::RgbImage,
    itertools::iproduct,
    std::num::NonZeroU32,
};

/// Center of a matched sub-region, relative to the top left corner of the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchPosition {
    pub x: u32,
    pub y: u32,
}

impl MatchPosition {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Finds the first sub-region that is similar enough to a template.
///
/// Candidate positions form a grid with `stride` pixels between neighbors and
/// are visited in row-major order. The search stops at the first candidate
/// whose mean absolute difference to the template (over all pixels and the
/// three color channels) is below `255 * (1 - threshold)`. There is no attempt
/// to find the best match, and a match whose offset is not on the grid may be
/// missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateMatcher {
    stride: NonZeroU32,
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new(SEARCH_STRIDE)
    }
}

impl TemplateMatcher {
    pub fn new(stride: NonZeroU32) -> Self {
        Self { stride }
    }

    /// Searches `region` for `template`.
    ///
    /// `threshold` is the required similarity in `(0, 1]`; higher values are
    /// stricter. A threshold of 1 can never be satisfied.
    pub fn find(
        &self,
        region: &CapturedRegion,
        template: &ReferenceImage,
        threshold: f64,
    ) -> Option<MatchPosition> {
        self.find_image(region, template, threshold)
    }

    pub fn is_visible(
        &self,
        region: &CapturedRegion,
        template: &ReferenceImage,
        threshold: f64,
    ) -> bool {
        self.find(region, template, threshold).is_some()
    }

    /// Same as [TemplateMatcher::find] for plain images.
    pub fn find_image(
        &self,
        haystack: &RgbImage,
        needle: &RgbImage,
        threshold: f64,
    ) -> Option<MatchPosition> {
        let (s_w, s_h) = haystack.dimensions();
        let (t_w, t_h) = needle.dimensions();
        if t_w == 0 || t_h == 0 {
            return None;
        }
        // The template must be strictly smaller than the region along both axes.
        let max_x = s_w.checked_sub(t_w)?;
        let max_y = s_h.checked_sub(t_h)?;
        let bound = 255.0 * (1.0 - threshold);
        let stride = self.stride.get() as usize;

        iproduct!((0..max_y).step_by(stride), (0..max_x).step_by(stride))
            .find(|&(y, x)| mean_difference_below(haystack, needle, x, y, bound))
            .map(|(y, x)| MatchPosition::new(x + t_w / 2, y + t_h / 2))
    }
}

/// Checks whether the mean absolute difference between `needle` and the
/// sub-region of `haystack` at (`left`, `top`) is below `bound`.
fn mean_difference_below(
    haystack: &RgbImage,
    needle: &RgbImage,
    left: u32,
    top: u32,
    bound: f64,
) -> bool {
    let samples = (u64::from(needle.width()) * u64::from(needle.height()) * 3) as f64;
    let mut total = 0u64;
    for y in 0..needle.height() {
        for x in 0..needle.width() {
            let a = haystack.get_pixel(left + x, top + y);
            let b = needle.get_pixel(x, y);
            total += a
                .0
                .iter()
                .zip(b.0)
                .map(|(&a, b)| u64::from(a.abs_diff(b)))
                .sum::<u64>();
        }
        // The total only grows, so the candidate can be rejected early.
        if total as f64 / samples >= bound {
            return false;
        }
    }
    total as f64 / samples < bound
}
