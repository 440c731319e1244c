use crate::view::Badge;
use std::sync::Arc;

/// Seam between the panel and whatever actually displays it
///
/// Mirrors the hosting UI: a badge element plus a list container the rendered
/// dropdown fragment is written into. Implementations must be cheap and
/// non-blocking; they are called synchronously from the feed-application path.
pub trait PanelSurface {
    /// Whether the hosting surface has a badge element at all
    ///
    /// A surface without one corresponds to a logged-out session; the panel
    /// never issues a request in that case.
    fn badge_present(&self) -> bool;

    /// Apply a new badge state
    fn apply_badge(&self, badge: &Badge);

    /// Replace the list container's content with a rendered fragment
    fn apply_list(&self, html: &str);
}

impl<S> PanelSurface for Arc<S>
where
    S: PanelSurface + ?Sized,
{
    fn badge_present(&self) -> bool {
        (**self).badge_present()
    }

    fn apply_badge(&self, badge: &Badge) {
        (**self).apply_badge(badge);
    }

    fn apply_list(&self, html: &str) {
        (**self).apply_list(html);
    }
}
