use ledgerbell_panel::{surface::PanelSurface, view::Badge};

/// Renders the panel to stdout, one snapshot per applied update
///
/// Stands in for the hosting page: the header line mirrors the badge element,
/// the fragment below it is what would be written into the dropdown's list
/// container.
#[derive(Clone, Copy, Default)]
pub struct TerminalSurface;

impl PanelSurface for TerminalSurface {
    fn badge_present(&self) -> bool {
        true
    }

    fn apply_badge(&self, badge: &Badge) {
        match badge.text() {
            Some(text) => println!("== notifications [{text}] =="),
            None => println!("== notifications =="),
        }
    }

    fn apply_list(&self, html: &str) {
        println!("{html}");
    }
}
