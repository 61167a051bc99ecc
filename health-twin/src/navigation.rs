//! Sidebar shared by every page

use crate::pages::Page;

pub const BRAND_TITLE: &str = "👨‍⚕️ AI Health Twin";
pub const FOOTER: &str = "© 2025 AI Health Twin | Your Digital Health Companion";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub page: Page,
    pub label: &'static str,
    pub command: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar {
    pub title: &'static str,
    pub links: Vec<NavLink>,
    pub footer: &'static str,
}

impl Sidebar {
    /// Sidebar with `current` highlighted
    pub fn for_page(current: Page) -> Self {
        let links = Page::ALL
            .iter()
            .map(|&page| NavLink {
                page,
                label: page.label(),
                command: page.command(),
                active: page == current,
            })
            .collect();

        Self {
            title: BRAND_TITLE,
            links,
            footer: FOOTER,
        }
    }

    pub fn render(&self) -> String {
        let width = self
            .links
            .iter()
            .map(|l| l.label.chars().count())
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        out.push_str(self.title);
        out.push('\n');
        for link in &self.links {
            let marker = if link.active { '▸' } else { ' ' };
            out.push_str(&format!(
                "{} {:<width$}  health-twin {}\n",
                marker,
                link.label,
                link.command,
                width = width
            ));
        }
        out.push_str("---\n");
        out.push_str(self.footer);
        out
    }
}

pub fn render_sidebar(current: Page) -> String {
    Sidebar::for_page(current).render()
}
