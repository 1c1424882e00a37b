//! Toolkit-independent view tree
//!
//! [`WindowView::build`] walks the config once and produces everything a
//! front end needs to draw: window geometry, pages, groups and rows with
//! markup-escaped text. Each row borrows the [`Item`] it came from so the
//! front end can hand the whole item to the dispatcher.

use crate::config::{Config, Item};
use crate::markup::Markup;

/// Label of the button attached to every row
pub const RUN_LABEL: &str = "Run";

#[derive(Clone, Debug)]
pub struct WindowView<'a> {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub pages: Vec<PageView<'a>>,
}

#[derive(Clone, Debug)]
pub struct PageView<'a> {
    pub title: String,
    pub icon: String,
    pub groups: Vec<GroupView<'a>>,
}

#[derive(Clone, Debug)]
pub struct GroupView<'a> {
    pub title: Markup,
    pub rows: Vec<RowView<'a>>,
}

#[derive(Clone, Debug)]
pub struct RowView<'a> {
    pub title: Markup,
    pub subtitle: Markup,
    pub icon: String,
    pub action_label: &'static str,
    pub item: &'a Item,
}

impl<'a> WindowView<'a> {
    pub fn build(config: &'a Config) -> Self {
        Self {
            title: config.window.title.clone(),
            width: config.window.width,
            height: config.window.height,
            pages: config
                .pages
                .iter()
                .map(|page| PageView {
                    title: page.name.clone(),
                    icon: page.icon.clone(),
                    groups: page
                        .groups
                        .iter()
                        .map(|group| GroupView {
                            title: Markup::escape(group.title.as_str()),
                            rows: group.items.iter().map(RowView::build).collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    /// Look up a row by position
    pub fn row(&self, page: usize, group: usize, row: usize) -> Option<&RowView<'a>> {
        self.pages.get(page)?.groups.get(group)?.rows.get(row)
    }
}

impl<'a> PageView<'a> {
    /// Rows of every group, in display order
    pub fn rows(&self) -> impl Iterator<Item = &RowView<'a>> {
        self.groups.iter().flat_map(|g| g.rows.iter())
    }

    pub fn row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}

impl<'a> RowView<'a> {
    fn build(item: &'a Item) -> Self {
        Self {
            title: Markup::escape(item.title.as_str()),
            subtitle: Markup::escape(item.description.as_str()),
            icon: item.icon.clone(),
            action_label: RUN_LABEL,
            item,
        }
    }
}
