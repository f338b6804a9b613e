//! Deterministic man page renderer for the actions map.
//!
//! The page layout follows the historical yunohost man page byte for byte,
//! so regenerating from an unchanged actions map yields an unchanged page.
//! Names and help texts are emitted verbatim.

use crate::actionsmap::ActionsMap;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

mod format;
mod model;

use format::{
    append_category_section, append_description_section, append_header, append_name_section,
    append_synopsis_section,
};

/// Month and year printed in the `.TH` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDate {
    pub month: String,
    pub year: i32,
}

impl RenderDate {
    /// English full month name, as in `October 2026`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.format("%B").to_string(),
            year: date.year(),
        }
    }
}

/// Rendering summary used for diagnostics.
#[derive(Debug, Serialize, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub categories: usize,
    pub actions: usize,
    pub arguments: usize,
    pub arguments_without_help: usize,
}

/// Rendered man page content plus a summary of what went into it.
pub struct RenderedManPage {
    pub man_page: String,
    pub summary: RenderSummary,
}

/// Render the man page for an already filtered actions map.
pub fn render_man_page(map: &ActionsMap, date: &RenderDate) -> RenderedManPage {
    let mut out = String::new();
    append_header(&mut out, date);
    append_name_section(&mut out);
    append_synopsis_section(&mut out);
    append_description_section(&mut out, map);
    for (name, category) in map.iter() {
        append_category_section(&mut out, name, category);
    }

    RenderedManPage {
        man_page: out,
        summary: build_render_summary(map),
    }
}

fn build_render_summary(map: &ActionsMap) -> RenderSummary {
    let mut summary = RenderSummary {
        categories: map.len(),
        ..RenderSummary::default()
    };
    for category in map.values() {
        summary.actions += category.actions.len();
        for action in category.actions.values() {
            let Some(arguments) = action.arguments.as_ref() else {
                continue;
            };
            summary.arguments += arguments.len();
            summary.arguments_without_help += arguments
                .values()
                .filter(|argument| argument.help.is_none())
                .count();
        }
    }
    summary
}
